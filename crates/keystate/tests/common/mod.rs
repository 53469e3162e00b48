// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Shared state types and serializers for integration tests.

#![allow(dead_code)]

use keystate::core::ser::{Cursor, OutputBuffer, SerResult};
use keystate::dynamic::{DynamicValue, PrimitiveKind, TypeDescriptor, TypeDescriptorBuilder};
use keystate::typeutils::{take_field, SerializerSnapshot, StateValue, TypeSerializer};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub uri: String,
}

impl Path {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
        }
    }
}

impl StateValue for Path {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptorBuilder::new("Path").string_field("uri").build())
    }

    fn to_dynamic(&self) -> DynamicValue {
        let mut fields = HashMap::new();
        fields.insert("uri".to_string(), self.uri.to_dynamic());
        DynamicValue::Struct(fields)
    }

    fn from_dynamic(mut value: DynamicValue) -> SerResult<Self> {
        Ok(Self {
            uri: take_field(&mut value, "uri")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskInfo {
    pub name: String,
    pub attempt: u32,
    pub output: Path,
}

impl StateValue for TaskInfo {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(
            TypeDescriptorBuilder::new("TaskInfo")
                .string_field("name")
                .field("attempt", PrimitiveKind::U32)
                .nested_field("output", Path::type_descriptor())
                .build(),
        )
    }

    fn to_dynamic(&self) -> DynamicValue {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), self.name.to_dynamic());
        fields.insert("attempt".to_string(), self.attempt.to_dynamic());
        fields.insert("output".to_string(), self.output.to_dynamic());
        DynamicValue::Struct(fields)
    }

    fn from_dynamic(mut value: DynamicValue) -> SerResult<Self> {
        Ok(Self {
            name: take_field(&mut value, "name")?,
            attempt: take_field(&mut value, "attempt")?,
            output: take_field(&mut value, "output")?,
        })
    }
}

/// Serializer whose output depends on how many values it has written.
///
/// Each frame is `[sequence: u32][value: i64]`. Decoding checks that frames
/// arrive in the order this instance would have produced them, so two users
/// sharing one instance would trip each other up.
#[derive(Debug, Default)]
pub struct SequencedLongSerializer {
    written: u32,
    read: u32,
    output: OutputBuffer,
}

impl SequencedLongSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn written(&self) -> u32 {
        self.written
    }
}

impl TypeSerializer<i64> for SequencedLongSerializer {
    fn duplicate(&self) -> Box<dyn TypeSerializer<i64>> {
        Box::new(Self::new())
    }

    fn serialize(&mut self, value: &i64) -> SerResult<Vec<u8>> {
        self.output.clear();
        self.output.write_u32_le(self.written);
        self.output.write_i64_le(*value);
        self.written += 1;
        Ok(self.output.to_vec())
    }

    fn deserialize(&mut self, bytes: &[u8]) -> SerResult<i64> {
        let mut cursor = Cursor::new(bytes);
        let sequence = cursor.read_u32_le()?;
        if sequence != self.read {
            return Err(keystate::SerError::InvalidData {
                reason: format!("frame {} out of order, expected {}", sequence, self.read),
            });
        }
        let value = cursor.read_i64_le()?;
        cursor.finish()?;
        self.read += 1;
        Ok(value)
    }

    fn create_instance(&self) -> i64 {
        0
    }

    fn copy(&self, value: &i64) -> i64 {
        *value
    }

    fn length(&self) -> Option<usize> {
        Some(12)
    }

    fn snapshot(&self) -> SerializerSnapshot {
        SerializerSnapshot::Opaque {
            type_name: "sequenced i64".into(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    // Stateless configuration: all instances are format-compatible.
    fn equals(&self, other: &dyn TypeSerializer<i64>) -> bool {
        other.as_any().is::<SequencedLongSerializer>()
    }
}
