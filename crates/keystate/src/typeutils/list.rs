// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Serializer for `Vec<E>` built on an element serializer.

use super::serializer::TypeSerializer;
use super::snapshot::SerializerSnapshot;
use crate::core::ser::{Cursor, OutputBuffer, SerResult};
use std::any::Any;
use std::fmt;

/// Encodes a list as a u32 element count followed by length-prefixed elements.
///
/// The element serializer is nested state: duplicating a `ListSerializer`
/// duplicates its element serializer too.
pub struct ListSerializer<E: 'static> {
    element: Box<dyn TypeSerializer<E>>,
    output: OutputBuffer,
}

impl<E: 'static> ListSerializer<E> {
    pub fn new(element: Box<dyn TypeSerializer<E>>) -> Self {
        Self {
            element,
            output: OutputBuffer::new(),
        }
    }

    pub fn element_serializer(&self) -> &dyn TypeSerializer<E> {
        self.element.as_ref()
    }
}

// Elements need not be `Debug`; the nested serializer always is.
impl<E: 'static> fmt::Debug for ListSerializer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSerializer")
            .field("element", &self.element)
            .finish()
    }
}

impl<E: Clone + Send + Sync + 'static> TypeSerializer<Vec<E>> for ListSerializer<E> {
    fn duplicate(&self) -> Box<dyn TypeSerializer<Vec<E>>> {
        Box::new(Self::new(self.element.duplicate()))
    }

    fn serialize(&mut self, value: &Vec<E>) -> SerResult<Vec<u8>> {
        self.output.clear();
        self.output.write_len(value.len())?;
        for item in value {
            let bytes = self.element.serialize(item)?;
            self.output.write_len(bytes.len())?;
            self.output.write_bytes(&bytes);
        }
        Ok(self.output.to_vec())
    }

    fn deserialize(&mut self, bytes: &[u8]) -> SerResult<Vec<E>> {
        let mut cursor = Cursor::new(bytes);
        let count = cursor.read_len(cursor.remaining() / 4)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let len = cursor.read_len(cursor.remaining())?;
            let element_bytes = cursor.read_bytes(len)?;
            items.push(self.element.deserialize(element_bytes)?);
        }
        cursor.finish()?;
        Ok(items)
    }

    fn create_instance(&self) -> Vec<E> {
        Vec::new()
    }

    fn copy(&self, value: &Vec<E>) -> Vec<E> {
        value.iter().map(|item| self.element.copy(item)).collect()
    }

    fn snapshot(&self) -> SerializerSnapshot {
        SerializerSnapshot::List {
            element: Box::new(self.element.snapshot()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
