// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! In-memory state bound to a descriptor.
//!
//! Each state resolves its descriptor, takes its own serializer duplicate and
//! keeps the current value in encoded form.

use super::descriptor::StateDescriptor;
use super::reducing::ReducingStateDescriptor;
use super::Result;
use crate::config::SerializerConfig;
use crate::typeutils::{StateValue, TypeSerializer};

/// Single-value state.
#[derive(Debug)]
pub struct HeapValueState<T: StateValue> {
    descriptor: StateDescriptor<T>,
    serializer: Box<dyn TypeSerializer<T>>,
    bytes: Option<Vec<u8>>,
}

impl<T: StateValue> HeapValueState<T> {
    /// Resolve `descriptor` against `config` (if needed) and bind to it.
    pub fn new(descriptor: &StateDescriptor<T>, config: &mut SerializerConfig) -> Result<Self> {
        descriptor.initialize_serializer_unless_set(config)?;
        let serializer = descriptor.serializer()?;
        log::debug!("[HeapValueState::new] bound to '{}'", descriptor.name());
        Ok(Self {
            descriptor: descriptor.clone(),
            serializer,
            bytes: None,
        })
    }

    pub fn descriptor(&self) -> &StateDescriptor<T> {
        &self.descriptor
    }

    /// Current value, or the descriptor's default if nothing was written.
    pub fn value(&mut self) -> Result<Option<T>> {
        match &self.bytes {
            Some(bytes) => Ok(Some(self.serializer.deserialize(bytes)?)),
            None => Ok(self.descriptor.default_value()),
        }
    }

    pub fn update(&mut self, value: &T) -> Result<()> {
        self.bytes = Some(self.serializer.serialize(value)?);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.bytes = None;
    }

    pub fn serialized_value(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }
}

/// State that folds every added value into one through the reduce function.
#[derive(Debug)]
pub struct HeapReducingState<T: StateValue> {
    descriptor: ReducingStateDescriptor<T>,
    serializer: Box<dyn TypeSerializer<T>>,
    bytes: Option<Vec<u8>>,
}

impl<T: StateValue> HeapReducingState<T> {
    pub fn new(
        descriptor: &ReducingStateDescriptor<T>,
        config: &mut SerializerConfig,
    ) -> Result<Self> {
        descriptor.initialize_serializer_unless_set(config)?;
        let serializer = descriptor.serializer()?;
        log::debug!("[HeapReducingState::new] bound to '{}'", descriptor.name());
        Ok(Self {
            descriptor: descriptor.clone(),
            serializer,
            bytes: None,
        })
    }

    pub fn descriptor(&self) -> &ReducingStateDescriptor<T> {
        &self.descriptor
    }

    pub fn get(&mut self) -> Result<Option<T>> {
        match &self.bytes {
            Some(bytes) => Ok(Some(self.serializer.deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    /// Fold `value` into the current aggregate. The first value is stored as is.
    pub fn add(&mut self, value: T) -> Result<()> {
        let next = match &self.bytes {
            Some(bytes) => {
                let current = self.serializer.deserialize(bytes)?;
                self.descriptor.reduce(current, value)
            }
            None => value,
        };
        self.bytes = Some(self.serializer.serialize(&next)?);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.bytes = None;
    }

    pub fn serialized_value(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }
}
