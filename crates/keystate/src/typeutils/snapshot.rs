// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Transmissible serializer configuration.
//!
//! A [`SerializerSnapshot`] is what crosses a process boundary in place of a
//! live serializer. It holds no buffers, only the information needed to build
//! a format-compatible serializer on the other side. A generic snapshot
//! carries the registration table it was resolved against, so the receiver
//! never has to guess identifiers.

use super::generic::GenericSerializer;
use super::serializer::TypeSerializer;
use super::type_info::{StateValue, TypeInfo};
use crate::config::RegistrationTable;
use crate::dynamic::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SerializerSnapshot {
    /// Built-in serializer for a primitive or string.
    Basic { type_name: String },
    /// [`ListSerializer`](super::ListSerializer) over an element serializer.
    List { element: Box<SerializerSnapshot> },
    /// Fallback serializer with the identifiers it was resolved against.
    Generic {
        type_descriptor: Arc<TypeDescriptor>,
        registrations: RegistrationTable,
        max_collection_length: usize,
    },
    /// User serializer that cannot be rebuilt elsewhere.
    Opaque { type_name: String },
}

impl SerializerSnapshot {
    pub fn is_transmittable(&self) -> bool {
        match self {
            Self::Basic { .. } | Self::Generic { .. } => true,
            Self::List { element } => element.is_transmittable(),
            Self::Opaque { .. } => false,
        }
    }

    /// Human-readable name of the serialized type.
    pub fn type_name(&self) -> String {
        match self {
            Self::Basic { type_name } | Self::Opaque { type_name } => type_name.clone(),
            Self::List { element } => format!("list<{}>", element.type_name()),
            Self::Generic {
                type_descriptor, ..
            } => type_descriptor.name.clone(),
        }
    }

    /// Rebuild a serializer for `T` from this snapshot.
    ///
    /// The rebuilt serializer is equal to the one the snapshot was taken from.
    pub fn restore<T: StateValue>(&self) -> Result<Box<dyn TypeSerializer<T>>, RestoreError> {
        match self {
            Self::Opaque { type_name } => Err(RestoreError::NotTransmittable {
                type_name: type_name.clone(),
            }),
            Self::Basic { .. } | Self::List { .. } => match T::basic_serializer() {
                Some(serializer) if serializer.snapshot() == *self => Ok(serializer),
                _ => Err(self.mismatch::<T>()),
            },
            Self::Generic {
                type_descriptor,
                registrations,
                max_collection_length,
            } => {
                let type_info = TypeInfo::<T>::of();
                if **type_info.descriptor() != **type_descriptor {
                    return Err(self.mismatch::<T>());
                }
                Ok(Box::new(GenericSerializer::new(
                    type_info,
                    Arc::new(registrations.clone()),
                    *max_collection_length,
                )))
            }
        }
    }

    fn mismatch<T: StateValue>(&self) -> RestoreError {
        RestoreError::TypeMismatch {
            expected: T::type_descriptor().name.clone(),
            found: self.type_name(),
        }
    }
}

/// Failure to rebuild a serializer from a [`SerializerSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreError {
    NotTransmittable { type_name: String },
    TypeMismatch { expected: String, found: String },
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreError::NotTransmittable { type_name } => {
                write!(f, "serializer for {} cannot be transmitted", type_name)
            }
            RestoreError::TypeMismatch { expected, found } => write!(
                f,
                "snapshot describes {} but {} was requested",
                found, expected
            ),
        }
    }
}

impl std::error::Error for RestoreError {}
