// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Copying descriptors to another execution context.
//!
//! A descriptor crosses a process boundary as a [`DescriptorSnapshot`]. What
//! the snapshot carries for the serializer depends on the [`TransferMode`]:
//!
//! - [`TransferMode::PreserveState`]: a resolved descriptor ships its
//!   serializer snapshot. For generic serializers that includes the
//!   registration table, so the identifiers travel together with the
//!   serializer that uses them.
//! - [`TransferMode::TypeOnly`]: only the type is shipped, and the receiver
//!   resolves again against its own config.
//!
//! Restoring never resolves implicitly. An unresolved snapshot yields an
//! unresolved descriptor.

use super::descriptor::{Resolution, StateDescriptor, StateKind};
use super::reducing::{ReduceFunction, ReducingStateDescriptor};
use super::{Error, Result};
use crate::dynamic::{DynamicValue, TypeDescriptor};
use crate::typeutils::{SerializerSnapshot, StateValue, TypeInfo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// How the resolution state is carried across a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    /// Ship the resolved serializer when there is one.
    #[default]
    PreserveState,
    /// Ship only the type; the receiver re-resolves.
    TypeOnly,
}

/// Resolution state as transmitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResolutionSnapshot {
    Unresolved { type_descriptor: Arc<TypeDescriptor> },
    Resolved { serializer: SerializerSnapshot },
}

/// Transmissible form of a [`StateDescriptor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSnapshot {
    pub name: String,
    pub kind: StateKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queryable_state_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DynamicValue>,
    pub resolution: ResolutionSnapshot,
}

impl DescriptorSnapshot {
    pub fn is_resolved(&self) -> bool {
        matches!(self.resolution, ResolutionSnapshot::Resolved { .. })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<T: StateValue> StateDescriptor<T> {
    /// Capture this descriptor for transmission.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotTransmittable` in `PreserveState` mode when the
    /// resolved serializer is opaque. `TypeOnly` never fails.
    pub fn snapshot(&self, mode: TransferMode) -> Result<DescriptorSnapshot> {
        let resolution = self.with_resolution(|resolution| match (resolution, mode) {
            (Resolution::Unresolved(type_info), _) => Ok(ResolutionSnapshot::Unresolved {
                type_descriptor: Arc::clone(type_info.descriptor()),
            }),
            (Resolution::Resolved(_), TransferMode::TypeOnly) => {
                Ok(ResolutionSnapshot::Unresolved {
                    type_descriptor: T::type_descriptor(),
                })
            }
            (Resolution::Resolved(serializer), TransferMode::PreserveState) => {
                let snapshot = serializer.snapshot();
                if !snapshot.is_transmittable() {
                    return Err(Error::NotTransmittable {
                        type_name: snapshot.type_name(),
                    });
                }
                Ok(ResolutionSnapshot::Resolved {
                    serializer: snapshot,
                })
            }
        })?;

        Ok(DescriptorSnapshot {
            name: self.name().to_string(),
            kind: self.kind(),
            queryable_state_name: self.queryable_state_name().map(str::to_string),
            default_value: self.default_value().as_ref().map(StateValue::to_dynamic),
            resolution,
        })
    }

    /// Rebuild a value-state descriptor from a snapshot.
    ///
    /// # Errors
    ///
    /// - `Error::TypeMismatch` if the snapshot describes another type or a
    ///   reducing descriptor
    /// - `Error::Serialization` if the default value does not decode as `T`
    pub fn restore(snapshot: DescriptorSnapshot) -> Result<Self> {
        Self::restore_kind(snapshot, StateKind::Value)
    }

    pub(crate) fn restore_kind(snapshot: DescriptorSnapshot, expected: StateKind) -> Result<Self> {
        if snapshot.kind != expected {
            return Err(Error::TypeMismatch {
                expected: format!("{} state", expected),
                found: format!("{} state", snapshot.kind),
            });
        }

        let resolution = match snapshot.resolution {
            ResolutionSnapshot::Unresolved { type_descriptor } => {
                let type_info = TypeInfo::<T>::of();
                if **type_info.descriptor() != *type_descriptor {
                    return Err(Error::TypeMismatch {
                        expected: type_info.type_name().to_string(),
                        found: type_descriptor.name.clone(),
                    });
                }
                Resolution::Unresolved(type_info)
            }
            ResolutionSnapshot::Resolved { serializer } => {
                Resolution::Resolved(serializer.restore::<T>()?)
            }
        };

        let mut descriptor = Self::from_parts(snapshot.name, snapshot.kind, resolution);
        descriptor.set_default_value(snapshot.default_value.map(T::from_dynamic).transpose()?);
        if let Some(queryable_name) = snapshot.queryable_state_name {
            descriptor.set_queryable(queryable_name)?;
        }

        log::debug!(
            "[StateDescriptor::restore] '{}' restored ({})",
            descriptor.name(),
            if descriptor.is_serializer_initialized() {
                "resolved"
            } else {
                "unresolved"
            }
        );
        Ok(descriptor)
    }

    /// Snapshot encoded as JSON.
    pub fn to_json(&self, mode: TransferMode) -> Result<String> {
        self.snapshot(mode)?.to_json()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::restore(DescriptorSnapshot::from_json(json)?)
    }
}

impl<T: StateValue> Serialize for StateDescriptor<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.snapshot(TransferMode::PreserveState)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de, T: StateValue> Deserialize<'de> for StateDescriptor<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let snapshot = DescriptorSnapshot::deserialize(deserializer)?;
        Self::restore(snapshot).map_err(serde::de::Error::custom)
    }
}

impl<T: StateValue> ReducingStateDescriptor<T> {
    /// Capture the descriptor part; the reduce function does not travel.
    pub fn snapshot(&self, mode: TransferMode) -> Result<DescriptorSnapshot> {
        self.as_descriptor().snapshot(mode)
    }

    /// Rebuild from a snapshot, supplying the reduce function locally.
    pub fn restore(
        snapshot: DescriptorSnapshot,
        reduce_function: impl ReduceFunction<T> + 'static,
    ) -> Result<Self> {
        let inner = StateDescriptor::restore_kind(snapshot, StateKind::Reducing)?;
        Ok(Self::from_descriptor(inner, Arc::new(reduce_function)))
    }

    pub fn to_json(&self, mode: TransferMode) -> Result<String> {
        self.snapshot(mode)?.to_json()
    }

    pub fn from_json(json: &str, reduce_function: impl ReduceFunction<T> + 'static) -> Result<Self> {
        Self::restore(DescriptorSnapshot::from_json(json)?, reduce_function)
    }
}
