// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Named state handle with lazy serializer resolution.

use super::{Error, Result};
use crate::config::SerializerConfig;
use crate::typeutils::{StateValue, TypeInfo, TypeSerializer};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Kind of state a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Value,
    Reducing,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKind::Value => write!(f, "value"),
            StateKind::Reducing => write!(f, "reducing"),
        }
    }
}

/// Either the pending type or the canonical serializer, never both.
pub(crate) enum Resolution<T: 'static> {
    Unresolved(TypeInfo<T>),
    Resolved(Box<dyn TypeSerializer<T>>),
}

impl<T: StateValue> Resolution<T> {
    fn duplicate(&self) -> Self {
        match self {
            Resolution::Unresolved(type_info) => Resolution::Unresolved(type_info.clone()),
            Resolution::Resolved(serializer) => Resolution::Resolved(serializer.duplicate()),
        }
    }
}

/// Named piece of managed state and the serializer for its values.
///
/// The canonical serializer is never handed out. [`serializer`](Self::serializer)
/// returns a duplicate the caller owns, which makes a descriptor safe to share
/// (`Arc<StateDescriptor<T>>`) between threads that encode concurrently.
pub struct StateDescriptor<T: StateValue> {
    name: String,
    kind: StateKind,
    resolution: RwLock<Resolution<T>>,
    default_value: Option<T>,
    queryable_state_name: Option<String>,
}

impl<T: StateValue> StateDescriptor<T> {
    /// Descriptor with a serializer chosen up front. No config is needed.
    pub fn with_serializer(name: impl Into<String>, serializer: Box<dyn TypeSerializer<T>>) -> Self {
        Self::from_parts(name.into(), StateKind::Value, Resolution::Resolved(serializer))
    }

    /// Descriptor whose serializer is picked later from a [`SerializerConfig`].
    pub fn with_type_info(name: impl Into<String>, type_info: TypeInfo<T>) -> Self {
        Self::from_parts(name.into(), StateKind::Value, Resolution::Unresolved(type_info))
    }

    /// Shorthand for `with_type_info(name, TypeInfo::of())`.
    pub fn of_type(name: impl Into<String>) -> Self {
        Self::with_type_info(name, TypeInfo::of())
    }

    pub(crate) fn from_parts(name: String, kind: StateKind, resolution: Resolution<T>) -> Self {
        Self {
            name,
            kind,
            resolution: RwLock::new(resolution),
            default_value: None,
            queryable_state_name: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StateKind {
        self.kind
    }

    /// Value reported by a state that was never written.
    #[must_use]
    pub fn with_default_value(mut self, value: T) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Fresh copy of the default value.
    pub fn default_value(&self) -> Option<T> {
        self.default_value.clone()
    }

    pub(crate) fn set_default_value(&mut self, value: Option<T>) {
        self.default_value = value;
    }

    /// Make the state queryable under `queryable_name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyQueryable` if a queryable name was already set.
    pub fn set_queryable(&mut self, queryable_name: impl Into<String>) -> Result<()> {
        if let Some(existing) = &self.queryable_state_name {
            return Err(Error::AlreadyQueryable {
                name: self.name.clone(),
                queryable_name: existing.clone(),
            });
        }
        self.queryable_state_name = Some(queryable_name.into());
        Ok(())
    }

    pub fn queryable_state_name(&self) -> Option<&str> {
        self.queryable_state_name.as_deref()
    }

    pub fn is_queryable(&self) -> bool {
        self.queryable_state_name.is_some()
    }

    pub fn is_serializer_initialized(&self) -> bool {
        matches!(*self.resolution.read(), Resolution::Resolved(_))
    }

    /// Resolve the serializer from `config` if that has not happened yet.
    ///
    /// Safe to call from many threads at once: exactly one caller performs
    /// the transition, the others return once it is visible. Calls after that
    /// are no-ops and leave `config` untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::Resolution` if no serializer can be built. The
    /// descriptor stays unresolved and `config` gains no registrations, so
    /// the call can be retried with another config.
    pub fn initialize_serializer_unless_set(&self, config: &mut SerializerConfig) -> Result<()> {
        if self.is_serializer_initialized() {
            log::trace!(
                "[StateDescriptor::initialize_serializer_unless_set] '{}' already resolved",
                self.name
            );
            return Ok(());
        }

        let mut resolution = self.resolution.write();
        let type_info = match &*resolution {
            Resolution::Resolved(_) => {
                log::trace!(
                    "[StateDescriptor::initialize_serializer_unless_set] '{}' resolved concurrently",
                    self.name
                );
                return Ok(());
            }
            Resolution::Unresolved(type_info) => type_info.clone(),
        };

        match type_info.create_serializer(config) {
            Ok(serializer) => {
                log::debug!(
                    "[StateDescriptor::initialize_serializer_unless_set] '{}' ({}) -> {:?}",
                    self.name,
                    type_info.type_name(),
                    serializer
                );
                *resolution = Resolution::Resolved(serializer);
                Ok(())
            }
            Err(e) => {
                log::warn!(
                    "[StateDescriptor::initialize_serializer_unless_set] '{}' ({}) failed: {}",
                    self.name,
                    type_info.type_name(),
                    e
                );
                Err(e.into())
            }
        }
    }

    /// Independent duplicate of the canonical serializer.
    ///
    /// Two calls never return the same instance.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnresolvedAccess` if the descriptor is still
    /// unresolved. No default config is applied implicitly.
    pub fn serializer(&self) -> Result<Box<dyn TypeSerializer<T>>> {
        match &*self.resolution.read() {
            Resolution::Resolved(canonical) => {
                log::trace!("[StateDescriptor::serializer] duplicating for '{}'", self.name);
                Ok(canonical.duplicate())
            }
            Resolution::Unresolved(_) => Err(Error::UnresolvedAccess {
                name: self.name.clone(),
            }),
        }
    }

    pub(crate) fn with_resolution<R>(&self, f: impl FnOnce(&Resolution<T>) -> R) -> R {
        f(&*self.resolution.read())
    }
}

impl<T: StateValue> Clone for StateDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            resolution: RwLock::new(self.resolution.read().duplicate()),
            default_value: self.default_value.clone(),
            queryable_state_name: self.queryable_state_name.clone(),
        }
    }
}

impl<T: StateValue> PartialEq for StateDescriptor<T> {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.name != other.name || self.kind != other.kind {
            return false;
        }
        // Never hold both locks at once; `b == a` may run concurrently.
        let ours = self.resolution.read().duplicate();
        let theirs = other.resolution.read();
        match (&ours, &*theirs) {
            (Resolution::Unresolved(a), Resolution::Unresolved(b)) => a == b,
            (Resolution::Resolved(a), Resolution::Resolved(b)) => a.equals(b.as_ref()),
            _ => false,
        }
    }
}

impl<T: StateValue> Eq for StateDescriptor<T> {}

impl<T: StateValue> Hash for StateDescriptor<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.kind.hash(state);
    }
}

impl<T: StateValue> fmt::Debug for StateDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("StateDescriptor");
        s.field("name", &self.name).field("kind", &self.kind);
        match &*self.resolution.read() {
            Resolution::Unresolved(type_info) => s.field("type_info", type_info),
            Resolution::Resolved(serializer) => s.field("serializer", serializer),
        };
        s.field("default_value", &self.default_value)
            .field("queryable_state_name", &self.queryable_state_name)
            .finish()
    }
}
