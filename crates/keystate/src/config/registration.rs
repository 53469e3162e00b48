// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Registered type names and their identifiers.

use serde::{Deserialize, Serialize};

/// One registered type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: u32,
    pub type_name: String,
}

/// Frozen view of a [`SerializerConfig`](super::SerializerConfig)'s
/// registrations, in registration order.
///
/// A generic serializer captures one of these at resolution time. Later
/// registrations in the config do not reach serializers already built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationTable {
    entries: Vec<Registration>,
}

impl RegistrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, id: u32, type_name: impl Into<String>) {
        self.entries.push(Registration {
            id,
            type_name: type_name.into(),
        });
    }

    pub fn id_of(&self, type_name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|r| r.type_name == type_name)
            .map(|r| r.id)
    }

    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.type_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }
}
