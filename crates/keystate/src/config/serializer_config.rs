// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Type registration table and resolution options.

use super::registration::RegistrationTable;
use super::{DEFAULT_MAX_COLLECTION_LENGTH, FIRST_REGISTRATION_ID};
use crate::dynamic::{TypeDescriptor, TypeKind};
use crate::typeutils::StateValue;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Knobs consulted while resolving a serializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    /// Use the generic serializer even for types with a dedicated one.
    pub force_generic_serializer: bool,
    /// Fail resolution instead of falling back to the generic serializer.
    pub disable_generic_types: bool,
    /// Upper bound on sequence lengths written or read by generic serializers.
    pub max_collection_length: usize,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            force_generic_serializer: false,
            disable_generic_types: false,
            max_collection_length: DEFAULT_MAX_COLLECTION_LENGTH,
        }
    }
}

/// Per-execution registry of named types plus resolution options.
///
/// Identifiers start at [`FIRST_REGISTRATION_ID`] and follow registration
/// order. Two configs fed the same registrations in the same order assign
/// the same identifiers; nothing else is guaranteed across configs.
///
/// The table is mutated by resolution. Callers sharing one config across
/// threads must serialize access themselves.
#[derive(Debug, Clone, Default)]
pub struct SerializerConfig {
    options: SerializerOptions,
    registered: Vec<Arc<TypeDescriptor>>,
}

impl SerializerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SerializerOptions) -> Self {
        Self {
            options,
            registered: Vec::new(),
        }
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    pub fn set_force_generic_serializer(&mut self, force: bool) {
        self.options.force_generic_serializer = force;
    }

    pub fn set_disable_generic_types(&mut self, disable: bool) {
        self.options.disable_generic_types = disable;
    }

    pub fn set_max_collection_length(&mut self, max: usize) {
        self.options.max_collection_length = max;
    }

    /// Register a single named struct or enum.
    ///
    /// Registering a type again under an identical descriptor returns the
    /// identifier it already has.
    ///
    /// # Errors
    ///
    /// - `ResolutionError::InvalidType` if the descriptor is anonymous or not
    ///   a struct/enum
    /// - `ResolutionError::ConflictingRegistration` if a different descriptor
    ///   already holds the name
    pub fn register_type(&mut self, descriptor: Arc<TypeDescriptor>) -> Result<u32, ResolutionError> {
        let mut staged = self.registered.clone();
        let id = stage(&mut staged, &descriptor)?;
        if staged.len() > self.registered.len() {
            log::debug!(
                "[SerializerConfig::register_type] {} -> id {}",
                descriptor.name,
                id
            );
        }
        self.registered = staged;
        Ok(id)
    }

    /// Register every named type reachable from `T`.
    pub fn register<T: StateValue>(&mut self) -> Result<(), ResolutionError> {
        self.register_reachable(&T::type_descriptor())
    }

    pub fn registration_id(&self, type_name: &str) -> Option<u32> {
        self.registered
            .iter()
            .position(|d| d.name == type_name)
            .map(id_for_index)
    }

    pub fn registered_types(&self) -> &[Arc<TypeDescriptor>] {
        &self.registered
    }

    /// Snapshot of the current registrations.
    pub fn registrations(&self) -> RegistrationTable {
        let mut table = RegistrationTable::new();
        for (index, descriptor) in self.registered.iter().enumerate() {
            table.push(id_for_index(index), descriptor.name.clone());
        }
        table
    }

    /// Register `root` and every named type below it, pre-order.
    ///
    /// Registrations are staged and only committed if the whole walk
    /// succeeds.
    pub(crate) fn register_reachable(&mut self, root: &TypeDescriptor) -> Result<(), ResolutionError> {
        let mut staged = self.registered.clone();
        if let Err(e) = collect(&mut staged, root) {
            log::warn!(
                "[SerializerConfig::register_reachable] {} rejected: {}",
                display_name(root),
                e
            );
            return Err(e);
        }

        for (index, descriptor) in staged.iter().enumerate().skip(self.registered.len()) {
            log::debug!(
                "[SerializerConfig::register_reachable] {} -> id {}",
                descriptor.name,
                id_for_index(index)
            );
        }
        self.registered = staged;
        Ok(())
    }
}

fn id_for_index(index: usize) -> u32 {
    // index is bounded by stage(), which refuses ids past u32::MAX
    FIRST_REGISTRATION_ID + index as u32
}

fn display_name(descriptor: &TypeDescriptor) -> &str {
    if descriptor.name.is_empty() {
        "<anonymous>"
    } else {
        &descriptor.name
    }
}

fn collect(staged: &mut Vec<Arc<TypeDescriptor>>, descriptor: &TypeDescriptor) -> Result<(), ResolutionError> {
    match &descriptor.kind {
        TypeKind::Primitive(_) => Ok(()),
        TypeKind::Struct(fields) => {
            stage(staged, descriptor)?;
            for field in fields {
                collect(staged, &field.type_desc)?;
            }
            Ok(())
        }
        TypeKind::Enum(_) => stage(staged, descriptor).map(|_| ()),
        TypeKind::Sequence(seq) => collect(staged, &seq.element_type),
        TypeKind::Array(arr) => collect(staged, &arr.element_type),
        TypeKind::Nested(inner) => collect(staged, inner),
    }
}

fn stage(staged: &mut Vec<Arc<TypeDescriptor>>, descriptor: &TypeDescriptor) -> Result<u32, ResolutionError> {
    validate(descriptor)?;

    if let Some(index) = staged.iter().position(|d| d.name == descriptor.name) {
        if *staged[index] != *descriptor {
            return Err(ResolutionError::ConflictingRegistration {
                type_name: descriptor.name.clone(),
            });
        }
        return Ok(id_for_index(index));
    }

    let index = staged.len();
    if u32::try_from(index)
        .ok()
        .and_then(|i| i.checked_add(FIRST_REGISTRATION_ID))
        .is_none()
    {
        return Err(ResolutionError::RegistrationOverflow { registered: index });
    }
    staged.push(Arc::new(descriptor.clone()));
    Ok(id_for_index(index))
}

fn validate(descriptor: &TypeDescriptor) -> Result<(), ResolutionError> {
    let invalid = |reason: &str| ResolutionError::InvalidType {
        type_name: display_name(descriptor).to_string(),
        reason: reason.to_string(),
    };

    if !descriptor.is_registrable() {
        return Err(invalid("only structs and enums carry registration ids"));
    }
    if descriptor.name.is_empty() {
        return Err(invalid("anonymous types cannot be registered"));
    }
    match &descriptor.kind {
        TypeKind::Struct(fields) => {
            let mut seen = HashSet::with_capacity(fields.len());
            for field in fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(invalid(&format!("duplicate field '{}'", field.name)));
                }
            }
        }
        TypeKind::Enum(en) => {
            let mut seen = HashSet::with_capacity(en.variants.len());
            for variant in &en.variants {
                if !seen.insert(variant.value) {
                    return Err(invalid(&format!("duplicate enum value {}", variant.value)));
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Failure to build a serializer for a type.
///
/// A failed resolution commits nothing: the descriptor stays unresolved and
/// the config keeps its previous registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The type has no dedicated serializer and generic types are disabled.
    GenericTypesDisabled { type_name: String },
    /// The type (or a type reachable from it) cannot be registered.
    InvalidType { type_name: String, reason: String },
    /// Another descriptor is already registered under this name.
    ConflictingRegistration { type_name: String },
    RegistrationOverflow { registered: usize },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::GenericTypesDisabled { type_name } => write!(
                f,
                "{} needs the generic serializer but generic types are disabled",
                type_name
            ),
            ResolutionError::InvalidType { type_name, reason } => {
                write!(f, "invalid type {}: {}", type_name, reason)
            }
            ResolutionError::ConflictingRegistration { type_name } => write!(
                f,
                "a different type is already registered as {}",
                type_name
            ),
            ResolutionError::RegistrationOverflow { registered } => {
                write!(f, "registration table full ({} types)", registered)
            }
        }
    }
}

impl std::error::Error for ResolutionError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::{EnumBuilder, PrimitiveKind, TypeDescriptorBuilder};

    fn path() -> Arc<TypeDescriptor> {
        Arc::new(
            TypeDescriptorBuilder::new("Path")
                .string_field("uri")
                .build(),
        )
    }

    fn task_info() -> Arc<TypeDescriptor> {
        Arc::new(
            TypeDescriptorBuilder::new("TaskInfo")
                .field("index", PrimitiveKind::U32)
                .nested_field("output", path())
                .nested_field(
                    "state",
                    Arc::new(EnumBuilder::new("TaskState").variant("Running").variant("Done").build()),
                )
                .build(),
        )
    }

    #[test]
    fn test_ids_follow_registration_order() {
        let mut config = SerializerConfig::new();
        assert_eq!(config.register_type(path()).expect("register Path"), 10);
        assert_eq!(config.register_type(task_info()).expect("register TaskInfo"), 11);
        assert_eq!(config.registration_id("Path"), Some(10));
        assert_eq!(config.registration_id("TaskState"), None);
    }

    #[test]
    fn test_register_type_is_idempotent() {
        let mut config = SerializerConfig::new();
        let first = config.register_type(path()).expect("register");
        let second = config.register_type(path()).expect("register again");
        assert_eq!(first, second);
        assert_eq!(config.registered_types().len(), 1);
    }

    #[test]
    fn test_conflicting_descriptor_rejected() {
        let mut config = SerializerConfig::new();
        config.register_type(path()).expect("register Path");
        let other = Arc::new(TypeDescriptorBuilder::new("Path").field("len", PrimitiveKind::U8).build());
        assert_eq!(
            config.register_type(other),
            Err(ResolutionError::ConflictingRegistration {
                type_name: "Path".into()
            })
        );
    }

    #[test]
    fn test_primitive_cannot_be_registered() {
        let mut config = SerializerConfig::new();
        let err = config
            .register_type(Arc::new(TypeDescriptor::primitive("u8", PrimitiveKind::U8)))
            .unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidType { .. }));
    }

    #[test]
    fn test_reachable_walk_is_preorder() {
        let mut config = SerializerConfig::new();
        config.register_reachable(&task_info()).expect("walk TaskInfo");
        let names: Vec<_> = config
            .registrations()
            .iter()
            .map(|r| (r.id, r.type_name.clone()))
            .collect();
        assert_eq!(
            names,
            vec![
                (10, "TaskInfo".to_string()),
                (11, "Path".to_string()),
                (12, "TaskState".to_string()),
            ]
        );
    }

    #[test]
    fn test_failed_walk_commits_nothing() {
        let mut config = SerializerConfig::new();
        let bad_nested = Arc::new(
            TypeDescriptorBuilder::new("Broken")
                .field("a", PrimitiveKind::U8)
                .field("a", PrimitiveKind::U16)
                .build(),
        );
        let root = TypeDescriptorBuilder::new("Outer")
            .nested_field("inner", bad_nested)
            .build();

        let err = config.register_reachable(&root).unwrap_err();
        assert!(err.to_string().contains("duplicate field 'a'"));
        assert!(config.registered_types().is_empty());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: SerializerOptions =
            serde_json::from_str(r#"{"force_generic_serializer":true}"#).expect("parse options");
        assert!(options.force_generic_serializer);
        assert!(!options.disable_generic_types);
        assert_eq!(options.max_collection_length, DEFAULT_MAX_COLLECTION_LENGTH);
    }
}
