// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Serializer configuration.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: compile-time constants (identifier base, default bounds)
//! - **Level 2 (Dynamic)**: [`SerializerConfig`], the per-execution registration
//!   table and resolution options
//! - **Level 3 (File)**: YAML options via [`YamlLoader`] (feature `config-loaders`)
//!
//! # Example
//!
//! ```rust
//! use keystate::config::{SerializerConfig, FIRST_REGISTRATION_ID};
//! use keystate::dynamic::{PrimitiveKind, TypeDescriptorBuilder};
//! use std::sync::Arc;
//!
//! let mut config = SerializerConfig::new();
//! config.set_max_collection_length(1024);
//!
//! let path = Arc::new(TypeDescriptorBuilder::new("Path").string_field("uri").build());
//! let id = config.register_type(path).expect("register Path");
//! assert_eq!(id, FIRST_REGISTRATION_ID);
//! ```

mod registration;
mod serializer_config;
#[cfg(feature = "config-loaders")]
mod yaml;

pub use registration::{Registration, RegistrationTable};
pub use serializer_config::{ResolutionError, SerializerConfig, SerializerOptions};
#[cfg(feature = "config-loaders")]
pub use yaml::{ConfigError, YamlConfigDocument, YamlLoader};

/// First identifier handed out by a [`SerializerConfig`].
///
/// Identifiers below this value are reserved for built-in kinds.
pub const FIRST_REGISTRATION_ID: u32 = 10;

/// Default bound on sequence lengths handled by generic serializers.
///
/// Protects decoders from allocating on a corrupt length prefix.
pub const DEFAULT_MAX_COLLECTION_LENGTH: usize = 1 << 20;
