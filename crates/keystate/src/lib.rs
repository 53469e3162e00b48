// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! # keystate - state descriptors with lazily resolved serializers
//!
//! Binds a named piece of managed state to a wire-compatible serializer.
//! Descriptors are created at definition time, often before the runtime
//! configuration exists, are shared between parallel workers, and may be
//! shipped to other processes where the serializer is rebuilt locally.
//!
//! ## Quick Start
//!
//! ```rust
//! use keystate::{SerializerConfig, StateDescriptor};
//!
//! fn main() -> keystate::Result<()> {
//!     // Definition time: only the type is known
//!     let descriptor = StateDescriptor::<Vec<String>>::of_type("recent-users");
//!
//!     // Runtime: bind to the task's configuration
//!     let mut config = SerializerConfig::new();
//!     descriptor.initialize_serializer_unless_set(&mut config)?;
//!
//!     // Every caller gets its own serializer
//!     let mut serializer = descriptor.serializer()?;
//!     let bytes = serializer.serialize(&vec!["ada".to_string()])?;
//!     assert_eq!(serializer.deserialize(&bytes)?, vec!["ada".to_string()]);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                           state                                     |
//! |   StateDescriptor | ReducingStateDescriptor | snapshots | heap state |
//! +---------------------------------------------------------------------+
//! |                 typeutils                |          config          |
//! |   TypeSerializer | TypeInfo | Generic    |   SerializerConfig, YAML |
//! +---------------------------------------------------------------------+
//! |                 dynamic                  |        core::ser         |
//! |   TypeDescriptor | DynamicValue          |   Cursor, OutputBuffer   |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`StateDescriptor`] | Name plus eager serializer or pending type |
//! | [`ReducingStateDescriptor`] | Descriptor carrying a reduce function |
//! | [`SerializerConfig`] | Registration table and resolution options |
//! | [`TypeSerializer`] | Encode/decode contract with `duplicate()` |
//! | [`DescriptorSnapshot`] | Transmissible form of a descriptor |
//!
//! ## Features
//!
//! - `config-loaders` (default): load [`SerializerConfig`] options from YAML

/// Global configuration (registration table, resolution options, YAML).
pub mod config;
/// Byte-level encode/decode helpers.
pub mod core;
/// Runtime type model for state elements.
pub mod dynamic;
/// State descriptors, transfer and in-memory state.
pub mod state;
/// Serializer contract and built-in serializers.
pub mod typeutils;

pub use config::{ResolutionError, SerializerConfig, SerializerOptions};
pub use crate::core::ser::{SerError, SerResult};
pub use state::{
    DescriptorSnapshot, Error, HeapReducingState, HeapValueState, ReduceFunction,
    ReducingStateDescriptor, Result, StateDescriptor, StateKind, TransferMode,
};
pub use typeutils::{SerializerSnapshot, StateValue, TypeInfo, TypeSerializer};

/// keystate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
