// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! # State descriptors
//!
//! A [`StateDescriptor`] names one piece of managed state and says how its
//! values are serialized. It is created at definition time, shared by every
//! parallel instance that uses the state, and may be shipped to other
//! processes.
//!
//! ## Lifecycle
//!
//! ```text
//! with_serializer(name, s) ----------------------------+
//!                                                       v
//! of_type(name) --> Unresolved(type) --initialize--> Resolved(canonical)
//!                                                       |
//!                                     serializer() -> canonical.duplicate()
//! ```
//!
//! Resolution happens at most once. Every [`serializer`](StateDescriptor::serializer)
//! call hands out a new duplicate, so callers never share encode buffers.
//!
//! ## Quick Start
//!
//! ```rust
//! use keystate::config::SerializerConfig;
//! use keystate::state::{Error, StateDescriptor};
//!
//! let descriptor = StateDescriptor::<i32>::of_type("counter");
//! assert!(matches!(descriptor.serializer(), Err(Error::UnresolvedAccess { .. })));
//!
//! let mut config = SerializerConfig::new();
//! descriptor.initialize_serializer_unless_set(&mut config)?;
//!
//! let mut serializer = descriptor.serializer()?;
//! let bytes = serializer.serialize(&42)?;
//! assert_eq!(serializer.deserialize(&bytes)?, 42);
//! # Ok::<(), keystate::state::Error>(())
//! ```
//!
//! ## See Also
//!
//! - [`ReducingStateDescriptor`] - descriptor plus a reduce function
//! - [`DescriptorSnapshot`] - transmissible form of a descriptor
//! - [`HeapValueState`] / [`HeapReducingState`] - in-memory state bound to a descriptor

mod descriptor;
mod heap;
mod reducing;
mod transfer;

pub use descriptor::{StateDescriptor, StateKind};
pub use heap::{HeapReducingState, HeapValueState};
pub use reducing::{ReduceFunction, ReducingStateDescriptor};
pub use transfer::{DescriptorSnapshot, ResolutionSnapshot, TransferMode};

use crate::config::ResolutionError;
use crate::core::ser::SerError;
use crate::typeutils::RestoreError;

/// Errors returned by state descriptor operations.
///
/// Every fallible path returns one of these; nothing in this module panics on
/// a caller mistake.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    // ========================================================================
    // Resolution Errors
    // ========================================================================
    /// Serializer requested before `initialize_serializer_unless_set`.
    UnresolvedAccess { name: String },
    /// Serializer construction failed; the descriptor is still unresolved.
    Resolution(ResolutionError),

    // ========================================================================
    // Data Errors
    // ========================================================================
    /// Encode or decode failed.
    Serialization(SerError),
    /// Value or snapshot describes a different type than the descriptor's.
    TypeMismatch { expected: String, found: String },

    // ========================================================================
    // Descriptor Errors
    // ========================================================================
    /// Queryable name already set.
    AlreadyQueryable { name: String, queryable_name: String },
    /// Resolved serializer has no transmissible form.
    NotTransmittable { type_name: String },
    /// Descriptor snapshot could not be encoded or decoded.
    Transfer(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnresolvedAccess { name } => write!(
                f,
                "serializer of state '{}' requested before initialize_serializer_unless_set",
                name
            ),
            Error::Resolution(e) => write!(f, "serializer resolution failed: {}", e),
            Error::Serialization(e) => write!(f, "serialization failed: {}", e),
            Error::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Error::AlreadyQueryable {
                name,
                queryable_name,
            } => write!(
                f,
                "state '{}' is already queryable as '{}'",
                name, queryable_name
            ),
            Error::NotTransmittable { type_name } => {
                write!(f, "serializer for {} cannot be transmitted", type_name)
            }
            Error::Transfer(msg) => write!(f, "descriptor transfer failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Resolution(e) => Some(e),
            Error::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResolutionError> for Error {
    fn from(e: ResolutionError) -> Self {
        Error::Resolution(e)
    }
}

impl From<SerError> for Error {
    fn from(e: SerError) -> Self {
        Error::Serialization(e)
    }
}

impl From<RestoreError> for Error {
    fn from(e: RestoreError) -> Self {
        match e {
            RestoreError::NotTransmittable { type_name } => Error::NotTransmittable { type_name },
            RestoreError::TypeMismatch { expected, found } => {
                Error::TypeMismatch { expected, found }
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Transfer(e.to_string())
    }
}

/// Convenient alias for state results using the module `Error` type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_the_state() {
        let err = Error::UnresolvedAccess {
            name: "counter".into(),
        };
        assert_eq!(
            err.to_string(),
            "serializer of state 'counter' requested before initialize_serializer_unless_set"
        );
    }

    #[test]
    fn test_restore_error_conversion() {
        let err: Error = RestoreError::TypeMismatch {
            expected: "i32".into(),
            found: "string".into(),
        }
        .into();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: "i32".into(),
                found: "string".into()
            }
        );
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;
        let err = Error::from(SerError::InvalidData {
            reason: "bad".into(),
        });
        assert!(err.source().is_some());
        assert!(Error::Transfer("eof".into()).source().is_none());
    }
}
