// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Byte-level helpers for state serializers.
//!
//! Every serializer in this crate writes little-endian primitives through an
//! [`OutputBuffer`] it owns and reads them back through a bounds-checked
//! [`Cursor`].

pub mod cursor;

pub use cursor::{Cursor, OutputBuffer};

use std::fmt;

/// Serialization error raised by encode/decode operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerError {
    WriteFailed {
        offset: usize,
        reason: String,
    },
    ReadFailed {
        offset: usize,
        reason: String,
    },
    InvalidData {
        reason: String,
    },
    /// Value shape does not match the type the serializer was built for.
    TypeMismatch {
        expected: String,
        found: String,
    },
    /// Payload carries a registration identifier other than the one assigned
    /// to the expected type.
    RegistrationMismatch {
        type_name: String,
        expected: u32,
        found: u32,
    },
    /// Collection or string longer than the configured bound.
    LengthExceeded {
        length: usize,
        max: usize,
    },
}

impl fmt::Display for SerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerError::WriteFailed { offset, reason } => {
                write!(f, "write failed at offset {}: {}", offset, reason)
            }
            SerError::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {}: {}", offset, reason)
            }
            SerError::InvalidData { reason } => write!(f, "invalid data: {}", reason),
            SerError::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            SerError::RegistrationMismatch {
                type_name,
                expected,
                found,
            } => write!(
                f,
                "registration id {} does not match id {} assigned to {}",
                found, expected, type_name
            ),
            SerError::LengthExceeded { length, max } => {
                write!(f, "length {} exceeds maximum {}", length, max)
            }
        }
    }
}

impl std::error::Error for SerError {}

impl From<std::string::FromUtf8Error> for SerError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        SerError::InvalidData {
            reason: format!("invalid UTF-8: {}", e),
        }
    }
}

pub type SerResult<T> = std::result::Result<T, SerError>;
