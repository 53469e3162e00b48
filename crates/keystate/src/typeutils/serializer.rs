// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! The serializer capability trait.

use super::snapshot::SerializerSnapshot;
use crate::core::ser::SerResult;
use std::any::Any;
use std::fmt;

/// Encode/decode strategy for one element type.
///
/// Implementations may keep mutable scratch state (output buffers, nested
/// serializers), which is why `serialize`/`deserialize` take `&mut self`.
/// Sharing happens only through `&self`, and the only operation offered there
/// that produces a usable encoder is [`duplicate`](TypeSerializer::duplicate).
///
/// # Duplication contract
///
/// `duplicate()` returns a new instance that reads and writes the same wire
/// format but shares no mutable state with `self` or with any other duplicate.
/// It cannot fail: a serializer that cannot honor this is a bug in that
/// serializer.
pub trait TypeSerializer<T: 'static>: Send + Sync + fmt::Debug {
    /// Independent, format-compatible copy of this serializer.
    fn duplicate(&self) -> Box<dyn TypeSerializer<T>>;

    /// Encode `value`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the value does not fit the serializer's type or
    /// exceeds a configured bound.
    fn serialize(&mut self, value: &T) -> SerResult<Vec<u8>>;

    /// Decode a value previously produced by a format-compatible serializer.
    ///
    /// # Errors
    ///
    /// Returns `Err` on truncated, trailing or malformed input.
    fn deserialize(&mut self, bytes: &[u8]) -> SerResult<T>;

    /// Default instance of the element type.
    fn create_instance(&self) -> T;

    /// Deep copy of `value`.
    fn copy(&self, value: &T) -> T;

    /// True when values can be shared without copying.
    fn is_immutable_type(&self) -> bool {
        false
    }

    /// Encoded length when every value has the same size.
    fn length(&self) -> Option<usize> {
        None
    }

    /// Configuration of this serializer, detached from its runtime state.
    fn snapshot(&self) -> SerializerSnapshot;

    fn as_any(&self) -> &dyn Any;

    /// Format compatibility with `other`.
    ///
    /// Two transmittable serializers are equal when their snapshots are equal.
    /// Opaque serializers are only equal to themselves unless they override
    /// this.
    fn equals(&self, other: &dyn TypeSerializer<T>) -> bool {
        if std::ptr::addr_eq(self as *const Self, other as *const dyn TypeSerializer<T>) {
            return true;
        }
        let ours = self.snapshot();
        ours.is_transmittable() && ours == other.snapshot()
    }
}

impl<T: 'static> PartialEq for dyn TypeSerializer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}
