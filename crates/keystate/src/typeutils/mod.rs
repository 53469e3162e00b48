// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Serializer capability contract and the built-in implementations.
//!
//! - [`TypeSerializer`] - encode/decode plus `duplicate()`
//! - [`StateValue`] / [`TypeInfo`] - element types and lazy serializer selection
//! - [`GenericSerializer`] - fallback built from a type descriptor and a
//!   registration table
//! - [`SerializerSnapshot`] - transmissible form of a serializer configuration

mod basic;
mod generic;
mod list;
mod serializer;
mod snapshot;
mod type_info;

pub use basic::{
    BoolSerializer, ByteSerializer, DoubleSerializer, FloatSerializer, IntSerializer,
    LongSerializer, ShortSerializer, StringSerializer, UnsignedByteSerializer,
    UnsignedIntSerializer, UnsignedLongSerializer, UnsignedShortSerializer,
};
pub use generic::GenericSerializer;
pub use list::ListSerializer;
pub use serializer::TypeSerializer;
pub use snapshot::{RestoreError, SerializerSnapshot};
pub use type_info::{take_field, StateValue, TypeInfo};
