// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Runtime type model for state elements.
//!
//! A [`TypeDescriptor`] is the runtime view of a state element type: what the
//! fallback serializer walks when no explicit serializer was supplied, and what
//! a descriptor ships to another process so the serializer can be rebuilt
//! there. [`DynamicValue`] is the matching value container.
//!
//! # Example
//!
//! ```rust
//! use keystate::dynamic::{PrimitiveKind, TypeDescriptorBuilder};
//!
//! let descriptor = TypeDescriptorBuilder::new("SensorReading")
//!     .field("sensor_id", PrimitiveKind::U32)
//!     .field("temperature", PrimitiveKind::F64)
//!     .string_field("location")
//!     .build();
//!
//! assert!(descriptor.is_registrable());
//! assert_eq!(descriptor.fields().map(|f| f.len()), Some(3));
//! ```

mod builder;
mod type_descriptor;
mod value;

pub use builder::{EnumBuilder, TypeDescriptorBuilder};
pub use type_descriptor::{
    ArrayDescriptor, EnumDescriptor, EnumVariant, FieldDescriptor, PrimitiveKind,
    SequenceDescriptor, TypeDescriptor, TypeKind,
};
pub use value::DynamicValue;

#[cfg(test)]
mod tests;
