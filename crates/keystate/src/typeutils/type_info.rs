// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! State element types and serializer selection.

use super::basic::{
    BoolSerializer, ByteSerializer, DoubleSerializer, FloatSerializer, IntSerializer,
    LongSerializer, ShortSerializer, StringSerializer, UnsignedByteSerializer,
    UnsignedIntSerializer, UnsignedLongSerializer, UnsignedShortSerializer,
};
use super::generic::GenericSerializer;
use super::list::ListSerializer;
use super::serializer::TypeSerializer;
use crate::config::{ResolutionError, SerializerConfig};
use crate::core::ser::{SerError, SerResult};
use crate::dynamic::{DynamicValue, PrimitiveKind, TypeDescriptor};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A type that can be held in managed state.
///
/// The descriptor returned by [`type_descriptor`](StateValue::type_descriptor)
/// is what the fallback serializer walks and what travels with an unresolved
/// state descriptor. Types with a dedicated encoding return it from
/// [`basic_serializer`](StateValue::basic_serializer).
///
/// # Example
///
/// ```rust
/// use keystate::core::ser::SerResult;
/// use keystate::dynamic::{DynamicValue, PrimitiveKind, TypeDescriptor, TypeDescriptorBuilder};
/// use keystate::typeutils::{take_field, StateValue};
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Reading {
///     sensor: u32,
///     celsius: f64,
/// }
///
/// impl StateValue for Reading {
///     fn type_descriptor() -> Arc<TypeDescriptor> {
///         Arc::new(
///             TypeDescriptorBuilder::new("Reading")
///                 .field("sensor", PrimitiveKind::U32)
///                 .field("celsius", PrimitiveKind::F64)
///                 .build(),
///         )
///     }
///
///     fn to_dynamic(&self) -> DynamicValue {
///         let mut fields = HashMap::new();
///         fields.insert("sensor".to_string(), self.sensor.to_dynamic());
///         fields.insert("celsius".to_string(), self.celsius.to_dynamic());
///         DynamicValue::Struct(fields)
///     }
///
///     fn from_dynamic(mut value: DynamicValue) -> SerResult<Self> {
///         Ok(Self {
///             sensor: take_field(&mut value, "sensor")?,
///             celsius: take_field(&mut value, "celsius")?,
///         })
///     }
/// }
///
/// assert!(Reading::basic_serializer().is_none());
/// ```
pub trait StateValue: Clone + Default + Send + Sync + fmt::Debug + 'static {
    fn type_descriptor() -> Arc<TypeDescriptor>;

    fn to_dynamic(&self) -> DynamicValue;

    /// # Errors
    ///
    /// Returns `SerError::TypeMismatch` or `SerError::InvalidData` when the
    /// value does not have the shape of `Self`.
    fn from_dynamic(value: DynamicValue) -> SerResult<Self>;

    /// Dedicated serializer, if the type has one.
    fn basic_serializer() -> Option<Box<dyn TypeSerializer<Self>>> {
        None
    }
}

/// Remove `name` from a struct value and convert it.
pub fn take_field<V: StateValue>(value: &mut DynamicValue, name: &str) -> SerResult<V> {
    match value.take_field(name) {
        Some(field) => V::from_dynamic(field),
        None => Err(SerError::InvalidData {
            reason: format!("missing field '{}'", name),
        }),
    }
}

macro_rules! impl_state_value {
    ($type:ty, $variant:ident, $name:expr, $kind:expr, $serializer:ident) => {
        impl StateValue for $type {
            fn type_descriptor() -> Arc<TypeDescriptor> {
                Arc::new(TypeDescriptor::primitive($name, $kind))
            }

            #[allow(clippy::clone_on_copy)]
            fn to_dynamic(&self) -> DynamicValue {
                DynamicValue::$variant(self.clone())
            }

            fn from_dynamic(value: DynamicValue) -> SerResult<Self> {
                match value {
                    DynamicValue::$variant(v) => Ok(v),
                    other => Err(SerError::TypeMismatch {
                        expected: $name.into(),
                        found: other.kind_name().into(),
                    }),
                }
            }

            fn basic_serializer() -> Option<Box<dyn TypeSerializer<Self>>> {
                Some(Box::new($serializer::new()))
            }
        }
    };
}

impl_state_value!(bool, Bool, "bool", PrimitiveKind::Bool, BoolSerializer);
impl_state_value!(i8, I8, "i8", PrimitiveKind::I8, ByteSerializer);
impl_state_value!(i16, I16, "i16", PrimitiveKind::I16, ShortSerializer);
impl_state_value!(i32, I32, "i32", PrimitiveKind::I32, IntSerializer);
impl_state_value!(i64, I64, "i64", PrimitiveKind::I64, LongSerializer);
impl_state_value!(u8, U8, "u8", PrimitiveKind::U8, UnsignedByteSerializer);
impl_state_value!(u16, U16, "u16", PrimitiveKind::U16, UnsignedShortSerializer);
impl_state_value!(u32, U32, "u32", PrimitiveKind::U32, UnsignedIntSerializer);
impl_state_value!(u64, U64, "u64", PrimitiveKind::U64, UnsignedLongSerializer);
impl_state_value!(f32, F32, "f32", PrimitiveKind::F32, FloatSerializer);
impl_state_value!(f64, F64, "f64", PrimitiveKind::F64, DoubleSerializer);
impl_state_value!(
    String,
    String,
    "string",
    PrimitiveKind::String { max_length: None },
    StringSerializer
);

impl<T: StateValue> StateValue for Vec<T> {
    fn type_descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::sequence_of(T::type_descriptor()))
    }

    fn to_dynamic(&self) -> DynamicValue {
        DynamicValue::Sequence(self.iter().map(StateValue::to_dynamic).collect())
    }

    fn from_dynamic(value: DynamicValue) -> SerResult<Self> {
        match value {
            DynamicValue::Sequence(items) => items.into_iter().map(T::from_dynamic).collect(),
            other => Err(SerError::TypeMismatch {
                expected: "sequence".into(),
                found: other.kind_name().into(),
            }),
        }
    }

    fn basic_serializer() -> Option<Box<dyn TypeSerializer<Self>>> {
        let element = T::basic_serializer()?;
        Some(Box::new(ListSerializer::new(element)))
    }
}

/// Typed handle on the runtime type of `T`.
///
/// This is what an unresolved state descriptor holds until a
/// [`SerializerConfig`] is available.
pub struct TypeInfo<T> {
    descriptor: Arc<TypeDescriptor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: StateValue> TypeInfo<T> {
    pub fn of() -> Self {
        Self {
            descriptor: T::type_descriptor(),
            _marker: PhantomData,
        }
    }

    /// Build the serializer `config` selects for `T`.
    ///
    /// Types with a dedicated serializer get it unless the config forces the
    /// generic path. Everything else gets a [`GenericSerializer`], which
    /// registers every named type reachable from `T` in `config` first.
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError` if the generic path is needed but disabled,
    /// or if a reachable type cannot be registered. `config` is unchanged on
    /// error.
    pub fn create_serializer(
        &self,
        config: &mut SerializerConfig,
    ) -> Result<Box<dyn TypeSerializer<T>>, ResolutionError> {
        if !config.options().force_generic_serializer {
            if let Some(serializer) = T::basic_serializer() {
                return Ok(serializer);
            }
        }

        if config.options().disable_generic_types {
            return Err(ResolutionError::GenericTypesDisabled {
                type_name: self.type_name().to_string(),
            });
        }

        config.register_reachable(&self.descriptor)?;
        Ok(Box::new(GenericSerializer::new(
            self.clone(),
            Arc::new(config.registrations()),
            config.options().max_collection_length,
        )))
    }
}

impl<T> TypeInfo<T> {
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }
}

impl<T> Clone for TypeInfo<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypeInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_name", &self.descriptor.name)
            .finish()
    }
}

impl<T> PartialEq for TypeInfo<T> {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor == other.descriptor
    }
}
