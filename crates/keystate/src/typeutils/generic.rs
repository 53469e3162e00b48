// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Fallback serializer driven by a type descriptor.
//!
//! # Wire format
//!
//! Values are walked against the [`TypeDescriptor`] of `T`:
//!
//! - primitives: little-endian, strings as u32 length + UTF-8
//! - struct: u32 registration id, then fields in declaration order; optional
//!   fields carry a presence byte
//! - enum: u32 registration id, then the i64 discriminant
//! - sequence: u32 count, then elements
//! - array: elements only (length is part of the type)
//!
//! Registration ids come from the [`RegistrationTable`] captured when the
//! serializer was resolved. Two configs that registered types in a different
//! order produce incompatible serializers, and decoding rejects the other
//! side's ids.

use super::serializer::TypeSerializer;
use super::snapshot::SerializerSnapshot;
use super::type_info::{StateValue, TypeInfo};
use crate::config::RegistrationTable;
use crate::core::ser::{Cursor, OutputBuffer, SerError, SerResult};
use crate::dynamic::{DynamicValue, PrimitiveKind, SequenceDescriptor, TypeDescriptor, TypeKind};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Serializer built from a bare type plus a registration table.
pub struct GenericSerializer<T> {
    type_info: TypeInfo<T>,
    registrations: Arc<RegistrationTable>,
    max_collection_length: usize,
    output: OutputBuffer,
}

impl<T: StateValue> GenericSerializer<T> {
    pub fn new(
        type_info: TypeInfo<T>,
        registrations: Arc<RegistrationTable>,
        max_collection_length: usize,
    ) -> Self {
        Self {
            type_info,
            registrations,
            max_collection_length,
            output: OutputBuffer::new(),
        }
    }

    pub fn type_info(&self) -> &TypeInfo<T> {
        &self.type_info
    }

    pub fn registrations(&self) -> &RegistrationTable {
        &self.registrations
    }

    pub fn registration_id(&self, type_name: &str) -> Option<u32> {
        self.registrations.id_of(type_name)
    }

    pub fn max_collection_length(&self) -> usize {
        self.max_collection_length
    }
}

impl<T> fmt::Debug for GenericSerializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericSerializer")
            .field("type_name", &self.type_info.type_name())
            .field("registrations", &self.registrations.len())
            .field("max_collection_length", &self.max_collection_length)
            .finish()
    }
}

impl<T: StateValue> TypeSerializer<T> for GenericSerializer<T> {
    fn duplicate(&self) -> Box<dyn TypeSerializer<T>> {
        // The registration table is immutable once captured; sharing it keeps
        // identifiers identical across duplicates.
        Box::new(Self::new(
            self.type_info.clone(),
            Arc::clone(&self.registrations),
            self.max_collection_length,
        ))
    }

    fn serialize(&mut self, value: &T) -> SerResult<Vec<u8>> {
        let dynamic = value.to_dynamic();
        self.output.clear();
        let mut encoder = GenericEncoder {
            out: &mut self.output,
            registrations: &self.registrations,
            max_collection_length: self.max_collection_length,
        };
        encoder.encode(self.type_info.descriptor(), &dynamic)?;
        Ok(self.output.to_vec())
    }

    fn deserialize(&mut self, bytes: &[u8]) -> SerResult<T> {
        let mut decoder = GenericDecoder {
            cursor: Cursor::new(bytes),
            registrations: &self.registrations,
            max_collection_length: self.max_collection_length,
        };
        let value = decoder.decode(self.type_info.descriptor())?;
        decoder.cursor.finish()?;
        T::from_dynamic(value)
    }

    fn create_instance(&self) -> T {
        T::default()
    }

    fn copy(&self, value: &T) -> T {
        value.clone()
    }

    fn length(&self) -> Option<usize> {
        self.type_info.descriptor().fixed_size()
    }

    fn snapshot(&self) -> SerializerSnapshot {
        SerializerSnapshot::Generic {
            type_descriptor: Arc::clone(self.type_info.descriptor()),
            registrations: (*self.registrations).clone(),
            max_collection_length: self.max_collection_length,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn shape_mismatch(desc: &TypeDescriptor, value: &DynamicValue) -> SerError {
    let expected = if desc.name.is_empty() {
        "anonymous type".to_string()
    } else {
        desc.name.clone()
    };
    SerError::TypeMismatch {
        expected,
        found: value.kind_name().to_string(),
    }
}

fn unregistered(type_name: &str) -> SerError {
    SerError::InvalidData {
        reason: format!("type {} has no registration id", type_name),
    }
}

fn sequence_bound(seq: &SequenceDescriptor, max_collection_length: usize) -> usize {
    seq.max_length
        .map_or(max_collection_length, |max| max.min(max_collection_length))
}

struct GenericEncoder<'a> {
    out: &'a mut OutputBuffer,
    registrations: &'a RegistrationTable,
    max_collection_length: usize,
}

impl GenericEncoder<'_> {
    fn encode(&mut self, desc: &TypeDescriptor, value: &DynamicValue) -> SerResult<()> {
        match &desc.kind {
            TypeKind::Primitive(kind) => self.encode_primitive(desc, kind, value),
            TypeKind::Struct(fields) => {
                let DynamicValue::Struct(map) = value else {
                    return Err(shape_mismatch(desc, value));
                };
                self.write_registration(&desc.name)?;
                for field in fields {
                    let field_value = map.get(&field.name).filter(|v| !v.is_null());
                    if field.optional {
                        self.out.write_bool(field_value.is_some());
                    }
                    match field_value {
                        Some(v) => self.encode(&field.type_desc, v)?,
                        None if field.optional => {}
                        None => {
                            return Err(SerError::InvalidData {
                                reason: format!("{}: missing field '{}'", desc.name, field.name),
                            })
                        }
                    }
                }
                Ok(())
            }
            TypeKind::Sequence(seq) => {
                let DynamicValue::Sequence(items) = value else {
                    return Err(shape_mismatch(desc, value));
                };
                let max = sequence_bound(seq, self.max_collection_length);
                if items.len() > max {
                    return Err(SerError::LengthExceeded {
                        length: items.len(),
                        max,
                    });
                }
                self.out.write_len(items.len())?;
                for item in items {
                    self.encode(&seq.element_type, item)?;
                }
                Ok(())
            }
            TypeKind::Array(arr) => {
                let DynamicValue::Array(items) = value else {
                    return Err(shape_mismatch(desc, value));
                };
                if items.len() != arr.length {
                    return Err(SerError::InvalidData {
                        reason: format!(
                            "array of {} elements where {} are required",
                            items.len(),
                            arr.length
                        ),
                    });
                }
                for item in items {
                    self.encode(&arr.element_type, item)?;
                }
                Ok(())
            }
            TypeKind::Enum(en) => {
                let DynamicValue::Enum(discriminant, _) = value else {
                    return Err(shape_mismatch(desc, value));
                };
                if en.variant_by_value(*discriminant).is_none() {
                    return Err(SerError::InvalidData {
                        reason: format!("{} has no variant with value {}", desc.name, discriminant),
                    });
                }
                self.write_registration(&desc.name)?;
                self.out.write_i64_le(*discriminant);
                Ok(())
            }
            TypeKind::Nested(inner) => self.encode(inner, value),
        }
    }

    fn encode_primitive(
        &mut self,
        desc: &TypeDescriptor,
        kind: &PrimitiveKind,
        value: &DynamicValue,
    ) -> SerResult<()> {
        match (kind, value) {
            (PrimitiveKind::Bool, DynamicValue::Bool(v)) => self.out.write_bool(*v),
            (PrimitiveKind::U8, DynamicValue::U8(v)) => self.out.write_u8(*v),
            (PrimitiveKind::U16, DynamicValue::U16(v)) => self.out.write_u16_le(*v),
            (PrimitiveKind::U32, DynamicValue::U32(v)) => self.out.write_u32_le(*v),
            (PrimitiveKind::U64, DynamicValue::U64(v)) => self.out.write_u64_le(*v),
            (PrimitiveKind::I8, DynamicValue::I8(v)) => self.out.write_i8(*v),
            (PrimitiveKind::I16, DynamicValue::I16(v)) => self.out.write_i16_le(*v),
            (PrimitiveKind::I32, DynamicValue::I32(v)) => self.out.write_i32_le(*v),
            (PrimitiveKind::I64, DynamicValue::I64(v)) => self.out.write_i64_le(*v),
            (PrimitiveKind::F32, DynamicValue::F32(v)) => self.out.write_f32_le(*v),
            (PrimitiveKind::F64, DynamicValue::F64(v)) => self.out.write_f64_le(*v),
            (PrimitiveKind::String { max_length }, DynamicValue::String(s)) => {
                if let Some(max) = *max_length {
                    if s.len() > max {
                        return Err(SerError::LengthExceeded {
                            length: s.len(),
                            max,
                        });
                    }
                }
                self.out.write_str(s)?;
            }
            _ => return Err(shape_mismatch(desc, value)),
        }
        Ok(())
    }

    fn write_registration(&mut self, type_name: &str) -> SerResult<()> {
        let id = self
            .registrations
            .id_of(type_name)
            .ok_or_else(|| unregistered(type_name))?;
        self.out.write_u32_le(id);
        Ok(())
    }
}

struct GenericDecoder<'a> {
    cursor: Cursor<'a>,
    registrations: &'a RegistrationTable,
    max_collection_length: usize,
}

impl GenericDecoder<'_> {
    fn decode(&mut self, desc: &TypeDescriptor) -> SerResult<DynamicValue> {
        match &desc.kind {
            TypeKind::Primitive(kind) => self.decode_primitive(kind),
            TypeKind::Struct(fields) => {
                self.read_registration(&desc.name)?;
                let mut map = HashMap::with_capacity(fields.len());
                for field in fields {
                    let present = if field.optional {
                        self.cursor.read_bool()?
                    } else {
                        true
                    };
                    let value = if present {
                        self.decode(&field.type_desc)?
                    } else {
                        DynamicValue::Null
                    };
                    map.insert(field.name.clone(), value);
                }
                Ok(DynamicValue::Struct(map))
            }
            TypeKind::Sequence(seq) => {
                let len = self
                    .cursor
                    .read_len(sequence_bound(seq, self.max_collection_length))?;
                let mut items = Vec::with_capacity(len.min(self.cursor.remaining()));
                for _ in 0..len {
                    items.push(self.decode(&seq.element_type)?);
                }
                Ok(DynamicValue::Sequence(items))
            }
            TypeKind::Array(arr) => {
                let mut items = Vec::with_capacity(arr.length.min(self.cursor.remaining()));
                for _ in 0..arr.length {
                    items.push(self.decode(&arr.element_type)?);
                }
                Ok(DynamicValue::Array(items))
            }
            TypeKind::Enum(en) => {
                self.read_registration(&desc.name)?;
                let discriminant = self.cursor.read_i64_le()?;
                let variant = en.variant_by_value(discriminant).ok_or_else(|| {
                    SerError::InvalidData {
                        reason: format!("{} has no variant with value {}", desc.name, discriminant),
                    }
                })?;
                Ok(DynamicValue::Enum(discriminant, variant.name.clone()))
            }
            TypeKind::Nested(inner) => self.decode(inner),
        }
    }

    fn decode_primitive(&mut self, kind: &PrimitiveKind) -> SerResult<DynamicValue> {
        let value = match kind {
            PrimitiveKind::Bool => DynamicValue::Bool(self.cursor.read_bool()?),
            PrimitiveKind::U8 => DynamicValue::U8(self.cursor.read_u8()?),
            PrimitiveKind::U16 => DynamicValue::U16(self.cursor.read_u16_le()?),
            PrimitiveKind::U32 => DynamicValue::U32(self.cursor.read_u32_le()?),
            PrimitiveKind::U64 => DynamicValue::U64(self.cursor.read_u64_le()?),
            PrimitiveKind::I8 => DynamicValue::I8(self.cursor.read_i8()?),
            PrimitiveKind::I16 => DynamicValue::I16(self.cursor.read_i16_le()?),
            PrimitiveKind::I32 => DynamicValue::I32(self.cursor.read_i32_le()?),
            PrimitiveKind::I64 => DynamicValue::I64(self.cursor.read_i64_le()?),
            PrimitiveKind::F32 => DynamicValue::F32(self.cursor.read_f32_le()?),
            PrimitiveKind::F64 => DynamicValue::F64(self.cursor.read_f64_le()?),
            PrimitiveKind::String { max_length } => {
                DynamicValue::String(self.cursor.read_string(max_length.unwrap_or(usize::MAX))?)
            }
        };
        Ok(value)
    }

    fn read_registration(&mut self, type_name: &str) -> SerResult<()> {
        let expected = self
            .registrations
            .id_of(type_name)
            .ok_or_else(|| unregistered(type_name))?;
        let found = self.cursor.read_u32_le()?;
        if found != expected {
            return Err(SerError::RegistrationMismatch {
                type_name: type_name.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SerializerConfig;
    use crate::dynamic::{EnumBuilder, TypeDescriptorBuilder};
    use crate::typeutils::take_field;

    #[derive(Debug, Clone, Default, PartialEq)]
    enum Unit {
        #[default]
        Meters,
        Feet,
    }

    impl StateValue for Unit {
        fn type_descriptor() -> Arc<TypeDescriptor> {
            Arc::new(
                EnumBuilder::new("Unit")
                    .variant("Meters")
                    .variant("Feet")
                    .build(),
            )
        }

        fn to_dynamic(&self) -> DynamicValue {
            match self {
                Unit::Meters => DynamicValue::Enum(0, "Meters".into()),
                Unit::Feet => DynamicValue::Enum(1, "Feet".into()),
            }
        }

        fn from_dynamic(value: DynamicValue) -> SerResult<Self> {
            match value {
                DynamicValue::Enum(0, _) => Ok(Unit::Meters),
                DynamicValue::Enum(1, _) => Ok(Unit::Feet),
                other => Err(SerError::TypeMismatch {
                    expected: "Unit".into(),
                    found: other.kind_name().into(),
                }),
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Measurement {
        sensor: String,
        samples: Vec<i32>,
        unit: Unit,
        note: Option<String>,
    }

    impl StateValue for Measurement {
        fn type_descriptor() -> Arc<TypeDescriptor> {
            Arc::new(
                TypeDescriptorBuilder::new("Measurement")
                    .string_field("sensor")
                    .sequence_field("samples", PrimitiveKind::I32)
                    .nested_field("unit", Unit::type_descriptor())
                    .optional_field("note", PrimitiveKind::String { max_length: Some(16) })
                    .build(),
            )
        }

        fn to_dynamic(&self) -> DynamicValue {
            let mut fields = HashMap::new();
            fields.insert("sensor".to_string(), self.sensor.to_dynamic());
            fields.insert("samples".to_string(), self.samples.to_dynamic());
            fields.insert("unit".to_string(), self.unit.to_dynamic());
            fields.insert(
                "note".to_string(),
                self.note
                    .as_ref()
                    .map_or(DynamicValue::Null, StateValue::to_dynamic),
            );
            DynamicValue::Struct(fields)
        }

        fn from_dynamic(mut value: DynamicValue) -> SerResult<Self> {
            let note = match value.take_field("note") {
                Some(DynamicValue::Null) | None => None,
                Some(v) => Some(String::from_dynamic(v)?),
            };
            Ok(Self {
                sensor: take_field(&mut value, "sensor")?,
                samples: take_field(&mut value, "samples")?,
                unit: take_field(&mut value, "unit")?,
                note,
            })
        }
    }

    fn resolve(config: &mut SerializerConfig) -> Box<dyn TypeSerializer<Measurement>> {
        TypeInfo::<Measurement>::of()
            .create_serializer(config)
            .expect("resolve Measurement")
    }

    fn sample() -> Measurement {
        Measurement {
            sensor: "probe-7".into(),
            samples: vec![3, -1, 40],
            unit: Unit::Feet,
            note: Some("calibrated".into()),
        }
    }

    #[test]
    fn test_resolution_registers_reachable_types_in_order() {
        let mut config = SerializerConfig::new();
        let serializer = resolve(&mut config);
        let generic = serializer
            .as_any()
            .downcast_ref::<GenericSerializer<Measurement>>()
            .expect("generic serializer");
        assert_eq!(generic.registration_id("Measurement"), Some(10));
        assert_eq!(generic.registration_id("Unit"), Some(11));
        assert_eq!(config.registration_id("Unit"), Some(11));
    }

    #[test]
    fn test_roundtrip_with_and_without_optional() {
        let mut config = SerializerConfig::new();
        let mut serializer = resolve(&mut config);

        let full = sample();
        let bytes = serializer.serialize(&full).expect("serialize");
        assert_eq!(&bytes[..4], &10u32.to_le_bytes());
        assert_eq!(serializer.deserialize(&bytes).expect("deserialize"), full);

        let empty = Measurement::default();
        let bytes = serializer.serialize(&empty).expect("serialize default");
        assert_eq!(serializer.deserialize(&bytes).expect("deserialize default"), empty);
    }

    #[test]
    fn test_decoding_with_other_registration_order_fails() {
        let mut ours = SerializerConfig::new();
        let mut encoder = resolve(&mut ours);
        let bytes = encoder.serialize(&sample()).expect("serialize");

        let mut theirs = SerializerConfig::new();
        theirs
            .register::<Unit>()
            .expect("register Unit first");
        let mut decoder = resolve(&mut theirs);
        assert!(!encoder.equals(decoder.as_ref()));

        let err = decoder.deserialize(&bytes).unwrap_err();
        assert_eq!(
            err,
            SerError::RegistrationMismatch {
                type_name: "Measurement".into(),
                expected: 11,
                found: 10,
            }
        );
    }

    #[test]
    fn test_collection_bound_from_config() {
        let mut config = SerializerConfig::new();
        config.set_max_collection_length(2);
        let mut serializer = resolve(&mut config);
        let err = serializer.serialize(&sample()).unwrap_err();
        assert_eq!(err, SerError::LengthExceeded { length: 3, max: 2 });
    }

    #[test]
    fn test_string_bound_from_descriptor() {
        let mut config = SerializerConfig::new();
        let mut serializer = resolve(&mut config);
        let mut value = sample();
        value.note = Some("much longer than sixteen bytes".into());
        assert!(matches!(
            serializer.serialize(&value),
            Err(SerError::LengthExceeded { max: 16, .. })
        ));
    }

    #[test]
    fn test_duplicate_shares_identifiers_not_buffers() {
        let mut config = SerializerConfig::new();
        let canonical = resolve(&mut config);
        let mut first = canonical.duplicate();
        let mut second = canonical.duplicate();
        assert!(!std::ptr::addr_eq(&*first, &*second));
        assert!(*first == *second);

        let a = first.serialize(&sample()).expect("serialize first");
        let b = second.serialize(&Measurement::default()).expect("serialize second");
        assert_ne!(a, b);
        assert_eq!(first.deserialize(&a).expect("decode first"), sample());
        assert_eq!(second.deserialize(&a).expect("decode with second"), sample());
    }

    #[test]
    fn test_unknown_enum_discriminant_rejected() {
        let mut config = SerializerConfig::new();
        let mut serializer = resolve(&mut config);
        let mut bytes = serializer.serialize(&sample()).expect("serialize");
        // Unit discriminant sits right after "probe-7" and the samples
        let unit_offset = 4 + (4 + 7) + (4 + 3 * 4) + 4;
        bytes[unit_offset..unit_offset + 8].copy_from_slice(&9i64.to_le_bytes());
        assert!(matches!(
            serializer.deserialize(&bytes),
            Err(SerError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_fixed_length_only_for_fixed_types() {
        let mut config = SerializerConfig::new();
        config.set_force_generic_serializer(true);
        let int = TypeInfo::<i32>::of()
            .create_serializer(&mut config)
            .expect("resolve i32");
        assert_eq!(int.length(), Some(4));
        assert_eq!(resolve(&mut config).length(), None);
    }
}
