// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Serializers for primitive element types and strings.

use super::serializer::TypeSerializer;
use super::snapshot::SerializerSnapshot;
use crate::core::ser::{Cursor, OutputBuffer, SerResult};
use std::any::Any;

/// Generate a fixed-width serializer (eliminates code duplication)
///
/// Each generated serializer owns its own [`OutputBuffer`]; `duplicate()`
/// hands out a fresh one.
macro_rules! basic_serializer {
    ($(#[$doc:meta])* $name:ident, $type:ty, $type_name:expr, $write:ident, $read:ident, $size:expr) => {
        $(#[$doc])*
        #[derive(Debug, Default)]
        pub struct $name {
            output: OutputBuffer,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    output: OutputBuffer::with_capacity($size),
                }
            }
        }

        impl TypeSerializer<$type> for $name {
            fn duplicate(&self) -> Box<dyn TypeSerializer<$type>> {
                Box::new(Self::new())
            }

            fn serialize(&mut self, value: &$type) -> SerResult<Vec<u8>> {
                self.output.clear();
                self.output.$write(*value);
                Ok(self.output.to_vec())
            }

            fn deserialize(&mut self, bytes: &[u8]) -> SerResult<$type> {
                let mut cursor = Cursor::new(bytes);
                let value = cursor.$read()?;
                cursor.finish()?;
                Ok(value)
            }

            fn create_instance(&self) -> $type {
                <$type>::default()
            }

            fn copy(&self, value: &$type) -> $type {
                *value
            }

            fn is_immutable_type(&self) -> bool {
                true
            }

            fn length(&self) -> Option<usize> {
                Some($size)
            }

            fn snapshot(&self) -> SerializerSnapshot {
                SerializerSnapshot::Basic {
                    type_name: $type_name.into(),
                }
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

basic_serializer!(
    /// Serializer for `bool` (one byte, 0 or 1).
    BoolSerializer, bool, "bool", write_bool, read_bool, 1
);
basic_serializer!(
    /// Serializer for `i8`.
    ByteSerializer, i8, "i8", write_i8, read_i8, 1
);
basic_serializer!(
    /// Serializer for `i16`.
    ShortSerializer, i16, "i16", write_i16_le, read_i16_le, 2
);
basic_serializer!(
    /// Serializer for `i32`.
    IntSerializer, i32, "i32", write_i32_le, read_i32_le, 4
);
basic_serializer!(
    /// Serializer for `i64`.
    LongSerializer, i64, "i64", write_i64_le, read_i64_le, 8
);
basic_serializer!(
    /// Serializer for `u8`.
    UnsignedByteSerializer, u8, "u8", write_u8, read_u8, 1
);
basic_serializer!(
    /// Serializer for `u16`.
    UnsignedShortSerializer, u16, "u16", write_u16_le, read_u16_le, 2
);
basic_serializer!(
    /// Serializer for `u32`.
    UnsignedIntSerializer, u32, "u32", write_u32_le, read_u32_le, 4
);
basic_serializer!(
    /// Serializer for `u64`.
    UnsignedLongSerializer, u64, "u64", write_u64_le, read_u64_le, 8
);
basic_serializer!(
    /// Serializer for `f32` (IEEE-754 bits, little-endian).
    FloatSerializer, f32, "f32", write_f32_le, read_f32_le, 4
);
basic_serializer!(
    /// Serializer for `f64` (IEEE-754 bits, little-endian).
    DoubleSerializer, f64, "f64", write_f64_le, read_f64_le, 8
);

/// Serializer for `String`: u32 byte length followed by UTF-8 bytes.
#[derive(Debug, Default)]
pub struct StringSerializer {
    output: OutputBuffer,
}

impl StringSerializer {
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
        }
    }
}

impl TypeSerializer<String> for StringSerializer {
    fn duplicate(&self) -> Box<dyn TypeSerializer<String>> {
        Box::new(Self::new())
    }

    fn serialize(&mut self, value: &String) -> SerResult<Vec<u8>> {
        self.output.clear();
        self.output.write_str(value)?;
        Ok(self.output.to_vec())
    }

    fn deserialize(&mut self, bytes: &[u8]) -> SerResult<String> {
        let mut cursor = Cursor::new(bytes);
        let value = cursor.read_string(u32::MAX as usize)?;
        cursor.finish()?;
        Ok(value)
    }

    fn create_instance(&self) -> String {
        String::new()
    }

    fn copy(&self, value: &String) -> String {
        value.clone()
    }

    fn is_immutable_type(&self) -> bool {
        true
    }

    fn snapshot(&self) -> SerializerSnapshot {
        SerializerSnapshot::Basic {
            type_name: "string".into(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_serializer_roundtrip_and_length() {
        let mut serializer = IntSerializer::new();
        for value in [0, -1, i32::MIN, i32::MAX, 42] {
            let bytes = serializer.serialize(&value).expect("serialize");
            assert_eq!(bytes.len(), 4);
            assert_eq!(serializer.deserialize(&bytes).expect("deserialize"), value);
        }
        assert_eq!(serializer.length(), Some(4));
        assert_eq!(serializer.create_instance(), 0);
    }

    #[test]
    fn test_string_serializer_roundtrip_including_empty() {
        let mut serializer = StringSerializer::new();
        for value in ["", "testName", "unicode \u{00e9}\u{4e2d}"] {
            let bytes = serializer
                .serialize(&value.to_string())
                .expect("serialize");
            assert_eq!(serializer.deserialize(&bytes).expect("deserialize"), value);
        }
    }

    #[test]
    fn test_double_preserves_bits() {
        let mut serializer = DoubleSerializer::new();
        let bytes = serializer.serialize(&-0.0).expect("serialize");
        let back = serializer.deserialize(&bytes).expect("deserialize");
        assert!(back.is_sign_negative());
    }

    #[test]
    fn test_deserialize_rejects_trailing_bytes() {
        let mut serializer = ShortSerializer::new();
        assert!(serializer.deserialize(&[1, 0, 0]).is_err());
        assert!(serializer.deserialize(&[1]).is_err());
    }

    #[test]
    fn test_duplicates_are_distinct_but_equal() {
        let canonical = LongSerializer::new();
        let a = canonical.duplicate();
        let b = canonical.duplicate();
        assert!(!std::ptr::addr_eq(&*a, &*b));
        assert!(a.equals(&*b));
        assert!(*a == *b);
    }

    #[test]
    fn test_different_basic_serializers_snapshots_differ() {
        let unsigned = UnsignedIntSerializer::new().snapshot();
        let signed = IntSerializer::new().snapshot();
        assert_ne!(unsigned, signed);
    }
}
