// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Type descriptors for runtime type information.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    String { max_length: Option<usize> },
}

impl PrimitiveKind {
    /// Get the encoded size in bytes (None for strings).
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::U8 | Self::I8 => Some(1),
            Self::U16 | Self::I16 => Some(2),
            Self::U32 | Self::I32 | Self::F32 => Some(4),
            Self::U64 | Self::I64 | Self::F64 => Some(8),
            Self::String { .. } => None,
        }
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeKind {
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Struct with named fields.
    Struct(Vec<FieldDescriptor>),
    /// Sequence (dynamic length).
    Sequence(SequenceDescriptor),
    /// Array (fixed length).
    Array(ArrayDescriptor),
    /// Enumeration.
    Enum(EnumDescriptor),
    /// Nested type reference.
    Nested(Arc<TypeDescriptor>),
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name.
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a primitive type descriptor.
    pub fn primitive(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::new(name, TypeKind::Primitive(kind))
    }

    /// Create a struct type descriptor.
    pub fn struct_type(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Struct(fields))
    }

    /// Create an unbounded sequence descriptor named after its element.
    pub fn sequence_of(element_type: Arc<TypeDescriptor>) -> Self {
        let name = format!("sequence<{}>", element_type.name);
        Self::new(
            name,
            TypeKind::Sequence(SequenceDescriptor::unbounded(element_type)),
        )
    }

    /// Check if this is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    /// Check if this is a struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Structs and enums carry a registration identifier on the wire.
    pub fn is_registrable(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_) | TypeKind::Enum(_))
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Encoded size when every value of the type has the same length.
    ///
    /// Registrable types include their 4-byte identifier.
    pub fn fixed_size(&self) -> Option<usize> {
        match &self.kind {
            TypeKind::Primitive(p) => p.size(),
            TypeKind::Struct(fields) => {
                let mut size = 4;
                for field in fields {
                    if field.optional {
                        return None;
                    }
                    size += field.type_desc.fixed_size()?;
                }
                Some(size)
            }
            TypeKind::Sequence(_) => None,
            TypeKind::Array(arr) => arr
                .element_type
                .fixed_size()
                .map(|size| size * arr.length),
            TypeKind::Enum(_) => Some(12),
            TypeKind::Nested(inner) => inner.fixed_size(),
        }
    }
}

/// Field descriptor for struct members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
    /// Field may be absent (encoded behind a presence byte).
    pub optional: bool,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
            optional: false,
        }
    }

    /// Mark as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Sequence type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
    /// Maximum length (None = unbounded).
    pub max_length: Option<usize>,
}

impl SequenceDescriptor {
    /// Create unbounded sequence.
    pub fn unbounded(element_type: Arc<TypeDescriptor>) -> Self {
        Self {
            element_type,
            max_length: None,
        }
    }

    /// Create bounded sequence.
    pub fn bounded(element_type: Arc<TypeDescriptor>, max_length: usize) -> Self {
        Self {
            element_type,
            max_length: Some(max_length),
        }
    }
}

/// Array type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
    /// Fixed length.
    pub length: usize,
}

impl ArrayDescriptor {
    /// Create array descriptor.
    pub fn new(element_type: Arc<TypeDescriptor>, length: usize) -> Self {
        Self {
            element_type,
            length,
        }
    }
}

/// Enumeration type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    /// Enum variants.
    pub variants: Vec<EnumVariant>,
}

impl EnumDescriptor {
    /// Create enum descriptor.
    pub fn new(variants: Vec<EnumVariant>) -> Self {
        Self { variants }
    }

    /// Get variant by name.
    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Get variant by value.
    pub fn variant_by_value(&self, value: i64) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.value == value)
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumVariant {
    /// Variant name.
    pub name: String,
    /// Variant value.
    pub value: i64,
}

impl EnumVariant {
    /// Create enum variant.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_size() {
        assert_eq!(PrimitiveKind::Bool.size(), Some(1));
        assert_eq!(PrimitiveKind::U32.size(), Some(4));
        assert_eq!(PrimitiveKind::F64.size(), Some(8));
        assert_eq!(PrimitiveKind::String { max_length: None }.size(), None);
    }

    #[test]
    fn test_type_descriptor_struct() {
        let u32_type = Arc::new(TypeDescriptor::primitive("u32", PrimitiveKind::U32));
        let f64_type = Arc::new(TypeDescriptor::primitive("f64", PrimitiveKind::F64));

        let fields = vec![
            FieldDescriptor::new("x", u32_type),
            FieldDescriptor::new("y", f64_type),
        ];

        let desc = TypeDescriptor::struct_type("Point", fields);
        assert!(desc.is_struct());
        assert!(desc.is_registrable());
        assert_eq!(desc.fields().map(|f| f.len()), Some(2));
        assert!(desc.field("x").is_some());
        assert!(desc.field("z").is_none());
        // identifier + u32 + f64
        assert_eq!(desc.fixed_size(), Some(16));
    }

    #[test]
    fn test_fixed_size_unknown_for_strings_and_optionals() {
        let text = Arc::new(TypeDescriptor::primitive(
            "string",
            PrimitiveKind::String { max_length: None },
        ));
        let with_text =
            TypeDescriptor::struct_type("Note", vec![FieldDescriptor::new("text", text)]);
        assert_eq!(with_text.fixed_size(), None);

        let id = Arc::new(TypeDescriptor::primitive("u32", PrimitiveKind::U32));
        let optional =
            TypeDescriptor::struct_type("MaybeId", vec![FieldDescriptor::new("id", id).optional()]);
        assert_eq!(optional.fixed_size(), None);
    }

    #[test]
    fn test_enum_descriptor() {
        let variants = vec![
            EnumVariant::new("RED", 0),
            EnumVariant::new("GREEN", 1),
            EnumVariant::new("BLUE", 2),
        ];
        let enum_desc = EnumDescriptor::new(variants);

        assert_eq!(enum_desc.variant("GREEN").map(|v| v.value), Some(1));
        assert_eq!(
            enum_desc.variant_by_value(2).map(|v| &v.name as &str),
            Some("BLUE")
        );
    }

    #[test]
    fn test_sequence_of_names_after_element() {
        let u8_type = Arc::new(TypeDescriptor::primitive("u8", PrimitiveKind::U8));
        let seq = TypeDescriptor::sequence_of(u8_type);
        assert_eq!(seq.name, "sequence<u8>");
        assert!(!seq.is_registrable());
    }
}
