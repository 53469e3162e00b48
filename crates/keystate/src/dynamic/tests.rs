// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Integration tests for the dynamic type model.

use super::*;
use std::sync::Arc;

#[test]
fn test_nested_descriptor_serde_roundtrip() {
    let vector3_type = Arc::new(
        TypeDescriptorBuilder::new("Vector3")
            .field("x", PrimitiveKind::F64)
            .field("y", PrimitiveKind::F64)
            .field("z", PrimitiveKind::F64)
            .build(),
    );

    let pose_type = TypeDescriptorBuilder::new("Pose")
        .nested_field("position", vector3_type.clone())
        .nested_field("orientation", vector3_type)
        .sequence_field("covariance", PrimitiveKind::F64)
        .build();

    let json = serde_json::to_string(&pose_type).expect("serialize descriptor");
    let back: TypeDescriptor = serde_json::from_str(&json).expect("deserialize descriptor");
    assert_eq!(back, pose_type);
    assert_eq!(back.fixed_size(), None);
}

#[test]
fn test_fixed_size_through_nested_reference() {
    let point = Arc::new(
        TypeDescriptorBuilder::new("Point")
            .field("x", PrimitiveKind::I32)
            .field("y", PrimitiveKind::I32)
            .build(),
    );
    let segment = TypeDescriptorBuilder::new("Segment")
        .nested_field("from", point.clone())
        .nested_field("to", point)
        .build();

    // Segment id + 2 x (Point id + 2 x i32)
    assert_eq!(segment.fixed_size(), Some(4 + 2 * 12));
}
