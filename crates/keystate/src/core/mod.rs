// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Low-level building blocks shared by the serializers.

pub mod ser;
