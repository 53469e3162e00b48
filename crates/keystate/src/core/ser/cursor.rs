// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 keystate contributors

//! Growable output buffer and bounds-checked read cursor.
//!

use super::{SerError, SerResult};

/// Generate little-endian write methods for primitive types.
macro_rules! impl_write_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) {
            self.buffer.extend_from_slice(&value.to_le_bytes());
        }
    };
}

/// Generate little-endian read methods for primitive types.
///
/// Each generated method:
/// 1. Checks buffer bounds (returns `SerError::ReadFailed` if overflow)
/// 2. Reads N bytes from buffer
/// 3. Converts bytes to value via `from_le_bytes()`
/// 4. Advances offset
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> SerResult<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Owned scratch buffer a serializer encodes into.
///
/// The buffer is reused across `serialize` calls, which is what makes a
/// serializer stateful: two threads writing through the same instance would
/// interleave their bytes. Each serializer duplicate owns a fresh one.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    buffer: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Drop previous contents while keeping the allocation.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Copy the encoded bytes out, leaving the scratch allocation in place.
    pub fn to_vec(&self) -> Vec<u8> {
        self.buffer.clone()
    }

    impl_write_le!(write_u8, u8);
    impl_write_le!(write_u16_le, u16);
    impl_write_le!(write_u32_le, u32);
    impl_write_le!(write_u64_le, u64);
    impl_write_le!(write_i8, i8);
    impl_write_le!(write_i16_le, i16);
    impl_write_le!(write_i32_le, i32);
    impl_write_le!(write_i64_le, i64);

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    pub fn write_f32_le(&mut self, value: f32) {
        self.write_u32_le(value.to_bits());
    }

    pub fn write_f64_le(&mut self, value: f64) {
        self.write_u64_le(value.to_bits());
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Write a `u32` length prefix.
    pub fn write_len(&mut self, len: usize) -> SerResult<()> {
        let len = u32::try_from(len).map_err(|_| SerError::WriteFailed {
            offset: self.buffer.len(),
            reason: "length does not fit in u32".into(),
        })?;
        self.write_u32_le(len);
        Ok(())
    }

    /// Length-prefixed UTF-8 string (no terminator).
    pub fn write_str(&mut self, value: &str) -> SerResult<()> {
        self.write_len(value.len())?;
        self.write_bytes(value.as_bytes());
        Ok(())
    }
}

/// Immutable cursor for reading (bounds-checked, zero-copy)
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    impl_read_le!(read_u8, u8, 1);
    impl_read_le!(read_u16_le, u16, 2);
    impl_read_le!(read_u32_le, u32, 4);
    impl_read_le!(read_u64_le, u64, 8);
    impl_read_le!(read_i8, i8, 1);
    impl_read_le!(read_i16_le, i16, 2);
    impl_read_le!(read_i32_le, i32, 4);
    impl_read_le!(read_i64_le, i64, 8);

    pub fn read_bool(&mut self) -> SerResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SerError::InvalidData {
                reason: format!("invalid bool byte {:#04X} at offset {}", other, self.offset - 1),
            }),
        }
    }

    pub fn read_f32_le(&mut self) -> SerResult<f32> {
        Ok(f32::from_bits(self.read_u32_le()?))
    }

    pub fn read_f64_le(&mut self) -> SerResult<f64> {
        Ok(f64::from_bits(self.read_u64_le()?))
    }

    pub fn read_bytes(&mut self, len: usize) -> SerResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(SerError::ReadFailed {
                offset: self.offset,
                reason: "unexpected end of buffer".into(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Read a `u32` length prefix and check it against `max`.
    pub fn read_len(&mut self, max: usize) -> SerResult<usize> {
        let len = self.read_u32_le()? as usize;
        if len > max {
            return Err(SerError::LengthExceeded { length: len, max });
        }
        Ok(len)
    }

    pub fn read_string(&mut self, max: usize) -> SerResult<String> {
        let len = self.read_len(max)?;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    /// Fail if bytes are left over after a complete value was decoded.
    pub fn finish(&self) -> SerResult<()> {
        if self.is_eof() {
            Ok(())
        } else {
            Err(SerError::InvalidData {
                reason: format!(
                    "{} trailing bytes after offset {}",
                    self.remaining(),
                    self.offset
                ),
            })
        }
    }
}
