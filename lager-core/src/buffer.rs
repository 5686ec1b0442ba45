// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Fixed-width little-endian primitive codec.
//!
//! Every scalar has one width: 1/2/4/8 bytes for the 8/16/32/64-bit kinds,
//! and the platform-word `int`/`uint` kinds always take 8 bytes. Signed
//! integers are sign-folded before they hit the wire: non-negative `v` is
//! stored as `v << 1`, negative `v` as `(!v << 1) | 1`.

use std::io::Read;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

use crate::error::Error;
use crate::value::{Complex128, Complex64};

// Counts from the wire are trusted only this far when pre-allocating.
const MAX_PREALLOCATE: usize = 1024;

macro_rules! impl_zigzag {
    ($encode:ident, $decode:ident, $signed:ty, $unsigned:ty) => {
        #[inline(always)]
        pub fn $encode(value: $signed) -> $unsigned {
            if value < 0 {
                ((!value) as $unsigned) << 1 | 1
            } else {
                (value as $unsigned) << 1
            }
        }

        #[inline(always)]
        pub fn $decode(value: $unsigned) -> $signed {
            if value & 1 != 0 {
                !((value >> 1) as $signed)
            } else {
                (value >> 1) as $signed
            }
        }
    };
}

impl_zigzag!(zigzag_encode_i8, zigzag_decode_i8, i8, u8);
impl_zigzag!(zigzag_encode_i16, zigzag_decode_i16, i16, u16);
impl_zigzag!(zigzag_encode_i32, zigzag_decode_i32, i32, u32);
impl_zigzag!(zigzag_encode_i64, zigzag_decode_i64, i64, u64);

/// Caps a wire-provided element count before it is used as a capacity hint.
#[inline(always)]
pub(crate) fn capacity_hint(len: usize) -> usize {
    len.min(MAX_PREALLOCATE)
}

/// Growable in-memory byte buffer.
///
/// The encoder writes every root object and every pooled pointer target
/// into its own `Writer`, and only concatenates them on finish.
#[derive(Default, Debug)]
pub struct Writer {
    pub(crate) bf: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Writer {
        Writer {
            bf: Vec::with_capacity(capacity),
        }
    }

    pub fn reset(&mut self) {
        // keep capacity and reset len to 0
        self.bf.clear();
    }

    pub fn dump(&self) -> Vec<u8> {
        self.bf.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bf
    }

    pub fn len(&self) -> usize {
        self.bf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    pub fn write_bytes(&mut self, v: &[u8]) -> usize {
        self.bf.extend_from_slice(v);
        v.len()
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        let mut bytes = [0u8; 2];
        LittleEndian::write_u16(&mut bytes, value);
        self.bf.extend_from_slice(&bytes);
    }

    pub fn write_u32(&mut self, value: u32) {
        let mut bytes = [0u8; 4];
        LittleEndian::write_u32(&mut bytes, value);
        self.bf.extend_from_slice(&bytes);
    }

    pub fn write_u64(&mut self, value: u64) {
        let mut bytes = [0u8; 8];
        LittleEndian::write_u64(&mut bytes, value);
        self.bf.extend_from_slice(&bytes);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.write_u8(zigzag_encode_i8(value));
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_u16(zigzag_encode_i16(value));
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_u32(zigzag_encode_i32(value));
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_u64(zigzag_encode_i64(value));
    }

    /// Platform-word signed integer; always 8 bytes on the wire.
    pub fn write_int(&mut self, value: i64) {
        self.write_i64(value);
    }

    /// Platform-word unsigned integer; always 8 bytes on the wire.
    pub fn write_uint(&mut self, value: u64) {
        self.write_u64(value);
    }

    /// Lengths and counts travel as signed `int`.
    pub fn write_len(&mut self, len: usize) {
        self.write_int(len as i64);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write_u64(value.to_bits());
    }

    pub fn write_complex64(&mut self, value: Complex64) {
        self.write_f32(value.re);
        self.write_f32(value.im);
    }

    pub fn write_complex128(&mut self, value: Complex128) {
        self.write_f64(value.re);
        self.write_f64(value.im);
    }

    /// Byte length followed by the raw UTF-8 bytes, no terminator.
    pub fn write_string(&mut self, value: &str) {
        self.write_len(value.len());
        self.write_bytes(value.as_bytes());
    }
}

/// Pull-based reader over any byte source.
///
/// Every read propagates the first I/O failure immediately; there is no
/// lookahead, so a `Reader` over a socket consumes exactly what it decodes.
pub struct Reader<R> {
    inner: R,
    cursor: u64,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R) -> Reader<R> {
        Reader { inner, cursor: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn get_cursor(&self) -> u64 {
        self.cursor
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let value = self.inner.read_u8()?;
        self.cursor += 1;
        Ok(value)
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        let value = self.inner.read_u16::<LittleEndian>()?;
        self.cursor += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        let value = self.inner.read_u32::<LittleEndian>()?;
        self.cursor += 4;
        Ok(value)
    }

    pub fn read_u64(&mut self) -> Result<u64, Error> {
        let value = self.inner.read_u64::<LittleEndian>()?;
        self.cursor += 8;
        Ok(value)
    }

    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(zigzag_decode_i8(self.read_u8()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, Error> {
        Ok(zigzag_decode_i16(self.read_u16()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, Error> {
        Ok(zigzag_decode_i32(self.read_u32()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, Error> {
        Ok(zigzag_decode_i64(self.read_u64()?))
    }

    pub fn read_int(&mut self) -> Result<i64, Error> {
        self.read_i64()
    }

    pub fn read_uint(&mut self) -> Result<u64, Error> {
        self.read_u64()
    }

    /// Reads a length or count, rejecting negative values.
    pub fn read_len(&mut self) -> Result<usize, Error> {
        let len = self.read_int()?;
        usize::try_from(len).map_err(|_| {
            Error::invalid_data(format!(
                "negative or oversized length {} at byte {}",
                len,
                self.cursor - 8
            ))
        })
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn read_complex64(&mut self) -> Result<Complex64, Error> {
        let re = self.read_f32()?;
        let im = self.read_f32()?;
        Ok(Complex64::new(re, im))
    }

    pub fn read_complex128(&mut self) -> Result<Complex128, Error> {
        let re = self.read_f64()?;
        let im = self.read_f64()?;
        Ok(Complex128::new(re, im))
    }

    /// Reads exactly `len` bytes without trusting `len` for allocation.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::with_capacity(capacity_hint(len));
        let read = (&mut self.inner).take(len as u64).read_to_end(&mut bytes)?;
        self.cursor += read as u64;
        if read != len {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes, stream ended after {}", len, read),
            )
            .into());
        }
        Ok(bytes)
    }

    pub fn read_string(&mut self) -> Result<String, Error> {
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes)
            .map_err(|e| Error::invalid_data(format!("string is not valid UTF-8: {}", e)))
    }
}
