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

use lager_core::buffer::{zigzag_decode_i64, zigzag_encode_i64, Reader, Writer};
use lager_core::error::Error;
use lager_core::{Complex128, Complex64};

#[test]
fn test_zigzag() {
    let test_data: Vec<(i64, u64)> = vec![
        (0, 0),
        (-1, 1),
        (1, 2),
        (-2, 3),
        (2, 4),
        (i64::MAX, u64::MAX - 1),
        (i64::MIN, u64::MAX),
    ];
    for &(signed, unsigned) in &test_data {
        assert_eq!(zigzag_encode_i64(signed), unsigned);
        assert_eq!(zigzag_decode_i64(unsigned), signed);
    }
}

#[test]
fn test_int64_minus_one_layout() {
    let mut writer = Writer::default();
    writer.write_i64(-1);
    assert_eq!(writer.dump(), vec![0x01, 0, 0, 0, 0, 0, 0, 0]);
    let bytes = writer.dump();
    let mut reader = Reader::new(bytes.as_slice());
    assert_eq!(reader.read_i64().unwrap(), -1);
}

#[test]
fn test_string_layout() {
    let mut writer = Writer::default();
    writer.write_string("ab");
    let bytes = writer.dump();
    // Int(2) length prefix, zigzag encoded
    assert_eq!(&bytes[..8], &[0x04, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(&bytes[8..], b"ab");
    let mut reader = Reader::new(bytes.as_slice());
    assert_eq!(reader.read_string().unwrap(), "ab");
}

#[test]
fn test_fixed_width_little_endian() {
    let mut writer = Writer::default();
    writer.write_u16(0x0102);
    writer.write_u32(0x0304_0506);
    writer.write_uint(7);
    assert_eq!(
        writer.dump(),
        vec![0x02, 0x01, 0x06, 0x05, 0x04, 0x03, 7, 0, 0, 0, 0, 0, 0, 0]
    );
}

#[test]
fn test_mixed_primitives() {
    let mut writer = Writer::default();
    writer.write_bool(true);
    writer.write_i8(-3);
    writer.write_i16(-300);
    writer.write_i32(70_000);
    writer.write_int(-42);
    writer.write_u8(200);
    writer.write_f32(1.5);
    writer.write_f64(-0.25);
    writer.write_complex64(Complex64::new(1.0, -2.0));
    writer.write_complex128(Complex128::new(3.5, 4.25));
    writer.write_string("héllo");
    let bytes = writer.dump();

    let mut reader = Reader::new(bytes.as_slice());
    assert!(reader.read_bool().unwrap());
    assert_eq!(reader.read_i8().unwrap(), -3);
    assert_eq!(reader.read_i16().unwrap(), -300);
    assert_eq!(reader.read_i32().unwrap(), 70_000);
    assert_eq!(reader.read_int().unwrap(), -42);
    assert_eq!(reader.read_u8().unwrap(), 200);
    assert_eq!(reader.read_f32().unwrap(), 1.5);
    assert_eq!(reader.read_f64().unwrap(), -0.25);
    assert_eq!(reader.read_complex64().unwrap(), Complex64::new(1.0, -2.0));
    assert_eq!(reader.read_complex128().unwrap(), Complex128::new(3.5, 4.25));
    assert_eq!(reader.read_string().unwrap(), "héllo");
    assert_eq!(reader.get_cursor(), bytes.len() as u64);
}

#[test]
fn test_truncated_input() {
    let bytes = [0x01, 0x00, 0x00];
    let mut reader = Reader::new(&bytes[..]);
    assert!(matches!(reader.read_u64(), Err(Error::Io(_))));
}

#[test]
fn test_negative_length() {
    let mut writer = Writer::default();
    writer.write_int(-5);
    let bytes = writer.dump();
    let mut reader = Reader::new(bytes.as_slice());
    assert!(matches!(reader.read_string(), Err(Error::InvalidData(_))));
}

#[test]
fn test_string_longer_than_input() {
    let mut writer = Writer::default();
    writer.write_len(1 << 40);
    writer.write_bytes(b"abc");
    let bytes = writer.dump();
    let mut reader = Reader::new(bytes.as_slice());
    assert!(matches!(reader.read_string(), Err(Error::Io(_))));
}

#[test]
fn test_invalid_utf8() {
    let mut writer = Writer::default();
    writer.write_len(2);
    writer.write_bytes(&[0xc3, 0x28]);
    let bytes = writer.dump();
    let mut reader = Reader::new(bytes.as_slice());
    assert!(matches!(reader.read_string(), Err(Error::InvalidData(_))));
}
