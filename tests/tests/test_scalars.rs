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


use lager_core::{Complex128, Complex64, Decoder, Encoder, Heap, TypeRegistry, Value};
use test_helpers::{decode, encode};

#[test]
fn test_int64_stream_layout() {
    let registry = TypeRegistry::new();
    let bytes = encode(&registry, &Heap::new(), &[Value::Int64(-1)]).unwrap();
    let mut expected = vec![];
    // object count 1, empty type table, empty pointer pool
    expected.extend_from_slice(&[0x02, 0, 0, 0, 0, 0, 0, 0]);
    expected.extend_from_slice(&[0; 8]);
    expected.extend_from_slice(&[0; 8]);
    // int64 tag, then zigzag(-1)
    expected.push(6);
    expected.extend_from_slice(&[0x01, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(bytes, expected);

    let (_, roots) = decode(&registry, &bytes).unwrap();
    assert_eq!(roots, vec![Value::Int64(-1)]);
}

#[test]
fn test_string_stream_layout() {
    let registry = TypeRegistry::new();
    let bytes = encode(&registry, &Heap::new(), &[Value::from("ab")]).unwrap();
    let body = &bytes[24..];
    assert_eq!(body[0], 24);
    assert_eq!(&body[1..9], &[0x04, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(&body[9..], b"ab");

    let (_, roots) = decode(&registry, &bytes).unwrap();
    assert_eq!(roots[0].as_str(), Some("ab"));
}

#[test]
fn test_every_scalar_kind() {
    let values = vec![
        Value::Bool(true),
        Value::Bool(false),
        Value::Int(-1234567890123),
        Value::Int8(i8::MIN),
        Value::Int16(-2),
        Value::Int32(i32::MAX),
        Value::Int64(i64::MIN),
        Value::Uint(u64::MAX),
        Value::Uint8(255),
        Value::Uint16(65535),
        Value::Uint32(7),
        Value::Uint64(1 << 63),
        Value::UintPtr(0xdead_beef),
        Value::Float32(-1.25),
        Value::Float64(std::f64::consts::PI),
        Value::Complex64(Complex64::new(0.5, -0.5)),
        Value::Complex128(Complex128::new(1e100, -1e-100)),
        Value::from(""),
        Value::from("utf-8 ✓"),
    ];
    let registry = TypeRegistry::new();
    let bytes = encode(&registry, &Heap::new(), &values).unwrap();
    let (heap, roots) = decode(&registry, &bytes).unwrap();
    assert!(heap.is_empty());
    assert_eq!(roots, values);
}

#[test]
fn test_nil_root() {
    let registry = TypeRegistry::new();
    let bytes = encode(&registry, &Heap::new(), &[Value::Nil]).unwrap();
    // nil interface tag
    assert_eq!(&bytes[24..], &[0]);
    let (_, roots) = decode(&registry, &bytes).unwrap();
    assert_eq!(roots, vec![Value::Nil]);
}

#[test]
fn test_empty_stream() {
    let registry = TypeRegistry::new();
    let encoder = Encoder::new(Vec::new(), &registry);
    let bytes = encoder.finish().unwrap();
    assert_eq!(bytes, vec![0; 24]);

    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    assert_eq!(decoder.object_count(), 0);
    assert!(decoder.read().unwrap_err().is_end_of_stream());
}

#[test]
fn test_nan_survives() {
    let registry = TypeRegistry::new();
    let bytes = encode(&registry, &Heap::new(), &[Value::Float64(f64::NAN)]).unwrap();
    let (_, roots) = decode(&registry, &bytes).unwrap();
    match roots[0] {
        Value::Float64(v) => assert!(v.is_nan()),
        ref other => panic!("unexpected {:?}", other),
    }
}
