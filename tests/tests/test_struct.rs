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


use lager_core::{
    Decoder, Error, FieldShape, Heap, SliceValue, StructShape, StructValue, TypeDescriptor,
    TypeRegistry, Value,
};
use test_helpers::{encode, round_trip};

const POINT: &str = "geo.Point";
const LINE: &str = "geo.Line";

/// `type Point struct { X, Y int64; label string }`
fn point_shape() -> StructShape {
    StructShape::new()
        .with_field(FieldShape::exported("X", TypeDescriptor::Int64))
        .with_field(FieldShape::exported("Y", TypeDescriptor::Int64))
        .with_field(FieldShape::unexported("label", TypeDescriptor::String))
}

fn geo_registry() -> TypeRegistry {
    let point = TypeDescriptor::struct_named(POINT);
    let mut registry = TypeRegistry::new();
    registry.register_struct_shape(POINT, point_shape());
    registry.register_struct_shape(
        LINE,
        StructShape::new()
            .with_field(FieldShape::exported("From", point.clone()))
            .with_field(FieldShape::exported("To", point.clone()))
            .with_field(FieldShape::exported("Via", TypeDescriptor::slice_of(point))),
    );
    registry
}

fn point(x: i64, y: i64) -> StructValue {
    StructValue::new(POINT)
        .with_field("X", x)
        .with_field("Y", y)
        .with_field("label", "")
}

#[test]
fn test_struct_round_trip() {
    let registry = geo_registry();
    let (_, root) = round_trip(&registry, &Heap::new(), point(3, -4).into());
    assert_eq!(root, Value::Struct(point(3, -4)));
}

#[test]
fn test_nested_structs() {
    let registry = geo_registry();
    let line = StructValue::new(LINE)
        .with_field("From", point(0, 0))
        .with_field("To", point(10, 10))
        .with_field(
            "Via",
            SliceValue::with_items(
                TypeDescriptor::struct_named(POINT),
                vec![point(5, 0).into(), point(5, 5).into()],
            ),
        );
    let (_, root) = round_trip(&registry, &Heap::new(), line.clone().into());
    assert_eq!(root, Value::Struct(line));
}

#[test]
fn test_unexported_field_is_not_carried() {
    let registry = geo_registry();
    let labelled = point(1, 2).with_field("label", "origin");
    let (_, root) = round_trip(&registry, &Heap::new(), labelled.into());
    let decoded = root.as_struct().unwrap();
    assert_eq!(decoded.get("X"), Some(&Value::Int64(1)));
    assert_eq!(decoded.get("label").and_then(Value::as_str), Some(""));
}

#[test]
fn test_missing_field_written_as_zero() {
    let registry = geo_registry();
    let partial = StructValue::new(POINT).with_field("Y", 7i64);
    let (_, root) = round_trip(&registry, &Heap::new(), partial.into());
    assert_eq!(root, Value::Struct(point(0, 7)));
}

#[test]
fn test_zero_value_of_struct() {
    let registry = geo_registry();
    let zero = Value::zero(&TypeDescriptor::struct_named(LINE), &registry).unwrap();
    let line = zero.as_struct().unwrap();
    assert_eq!(line.get("From"), Some(&Value::Struct(point(0, 0))));
    let via = line.get("Via").and_then(Value::as_slice).unwrap();
    assert!(via.is_empty());
    assert_eq!(via.elem(), &TypeDescriptor::struct_named(POINT));
}

#[test]
fn test_unknown_field_on_encode() {
    let registry = geo_registry();
    let bogus = point(1, 1).with_field("Z", 1i64);
    let err = encode(&registry, &Heap::new(), &[bogus.into()]).unwrap_err();
    match err {
        Error::UnknownField { type_name, field } => {
            assert_eq!(type_name, POINT);
            assert_eq!(field, "Z");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_unknown_field_on_decode() {
    let mut writer_registry = TypeRegistry::new();
    writer_registry.register_struct_shape(
        POINT,
        point_shape().with_field(FieldShape::exported("Z", TypeDescriptor::Int64)),
    );
    let bytes = encode(
        &writer_registry,
        &Heap::new(),
        &[point(1, 2).with_field("Z", 3i64).into()],
    )
    .unwrap();

    let reader_registry = geo_registry();
    let mut decoder = Decoder::open(bytes.as_slice(), &reader_registry).unwrap();
    let err = decoder.read().unwrap_err();
    assert!(matches!(err, Error::UnknownField { .. }));
}

#[test]
fn test_unexported_field_on_wire_is_rejected() {
    // the writer exports "label", the reader keeps it private
    let mut writer_registry = TypeRegistry::new();
    writer_registry.register_struct_shape(
        POINT,
        StructShape::new()
            .with_field(FieldShape::exported("X", TypeDescriptor::Int64))
            .with_field(FieldShape::exported("Y", TypeDescriptor::Int64))
            .with_field(FieldShape::exported("label", TypeDescriptor::String)),
    );
    let bytes = encode(&writer_registry, &Heap::new(), &[point(1, 2).into()]).unwrap();

    let reader_registry = geo_registry();
    let mut decoder = Decoder::open(bytes.as_slice(), &reader_registry).unwrap();
    assert!(matches!(decoder.read().unwrap_err(), Error::UnknownField { .. }));
}

#[test]
fn test_fewer_fields_on_wire_keep_zero() {
    let mut writer_registry = TypeRegistry::new();
    writer_registry.register_struct_shape(
        POINT,
        StructShape::new().with_field(FieldShape::exported("X", TypeDescriptor::Int64)),
    );
    let only_x = StructValue::new(POINT).with_field("X", 9i64);
    let bytes = encode(&writer_registry, &Heap::new(), &[only_x.into()]).unwrap();

    let reader_registry = geo_registry();
    let mut decoder = Decoder::open(bytes.as_slice(), &reader_registry).unwrap();
    assert_eq!(decoder.read().unwrap(), Value::Struct(point(9, 0)));
}

#[test]
fn test_unregistered_struct_on_encode() {
    let registry = TypeRegistry::new();
    let err = encode(&registry, &Heap::new(), &[point(1, 2).into()]).unwrap_err();
    assert!(matches!(err, Error::UnregisteredTypeName(name) if name == POINT));
}

#[test]
fn test_interface_name_used_as_struct() {
    let mut registry = TypeRegistry::new();
    registry.register_interface(POINT);
    let err = encode(&registry, &Heap::new(), &[point(1, 2).into()]).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn test_field_type_mismatch() {
    let registry = geo_registry();
    let wrong = point(1, 2).with_field("X", "one");
    let err = encode(&registry, &Heap::new(), &[wrong.into()]).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}
