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


use lager_core::buffer::Writer;
use lager_core::{
    Config, Decoder, DecoderState, Encoder, Error, FieldShape, Heap, PointerValue, SliceValue,
    StructShape, StructValue, TypeDescriptor, TypeRegistry, Value,
};
use test_helpers::{decode, encode, node, node_registry, round_trip, NODE};

/// Header with the given object count, no types and no pool entries.
fn bare_header(objects: i64) -> Writer {
    let mut writer = Writer::default();
    writer.write_int(objects);
    writer.write_int(0);
    writer.write_int(0);
    writer
}

#[test]
fn test_multiple_roots_in_order() {
    let registry = TypeRegistry::new();
    let roots = vec![Value::Int32(1), Value::from("two"), Value::Bool(true)];
    let bytes = encode(&registry, &Heap::new(), &roots).unwrap();

    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    assert_eq!(decoder.object_count(), 3);
    assert_eq!(decoder.state(), DecoderState::PoolPatched);
    assert_eq!(decoder.read().unwrap(), Value::Int32(1));
    assert_eq!(decoder.state(), DecoderState::Reading);
    assert_eq!(decoder.remaining(), 2);
    assert_eq!(decoder.read().unwrap(), Value::from("two"));
    assert_eq!(decoder.read().unwrap(), Value::Bool(true));
    assert_eq!(decoder.state(), DecoderState::Exhausted);
    assert!(decoder.read().unwrap_err().is_end_of_stream());
    assert!(matches!(decoder.read(), Err(Error::EndOfStream)));
}

#[test]
fn test_unregistered_type_name_at_open() {
    let writer_registry = node_registry();
    let object = StructValue::new(NODE)
        .with_field("Name", "a")
        .with_field("Next", PointerValue::nil(node()));
    let bytes = encode(&writer_registry, &Heap::new(), &[object.into()]).unwrap();

    let reader_registry = TypeRegistry::new();
    match Decoder::open(bytes.as_slice(), &reader_registry) {
        Err(Error::UnregisteredTypeName(name)) => assert_eq!(name, NODE),
        Err(other) => panic!("unexpected error {:?}", other),
        Ok(_) => panic!("decoder opened a stream naming an unregistered type"),
    }
}

#[test]
fn test_unknown_type_id() {
    let mut writer = bare_header(1);
    // struct tag naming id 7, absent from the type table
    writer.write_u8(25);
    writer.write_uint(7);
    let bytes = writer.dump();

    let registry = node_registry();
    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    assert!(matches!(decoder.read(), Err(Error::UnknownTypeId(7))));
}

#[test]
fn test_duplicate_type_id() {
    let mut registry = node_registry();
    registry.register_struct_shape("main.Other", StructShape::new());
    let mut writer = Writer::default();
    writer.write_int(0);
    writer.write_int(2);
    writer.write_string(NODE);
    writer.write_uint(1);
    writer.write_string("main.Other");
    writer.write_uint(1);
    writer.write_int(0);
    let bytes = writer.dump();

    match Decoder::open(bytes.as_slice(), &registry) {
        Err(Error::InvalidData(_)) => {}
        Err(other) => panic!("unexpected error {:?}", other),
        Ok(_) => panic!("decoder opened a type table with a repeated id"),
    }
}

#[test]
fn test_dangling_pointer_in_root() {
    let mut writer = bare_header(1);
    // *int64 with origin key 5
    writer.write_u8(22);
    writer.write_u8(6);
    writer.write_u64(5);
    let bytes = writer.dump();

    let registry = TypeRegistry::new();
    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    assert!(matches!(decoder.read(), Err(Error::DanglingPointer(5))));
}

#[test]
fn test_dangling_pointer_in_pool() {
    let mut writer = Writer::default();
    writer.write_int(0);
    writer.write_int(0);
    writer.write_int(1);
    // origin key 1: a *int64 that points at origin key 9
    writer.write_u64(1);
    writer.write_u8(22);
    writer.write_u8(6);
    writer.write_u64(9);
    let bytes = writer.dump();

    let registry = TypeRegistry::new();
    assert!(matches!(
        Decoder::open(bytes.as_slice(), &registry),
        Err(Error::DanglingPointer(9))
    ));
}

#[test]
fn test_duplicate_origin_key() {
    let mut writer = Writer::default();
    writer.write_int(0);
    writer.write_int(0);
    writer.write_int(2);
    for value in [1i64, 2] {
        writer.write_u64(1);
        writer.write_u8(6);
        writer.write_i64(value);
    }
    let bytes = writer.dump();

    let registry = TypeRegistry::new();
    assert!(matches!(
        Decoder::open(bytes.as_slice(), &registry),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_zero_origin_key_in_pool() {
    let mut writer = Writer::default();
    writer.write_int(0);
    writer.write_int(0);
    writer.write_int(1);
    writer.write_u64(0);
    writer.write_u8(6);
    writer.write_i64(1);
    let bytes = writer.dump();

    let registry = TypeRegistry::new();
    assert!(matches!(
        Decoder::open(bytes.as_slice(), &registry),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_pool_entry_of_wrong_type() {
    let mut writer = Writer::default();
    writer.write_int(1);
    writer.write_int(0);
    writer.write_int(1);
    writer.write_u64(1);
    writer.write_u8(6);
    writer.write_i64(42);
    // *string pointing at the int64 entry
    writer.write_u8(22);
    writer.write_u8(24);
    writer.write_u64(1);
    let bytes = writer.dump();

    let registry = TypeRegistry::new();
    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    assert!(matches!(decoder.read(), Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_unsupported_kind_on_decode() {
    let mut writer = bare_header(1);
    // array tag
    writer.write_u8(17);
    let bytes = writer.dump();

    let registry = TypeRegistry::new();
    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    assert!(matches!(decoder.read(), Err(Error::UnsupportedType(_))));
}

#[test]
fn test_unsupported_field_on_encode() {
    let mut registry = TypeRegistry::new();
    registry.register_struct_shape(
        "main.Buffer",
        StructShape::new().with_field(FieldShape::exported(
            "Data",
            TypeDescriptor::array_of(TypeDescriptor::Uint8, 4),
        )),
    );
    let object = StructValue::new("main.Buffer");
    let err = encode(&registry, &Heap::new(), &[object.into()]).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));
}

#[test]
fn test_unknown_kind_byte() {
    let mut writer = bare_header(1);
    writer.write_u8(99);
    let bytes = writer.dump();

    let registry = TypeRegistry::new();
    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    assert!(matches!(decoder.read(), Err(Error::InvalidData(_))));
}

#[test]
fn test_failed_decoder_refuses_reads() {
    let mut writer = bare_header(2);
    writer.write_u8(99);
    let bytes = writer.dump();

    let registry = TypeRegistry::new();
    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    assert!(decoder.read().is_err());
    assert_eq!(decoder.state(), DecoderState::Failed);
    assert!(matches!(decoder.read(), Err(Error::NotAllowed(_))));
    assert!(decoder.next().is_none());
}

#[test]
fn test_truncated_body() {
    let registry = TypeRegistry::new();
    let bytes = encode(&registry, &Heap::new(), &[Value::Int64(5)]).unwrap();
    let truncated = &bytes[..bytes.len() - 3];

    let mut decoder = Decoder::open(truncated, &registry).unwrap();
    assert!(matches!(decoder.read(), Err(Error::Io(_))));
}

#[test]
fn test_truncated_header() {
    let registry = TypeRegistry::new();
    assert!(matches!(
        Decoder::open(&[0x02, 0x00][..], &registry),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_failed_write_is_rolled_back() {
    let mut registry = node_registry();
    registry.register_struct_shape(
        "main.Buffer",
        StructShape::new().with_field(FieldShape::exported(
            "Data",
            TypeDescriptor::array_of(TypeDescriptor::Uint8, 4),
        )),
    );
    let mut heap = Heap::new();
    let slot = heap.alloc(TypeDescriptor::Int64, Value::Int64(1));

    let mut encoder = Encoder::new(Vec::new(), &registry);
    let broken = SliceValue::new(TypeDescriptor::interface_named("main.Any"));
    // unregistered interface element type
    assert!(encoder.write(&heap, &broken.into()).is_err());
    let pointer: Value = PointerValue::new(TypeDescriptor::Int64, slot).into();
    let failing = SliceValue::with_items(
        TypeDescriptor::pointer_to(TypeDescriptor::Int64),
        vec![pointer, Value::from("not a pointer")],
    );
    assert!(encoder.write(&heap, &failing.into()).is_err());
    assert!(encoder
        .write(&heap, &StructValue::new("main.Buffer").into())
        .is_err());
    assert_eq!(encoder.object_count(), 0);
    assert_eq!(encoder.pool_len(), 0);

    encoder.write(&heap, &Value::Int64(7)).unwrap();
    let bytes = encoder.finish().unwrap();

    // nothing from the failed writes reached the type table or the pool
    let (decoded, roots) = decode(&TypeRegistry::new(), &bytes).unwrap();
    assert!(decoded.is_empty());
    assert_eq!(roots, vec![Value::Int64(7)]);
}

#[test]
fn test_interface_slice() {
    let mut registry = node_registry();
    registry.register_interface("main.Any");
    let any = TypeDescriptor::interface_named("main.Any");

    let mut heap = Heap::new();
    let slot = heap.alloc(
        node(),
        StructValue::new(NODE)
            .with_field("Name", "pooled")
            .with_field("Next", PointerValue::nil(node()))
            .into(),
    );
    let pointer: Value = PointerValue::new(node(), slot).into();
    let items = vec![
        Value::Int(1),
        Value::from("two"),
        Value::Nil,
        StructValue::new(NODE)
            .with_field("Name", "inline")
            .with_field("Next", PointerValue::new(node(), slot))
            .into(),
        pointer.clone(),
        SliceValue::with_items(any.clone(), vec![Value::Float64(0.5), pointer]).into(),
    ];
    let (heap, root) = round_trip(&registry, &heap, SliceValue::with_items(any, items).into());

    let items = root.as_slice().unwrap();
    assert_eq!(items.len(), 6);
    assert_eq!(items.get(0), Some(&Value::Int(1)));
    assert_eq!(items.get(1).and_then(Value::as_str), Some("two"));
    assert!(items.get(2).unwrap().is_nil());
    let inline = items.get(3).and_then(Value::as_struct).unwrap();
    let via_field = inline.get("Next").and_then(Value::as_pointer).unwrap();
    let direct = items.get(4).and_then(Value::as_pointer).unwrap();
    assert!(via_field.same_target(direct));
    let nested = items.get(5).and_then(Value::as_slice).unwrap();
    assert_eq!(nested.get(0), Some(&Value::Float64(0.5)));
    assert!(nested
        .get(1)
        .and_then(Value::as_pointer)
        .unwrap()
        .same_target(direct));
    assert_eq!(heap.len(), 1);
}

fn nested_slices(depth: usize) -> Value {
    let mut descriptor = TypeDescriptor::Int8;
    let mut value = Value::Int8(1);
    for _ in 0..depth {
        value = SliceValue::with_items(descriptor.clone(), vec![value]).into();
        descriptor = TypeDescriptor::slice_of(descriptor);
    }
    value
}

#[test]
fn test_depth_exceed_on_encode() {
    let registry = TypeRegistry::new();
    let mut encoder = Encoder::with_config(Vec::new(), &registry, Config::new().max_depth(4));
    encoder.write(&Heap::new(), &nested_slices(3)).unwrap();
    let err = encoder.write(&Heap::new(), &nested_slices(10)).unwrap_err();
    assert!(matches!(err, Error::DepthExceed(_)));
}

#[test]
fn test_depth_exceed_on_decode() {
    let registry = TypeRegistry::new();
    let bytes = encode(&registry, &Heap::new(), &[nested_slices(10)]).unwrap();

    let mut decoder =
        Decoder::open_with_config(bytes.as_slice(), &registry, Config::new().max_depth(4))
            .unwrap();
    assert!(matches!(decoder.read(), Err(Error::DepthExceed(_))));

    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    assert_eq!(decoder.read().unwrap(), nested_slices(10));
}
