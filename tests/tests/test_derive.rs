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

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use lager_core::object::{Shaped, StructObject};
use lager_core::{
    Decoder, DecoderState, Encoder, Error, Heap, PointerValue, SliceValue, StructValue,
    TypeDescriptor, TypeRegistry, Value,
};
use lager_derive::LagerObject;

#[derive(LagerObject, Default, Debug)]
#[lager(name = "main.Node")]
pub struct Node {
    pub name: String,
    pub next: Option<Rc<RefCell<Node>>>,
    visits: u32,
}

#[derive(LagerObject, Default, Debug, PartialEq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

#[derive(LagerObject, Default, Debug, PartialEq)]
#[lager(name = "geo.Shape")]
pub struct Shape {
    #[lager(rename = "Label")]
    pub label: String,
    pub origin: Point,
    pub path: Vec<Point>,
    pub tags: BTreeMap<String, u8>,
    pub weights: HashMap<i32, f64>,
    #[lager(skip)]
    pub cache: Vec<u64>,
}

#[derive(LagerObject, Default, Debug)]
#[lager(name = "main.Leaf")]
pub struct Leaf {
    pub id: i64,
}

#[derive(LagerObject, Default, Debug)]
#[lager(name = "main.Holder")]
pub struct Holder {
    pub items: Vec<Rc<RefCell<Leaf>>>,
}

fn node(name: &str) -> Rc<RefCell<Node>> {
    Rc::new(RefCell::new(Node {
        name: name.to_string(),
        next: None,
        visits: 0,
    }))
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register_struct::<Node>();
    registry.register_struct::<Point>();
    registry.register_struct::<Shape>();
    registry
}

#[test]
fn test_type_names() {
    assert_eq!(Node::type_name(), "main.Node");
    assert_eq!(Point::type_name(), "test_derive::Point");
    assert_eq!(Shape::type_name(), "geo.Shape");
    assert_eq!(
        <Option<Rc<RefCell<Node>>>>::descriptor(),
        TypeDescriptor::pointer_to(TypeDescriptor::struct_named("main.Node"))
    );
}

#[test]
fn test_shape_lists_exported_fields() {
    let shape = Shape::shape();
    let names: Vec<_> = shape.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["Label", "origin", "path", "tags", "weights"]);
    let point = TypeDescriptor::struct_named("test_derive::Point");
    let path = shape.field_named("path").unwrap();
    assert_eq!(path.descriptor(), &TypeDescriptor::slice_of(point));
    assert_eq!(Node::shape().exported_count(), 2);
}

#[test]
fn test_cycle_round_trip() {
    let registry = registry();
    let a = node("a");
    let b = node("b");
    a.borrow_mut().next = Some(b.clone());
    b.borrow_mut().next = Some(a.clone());

    let mut encoder = Encoder::new(Vec::new(), &registry);
    encoder.write_object(&vec![a.clone(), b.clone()]).unwrap();
    assert_eq!(encoder.pool_len(), 2);
    let bytes = encoder.finish().unwrap();

    // break the cycle so the originals can be dropped
    a.borrow_mut().next = None;

    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    let nodes: Vec<Rc<RefCell<Node>>> = decoder.read_object().unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].borrow().name, "a");
    assert_eq!(nodes[1].borrow().name, "b");
    assert!(Rc::ptr_eq(nodes[0].borrow().next.as_ref().unwrap(), &nodes[1]));
    assert!(Rc::ptr_eq(nodes[1].borrow().next.as_ref().unwrap(), &nodes[0]));

    nodes[0].borrow_mut().next = None;
}

#[test]
fn test_shared_rc_across_roots() {
    let registry = registry();
    let shared = node("shared");
    let head = node("head");
    head.borrow_mut().next = Some(shared.clone());

    let mut encoder = Encoder::new(Vec::new(), &registry);
    encoder.write_object(&head).unwrap();
    encoder.write_object(&shared).unwrap();
    assert_eq!(encoder.object_count(), 2);
    assert_eq!(encoder.pool_len(), 2);
    let bytes = encoder.finish().unwrap();

    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    let head2: Rc<RefCell<Node>> = decoder.read_object().unwrap();
    let shared2: Rc<RefCell<Node>> = decoder.read_object().unwrap();
    assert!(Rc::ptr_eq(head2.borrow().next.as_ref().unwrap(), &shared2));
    assert!(shared2.borrow().next.is_none());
    assert!(decoder.read_object::<Rc<RefCell<Node>>>().unwrap_err().is_end_of_stream());
}

#[test]
fn test_private_field_defaults() {
    let registry = registry();
    let a = node("a");
    a.borrow_mut().visits = 5;

    let mut encoder = Encoder::new(Vec::new(), &registry);
    encoder.write_object(&a).unwrap();
    let bytes = encoder.finish().unwrap();

    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    let a2: Rc<RefCell<Node>> = decoder.read_object().unwrap();
    assert_eq!(a2.borrow().name, "a");
    assert_eq!(a2.borrow().visits, 0);
}

#[test]
fn test_value_struct_with_collections() {
    let registry = registry();
    let shape = Shape {
        label: "triangle".to_string(),
        origin: Point { x: 1, y: 2 },
        path: vec![Point { x: 0, y: 0 }, Point { x: 3, y: 0 }, Point { x: 0, y: 4 }],
        tags: BTreeMap::from([("closed".to_string(), 1), ("filled".to_string(), 0)]),
        weights: HashMap::from([(1, 0.5), (-2, 2.0)]),
        cache: vec![9, 9, 9],
    };

    let mut encoder = Encoder::new(Vec::new(), &registry);
    encoder.write_object(&shape).unwrap();
    let bytes = encoder.finish().unwrap();

    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    let decoded: Shape = decoder.read_object().unwrap();
    assert_eq!(
        decoded,
        Shape {
            cache: vec![],
            ..shape
        }
    );
}

#[test]
fn test_typed_stream_read_dynamically() {
    let registry = registry();
    let shape = Shape {
        label: "dot".to_string(),
        ..Shape::default()
    };
    let mut encoder = Encoder::new(Vec::new(), &registry);
    encoder.write_object(&shape).unwrap();
    let bytes = encoder.finish().unwrap();

    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    let value = decoder.read().unwrap();
    let object = value.as_struct().unwrap();
    assert_eq!(object.type_name(), "geo.Shape");
    assert_eq!(object.get("Label").and_then(Value::as_str), Some("dot"));
    assert!(object.get("label").is_none());
    assert!(object.get("cache").is_none());
}

#[test]
fn test_nil_into_required_pointer() {
    let registry = registry();
    let mut encoder = Encoder::new(Vec::new(), &registry);
    encoder.write_object(&None::<Rc<RefCell<Node>>>).unwrap();
    let bytes = encoder.finish().unwrap();

    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    let err = decoder.read_object::<Rc<RefCell<Node>>>().unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn test_mutably_borrowed_object() {
    let registry = registry();
    let a = node("a");
    let b = node("b");
    a.borrow_mut().next = Some(b.clone());
    let _guard = b.borrow_mut();

    let mut encoder = Encoder::new(Vec::new(), &registry);
    let err = encoder.write_object(&a).unwrap_err();
    assert!(matches!(err, Error::NotAllowed(_)));
    assert_eq!(encoder.object_count(), 0);
    assert_eq!(encoder.pool_len(), 0);
}

#[test]
fn test_unregistered_typed_object() {
    let registry = TypeRegistry::new();
    let mut encoder = Encoder::new(Vec::new(), &registry);
    let err = encoder.write_object(&Point { x: 1, y: 1 }).unwrap_err();
    assert!(matches!(err, Error::UnregisteredTypeName(_)));
}

#[test]
fn test_failed_fill_is_not_reused() {
    let mut registry = TypeRegistry::new();
    registry.register_struct::<Leaf>();
    registry.register_struct::<Holder>();

    // one pooled Holder whose only item is a nil *Leaf, reachable from two roots
    let mut heap = Heap::new();
    let items = SliceValue::with_items(
        TypeDescriptor::pointer_to(Leaf::descriptor()),
        vec![PointerValue::nil(Leaf::descriptor()).into()],
    );
    let holder = heap.alloc(
        Holder::descriptor(),
        StructValue::new(Holder::type_name())
            .with_field("items", items)
            .into(),
    );
    let root: Value = PointerValue::new(Holder::descriptor(), holder).into();
    let mut encoder = Encoder::new(Vec::new(), &registry);
    encoder.write(&heap, &root).unwrap();
    encoder.write(&heap, &root).unwrap();
    let bytes = encoder.finish().unwrap();

    let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
    let err = decoder.read_object::<Rc<RefCell<Holder>>>().unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
    assert_eq!(decoder.state(), DecoderState::Failed);
    let err = decoder.read_object::<Rc<RefCell<Holder>>>().unwrap_err();
    assert!(matches!(err, Error::NotAllowed(_)));
}
