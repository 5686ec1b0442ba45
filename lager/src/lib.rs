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

//! # Lager
//!
//! Binary serialization for object graphs. Pointers keep their identity
//! across a round trip: two pointers to one object decode as two pointers to
//! one object, and cycles decode as cycles.
//!
//! This crate re-exports the engine from `lager_core` and the
//! `#[derive(LagerObject)]` macro from `lager_derive`. Derived impls refer to
//! `lager_core` by path, so crates using the derive depend on both.
//!
//! ## Typed objects
//!
//! ```rust,ignore
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use lager::{Decoder, Encoder, Error, LagerObject, TypeRegistry};
//!
//! #[derive(LagerObject, Default)]
//! #[lager(name = "main.Node")]
//! pub struct Node {
//!     pub name: String,
//!     pub next: Option<Rc<RefCell<Node>>>,
//! }
//!
//! fn round_trip() -> Result<(), Error> {
//!     let mut registry = TypeRegistry::new();
//!     registry.register_struct::<Node>();
//!
//!     let a = Rc::new(RefCell::new(Node { name: "a".into(), next: None }));
//!     let b = Rc::new(RefCell::new(Node { name: "b".into(), next: Some(a.clone()) }));
//!     a.borrow_mut().next = Some(b.clone());
//!
//!     let mut encoder = Encoder::new(Vec::new(), &registry);
//!     encoder.write_object(&a)?;
//!     let bytes = encoder.finish()?;
//!
//!     let mut decoder = Decoder::open(bytes.as_slice(), &registry)?;
//!     let a2: Rc<RefCell<Node>> = decoder.read_object()?;
//!     let b2 = a2.borrow().next.clone().unwrap();
//!     assert!(Rc::ptr_eq(b2.borrow().next.as_ref().unwrap(), &a2));
//!     Ok(())
//! }
//! ```
//!
//! ## Dynamic values
//!
//! Without native types, build a [`Heap`] of slots and write [`Value`]s that
//! point into it. Decoding produces the same model: [`Decoder::heap`] holds
//! every pointer target, and each root read is a [`Value`].
//!
//! ## Errors
//!
//! Every fallible operation returns [`Error`]. Building with the environment
//! variable `LAGER_PANIC_ON_ERROR` set turns error construction
//! into a panic, which gives a backtrace at the failure site.

pub use lager_core::{
    buffer, config, decoder, encoder, error, heap, meta, object, resolver, serializer, types,
    value, Complex128, Complex64, Config, Decoder, DecoderState, Encoder, Error, FieldShape, Heap,
    Kind, MapValue, PointerValue, ReadGraph, Shaped, SliceValue, SlotId, StructObject,
    StructShape, StructValue, TypeDescriptor, TypeRegistry, TypeShape, Value, WriteGraph,
};
pub use lager_derive::LagerObject;
