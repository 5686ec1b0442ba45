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

//! # Lager Core
//!
//! Encode/decode engine of the lager object-graph serializer. A stream holds
//! any number of root objects; pointers between objects keep their identity,
//! so shared targets and cycles come back exactly as they were written.
//!
//! ## Architecture
//!
//! - **`buffer`**: fixed-width little-endian primitive codec
//! - **`meta`**: type descriptors and their wire tags, struct shapes
//! - **`resolver`**: type registry, stream type table, pointer pool
//! - **`serializer`**: value encoding against static descriptors
//! - **`heap`** / **`value`**: the dynamic object model
//! - **`object`**: native Rust types on top of the dynamic model
//! - **`encoder`** / **`decoder`**: stream sessions
//!
//! ## Wire layout
//!
//! ```text
//! object_count   int
//! type table     int count, count x (string name, uint id)
//! pointer pool   int count, count x (uint64 origin key, type tag, value)
//! body           object_count x (type tag, value)
//! ```
//!
//! Pointers are written as origin keys (0 for nil); every pointer target is
//! written once, in the pool, no matter how many pointers refer to it.
//!
//! ## Usage
//!
//! ```rust
//! use lager_core::{Decoder, Encoder, FieldShape, Heap, PointerValue, StructShape,
//!                  StructValue, TypeDescriptor, TypeRegistry, Value};
//!
//! let node = TypeDescriptor::struct_named("main.Node");
//! let mut registry = TypeRegistry::new();
//! registry.register_struct_shape(
//!     "main.Node",
//!     StructShape::new()
//!         .with_field(FieldShape::exported("Name", TypeDescriptor::String))
//!         .with_field(FieldShape::exported("Next", TypeDescriptor::pointer_to(node.clone()))),
//! );
//!
//! // a <-> b
//! let mut heap = Heap::new();
//! let a = heap.alloc(node.clone(), Value::Nil);
//! let b = heap.alloc(node.clone(), Value::Nil);
//! heap.replace(a, StructValue::new("main.Node")
//!     .with_field("Name", "a")
//!     .with_field("Next", PointerValue::new(node.clone(), b))
//!     .into());
//! heap.replace(b, StructValue::new("main.Node")
//!     .with_field("Name", "b")
//!     .with_field("Next", PointerValue::new(node.clone(), a))
//!     .into());
//!
//! let mut encoder = Encoder::new(Vec::new(), &registry);
//! encoder.write(&heap, &PointerValue::new(node.clone(), a).into()).unwrap();
//! let bytes = encoder.finish().unwrap();
//!
//! let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
//! let root = decoder.read().unwrap();
//! let a2 = root.as_pointer().unwrap();
//! let b2 = decoder.heap().deref(a2).unwrap().as_struct().unwrap().get("Next").unwrap();
//! let back = decoder.heap().deref(b2.as_pointer().unwrap()).unwrap();
//! let next_of_b = back.as_struct().unwrap().get("Next").unwrap().as_pointer().unwrap();
//! assert!(next_of_b.same_target(a2));
//! ```

pub mod buffer;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod heap;
pub mod meta;
pub mod object;
pub mod resolver;
pub mod serializer;
pub mod types;
pub mod value;

pub use config::Config;
pub use decoder::{Decoder, DecoderState};
pub use encoder::Encoder;
pub use error::Error;
pub use heap::{Heap, SlotId};
pub use meta::{FieldShape, StructShape, TypeDescriptor};
pub use object::{ReadGraph, Shaped, StructObject, WriteGraph};
pub use resolver::type_registry::{TypeRegistry, TypeShape};
pub use types::Kind;
pub use value::{Complex128, Complex64, MapValue, PointerValue, SliceValue, StructValue, Value};
