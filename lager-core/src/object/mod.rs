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

//! Typed objects.
//!
//! [`Shaped`] converts native Rust values to and from [`Value`] trees.
//! Shared `Rc<RefCell<T>>` allocations become heap slots, so aliasing and
//! cycles survive a round trip. Structs usually get their impls from
//! `#[derive(LagerObject)]`.

use crate::error::Error;
use crate::meta::{StructShape, TypeDescriptor};
use crate::value::{StructValue, Value};

mod graph;
mod impls;

pub use graph::{ReadGraph, ReadRefs, WriteGraph};

/// A Rust type with a lager type descriptor.
pub trait Shaped: Sized + 'static {
    /// Static type of slots holding this type.
    fn descriptor() -> TypeDescriptor;

    fn to_value(&self, graph: &mut WriteGraph) -> Result<Value, Error>;

    fn from_value(value: &Value, graph: &mut ReadGraph) -> Result<Self, Error>;
}

/// A [`Shaped`] struct with a registrable name and field list.
pub trait StructObject: Shaped {
    fn type_name() -> &'static str;

    /// Exported fields, in declaration order.
    fn shape() -> StructShape;
}

/// Borrows `value` as a struct of the given type.
pub fn expect_struct<'v>(value: &'v Value, type_name: &str) -> Result<&'v StructValue, Error> {
    match value {
        Value::Struct(object) if object.type_name() == type_name => Ok(object),
        other => Err(Error::type_mismatch(type_name, other.type_label())),
    }
}

/// Converts one field of a decoded struct.
pub fn read_field<T: Shaped>(
    object: &StructValue,
    field: &str,
    graph: &mut ReadGraph,
) -> Result<T, Error> {
    match object.get(field) {
        Some(value) => T::from_value(value, graph),
        None => Err(Error::invalid_data(format!(
            "struct {} holds no value for field {}",
            object.type_name(),
            field
        ))),
    }
}
