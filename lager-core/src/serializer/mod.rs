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

//! Value encoding against static type descriptors.
//!
//! Every value is written in a slot whose static type is known to both ends.
//! Concrete slots carry no tag; interface slots carry the concrete type tag
//! of the value they hold, or the nil tag.

use std::io::Read;

use crate::error::Error;
use crate::meta::TypeDescriptor;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::resolver::ref_resolver::PoolReader;
use crate::value::{Address, PointerValue, Value};

mod any;
mod list;
mod map;
mod number;
mod pointer;
mod string;
mod struct_;

pub use any::{read_any, write_any};

/// Writes `value` into a slot of static type `descriptor`.
pub fn write_value(
    context: &mut WriteContext,
    value: &Value,
    descriptor: &TypeDescriptor,
) -> Result<(), Error> {
    match (descriptor, value) {
        (TypeDescriptor::Interface(_), value) => any::write_any(context, value),
        (TypeDescriptor::String, Value::String(s)) => {
            string::write_string(context, s);
            Ok(())
        }
        (TypeDescriptor::Slice(elem), Value::Slice(slice)) => {
            list::write_slice(context, slice, elem)
        }
        (TypeDescriptor::Map(key, elem), Value::Map(map)) => {
            map::write_map(context, map, key, elem)
        }
        (TypeDescriptor::Pointer(target), Value::Pointer(pointer)) => {
            pointer::write_pointer(context, pointer, target)
        }
        (TypeDescriptor::Struct(name), Value::Struct(object)) => {
            struct_::write_struct(context, object, name)
        }
        (TypeDescriptor::Array { .. } | TypeDescriptor::Chan(_) | TypeDescriptor::Func, _) => {
            Err(Error::unsupported_type(descriptor.kind().name()))
        }
        (descriptor, value) if number::is_number(descriptor) => {
            number::write_number(&mut context.writer, value, descriptor)
        }
        (descriptor, value) => Err(Error::type_mismatch(descriptor, value.type_label())),
    }
}

/// Reads a value from a slot of static type `descriptor`.
pub fn read_value<R: Read>(
    context: &mut ReadContext<R>,
    descriptor: &TypeDescriptor,
) -> Result<Value, Error> {
    match descriptor {
        TypeDescriptor::Interface(_) => any::read_any(context),
        TypeDescriptor::String => string::read_string(context),
        TypeDescriptor::Slice(elem) => list::read_slice(context, elem),
        TypeDescriptor::Map(key, elem) => map::read_map(context, key, elem),
        TypeDescriptor::Pointer(target) => {
            Ok(Value::Pointer(context.read_pointer(target)?))
        }
        TypeDescriptor::Struct(name) => struct_::read_struct(context, name),
        TypeDescriptor::Array { .. } | TypeDescriptor::Chan(_) | TypeDescriptor::Func => {
            Err(Error::unsupported_type(descriptor.kind().name()))
        }
        scalar => number::read_number(context.reader, scalar),
    }
}

/// Replaces every origin-key placeholder inside `value` with its pool slot.
///
/// Walks structs, slices and both keys and values of maps.
pub fn patch(value: &mut Value, pool: &PoolReader) -> Result<(), Error> {
    match value {
        Value::Pointer(pointer) => patch_pointer(pointer, pool),
        Value::Slice(slice) => {
            for item in slice.items_mut() {
                patch(item, pool)?;
            }
            Ok(())
        }
        Value::Map(map) => map.try_update_entries(|key, item| {
            patch(key, pool)?;
            patch(item, pool)
        }),
        Value::Struct(object) => {
            for (_, field) in object.fields.iter_mut() {
                patch(field, pool)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn patch_pointer(pointer: &mut PointerValue, pool: &PoolReader) -> Result<(), Error> {
    if let Address::Pending(key) = pointer.addr() {
        let addr = match pool.resolve(key, pointer.target())? {
            Some(slot) => Address::Slot(slot),
            None => Address::Nil,
        };
        pointer.set_addr(addr);
    }
    Ok(())
}
