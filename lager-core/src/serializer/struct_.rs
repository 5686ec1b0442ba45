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

use std::io::Read;
use std::sync::Arc;

use crate::error::Error;
use crate::meta::TypeDescriptor;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{read_value, write_value};
use crate::value::{StructValue, Value};

/// Exported field count, then name and value of each exported field in
/// shape order.
pub(super) fn write_struct(
    context: &mut WriteContext,
    object: &StructValue,
    name: &Arc<str>,
) -> Result<(), Error> {
    if object.type_name() != name.as_ref() {
        return Err(Error::type_mismatch(name, object.type_name()));
    }
    let registry = context.registry();
    let shape = registry.struct_shape(name)?;
    if let Some((field, _)) = object
        .fields()
        .find(|(field, _)| shape.field_named(field).is_none())
    {
        return Err(Error::unknown_field(name.as_ref(), field));
    }
    context.register_type(name)?;
    context.inc_depth()?;
    context.writer.write_len(shape.exported_count());
    for field in shape.exported_fields() {
        context.writer.write_string(field.name());
        match object.get(field.name()) {
            Some(value) => write_value(context, value, field.descriptor())?,
            None => {
                let zero = Value::zero(field.descriptor(), registry)?;
                write_value(context, &zero, field.descriptor())?;
            }
        }
    }
    context.dec_depth();
    Ok(())
}

/// Starts from the zero value of the struct, so fields missing from the
/// stream (including every unexported one) keep their zero value.
pub(super) fn read_struct<R: Read>(
    context: &mut ReadContext<R>,
    name: &Arc<str>,
) -> Result<Value, Error> {
    let registry = context.registry();
    let shape = registry.struct_shape(name)?;
    let mut object = match context.zero_value(&TypeDescriptor::Struct(name.clone()))? {
        Value::Struct(object) => object,
        other => return Err(Error::type_mismatch(name, other.type_label())),
    };
    let count = context.reader.read_len()?;
    context.inc_depth()?;
    for _ in 0..count {
        let field_name = context.reader.read_string()?;
        let field = match shape.field_named(&field_name) {
            Some(field) if field.is_exported() => field,
            _ => return Err(Error::unknown_field(name.as_ref(), field_name)),
        };
        let value = read_value(context, field.descriptor())?;
        object.set(field_name, value);
    }
    context.dec_depth();
    Ok(Value::Struct(object))
}
