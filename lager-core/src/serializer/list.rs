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

use crate::buffer::capacity_hint;
use crate::error::Error;
use crate::meta::TypeDescriptor;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{read_value, write_value};
use crate::value::{SliceValue, Value};

pub(super) fn write_slice(
    context: &mut WriteContext,
    slice: &SliceValue,
    elem: &TypeDescriptor,
) -> Result<(), Error> {
    if slice.elem() != elem {
        return Err(Error::type_mismatch(
            TypeDescriptor::slice_of(elem.clone()),
            TypeDescriptor::slice_of(slice.elem().clone()),
        ));
    }
    context.inc_depth()?;
    context.writer.write_len(slice.len());
    for item in slice.iter() {
        write_value(context, item, elem)?;
    }
    context.dec_depth();
    Ok(())
}

pub(super) fn read_slice<R: Read>(
    context: &mut ReadContext<R>,
    elem: &TypeDescriptor,
) -> Result<Value, Error> {
    let len = context.reader.read_len()?;
    context.inc_depth()?;
    let mut items = Vec::with_capacity(capacity_hint(len));
    for _ in 0..len {
        items.push(read_value(context, elem)?);
    }
    context.dec_depth();
    Ok(Value::Slice(SliceValue::with_items(elem.clone(), items)))
}
