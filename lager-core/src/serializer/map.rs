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

use crate::error::Error;
use crate::meta::TypeDescriptor;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{read_value, write_value};
use crate::value::{MapValue, Value};

pub(super) fn write_map(
    context: &mut WriteContext,
    map: &MapValue,
    key: &TypeDescriptor,
    elem: &TypeDescriptor,
) -> Result<(), Error> {
    if map.key_type() != key || map.elem_type() != elem {
        return Err(Error::type_mismatch(
            TypeDescriptor::map_of(key.clone(), elem.clone()),
            TypeDescriptor::map_of(map.key_type().clone(), map.elem_type().clone()),
        ));
    }
    context.inc_depth()?;
    context.writer.write_len(map.len());
    for (k, v) in map.iter() {
        write_value(context, k, key)?;
        write_value(context, v, elem)?;
    }
    context.dec_depth();
    Ok(())
}

// Entry order on the wire is whatever the writer produced; a repeated key
// keeps the last value.
pub(super) fn read_map<R: Read>(
    context: &mut ReadContext<R>,
    key: &TypeDescriptor,
    elem: &TypeDescriptor,
) -> Result<Value, Error> {
    let len = context.reader.read_len()?;
    context.inc_depth()?;
    let mut map = MapValue::new(key.clone(), elem.clone());
    for _ in 0..len {
        let k = read_value(context, key)?;
        let v = read_value(context, elem)?;
        map.insert(k, v);
    }
    context.dec_depth();
    Ok(Value::Map(map))
}
