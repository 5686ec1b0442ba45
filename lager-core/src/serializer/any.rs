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
use crate::meta::write_nil_tag;
use crate::resolver::context::{ReadContext, WriteContext};
use crate::serializer::{read_value, write_value};
use crate::value::Value;

/// Writes a value into an interface slot: its concrete type tag, then the
/// value. Root objects are written this way too.
pub fn write_any(context: &mut WriteContext, value: &Value) -> Result<(), Error> {
    let descriptor = match value.descriptor() {
        Some(descriptor) => descriptor,
        None => {
            write_nil_tag(&mut context.writer);
            return Ok(());
        }
    };
    context.write_tag(&descriptor)?;
    write_value(context, value, &descriptor)
}

pub fn read_any<R: Read>(context: &mut ReadContext<R>) -> Result<Value, Error> {
    let descriptor = match context.read_interface_tag()? {
        Some(descriptor) => descriptor,
        None => return Ok(Value::Nil),
    };
    // A tag may itself name an interface, which is followed by another tag.
    context.inc_depth()?;
    let value = read_value(context, &descriptor)?;
    context.dec_depth();
    Ok(value)
}
