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

use crate::error::Error;
use crate::meta::TypeDescriptor;
use crate::resolver::context::WriteContext;
use crate::resolver::ref_resolver::NIL_ORIGIN_KEY;
use crate::value::{Address, PointerValue};

/// Writes the origin key of the pointer target; the target itself goes to
/// the pool the first time it is seen.
pub(super) fn write_pointer(
    context: &mut WriteContext,
    pointer: &PointerValue,
    target: &TypeDescriptor,
) -> Result<(), Error> {
    if pointer.target() != target {
        return Err(Error::type_mismatch(
            TypeDescriptor::pointer_to(target.clone()),
            TypeDescriptor::pointer_to(pointer.target().clone()),
        ));
    }
    let key = match pointer.addr() {
        Address::Nil => NIL_ORIGIN_KEY,
        Address::Slot(slot) => context.pointer_key(pointer, slot)?,
        Address::Pending(key) => {
            return Err(Error::invalid_data(format!(
                "pointer still refers to unresolved origin key {}",
                key
            )))
        }
    };
    context.writer.write_u64(key);
    Ok(())
}
