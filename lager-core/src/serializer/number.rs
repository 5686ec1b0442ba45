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

use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::meta::TypeDescriptor;
use crate::value::Value;

#[inline(always)]
pub(super) fn is_number(descriptor: &TypeDescriptor) -> bool {
    matches!(
        descriptor,
        TypeDescriptor::Bool
            | TypeDescriptor::Int
            | TypeDescriptor::Int8
            | TypeDescriptor::Int16
            | TypeDescriptor::Int32
            | TypeDescriptor::Int64
            | TypeDescriptor::Uint
            | TypeDescriptor::Uint8
            | TypeDescriptor::Uint16
            | TypeDescriptor::Uint32
            | TypeDescriptor::Uint64
            | TypeDescriptor::UintPtr
            | TypeDescriptor::Float32
            | TypeDescriptor::Float64
            | TypeDescriptor::Complex64
            | TypeDescriptor::Complex128
    )
}

macro_rules! number_codec {
    ($($descriptor:ident => $variant:ident, $write:ident, $read:ident;)*) => {
        pub(super) fn write_number(
            writer: &mut Writer,
            value: &Value,
            descriptor: &TypeDescriptor,
        ) -> Result<(), Error> {
            match (descriptor, value) {
                $((TypeDescriptor::$descriptor, Value::$variant(v)) => writer.$write(*v),)*
                (descriptor, value) => {
                    return Err(Error::type_mismatch(descriptor, value.type_label()))
                }
            }
            Ok(())
        }

        pub(super) fn read_number<R: Read>(
            reader: &mut Reader<R>,
            descriptor: &TypeDescriptor,
        ) -> Result<Value, Error> {
            match descriptor {
                $(TypeDescriptor::$descriptor => Ok(Value::$variant(reader.$read()?)),)*
                other => Err(Error::type_mismatch("a number", other)),
            }
        }
    };
}

number_codec! {
    Bool => Bool, write_bool, read_bool;
    Int => Int, write_int, read_int;
    Int8 => Int8, write_i8, read_i8;
    Int16 => Int16, write_i16, read_i16;
    Int32 => Int32, write_i32, read_i32;
    Int64 => Int64, write_i64, read_i64;
    Uint => Uint, write_uint, read_uint;
    Uint8 => Uint8, write_u8, read_u8;
    Uint16 => Uint16, write_u16, read_u16;
    Uint32 => Uint32, write_u32, read_u32;
    Uint64 => Uint64, write_u64, read_u64;
    UintPtr => UintPtr, write_u64, read_u64;
    Float32 => Float32, write_f32, read_f32;
    Float64 => Float64, write_f64, read_f64;
    Complex64 => Complex64, write_complex64, read_complex64;
    Complex128 => Complex128, write_complex128, read_complex128;
}
