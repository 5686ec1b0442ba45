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

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::rc::Rc;

use crate::error::Error;
use crate::meta::TypeDescriptor;
use crate::object::{ReadGraph, Shaped, WriteGraph};
use crate::value::{Complex128, Complex64, MapValue, SliceValue, Value};

#[cold]
fn mismatch<T: Shaped>(value: &Value) -> Error {
    Error::type_mismatch(T::descriptor(), value.type_label())
}

macro_rules! impl_shaped_scalar {
    ($ty:ty, $variant:ident) => {
        impl Shaped for $ty {
            #[inline(always)]
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::$variant
            }

            #[inline(always)]
            fn to_value(&self, _: &mut WriteGraph) -> Result<Value, Error> {
                Ok(Value::$variant(self.clone()))
            }

            #[inline(always)]
            fn from_value(value: &Value, _: &mut ReadGraph) -> Result<Self, Error> {
                match value {
                    Value::$variant(v) => Ok(v.clone()),
                    other => Err(mismatch::<Self>(other)),
                }
            }
        }
    };
}

impl_shaped_scalar!(bool, Bool);
impl_shaped_scalar!(i8, Int8);
impl_shaped_scalar!(i16, Int16);
impl_shaped_scalar!(i32, Int32);
impl_shaped_scalar!(i64, Int64);
impl_shaped_scalar!(u8, Uint8);
impl_shaped_scalar!(u16, Uint16);
impl_shaped_scalar!(u32, Uint32);
impl_shaped_scalar!(u64, Uint64);
impl_shaped_scalar!(f32, Float32);
impl_shaped_scalar!(f64, Float64);
impl_shaped_scalar!(Complex64, Complex64);
impl_shaped_scalar!(Complex128, Complex128);
impl_shaped_scalar!(String, String);

// Platform-word integers always travel as 64 bits.
impl Shaped for isize {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Int
    }

    fn to_value(&self, _: &mut WriteGraph) -> Result<Value, Error> {
        Ok(Value::Int(*self as i64))
    }

    fn from_value(value: &Value, _: &mut ReadGraph) -> Result<Self, Error> {
        match value {
            Value::Int(v) => isize::try_from(*v)
                .map_err(|_| Error::invalid_data(format!("int {} overflows isize", v))),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Shaped for usize {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Uint
    }

    fn to_value(&self, _: &mut WriteGraph) -> Result<Value, Error> {
        Ok(Value::Uint(*self as u64))
    }

    fn from_value(value: &Value, _: &mut ReadGraph) -> Result<Self, Error> {
        match value {
            Value::Uint(v) => usize::try_from(*v)
                .map_err(|_| Error::invalid_data(format!("uint {} overflows usize", v))),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl<T: Shaped> Shaped for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::slice_of(T::descriptor())
    }

    fn to_value(&self, graph: &mut WriteGraph) -> Result<Value, Error> {
        let items = self
            .iter()
            .map(|item| item.to_value(graph))
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Value::Slice(SliceValue::with_items(T::descriptor(), items)))
    }

    fn from_value(value: &Value, graph: &mut ReadGraph) -> Result<Self, Error> {
        match value {
            Value::Slice(slice) => slice
                .iter()
                .map(|item| T::from_value(item, graph))
                .collect(),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

fn map_to_value<'a, K, V, I>(entries: I, graph: &mut WriteGraph) -> Result<Value, Error>
where
    K: Shaped + 'a,
    V: Shaped + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    let mut map = MapValue::new(K::descriptor(), V::descriptor());
    for (k, v) in entries {
        map.insert(k.to_value(graph)?, v.to_value(graph)?);
    }
    Ok(Value::Map(map))
}

impl<K: Shaped + Eq + Hash, V: Shaped> Shaped for HashMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map_of(K::descriptor(), V::descriptor())
    }

    fn to_value(&self, graph: &mut WriteGraph) -> Result<Value, Error> {
        map_to_value(self.iter(), graph)
    }

    fn from_value(value: &Value, graph: &mut ReadGraph) -> Result<Self, Error> {
        match value {
            Value::Map(map) => map
                .iter()
                .map(|(k, v)| {
                    Ok::<_, Error>((K::from_value(k, graph)?, V::from_value(v, graph)?))
                })
                .collect(),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl<K: Shaped + Ord, V: Shaped> Shaped for BTreeMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map_of(K::descriptor(), V::descriptor())
    }

    fn to_value(&self, graph: &mut WriteGraph) -> Result<Value, Error> {
        map_to_value(self.iter(), graph)
    }

    fn from_value(value: &Value, graph: &mut ReadGraph) -> Result<Self, Error> {
        match value {
            Value::Map(map) => map
                .iter()
                .map(|(k, v)| {
                    Ok::<_, Error>((K::from_value(k, graph)?, V::from_value(v, graph)?))
                })
                .collect(),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

/// Non-nil pointer.
impl<T: Shaped + Default> Shaped for Rc<RefCell<T>> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::pointer_to(T::descriptor())
    }

    fn to_value(&self, graph: &mut WriteGraph) -> Result<Value, Error> {
        Ok(Value::Pointer(graph.pointer_to(self)))
    }

    fn from_value(value: &Value, graph: &mut ReadGraph) -> Result<Self, Error> {
        match value {
            Value::Pointer(pointer) => graph.pointer::<T>(pointer)?.ok_or_else(|| {
                Error::invalid_data(format!(
                    "nil pointer decoded into a non-optional Rc<RefCell<_>> of {}",
                    T::descriptor()
                ))
            }),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

/// Nullable pointer.
impl<T: Shaped + Default> Shaped for Option<Rc<RefCell<T>>> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::pointer_to(T::descriptor())
    }

    fn to_value(&self, graph: &mut WriteGraph) -> Result<Value, Error> {
        Ok(Value::Pointer(match self {
            Some(rc) => graph.pointer_to(rc),
            None => crate::value::PointerValue::nil(T::descriptor()),
        }))
    }

    fn from_value(value: &Value, graph: &mut ReadGraph) -> Result<Self, Error> {
        match value {
            Value::Pointer(pointer) => graph.pointer::<T>(pointer),
            other => Err(mismatch::<Self>(other)),
        }
    }
}
