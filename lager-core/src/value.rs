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

//! Dynamic values.
//!
//! A [`Value`] is a tree; graph edges are [`PointerValue`]s holding a
//! [`SlotId`] into a [`Heap`](crate::heap::Heap). Composite values carry
//! their static element types so the encoder can tell interface slots
//! (which need a type tag per element) from concrete ones.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::Error;
use crate::heap::SlotId;
use crate::meta::TypeDescriptor;
use crate::resolver::type_registry::{TypeRegistry, TypeShape};
use crate::types::Kind;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex64 {
    pub re: f32,
    pub im: f32,
}

impl Complex64 {
    pub const fn new(re: f32, im: f32) -> Self {
        Complex64 { re, im }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex128 {
    pub re: f64,
    pub im: f64,
}

impl Complex128 {
    pub const fn new(re: f64, im: f64) -> Self {
        Complex128 { re, im }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Nil interface value.
    Nil,
    Bool(bool),
    Int(i64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint(u64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    UintPtr(u64),
    Float32(f32),
    Float64(f64),
    Complex64(Complex64),
    Complex128(Complex128),
    String(String),
    Slice(SliceValue),
    Map(MapValue),
    Pointer(PointerValue),
    Struct(StructValue),
}

impl Value {
    /// Concrete type of this value, `None` for [`Value::Nil`].
    pub fn descriptor(&self) -> Option<TypeDescriptor> {
        let descriptor = match self {
            Value::Nil => return None,
            Value::Bool(_) => TypeDescriptor::Bool,
            Value::Int(_) => TypeDescriptor::Int,
            Value::Int8(_) => TypeDescriptor::Int8,
            Value::Int16(_) => TypeDescriptor::Int16,
            Value::Int32(_) => TypeDescriptor::Int32,
            Value::Int64(_) => TypeDescriptor::Int64,
            Value::Uint(_) => TypeDescriptor::Uint,
            Value::Uint8(_) => TypeDescriptor::Uint8,
            Value::Uint16(_) => TypeDescriptor::Uint16,
            Value::Uint32(_) => TypeDescriptor::Uint32,
            Value::Uint64(_) => TypeDescriptor::Uint64,
            Value::UintPtr(_) => TypeDescriptor::UintPtr,
            Value::Float32(_) => TypeDescriptor::Float32,
            Value::Float64(_) => TypeDescriptor::Float64,
            Value::Complex64(_) => TypeDescriptor::Complex64,
            Value::Complex128(_) => TypeDescriptor::Complex128,
            Value::String(_) => TypeDescriptor::String,
            Value::Slice(s) => TypeDescriptor::slice_of(s.elem.clone()),
            Value::Map(m) => TypeDescriptor::map_of(m.key.clone(), m.elem.clone()),
            Value::Pointer(p) => TypeDescriptor::pointer_to(p.target.clone()),
            Value::Struct(s) => TypeDescriptor::Struct(s.type_name.clone()),
        };
        Some(descriptor)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Invalid,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Int8(_) => Kind::Int8,
            Value::Int16(_) => Kind::Int16,
            Value::Int32(_) => Kind::Int32,
            Value::Int64(_) => Kind::Int64,
            Value::Uint(_) => Kind::Uint,
            Value::Uint8(_) => Kind::Uint8,
            Value::Uint16(_) => Kind::Uint16,
            Value::Uint32(_) => Kind::Uint32,
            Value::Uint64(_) => Kind::Uint64,
            Value::UintPtr(_) => Kind::UintPtr,
            Value::Float32(_) => Kind::Float32,
            Value::Float64(_) => Kind::Float64,
            Value::Complex64(_) => Kind::Complex64,
            Value::Complex128(_) => Kind::Complex128,
            Value::String(_) => Kind::String,
            Value::Slice(_) => Kind::Slice,
            Value::Map(_) => Kind::Map,
            Value::Pointer(_) => Kind::Pointer,
            Value::Struct(_) => Kind::Struct,
        }
    }

    /// Human readable type of the value, for error messages.
    pub fn type_label(&self) -> String {
        match self.descriptor() {
            Some(descriptor) => descriptor.to_string(),
            None => "nil".to_string(),
        }
    }

    /// Zero value of `descriptor`, resolving struct shapes through `registry`.
    ///
    /// Kinds without a wire form (arrays, channels, functions) zero to
    /// [`Value::Nil`]; they can only ever sit in unexported fields.
    pub fn zero(descriptor: &TypeDescriptor, registry: &TypeRegistry) -> Result<Value, Error> {
        zero_value(descriptor, registry, crate::config::DEFAULT_MAX_DEPTH)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Any signed integer kind widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) | Value::Int64(v) => Some(*v),
            Value::Int8(v) => Some(i64::from(*v)),
            Value::Int16(v) => Some(i64::from(*v)),
            Value::Int32(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Any unsigned integer kind widened to `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint(v) | Value::Uint64(v) | Value::UintPtr(v) => Some(*v),
            Value::Uint8(v) => Some(u64::from(*v)),
            Value::Uint16(v) => Some(u64::from(*v)),
            Value::Uint32(v) => Some(u64::from(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&SliceValue> {
        match self {
            Value::Slice(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<&PointerValue> {
        match self {
            Value::Pointer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut StructValue> {
        match self {
            Value::Struct(v) => Some(v),
            _ => None,
        }
    }
}

pub(crate) fn zero_value(
    descriptor: &TypeDescriptor,
    registry: &TypeRegistry,
    depth_budget: u32,
) -> Result<Value, Error> {
    let value = match descriptor {
        TypeDescriptor::Bool => Value::Bool(false),
        TypeDescriptor::Int => Value::Int(0),
        TypeDescriptor::Int8 => Value::Int8(0),
        TypeDescriptor::Int16 => Value::Int16(0),
        TypeDescriptor::Int32 => Value::Int32(0),
        TypeDescriptor::Int64 => Value::Int64(0),
        TypeDescriptor::Uint => Value::Uint(0),
        TypeDescriptor::Uint8 => Value::Uint8(0),
        TypeDescriptor::Uint16 => Value::Uint16(0),
        TypeDescriptor::Uint32 => Value::Uint32(0),
        TypeDescriptor::Uint64 => Value::Uint64(0),
        TypeDescriptor::UintPtr => Value::UintPtr(0),
        TypeDescriptor::Float32 => Value::Float32(0.0),
        TypeDescriptor::Float64 => Value::Float64(0.0),
        TypeDescriptor::Complex64 => Value::Complex64(Complex64::default()),
        TypeDescriptor::Complex128 => Value::Complex128(Complex128::default()),
        TypeDescriptor::String => Value::String(String::new()),
        TypeDescriptor::Array { .. } | TypeDescriptor::Chan(_) | TypeDescriptor::Func => {
            Value::Nil
        }
        TypeDescriptor::Interface(_) => Value::Nil,
        TypeDescriptor::Slice(elem) => Value::Slice(SliceValue::new((**elem).clone())),
        TypeDescriptor::Map(key, elem) => {
            Value::Map(MapValue::new((**key).clone(), (**elem).clone()))
        }
        TypeDescriptor::Pointer(target) => Value::Pointer(PointerValue::nil((**target).clone())),
        TypeDescriptor::Struct(name) => {
            if depth_budget == 0 {
                return Err(Error::depth_exceed(format!(
                    "zero value of struct {} nests structs too deeply",
                    name
                )));
            }
            let shape = match registry.resolve(name) {
                Some(TypeShape::Struct(shape)) => shape,
                Some(TypeShape::Interface) => {
                    return Err(Error::type_mismatch(
                        descriptor,
                        format_args!("interface {}", name),
                    ))
                }
                None => return Err(Error::unregistered_type_name(name.as_ref())),
            };
            let mut value = StructValue::new(name.clone());
            for field in shape.fields() {
                let zero = zero_value(field.descriptor(), registry, depth_budget - 1)?;
                value.fields.push((field.name().to_string(), zero));
            }
            Value::Struct(value)
        }
    };
    Ok(value)
}

macro_rules! impl_from_scalar {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value)
            }
        }
    };
}

impl_from_scalar!(bool, Bool);
impl_from_scalar!(i8, Int8);
impl_from_scalar!(i16, Int16);
impl_from_scalar!(i32, Int32);
impl_from_scalar!(i64, Int64);
impl_from_scalar!(u8, Uint8);
impl_from_scalar!(u16, Uint16);
impl_from_scalar!(u32, Uint32);
impl_from_scalar!(u64, Uint64);
impl_from_scalar!(f32, Float32);
impl_from_scalar!(f64, Float64);
impl_from_scalar!(Complex64, Complex64);
impl_from_scalar!(Complex128, Complex128);
impl_from_scalar!(String, String);
impl_from_scalar!(SliceValue, Slice);
impl_from_scalar!(MapValue, Map);
impl_from_scalar!(PointerValue, Pointer);
impl_from_scalar!(StructValue, Struct);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// Slice of values sharing one static element type.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceValue {
    elem: TypeDescriptor,
    items: Vec<Value>,
}

impl SliceValue {
    pub fn new(elem: TypeDescriptor) -> Self {
        SliceValue {
            elem,
            items: Vec::new(),
        }
    }

    pub fn with_items(elem: TypeDescriptor, items: Vec<Value>) -> Self {
        SliceValue { elem, items }
    }

    pub fn elem(&self) -> &TypeDescriptor {
        &self.elem
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<Value> {
        &mut self.items
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

/// Map of values.
///
/// Entries keep insertion order locally, but the wire format defines no
/// ordering, so equality is set equivalence: two maps are equal when they
/// hold the same key/value pairs in any order.
///
/// Keys are indexed by a hash consistent with [`Value`] equality, so lookups
/// and inserts don't scan the entries. Keys holding a NaN never compare equal
/// and are kept out of the index.
#[derive(Clone, Debug)]
pub struct MapValue {
    key: TypeDescriptor,
    elem: TypeDescriptor,
    entries: Vec<(Value, Value)>,
    index: HashMap<u64, Vec<usize>>,
}

impl MapValue {
    pub fn new(key: TypeDescriptor, elem: TypeDescriptor) -> Self {
        MapValue {
            key,
            elem,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn key_type(&self) -> &TypeDescriptor {
        &self.key
    }

    pub fn elem_type(&self) -> &TypeDescriptor {
        &self.elem
    }

    /// Inserts an entry, returning the value previously stored under an equal key.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        if contains_nan(&key) {
            self.entries.push((key, value));
            return None;
        }
        let hash = hash_value(&key);
        if let Some(position) = self.position(hash, &key) {
            return Some(std::mem::replace(&mut self.entries[position].1, value));
        }
        self.index.entry(hash).or_default().push(self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        if contains_nan(key) {
            return None;
        }
        self.position(hash_value(key), key)
            .map(|position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Runs `f` over every entry in place, then rebuilds the key index.
    pub(crate) fn try_update_entries<F>(&mut self, mut f: F) -> Result<(), Error>
    where
        F: FnMut(&mut Value, &mut Value) -> Result<(), Error>,
    {
        let result = self
            .entries
            .iter_mut()
            .try_for_each(|(key, item)| f(key, item));
        self.reindex();
        result
    }

    fn position(&self, hash: u64, key: &Value) -> Option<usize> {
        self.index
            .get(&hash)?
            .iter()
            .copied()
            .find(|&position| self.entries[position].0 == *key)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, (key, _)) in self.entries.iter().enumerate() {
            if !contains_nan(key) {
                self.index
                    .entry(hash_value(key))
                    .or_default()
                    .push(position);
            }
        }
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.elem == other.elem
            && self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

fn hash_value(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_into(value, &mut hasher);
    hasher.finish()
}

// Equal values must hash equally: 0.0 and -0.0 share a hash, and maps and
// structs combine their entries without regard to order.
fn hash_into<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Nil => {}
        Value::Bool(v) => v.hash(state),
        Value::Int(v) | Value::Int64(v) => v.hash(state),
        Value::Int8(v) => v.hash(state),
        Value::Int16(v) => v.hash(state),
        Value::Int32(v) => v.hash(state),
        Value::Uint(v) | Value::Uint64(v) | Value::UintPtr(v) => v.hash(state),
        Value::Uint8(v) => v.hash(state),
        Value::Uint16(v) => v.hash(state),
        Value::Uint32(v) => v.hash(state),
        Value::Float32(v) => float32_bits(*v).hash(state),
        Value::Float64(v) => float64_bits(*v).hash(state),
        Value::Complex64(c) => {
            float32_bits(c.re).hash(state);
            float32_bits(c.im).hash(state);
        }
        Value::Complex128(c) => {
            float64_bits(c.re).hash(state);
            float64_bits(c.im).hash(state);
        }
        Value::String(v) => v.hash(state),
        Value::Slice(slice) => {
            slice.elem().hash(state);
            slice.len().hash(state);
            for item in slice.iter() {
                hash_into(item, state);
            }
        }
        Value::Map(map) => {
            map.key.hash(state);
            map.elem.hash(state);
            map.entries.len().hash(state);
            let combined = map.entries.iter().fold(0u64, |acc, (k, v)| {
                acc.wrapping_add(hash_value(k).rotate_left(17) ^ hash_value(v))
            });
            combined.hash(state);
        }
        Value::Pointer(pointer) => {
            pointer.target.hash(state);
            pointer.addr.hash(state);
        }
        Value::Struct(object) => {
            object.type_name.hash(state);
            object.fields.len().hash(state);
            let combined = object.fields.iter().fold(0u64, |acc, (name, field)| {
                let mut hasher = DefaultHasher::new();
                name.hash(&mut hasher);
                acc.wrapping_add(hasher.finish() ^ hash_value(field))
            });
            combined.hash(state);
        }
    }
}

fn float32_bits(v: f32) -> u32 {
    if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

fn float64_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

fn contains_nan(value: &Value) -> bool {
    match value {
        Value::Float32(v) => v.is_nan(),
        Value::Float64(v) => v.is_nan(),
        Value::Complex64(c) => c.re.is_nan() || c.im.is_nan(),
        Value::Complex128(c) => c.re.is_nan() || c.im.is_nan(),
        Value::Slice(slice) => slice.iter().any(contains_nan),
        Value::Map(map) => map
            .entries
            .iter()
            .any(|(k, v)| contains_nan(k) || contains_nan(v)),
        Value::Struct(object) => object.fields.iter().any(|(_, v)| contains_nan(v)),
        _ => false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Address {
    Nil,
    Slot(SlotId),
    // Origin key read from the pointer pool, not yet patched to a slot.
    Pending(u64),
}

/// Reference to a heap slot holding a value of type `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerValue {
    target: TypeDescriptor,
    addr: Address,
}

impl PointerValue {
    pub fn new(target: TypeDescriptor, slot: SlotId) -> Self {
        PointerValue {
            target,
            addr: Address::Slot(slot),
        }
    }

    pub fn nil(target: TypeDescriptor) -> Self {
        PointerValue {
            target,
            addr: Address::Nil,
        }
    }

    pub(crate) fn pending(target: TypeDescriptor, origin_key: u64) -> Self {
        PointerValue {
            target,
            addr: Address::Pending(origin_key),
        }
    }

    pub fn target(&self) -> &TypeDescriptor {
        &self.target
    }

    /// Slot this pointer refers to, `None` when nil.
    pub fn slot(&self) -> Option<SlotId> {
        match self.addr {
            Address::Slot(slot) => Some(slot),
            Address::Nil | Address::Pending(_) => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        self.addr == Address::Nil
    }

    /// Two pointers are identical when they refer to the same slot.
    pub fn same_target(&self, other: &PointerValue) -> bool {
        matches!((self.addr, other.addr), (Address::Slot(a), Address::Slot(b)) if a == b)
    }

    pub(crate) fn addr(&self) -> Address {
        self.addr
    }

    pub(crate) fn set_addr(&mut self, addr: Address) {
        self.addr = addr;
    }
}

/// Struct instance: a registered type name plus named field values.
///
/// Equality ignores field order.
#[derive(Clone, Debug)]
pub struct StructValue {
    type_name: Arc<str>,
    pub(crate) fields: Vec<(String, Value)>,
}

impl StructValue {
    pub fn new(type_name: impl Into<Arc<str>>) -> Self {
        StructValue {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn type_name_arc(&self) -> &Arc<str> {
        &self.type_name
    }

    /// Sets a field, returning its previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for StructValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(n, v)| other.get(n).is_some_and(|o| o == v))
    }
}
