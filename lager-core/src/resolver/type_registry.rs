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

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Error;
use crate::meta::StructShape;
use crate::object::StructObject;

/// What a registered name stands for.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeShape {
    Struct(StructShape),
    Interface,
}

/// Name → shape table shared by encoders and decoders of one program.
///
/// Every struct or interface that appears in a stream has to be registered
/// here before the stream is written or opened. The registry is a plain
/// value: fill it first, then lend it to encoders and decoders.
///
/// ```rust
/// use lager_core::meta::{FieldShape, StructShape, TypeDescriptor};
/// use lager_core::resolver::type_registry::{TypeRegistry, TypeShape};
///
/// let mut registry = TypeRegistry::new();
/// registry.register_struct_shape(
///     "main.Point",
///     StructShape::new()
///         .with_field(FieldShape::exported("X", TypeDescriptor::Int64))
///         .with_field(FieldShape::exported("Y", TypeDescriptor::Int64)),
/// );
/// registry.register_interface("any");
/// assert!(matches!(registry.resolve("main.Point"), Some(TypeShape::Struct(_))));
/// assert_eq!(registry.resolve("any"), Some(&TypeShape::Interface));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<Arc<str>, TypeShape>,
}

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        TypeRegistry::default()
    }

    /// Registers `name`, replacing any previous registration of it.
    pub fn register(&mut self, name: impl Into<Arc<str>>, shape: TypeShape) {
        self.types.insert(name.into(), shape);
    }

    pub fn register_struct_shape(&mut self, name: impl Into<Arc<str>>, shape: StructShape) {
        self.register(name, TypeShape::Struct(shape));
    }

    pub fn register_interface(&mut self, name: impl Into<Arc<str>>) {
        self.register(name, TypeShape::Interface);
    }

    /// Registers a derived struct under its own name.
    pub fn register_struct<T: StructObject>(&mut self) {
        self.register_struct_shape(T::type_name(), T::shape());
    }

    pub fn resolve(&self, name: &str) -> Option<&TypeShape> {
        self.types.get(name)
    }

    /// Shape of a registered struct.
    pub fn struct_shape(&self, name: &str) -> Result<&StructShape, Error> {
        match self.types.get(name) {
            Some(TypeShape::Struct(shape)) => Ok(shape),
            Some(TypeShape::Interface) => Err(Error::type_mismatch(
                format_args!("struct {}", name),
                format_args!("interface {}", name),
            )),
            None => Err(Error::unregistered_type_name(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered entry including the shared name, so decoded descriptors
    /// reuse the registry's allocation.
    pub(crate) fn resolve_entry(&self, name: &str) -> Option<(&Arc<str>, &TypeShape)> {
        self.types.get_key_value(name)
    }
}
