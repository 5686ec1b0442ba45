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

//! Stream-local type table.
//!
//! Type tags never carry names; a struct or interface tag carries a small id,
//! and the header maps every id back to its registered name once.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use crate::buffer::{capacity_hint, Reader, Writer};
use crate::error::Error;
use crate::resolver::type_registry::{TypeRegistry, TypeShape};

/// Assigns ids to type names in first-registration order, starting at 1.
#[derive(Default, Debug)]
pub struct TypeIdWriter {
    ids: HashMap<Arc<str>, u64>,
    // index = id - 1
    names: Vec<Arc<str>>,
}

impl TypeIdWriter {
    pub fn new() -> TypeIdWriter {
        TypeIdWriter::default()
    }

    /// Id of `name`, assigning the next one if it's new to this stream.
    ///
    /// The name must be registered, as a struct or an interface according to
    /// `as_interface`.
    pub fn register(
        &mut self,
        name: &Arc<str>,
        as_interface: bool,
        registry: &TypeRegistry,
    ) -> Result<u64, Error> {
        match (registry.resolve(name), as_interface) {
            (None, _) => return Err(Error::unregistered_type_name(name.as_ref())),
            (Some(TypeShape::Struct(_)), true) => {
                return Err(Error::type_mismatch(
                    format_args!("interface {}", name),
                    format_args!("struct {}", name),
                ))
            }
            (Some(TypeShape::Interface), false) => {
                return Err(Error::type_mismatch(
                    format_args!("struct {}", name),
                    format_args!("interface {}", name),
                ))
            }
            _ => {}
        }
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        self.names.push(name.clone());
        let id = self.names.len() as u64;
        self.ids.insert(name.clone(), id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Checkpoint for [`TypeIdWriter::rollback`].
    pub(crate) fn mark(&self) -> usize {
        self.names.len()
    }

    /// Forgets every id assigned after `mark`.
    pub(crate) fn rollback(&mut self, mark: usize) {
        for name in self.names.drain(mark..) {
            self.ids.remove(&name);
        }
    }

    /// Writes the table in id order.
    pub fn write_to(&self, writer: &mut Writer) {
        writer.write_len(self.names.len());
        for (index, name) in self.names.iter().enumerate() {
            writer.write_string(name);
            writer.write_uint(index as u64 + 1);
        }
    }
}

/// Type table parsed from a stream header, resolved against a registry.
#[derive(Default, Debug)]
pub struct TypeIdReader {
    types: HashMap<u64, (Arc<str>, bool)>,
}

impl TypeIdReader {
    pub fn read_from<R: Read>(
        reader: &mut Reader<R>,
        registry: &TypeRegistry,
    ) -> Result<TypeIdReader, Error> {
        let count = reader.read_len()?;
        let mut types = HashMap::with_capacity(capacity_hint(count));
        for _ in 0..count {
            let name = reader.read_string()?;
            let id = reader.read_uint()?;
            let (name, shape) = registry
                .resolve_entry(&name)
                .ok_or_else(|| Error::unregistered_type_name(name))?;
            let is_interface = matches!(shape, TypeShape::Interface);
            log::trace!("type table: id {} -> {}", id, name);
            if types.insert(id, (name.clone(), is_interface)).is_some() {
                return Err(Error::invalid_data(format!(
                    "type id {} appears twice in the type table",
                    id
                )));
            }
        }
        Ok(TypeIdReader { types })
    }

    /// Registered name behind `id`, and whether it names an interface.
    pub fn resolve(&self, id: u64) -> Result<(Arc<str>, bool), Error> {
        self.types
            .get(&id)
            .map(|(name, is_interface)| (name.clone(), *is_interface))
            .ok_or_else(|| Error::unknown_type_id(id))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
