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
use crate::heap::{Heap, SlotId};
use crate::meta::TypeDescriptor;
use crate::resolver::ref_resolver::{PoolReader, PoolWriter};
use crate::resolver::type_registry::TypeRegistry;
use crate::resolver::type_resolver::{TypeIdReader, TypeIdWriter};
use crate::serializer;
use crate::value::{PointerValue, Value};

/// State of one `Encoder::write` call.
pub struct WriteContext<'se> {
    pub writer: Writer,
    registry: &'se TypeRegistry,
    heap: &'se Heap,
    type_ids: &'se mut TypeIdWriter,
    pool: &'se mut PoolWriter,
    max_depth: u32,
    current_depth: u32,
}

impl<'se> WriteContext<'se> {
    pub fn new(
        registry: &'se TypeRegistry,
        heap: &'se Heap,
        type_ids: &'se mut TypeIdWriter,
        pool: &'se mut PoolWriter,
        max_depth: u32,
    ) -> WriteContext<'se> {
        WriteContext {
            writer: Writer::default(),
            registry,
            heap,
            type_ids,
            pool,
            max_depth,
            current_depth: 0,
        }
    }

    #[inline(always)]
    pub fn registry(&self) -> &'se TypeRegistry {
        self.registry
    }

    pub fn write_tag(&mut self, descriptor: &TypeDescriptor) -> Result<(), Error> {
        descriptor.write_tag(&mut self.writer, self.type_ids, self.registry)
    }

    pub fn register_type(&mut self, name: &std::sync::Arc<str>) -> Result<u64, Error> {
        self.type_ids.register(name, false, self.registry)
    }

    /// Origin key for a pointer, queueing its target on first sight.
    pub fn pointer_key(&mut self, pointer: &PointerValue, slot: SlotId) -> Result<u64, Error> {
        let descriptor = self.heap.descriptor(slot).ok_or_else(|| {
            Error::invalid_data(format!(
                "pointer to {} refers to slot {} outside the heap",
                pointer.target(),
                slot
            ))
        })?;
        if descriptor != pointer.target() {
            return Err(Error::type_mismatch(
                TypeDescriptor::pointer_to(pointer.target().clone()),
                TypeDescriptor::pointer_to(descriptor.clone()),
            ));
        }
        let (key, first_sight) = self.pool.reserve(self.heap.id(), slot);
        if first_sight {
            log::trace!("pool: slot {} of {} gets origin key {}", slot, descriptor, key);
        }
        Ok(key)
    }

    /// Takes the bytes written so far, leaving an empty buffer behind.
    pub fn take_buffer(&mut self) -> Writer {
        std::mem::take(&mut self.writer)
    }

    /// Encodes every queued pointer target into its own pool entry.
    ///
    /// Targets discovered while encoding are queued behind the current one,
    /// so arbitrarily long pointer chains never deepen the call stack.
    pub fn drain_pool(&mut self) -> Result<(), Error> {
        while let Some((slot, key)) = self.pool.next_pending() {
            let heap = self.heap;
            let target = heap.slot(slot).ok_or_else(|| Error::dangling_pointer(key))?;
            let outer = self.take_buffer();
            self.current_depth = 0;
            self.write_tag(&target.descriptor)?;
            serializer::write_value(self, &target.value, &target.descriptor)?;
            let payload = std::mem::replace(&mut self.writer, outer);
            self.pool.fill(key, payload.into_bytes())?;
        }
        Ok(())
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.max_depth {
            return Err(Error::depth_exceed(format!(
                "Maximum value nesting depth ({}) exceeded while encoding",
                self.max_depth
            )));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}

/// State of reading values from a stream.
///
/// Without a pool the context is building the pool itself: pointers decode to
/// placeholders that [`serializer::patch`] later resolves.
pub struct ReadContext<'de, R> {
    pub reader: &'de mut Reader<R>,
    registry: &'de TypeRegistry,
    types: &'de TypeIdReader,
    pool: Option<&'de PoolReader>,
    max_depth: u32,
    current_depth: u32,
}

impl<'de, R: Read> ReadContext<'de, R> {
    pub fn new(
        reader: &'de mut Reader<R>,
        registry: &'de TypeRegistry,
        types: &'de TypeIdReader,
        pool: Option<&'de PoolReader>,
        max_depth: u32,
    ) -> ReadContext<'de, R> {
        ReadContext {
            reader,
            registry,
            types,
            pool,
            max_depth,
            current_depth: 0,
        }
    }

    #[inline(always)]
    pub fn registry(&self) -> &'de TypeRegistry {
        self.registry
    }

    /// Tag in a position where nil is not allowed.
    pub fn read_tag(&mut self) -> Result<TypeDescriptor, Error> {
        TypeDescriptor::read_tag(self.reader, self.types, self.max_depth)
    }

    /// Tag of an interface slot; `None` means a nil value.
    pub fn read_interface_tag(&mut self) -> Result<Option<TypeDescriptor>, Error> {
        TypeDescriptor::read_interface_tag(self.reader, self.types, self.max_depth)
    }

    pub fn read_pointer(&mut self, target: &TypeDescriptor) -> Result<PointerValue, Error> {
        let key = self.reader.read_u64()?;
        match self.pool {
            Some(pool) => Ok(match pool.resolve(key, target)? {
                Some(slot) => PointerValue::new(target.clone(), slot),
                None => PointerValue::nil(target.clone()),
            }),
            None if key == 0 => Ok(PointerValue::nil(target.clone())),
            None => Ok(PointerValue::pending(target.clone(), key)),
        }
    }

    /// Zero value used as the starting point of a decoded struct.
    pub fn zero_value(&self, descriptor: &TypeDescriptor) -> Result<Value, Error> {
        crate::value::zero_value(
            descriptor,
            self.registry,
            self.max_depth.saturating_sub(self.current_depth),
        )
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.max_depth {
            return Err(Error::depth_exceed(format!(
                "Maximum value nesting depth ({}) exceeded while decoding",
                self.max_depth
            )));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}
