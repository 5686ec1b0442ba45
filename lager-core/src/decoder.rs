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

use crate::buffer::Reader;
use crate::config::Config;
use crate::error::Error;
use crate::heap::{Heap, SlotId};
use crate::object::{ReadGraph, ReadRefs, Shaped};
use crate::resolver::context::ReadContext;
use crate::resolver::ref_resolver::PoolReader;
use crate::resolver::type_registry::TypeRegistry;
use crate::resolver::type_resolver::TypeIdReader;
use crate::serializer;
use crate::value::Value;

/// Progress of a [`Decoder`] through its stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecoderState {
    Unopened,
    HeaderParsing,
    /// Header parsed and every pool pointer resolved; no root read yet.
    PoolPatched,
    Reading,
    /// Every declared root has been returned.
    Exhausted,
    /// A read failed; the stream position is unknown.
    Failed,
}

/// Reads root objects from a stream.
///
/// Opening a decoder parses the whole header. The pointer pool is decoded
/// in two passes: every entry is first decoded with its pointers left as
/// origin keys and stored in a fresh heap slot, then every slot is patched
/// so its pointers refer to slots. Roots read afterwards resolve their
/// pointers directly, and all of them share the decoder's [`Heap`].
pub struct Decoder<'a, R: Read> {
    reader: Reader<R>,
    registry: &'a TypeRegistry,
    config: Config,
    types: TypeIdReader,
    pool: PoolReader,
    heap: Heap,
    refs: ReadRefs,
    object_count: usize,
    consumed: usize,
    state: DecoderState,
}

impl<'a, R: Read> Decoder<'a, R> {
    pub fn open(source: R, registry: &'a TypeRegistry) -> Result<Decoder<'a, R>, Error> {
        Self::open_with_config(source, registry, Config::default())
    }

    pub fn open_with_config(
        source: R,
        registry: &'a TypeRegistry,
        config: Config,
    ) -> Result<Decoder<'a, R>, Error> {
        let mut decoder = Decoder {
            reader: Reader::new(source),
            registry,
            config,
            types: TypeIdReader::default(),
            pool: PoolReader::new(),
            heap: Heap::new(),
            refs: ReadRefs::new(),
            object_count: 0,
            consumed: 0,
            state: DecoderState::Unopened,
        };
        decoder.read_header()?;
        Ok(decoder)
    }

    fn read_header(&mut self) -> Result<(), Error> {
        self.state = DecoderState::HeaderParsing;
        let count = self.reader.read_int()?;
        self.object_count = usize::try_from(count)
            .map_err(|_| Error::invalid_data(format!("negative object count {}", count)))?;
        self.types = TypeIdReader::read_from(&mut self.reader, self.registry)?;
        self.read_pool()?;
        self.patch_pool()?;
        self.state = DecoderState::PoolPatched;
        log::debug!(
            "opened stream: {} objects, {} types, {} pooled pointers",
            self.object_count,
            self.types.len(),
            self.pool.len()
        );
        Ok(())
    }

    // First pass: decode every entry, pointers stay origin keys.
    fn read_pool(&mut self) -> Result<(), Error> {
        let len = self.reader.read_len()?;
        let mut context = ReadContext::new(
            &mut self.reader,
            self.registry,
            &self.types,
            None,
            self.config.get_max_depth(),
        );
        for _ in 0..len {
            let origin_key = context.reader.read_u64()?;
            let descriptor = context.read_tag()?;
            let value = serializer::read_value(&mut context, &descriptor)?;
            let slot = self.heap.alloc(descriptor.clone(), value);
            self.pool.insert(origin_key, slot, descriptor)?;
            log::trace!("pool: origin key {} -> slot {}", origin_key, slot);
        }
        Ok(())
    }

    // Second pass: every origin key now has a slot.
    fn patch_pool(&mut self) -> Result<(), Error> {
        for index in 0..self.heap.len() {
            let slot = SlotId(index);
            if let Some(mut value) = self.heap.take(slot) {
                serializer::patch(&mut value, &self.pool)?;
                self.heap.replace(slot, value);
            }
        }
        Ok(())
    }

    /// Next root object.
    ///
    /// Fails with [`Error::EndOfStream`] once every declared object has been
    /// read. After any other failure the decoder refuses further reads.
    pub fn read(&mut self) -> Result<Value, Error> {
        match self.state {
            DecoderState::Failed => {
                return Err(Error::not_allowed(
                    "decoder failed on an earlier read and can't continue",
                ))
            }
            DecoderState::Unopened | DecoderState::HeaderParsing => {
                return Err(Error::not_allowed("decoder header was never parsed"))
            }
            _ => {}
        }
        if self.consumed >= self.object_count {
            self.state = DecoderState::Exhausted;
            return Err(Error::end_of_stream());
        }
        self.state = DecoderState::Reading;
        let mut context = ReadContext::new(
            &mut self.reader,
            self.registry,
            &self.types,
            Some(&self.pool),
            self.config.get_max_depth(),
        );
        match serializer::read_any(&mut context) {
            Ok(value) => {
                self.consumed += 1;
                if self.consumed == self.object_count {
                    self.state = DecoderState::Exhausted;
                }
                Ok(value)
            }
            Err(err) => {
                self.state = DecoderState::Failed;
                Err(err)
            }
        }
    }

    /// Next root object converted to a native type.
    ///
    /// Objects reached through pointers are shared across every object read
    /// from this decoder.
    ///
    /// A failed conversion discards every object it materialized and leaves
    /// the decoder [`DecoderState::Failed`].
    pub fn read_object<T: Shaped>(&mut self) -> Result<T, Error> {
        let value = self.read()?;
        let mark = self.refs.mark();
        let mut graph = ReadGraph::new(&self.heap, &mut self.refs);
        let result = T::from_value(&value, &mut graph).and_then(|object| {
            graph.drain()?;
            Ok(object)
        });
        if result.is_err() {
            self.refs.rollback(mark);
            self.state = DecoderState::Failed;
        }
        result
    }

    /// Heap holding every pointer target of the stream.
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn into_heap(self) -> Heap {
        self.heap
    }

    pub fn object_count(&self) -> usize {
        self.object_count
    }

    /// Roots not read yet.
    pub fn remaining(&self) -> usize {
        self.object_count - self.consumed
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }
}

/// Yields the remaining roots; stops at the end of the stream or after the
/// first error.
impl<'a, R: Read> Iterator for Decoder<'a, R> {
    type Item = Result<Value, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == DecoderState::Failed {
            return None;
        }
        match self.read() {
            Err(err) if err.is_end_of_stream() => None,
            other => Some(other),
        }
    }
}
