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

//! Pointer pool bookkeeping.
//!
//! Every distinct pointer target is written once into the pool in the stream
//! header, keyed by an origin key; pointers in values only carry the key.

use std::collections::{HashMap, VecDeque};

use crate::buffer::Writer;
use crate::ensure;
use crate::error::Error;
use crate::heap::{HeapId, SlotId};
use crate::meta::TypeDescriptor;

/// Origin key written for a nil pointer.
pub const NIL_ORIGIN_KEY: u64 = 0;

#[derive(Debug)]
struct PoolEntry {
    heap: HeapId,
    slot: SlotId,
    payload: Option<Vec<u8>>,
}

/// Assigns origin keys to heap slots and collects the encoded pool entries.
///
/// Keys are sequential from 1, so the key of an entry is its index plus one.
///
/// ```rust
/// use lager_core::heap::Heap;
/// use lager_core::meta::TypeDescriptor;
/// use lager_core::resolver::ref_resolver::PoolWriter;
/// use lager_core::value::Value;
///
/// let mut heap = Heap::new();
/// let slot = heap.alloc(TypeDescriptor::Bool, Value::Bool(true));
/// let mut pool = PoolWriter::new();
///
/// // First sight - the target still has to be encoded
/// assert_eq!(pool.reserve(heap.id(), slot), (1, true));
/// // Seen before - only the key is written
/// assert_eq!(pool.reserve(heap.id(), slot), (1, false));
/// ```
#[derive(Default, Debug)]
pub struct PoolWriter {
    keys: HashMap<(HeapId, SlotId), u64>,
    entries: Vec<PoolEntry>,
    pending: VecDeque<(SlotId, u64)>,
}

impl PoolWriter {
    pub fn new() -> PoolWriter {
        PoolWriter::default()
    }

    /// Origin key of a slot, and whether this is the first time it was seen.
    ///
    /// A newly seen slot is queued until [`PoolWriter::next_pending`] hands it
    /// out for encoding.
    pub fn reserve(&mut self, heap: HeapId, slot: SlotId) -> (u64, bool) {
        if let Some(&key) = self.keys.get(&(heap, slot)) {
            return (key, false);
        }
        self.entries.push(PoolEntry {
            heap,
            slot,
            payload: None,
        });
        let key = self.entries.len() as u64;
        self.keys.insert((heap, slot), key);
        self.pending.push_back((slot, key));
        (key, true)
    }

    /// Next reserved slot whose value hasn't been encoded yet.
    pub(crate) fn next_pending(&mut self) -> Option<(SlotId, u64)> {
        self.pending.pop_front()
    }

    /// Stores the encoded type tag and value of the entry behind `key`.
    pub(crate) fn fill(&mut self, key: u64, payload: Vec<u8>) -> Result<(), Error> {
        let entry = key
            .checked_sub(1)
            .and_then(|index| self.entries.get_mut(index as usize))
            .ok_or_else(|| Error::dangling_pointer(key))?;
        entry.payload = Some(payload);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn mark(&self) -> usize {
        self.entries.len()
    }

    /// Drops every entry reserved after `mark`, freeing their origin keys.
    pub(crate) fn rollback(&mut self, mark: usize) {
        for entry in self.entries.drain(mark..) {
            self.keys.remove(&(entry.heap, entry.slot));
        }
        self.pending.clear();
    }

    pub fn write_to(&self, writer: &mut Writer) -> Result<(), Error> {
        writer.write_len(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            let key = index as u64 + 1;
            let payload = entry.payload.as_ref().ok_or_else(|| {
                Error::invalid_data(format!("pool entry {} was reserved but never encoded", key))
            })?;
            writer.write_u64(key);
            writer.write_bytes(payload);
        }
        Ok(())
    }
}

/// Origin key → slot map rebuilt while opening a stream.
#[derive(Default, Debug)]
pub struct PoolReader {
    slots: HashMap<u64, (SlotId, TypeDescriptor)>,
}

impl PoolReader {
    pub fn new() -> PoolReader {
        PoolReader::default()
    }

    pub fn insert(
        &mut self,
        origin_key: u64,
        slot: SlotId,
        descriptor: TypeDescriptor,
    ) -> Result<(), Error> {
        ensure!(
            origin_key != NIL_ORIGIN_KEY,
            "pool entry uses the nil origin key"
        );
        ensure!(
            !self.slots.contains_key(&origin_key),
            "duplicate pool entry for origin key {}",
            origin_key
        );
        self.slots.insert(origin_key, (slot, descriptor));
        Ok(())
    }

    /// Slot behind `origin_key`, checked against the pointer's target type.
    /// The nil key resolves to `None`.
    pub fn resolve(
        &self,
        origin_key: u64,
        target: &TypeDescriptor,
    ) -> Result<Option<SlotId>, Error> {
        if origin_key == NIL_ORIGIN_KEY {
            return Ok(None);
        }
        let (slot, descriptor) = self
            .slots
            .get(&origin_key)
            .ok_or_else(|| Error::dangling_pointer(origin_key))?;
        if descriptor != target {
            return Err(Error::type_mismatch(
                TypeDescriptor::pointer_to(target.clone()),
                TypeDescriptor::pointer_to(descriptor.clone()),
            ));
        }
        Ok(Some(*slot))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
