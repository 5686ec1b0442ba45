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

//! Arena of typed slots that pointers refer to.
//!
//! A pointer is a [`SlotId`] into a [`Heap`]. Sharing and cycles are plain
//! slot-id equality, so a graph needs no reference counting and decoding a
//! cycle needs no unsafe aliasing.
//!
//! ```rust
//! use lager_core::heap::Heap;
//! use lager_core::meta::TypeDescriptor;
//! use lager_core::value::{PointerValue, Value};
//!
//! let mut heap = Heap::new();
//! let slot = heap.alloc(TypeDescriptor::Int64, Value::Int64(7));
//! let ptr = PointerValue::new(TypeDescriptor::Int64, slot);
//! assert_eq!(heap.deref(&ptr), Some(&Value::Int64(7)));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::meta::TypeDescriptor;
use crate::value::{PointerValue, Value};

static NEXT_HEAP_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Heap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HeapId(u64);

impl HeapId {
    fn next() -> HeapId {
        HeapId(NEXT_HEAP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable address of a slot within one heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub descriptor: TypeDescriptor,
    pub value: Value,
}

#[derive(Debug)]
pub struct Heap {
    id: HeapId,
    slots: Vec<Slot>,
}

impl Default for Heap {
    fn default() -> Self {
        Heap::new()
    }
}

// A clone is a distinct heap: its slots must not alias the original's
// inside an encoder session.
impl Clone for Heap {
    fn clone(&self) -> Self {
        Heap {
            id: HeapId::next(),
            slots: self.slots.clone(),
        }
    }
}

impl Heap {
    pub fn new() -> Heap {
        Heap {
            id: HeapId::next(),
            slots: Vec::new(),
        }
    }

    pub fn id(&self) -> HeapId {
        self.id
    }

    /// Stores `value` in a fresh slot typed `descriptor`.
    pub fn alloc(&mut self, descriptor: TypeDescriptor, value: Value) -> SlotId {
        let slot = SlotId(self.slots.len());
        self.slots.push(Slot { descriptor, value });
        slot
    }

    pub fn get(&self, slot: SlotId) -> Option<&Value> {
        self.slots.get(slot.0).map(|s| &s.value)
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut Value> {
        self.slots.get_mut(slot.0).map(|s| &mut s.value)
    }

    pub fn slot(&self, slot: SlotId) -> Option<&Slot> {
        self.slots.get(slot.0)
    }

    pub fn descriptor(&self, slot: SlotId) -> Option<&TypeDescriptor> {
        self.slots.get(slot.0).map(|s| &s.descriptor)
    }

    /// Overwrites the value of a slot, returning the old one.
    ///
    /// Returns `None` and leaves the heap untouched if the slot doesn't exist.
    pub fn replace(&mut self, slot: SlotId, value: Value) -> Option<Value> {
        self.slots
            .get_mut(slot.0)
            .map(|s| std::mem::replace(&mut s.value, value))
    }

    /// Value a pointer refers to, `None` for nil or foreign pointers.
    pub fn deref(&self, pointer: &PointerValue) -> Option<&Value> {
        pointer.slot().and_then(|slot| self.get(slot))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Slot)> {
        self.slots.iter().enumerate().map(|(i, s)| (SlotId(i), s))
    }

    pub(crate) fn take(&mut self, slot: SlotId) -> Option<Value> {
        self.replace(slot, Value::Nil)
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.slots.truncate(len);
    }
}
