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

use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::Error;
use crate::heap::{Heap, SlotId};
use crate::object::Shaped;
use crate::value::{PointerValue, Value};

type ConvertFn = fn(&dyn Any, &mut WriteGraph) -> Result<Value, Error>;
type FillFn = fn(&dyn Any, &Value, &mut ReadGraph) -> Result<(), Error>;

fn convert<T: Shaped>(cell: &dyn Any, graph: &mut WriteGraph) -> Result<Value, Error> {
    let cell = cell
        .downcast_ref::<RefCell<T>>()
        .ok_or_else(|| Error::type_mismatch(T::descriptor(), "another Rust type"))?;
    let object = cell
        .try_borrow()
        .map_err(|_| Error::not_allowed("object is mutably borrowed while encoding"))?;
    object.to_value(graph)
}

fn fill<T: Shaped>(cell: &dyn Any, value: &Value, graph: &mut ReadGraph) -> Result<(), Error> {
    let cell = cell
        .downcast_ref::<RefCell<T>>()
        .ok_or_else(|| Error::type_mismatch(T::descriptor(), "another Rust type"))?;
    let object = T::from_value(value, graph)?;
    *cell
        .try_borrow_mut()
        .map_err(|_| Error::not_allowed("object is borrowed while decoding"))? = object;
    Ok(())
}

/// Heap built from native objects.
///
/// Maps every `Rc` allocation to one heap slot by address. The `Rc`s are
/// kept alive for the session, so an address can't be reused by another
/// object while its slot is still referenced.
#[derive(Default)]
pub struct WriteGraph {
    heap: Heap,
    refs: HashMap<usize, (SlotId, Rc<dyn Any>)>,
    order: Vec<usize>,
    pending: VecDeque<(SlotId, Rc<dyn Any>, ConvertFn)>,
}

impl WriteGraph {
    pub fn new() -> WriteGraph {
        WriteGraph::default()
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Pointer to the slot of `rc`, allocating the slot on first sight.
    ///
    /// The slot's value is converted later by [`WriteGraph::drain`].
    pub fn pointer_to<T: Shaped>(&mut self, rc: &Rc<RefCell<T>>) -> PointerValue {
        let addr = Rc::as_ptr(rc) as *const () as usize;
        if let Some((slot, _)) = self.refs.get(&addr) {
            return PointerValue::new(T::descriptor(), *slot);
        }
        let descriptor = T::descriptor();
        let slot = self.heap.alloc(descriptor.clone(), Value::Nil);
        let cell: Rc<dyn Any> = rc.clone();
        self.refs.insert(addr, (slot, cell.clone()));
        self.order.push(addr);
        self.pending.push_back((slot, cell, convert::<T>));
        PointerValue::new(descriptor, slot)
    }

    /// Converts every object discovered by [`WriteGraph::pointer_to`].
    pub fn drain(&mut self) -> Result<(), Error> {
        while let Some((slot, cell, convert)) = self.pending.pop_front() {
            let value = convert(&*cell, self)?;
            self.heap.replace(slot, value);
        }
        Ok(())
    }

    pub(crate) fn mark(&self) -> (usize, usize) {
        (self.heap.len(), self.order.len())
    }

    pub(crate) fn rollback(&mut self, (slots, refs): (usize, usize)) {
        self.heap.truncate(slots);
        for addr in self.order.drain(refs..) {
            self.refs.remove(&addr);
        }
        self.pending.clear();
    }
}

/// Native objects materialized from heap slots, one per slot.
#[derive(Default)]
pub struct ReadRefs {
    objects: HashMap<SlotId, Rc<dyn Any>>,
    order: Vec<SlotId>,
    pending: VecDeque<(SlotId, Rc<dyn Any>, FillFn)>,
}

impl ReadRefs {
    pub fn new() -> ReadRefs {
        ReadRefs::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub(crate) fn mark(&self) -> usize {
        self.order.len()
    }

    /// Forgets every object materialized since `mark`, filled or not.
    pub(crate) fn rollback(&mut self, mark: usize) {
        for slot in self.order.drain(mark..) {
            self.objects.remove(&slot);
        }
        self.pending.clear();
    }
}

/// Converts heap slots back to shared `Rc<RefCell<T>>` objects.
pub struct ReadGraph<'h> {
    heap: &'h Heap,
    refs: &'h mut ReadRefs,
}

impl<'h> ReadGraph<'h> {
    pub fn new(heap: &'h Heap, refs: &'h mut ReadRefs) -> ReadGraph<'h> {
        ReadGraph { heap, refs }
    }

    /// Object behind a pointer, `None` for nil.
    ///
    /// A slot seen for the first time yields a default-initialized object
    /// that [`ReadGraph::drain`] fills in, so cycles resolve to the same `Rc`.
    pub fn pointer<T: Shaped + Default>(
        &mut self,
        pointer: &PointerValue,
    ) -> Result<Option<Rc<RefCell<T>>>, Error> {
        if pointer.target() != &T::descriptor() {
            return Err(Error::type_mismatch(
                crate::meta::TypeDescriptor::pointer_to(T::descriptor()),
                crate::meta::TypeDescriptor::pointer_to(pointer.target().clone()),
            ));
        }
        let slot = match pointer.slot() {
            Some(slot) => slot,
            None => return Ok(None),
        };
        if let Some(cell) = self.refs.objects.get(&slot) {
            return cell
                .clone()
                .downcast::<RefCell<T>>()
                .map(Some)
                .map_err(|_| Error::type_mismatch(T::descriptor(), "another Rust type"));
        }
        match self.heap.descriptor(slot) {
            Some(descriptor) if descriptor == &T::descriptor() => {}
            Some(descriptor) => return Err(Error::type_mismatch(T::descriptor(), descriptor)),
            None => {
                return Err(Error::invalid_data(format!(
                    "pointer refers to slot {} outside the heap",
                    slot
                )))
            }
        }
        let rc = Rc::new(RefCell::new(T::default()));
        let cell: Rc<dyn Any> = rc.clone();
        self.refs.objects.insert(slot, cell.clone());
        self.refs.order.push(slot);
        self.refs.pending.push_back((slot, cell, fill::<T>));
        Ok(Some(rc))
    }

    /// Fills every object handed out by [`ReadGraph::pointer`].
    pub fn drain(&mut self) -> Result<(), Error> {
        while let Some((slot, cell, fill)) = self.refs.pending.pop_front() {
            let heap = self.heap;
            let value = heap.get(slot).ok_or_else(|| {
                Error::invalid_data(format!("pointer refers to slot {} outside the heap", slot))
            })?;
            fill(&*cell, value, self)?;
        }
        Ok(())
    }
}
