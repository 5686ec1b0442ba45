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

use std::io::Write;

use crate::buffer::Writer;
use crate::config::Config;
use crate::error::Error;
use crate::heap::Heap;
use crate::object::{Shaped, WriteGraph};
use crate::resolver::context::WriteContext;
use crate::resolver::ref_resolver::PoolWriter;
use crate::resolver::type_registry::TypeRegistry;
use crate::resolver::type_resolver::TypeIdWriter;
use crate::serializer;
use crate::value::Value;

/// Writes root objects to a stream.
///
/// Objects are buffered until [`Encoder::finish`]: the header, which holds
/// the type table and the pointer pool, has to precede the body and is only
/// complete once every object has been walked.
///
/// ```rust
/// use lager_core::decoder::Decoder;
/// use lager_core::encoder::Encoder;
/// use lager_core::heap::Heap;
/// use lager_core::resolver::type_registry::TypeRegistry;
/// use lager_core::value::Value;
///
/// let registry = TypeRegistry::new();
/// let heap = Heap::new();
/// let mut encoder = Encoder::new(Vec::new(), &registry);
/// encoder.write(&heap, &Value::Int64(-1)).unwrap();
/// encoder.write(&heap, &Value::from("ab")).unwrap();
/// let bytes = encoder.finish().unwrap();
///
/// let mut decoder = Decoder::open(bytes.as_slice(), &registry).unwrap();
/// assert_eq!(decoder.read().unwrap(), Value::Int64(-1));
/// assert_eq!(decoder.read().unwrap(), Value::from("ab"));
/// assert!(decoder.read().unwrap_err().is_end_of_stream());
/// ```
pub struct Encoder<'a, W: Write> {
    sink: W,
    registry: &'a TypeRegistry,
    config: Config,
    body: Writer,
    object_count: usize,
    type_ids: TypeIdWriter,
    pool: PoolWriter,
    graph: WriteGraph,
}

impl<'a, W: Write> Encoder<'a, W> {
    pub fn new(sink: W, registry: &'a TypeRegistry) -> Encoder<'a, W> {
        Self::with_config(sink, registry, Config::default())
    }

    pub fn with_config(sink: W, registry: &'a TypeRegistry, config: Config) -> Encoder<'a, W> {
        Encoder {
            sink,
            registry,
            config,
            body: Writer::default(),
            object_count: 0,
            type_ids: TypeIdWriter::new(),
            pool: PoolWriter::new(),
            graph: WriteGraph::new(),
        }
    }

    /// Buffers one root object whose pointers refer to slots of `heap`.
    ///
    /// On error nothing of this object is kept: type ids and pool entries it
    /// introduced are discarded and earlier objects stay intact.
    pub fn write(&mut self, heap: &Heap, root: &Value) -> Result<(), Error> {
        let type_mark = self.type_ids.mark();
        let pool_mark = self.pool.mark();
        match write_root(
            self.registry,
            &self.config,
            heap,
            &mut self.type_ids,
            &mut self.pool,
            root,
        ) {
            Ok(bytes) => {
                self.body.write_bytes(bytes.as_slice());
                self.object_count += 1;
                Ok(())
            }
            Err(err) => {
                self.type_ids.rollback(type_mark);
                self.pool.rollback(pool_mark);
                Err(err)
            }
        }
    }

    /// Buffers a native object.
    ///
    /// `Rc` allocations shared between objects of the same session encode
    /// as one pool entry.
    pub fn write_object<T: Shaped>(&mut self, object: &T) -> Result<(), Error> {
        let graph_mark = self.graph.mark();
        let type_mark = self.type_ids.mark();
        let pool_mark = self.pool.mark();
        let result = object.to_value(&mut self.graph).and_then(|root| {
            self.graph.drain()?;
            write_root(
                self.registry,
                &self.config,
                self.graph.heap(),
                &mut self.type_ids,
                &mut self.pool,
                &root,
            )
        });
        match result {
            Ok(bytes) => {
                self.body.write_bytes(bytes.as_slice());
                self.object_count += 1;
                Ok(())
            }
            Err(err) => {
                self.graph.rollback(graph_mark);
                self.type_ids.rollback(type_mark);
                self.pool.rollback(pool_mark);
                Err(err)
            }
        }
    }

    /// Number of root objects written so far.
    pub fn object_count(&self) -> usize {
        self.object_count
    }

    /// Number of distinct pointer targets pooled so far.
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Writes header and body to the sink, flushes it and hands it back.
    pub fn finish(mut self) -> Result<W, Error> {
        let mut header = Writer::with_capacity(64);
        header.write_len(self.object_count);
        self.type_ids.write_to(&mut header);
        self.pool.write_to(&mut header)?;
        self.sink.write_all(header.as_slice())?;
        self.sink.write_all(self.body.as_slice())?;
        self.sink.flush()?;
        log::debug!(
            "finished stream: {} objects, {} types, {} pooled pointers, {} bytes",
            self.object_count,
            self.type_ids.len(),
            self.pool.len(),
            header.len() + self.body.len()
        );
        Ok(self.sink)
    }
}

fn write_root(
    registry: &TypeRegistry,
    config: &Config,
    heap: &Heap,
    type_ids: &mut TypeIdWriter,
    pool: &mut PoolWriter,
    root: &Value,
) -> Result<Writer, Error> {
    let mut context = WriteContext::new(registry, heap, type_ids, pool, config.get_max_depth());
    serializer::write_any(&mut context, root)?;
    let body = context.take_buffer();
    context.drain_pool()?;
    Ok(body)
}
