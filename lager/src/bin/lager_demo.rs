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

//! Writes a ring of linked nodes to a file and reads it back.

use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use lager::{Config, Decoder, Encoder, Error, LagerObject, TypeRegistry};

#[derive(Parser, Debug)]
#[command(name = "lager-demo")]
#[command(about = "Encode and decode a cyclic object graph")]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Maximum nesting depth accepted by the codec
    #[arg(long, default_value_t = lager::config::DEFAULT_MAX_DEPTH, global = true)]
    max_depth: u32,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Write a ring of nodes to a file
    Write {
        /// Output file
        path: PathBuf,

        /// Number of nodes in the ring
        #[arg(short = 'n', long, default_value = "2")]
        nodes: usize,
    },
    /// Read a ring back and walk it until it closes
    Read {
        /// Input file
        path: PathBuf,
    },
}

#[derive(LagerObject, Default, Debug)]
#[lager(name = "main.Node")]
pub struct Node {
    pub name: String,
    pub next: Option<Rc<RefCell<Node>>>,
    visits: u32,
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register_struct::<Node>();
    registry
}

fn ring(len: usize) -> Option<Rc<RefCell<Node>>> {
    let nodes: Vec<_> = (0..len)
        .map(|i| {
            Rc::new(RefCell::new(Node {
                name: format!("node-{}", i),
                next: None,
                visits: 0,
            }))
        })
        .collect();
    for (i, node) in nodes.iter().enumerate() {
        node.borrow_mut().next = Some(nodes[(i + 1) % len].clone());
    }
    nodes.first().cloned()
}

fn write(path: &Path, nodes: usize, config: Config) -> Result<(), Error> {
    let registry = registry();
    let head = ring(nodes);
    let sink = BufWriter::new(File::create(path)?);
    let mut encoder = Encoder::with_config(sink, &registry, config);
    encoder.write_object(&head)?;
    let pool = encoder.pool_len();
    encoder.finish()?;
    println!(
        "wrote {} nodes to {} ({} pool entries)",
        nodes,
        path.display(),
        pool
    );
    Ok(())
}

fn read(path: &Path, config: Config) -> Result<(), Error> {
    let registry = registry();
    let source = BufReader::new(File::open(path)?);
    let mut decoder = Decoder::open_with_config(source, &registry, config)?;
    let head: Option<Rc<RefCell<Node>>> = decoder.read_object()?;
    let head = match head {
        Some(head) => head,
        None => {
            println!("empty ring");
            return Ok(());
        }
    };
    let mut current = head.clone();
    let mut steps = 0usize;
    loop {
        let next = {
            let mut node = current.borrow_mut();
            node.visits += 1;
            println!("{}", node.name);
            node.next.clone()
        };
        steps += 1;
        match next {
            Some(next) if Rc::ptr_eq(&next, &head) => break,
            Some(next) => current = next,
            None => {
                println!("ring is broken after {} nodes", steps);
                return Ok(());
            }
        }
    }
    println!("ring closed after {} nodes", steps);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let config = Config::new().max_depth(args.max_depth);
    let result = match &args.mode {
        Mode::Write { path, nodes } => write(path, *nodes, config),
        Mode::Read { path } => read(path, config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
