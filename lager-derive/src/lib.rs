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

//! # Lager Derive Macros
//!
//! `#[derive(LagerObject)]` implements `Shaped` and `StructObject` for a
//! struct with named fields, so it can be registered with a `TypeRegistry`
//! and written through `Encoder::write_object`.
//!
//! Only `pub` fields are carried on the wire. Private fields, and fields
//! marked `#[lager(skip)]`, are left out when encoding and come back as
//! `Default::default()` when decoding.
//!
//! ## Attributes
//!
//! - `#[lager(name = "pkg.Node")]` on the struct overrides the registered
//!   type name. It defaults to `module_path!()::Ident`.
//! - `#[lager(rename = "Next")]` on a field overrides its wire name.
//! - `#[lager(skip)]` on a `pub` field treats it as unexported.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use lager_derive::LagerObject;
//!
//! #[derive(LagerObject, Default)]
//! #[lager(name = "main.Node")]
//! pub struct Node {
//!     pub name: String,
//!     pub next: Option<Rc<RefCell<Node>>>,
//!     visits: u32,
//! }
//! ```
//!
//! Enums, unions, tuple structs and generic structs are rejected at compile
//! time.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod object;
mod util;

/// Derive macro for typed object graphs.
///
/// # Example
///
/// ```rust,ignore
/// use lager_derive::LagerObject;
///
/// #[derive(LagerObject, Default)]
/// pub struct Point {
///     pub x: i64,
///     pub y: i64,
/// }
/// ```
#[proc_macro_derive(LagerObject, attributes(lager))]
pub fn proc_macro_derive_lager_object(input: proc_macro::TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    object::derive_object(&input)
}
