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

use syn::{Field, Fields, Ident, Type, Visibility};

use crate::object::field_meta::parse_field_meta;

/// Named struct field with its wire name resolved.
pub struct SourceField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    /// Name carried on the wire.
    pub wire_name: String,
    /// Only `pub` fields without `#[lager(skip)]` are carried.
    pub exported: bool,
}

/// Returns the fields of a named struct in declaration order.
pub fn source_fields(fields: &Fields) -> syn::Result<Vec<SourceField<'_>>> {
    let named = match fields {
        Fields::Named(named) => named,
        Fields::Unnamed(_) | Fields::Unit => {
            return Err(syn::Error::new_spanned(
                fields,
                "LagerObject can only be derived for structs with named fields",
            ))
        }
    };
    named.named.iter().map(source_field).collect()
}

fn source_field(field: &Field) -> syn::Result<SourceField<'_>> {
    let meta = parse_field_meta(field)?;
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
    let wire_name = match &meta.rename {
        Some(rename) => rename.value(),
        None => ident.to_string(),
    };
    let exported = matches!(field.vis, Visibility::Public(_)) && !meta.skip;
    Ok(SourceField {
        ident,
        ty: &field.ty,
        wire_name,
        exported,
    })
}
