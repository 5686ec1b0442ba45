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

use syn::{Attribute, Field, LitStr};

/// Options from `#[lager(...)]` on a struct.
#[derive(Default)]
pub struct LagerStructMeta {
    /// Registered type name, `module_path!()::Ident` when absent.
    pub name: Option<LitStr>,
}

/// Options from `#[lager(...)]` on a field.
#[derive(Default)]
pub struct LagerFieldMeta {
    /// Name used on the wire instead of the Rust identifier.
    pub rename: Option<LitStr>,
    /// Treat a `pub` field as unexported.
    pub skip: bool,
}

/// Parse `#[lager(name = "...")]` from the struct attributes
pub fn parse_struct_meta(attrs: &[Attribute]) -> syn::Result<LagerStructMeta> {
    let mut meta = LagerStructMeta::default();
    for attr in attrs {
        if !attr.path().is_ident("lager") {
            continue;
        }
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("name") {
                let lit: LitStr = nested.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(syn::Error::new(lit.span(), "type name must not be empty"));
                }
                meta.name = Some(lit);
                Ok(())
            } else {
                Err(nested.error("unsupported lager struct attribute, expected `name`"))
            }
        })?;
    }
    Ok(meta)
}

/// Parse `#[lager(...)]` attributes from a field
pub fn parse_field_meta(field: &Field) -> syn::Result<LagerFieldMeta> {
    let mut meta = LagerFieldMeta::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("lager") {
            continue;
        }
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("rename") {
                meta.rename = Some(nested.value()?.parse()?);
                Ok(())
            } else if nested.path.is_ident("skip") {
                meta.skip = true;
                Ok(())
            } else {
                Err(nested.error("unsupported lager field attribute, expected `rename` or `skip`"))
            }
        })?;
    }
    Ok(meta)
}
