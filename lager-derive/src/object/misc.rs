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

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use super::field_meta::LagerStructMeta;
use crate::util::SourceField;

pub fn gen_type_name(name: &Ident, meta: &LagerStructMeta) -> TokenStream {
    match &meta.name {
        Some(lit) => quote! { #lit },
        None => {
            let ident = name.to_string();
            quote! { concat!(module_path!(), "::", #ident) }
        }
    }
}

pub fn gen_shape(source_fields: &[SourceField<'_>]) -> TokenStream {
    let fields = source_fields.iter().filter(|sf| sf.exported).map(|sf| {
        let ty = sf.ty;
        let wire_name = &sf.wire_name;
        quote! {
            .with_field(::lager_core::meta::FieldShape::exported(
                #wire_name,
                <#ty as ::lager_core::object::Shaped>::descriptor(),
            ))
        }
    });
    quote! {
        ::lager_core::meta::StructShape::new()
            #(#fields)*
    }
}
