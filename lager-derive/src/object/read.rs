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

use crate::util::SourceField;

/// Unexported fields come back as `Default::default()`.
pub fn gen_from_value(source_fields: &[SourceField<'_>]) -> TokenStream {
    let inits = source_fields.iter().map(|sf| {
        let ident = sf.ident;
        let ty = sf.ty;
        let wire_name = &sf.wire_name;
        if sf.exported {
            quote! {
                #ident: ::lager_core::object::read_field::<#ty>(object, #wire_name, graph)?
            }
        } else {
            quote! {
                #ident: ::core::default::Default::default()
            }
        }
    });
    quote! {
        #[allow(unused_variables)]
        fn from_value(
            value: &::lager_core::value::Value,
            graph: &mut ::lager_core::object::ReadGraph,
        ) -> ::core::result::Result<Self, ::lager_core::error::Error> {
            let object = ::lager_core::object::expect_struct(
                value,
                <Self as ::lager_core::object::StructObject>::type_name(),
            )?;
            ::core::result::Result::Ok(Self {
                #(#inits),*
            })
        }
    }
}
