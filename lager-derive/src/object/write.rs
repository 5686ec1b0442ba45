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

pub fn gen_to_value(source_fields: &[SourceField<'_>]) -> TokenStream {
    let sets = source_fields.iter().filter(|sf| sf.exported).map(|sf| {
        let ident = sf.ident;
        let ty = sf.ty;
        let wire_name = &sf.wire_name;
        quote! {
            object.set(
                #wire_name,
                <#ty as ::lager_core::object::Shaped>::to_value(&self.#ident, graph)?,
            );
        }
    });
    quote! {
        #[allow(unused_variables, unused_mut)]
        fn to_value(
            &self,
            graph: &mut ::lager_core::object::WriteGraph,
        ) -> ::core::result::Result<::lager_core::value::Value, ::lager_core::error::Error> {
            let mut object = ::lager_core::value::StructValue::new(
                <Self as ::lager_core::object::StructObject>::type_name(),
            );
            #(#sets)*
            ::core::result::Result::Ok(::lager_core::value::Value::Struct(object))
        }
    }
}
