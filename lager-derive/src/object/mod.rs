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

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput};

pub(crate) mod field_meta;
mod misc;
mod read;
mod write;

use crate::util::source_fields;

pub fn derive_object(ast: &DeriveInput) -> TokenStream {
    match gen_object(ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn gen_object(ast: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &ast.ident;
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "LagerObject cannot be derived for generic structs",
        ));
    }
    let data = match &ast.data {
        Data::Struct(data) => data,
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span,
                "LagerObject cannot be derived for enums",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "LagerObject cannot be derived for unions",
            ))
        }
    };
    let struct_meta = field_meta::parse_struct_meta(&ast.attrs)?;
    let fields = source_fields(&data.fields)?;

    let type_name_ts = misc::gen_type_name(name, &struct_meta);
    let shape_ts = misc::gen_shape(&fields);
    let to_value_ts = write::gen_to_value(&fields);
    let from_value_ts = read::gen_from_value(&fields);

    Ok(quote! {
        impl ::lager_core::object::Shaped for #name {
            fn descriptor() -> ::lager_core::meta::TypeDescriptor {
                ::lager_core::meta::TypeDescriptor::struct_named(
                    <Self as ::lager_core::object::StructObject>::type_name(),
                )
            }

            #to_value_ts

            #from_value_ts
        }

        impl ::lager_core::object::StructObject for #name {
            fn type_name() -> &'static str {
                #type_name_ts
            }

            fn shape() -> ::lager_core::meta::StructShape {
                #shape_ts
            }
        }
    })
}
