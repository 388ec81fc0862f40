//! Implementation of the `#[derive(Filterable)]` macro.
//!
//! Generates an implementation of `tenancy_filter::Filterable` and an
//! attribute-name constant per exposed field.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use crate::attrs::{parse_filter_attrs, FilterKind};

pub fn filterable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Filterable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Filterable can only be derived for structs",
            ))
        }
    };

    let mut arms: Vec<TokenStream> = Vec::new();
    let mut constants: Vec<TokenStream> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_filter_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(kind) = attrs.kind else {
            continue;
        };

        let span = attrs.span;
        let attribute_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        if !seen.insert(attribute_name.clone()) {
            return Err(Error::new(
                span,
                format!("duplicate filter attribute name '{}'", attribute_name),
            ));
        }
        let const_name = format_ident!("{}", to_screaming_snake_case(&attribute_name));

        constants.push(quote! {
            /// Attribute name constant for building predicates.
            pub const #const_name: &'static str = #attribute_name;
        });

        let value_expr = match kind {
            FilterKind::String => quote_spanned! {span=>
                ::tenancy_filter::Value::String(&self.#field_name)
            },
            FilterKind::Bool => quote_spanned! {span=>
                ::tenancy_filter::Value::Bool(self.#field_name)
            },
            FilterKind::Number => quote_spanned! {span=>
                ::tenancy_filter::Value::from(self.#field_name)
            },
            FilterKind::Strings => quote_spanned! {span=>
                ::tenancy_filter::Value::strings(&self.#field_name)
            },
            FilterKind::Enum => quote_spanned! {span=>
                ::tenancy_filter::Value::named(&self.#field_name)
            },
            FilterKind::EnumList => quote_spanned! {span=>
                ::tenancy_filter::Value::named_list(&self.#field_name)
            },
        };

        arms.push(quote! {
            #attribute_name => ::std::option::Option::Some(#value_expr),
        });
    }

    Ok(quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#constants)*
        }

        impl #impl_generics ::tenancy_filter::Filterable for #struct_name #ty_generics #where_clause {
            fn attribute(&self, name: &str) -> ::std::option::Option<::tenancy_filter::Value<'_>> {
                match name {
                    #(#arms)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    })
}

fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == '.' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}
