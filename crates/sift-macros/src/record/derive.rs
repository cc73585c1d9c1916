//! Implementation of the `#[derive(Record)]` macro.
//!
//! This macro generates implementations of `sift::Record` and
//! `sift::AsValue`, plus attribute name constants for building queries.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Ident, Result};

use super::attrs::parse_record_attrs;

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => return Ok(expand(&input, &[], &[], &[])),
            Fields::Unnamed(_) => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(Error::new(
            lifetime.span(),
            "Record cannot be derived for structs with lifetime parameters",
        ));
    }

    let mut names: Vec<String> = Vec::new();
    let mut accessors: Vec<TokenStream> = Vec::new();
    let mut constants: Vec<TokenStream> = Vec::new();
    let mut constant_names: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_record_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let attribute = attrs
            .rename
            .unwrap_or_else(|| field_name.to_string().trim_start_matches("r#").to_string());

        if names.contains(&attribute) {
            return Err(Error::new(
                field.span(),
                format!("duplicate record attribute '{attribute}'"),
            ));
        }

        let screaming = to_screaming_snake_case(&attribute);
        if constant_names.contains(&screaming) {
            return Err(Error::new(
                field.span(),
                format!("record attribute '{attribute}' collides with another attribute's constant {screaming}"),
            ));
        }
        let const_name = syn::parse_str::<Ident>(&screaming).map_err(|_| {
            Error::new(
                field.span(),
                format!("record attribute '{attribute}' does not yield a valid constant name"),
            )
        })?;
        constant_names.push(screaming);
        constants.push(quote! {
            /// Attribute name constant for property paths.
            pub const #const_name: &'static str = #attribute;
        });

        accessors.push(quote! { ::sift::AsValue::as_value(&self.#field_name) });
        names.push(attribute);
    }

    Ok(expand(&input, &names, &accessors, &constants))
}

fn expand(
    input: &DeriveInput,
    names: &[String],
    accessors: &[TokenStream],
    constants: &[TokenStream],
) -> TokenStream {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let slots = 0..accessors.len();

    quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#constants)*
        }

        impl #impl_generics ::sift::Record for #struct_name #ty_generics #where_clause {
            fn attributes(&self) -> &'static [&'static str] {
                &[#(#names),*]
            }

            fn attribute(&self, slot: usize) -> ::sift::Value<'_> {
                match slot {
                    #(#slots => #accessors,)*
                    _ => ::sift::Value::Null,
                }
            }
        }

        impl #impl_generics ::sift::AsValue for #struct_name #ty_generics #where_clause {
            fn as_value(&self) -> ::sift::Value<'_> {
                ::sift::Value::Record(self)
            }
        }
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
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
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
