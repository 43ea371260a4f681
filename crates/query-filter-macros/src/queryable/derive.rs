//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! This macro generates an implementation of the `Queryable` trait that
//! exposes each field as an attribute, plus field name constants for
//! building paths without string typos.

use std::collections::HashSet;

use proc_macro2::{TokenStream, TokenTree};
use quote::{format_ident, quote, ToTokens};
use syn::{parse_quote, spanned::Spanned, Data, DeriveInput, Error, Fields, Ident, Result, Type};

use super::attrs::parse_query_attrs;

/// Main implementation of the Queryable derive macro.
pub fn queryable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Queryable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Queryable can only be derived for structs",
            ))
        }
    };

    let mut attr_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut exposed_types: Vec<&Type> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let query_attrs = parse_query_attrs(&field.attrs)?;

        // Skip if marked with #[query(skip)]
        if query_attrs.skip {
            continue;
        }

        // Raw identifiers are looked up without their `r#` prefix
        let attr_name = query_attrs.rename.unwrap_or_else(|| {
            let name = field_name.to_string();
            name.strip_prefix("r#").map(str::to_string).unwrap_or(name)
        });

        if !seen.insert(attr_name.clone()) {
            return Err(Error::new(
                field.span(),
                format!("duplicate query attribute name '{attr_name}'"),
            ));
        }

        // Generate constant name (SCREAMING_SNAKE_CASE); names that make no
        // identifier get no constant
        let const_name = to_screaming_snake_case(&attr_name);
        if syn::parse_str::<syn::Ident>(&const_name).is_ok() {
            let const_name = format_ident!("{}", const_name);
            field_constants.push(quote! {
                /// Attribute name constant for building query paths.
                pub const #const_name: &'static str = #attr_name;
            });
        }

        exposed_types.push(&field.ty);
        attr_matches.push(quote! {
            #attr_name => ::core::option::Option::Some(
                ::query_filter::Queryable::to_value(&self.#field_name)
            ),
        });
    }

    // Type parameters reached through an exposed field must be queryable;
    // skipped fields add no bound.
    let mut bounded = input.generics.clone();
    let params: Vec<Ident> = input
        .generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    for param in params {
        if exposed_types.iter().any(|ty| mentions(ty.to_token_stream(), &param)) {
            bounded
                .make_where_clause()
                .predicates
                .push(parse_quote!(#param: ::query_filter::Queryable));
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let (_, _, queryable_where) = bounded.split_for_impl();

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::query_filter::Queryable for #struct_name #ty_generics #queryable_where {
            fn to_value(&self) -> ::query_filter::Value<'_> {
                ::query_filter::Value::Node(self)
            }

            fn attr(&self, name: &str) -> ::core::option::Option<::query_filter::Value<'_>> {
                match name {
                    #(#attr_matches)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// Whether `ident` appears anywhere in `tokens`.
fn mentions(tokens: TokenStream, ident: &Ident) -> bool {
    tokens.into_iter().any(|tree| match tree {
        TokenTree::Ident(found) => found == *ident,
        TokenTree::Group(group) => mentions(group.stream(), ident),
        _ => false,
    })
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
        } else if c == '_' || c == '-' || c == ' ' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(source: &str) -> Result<String> {
        let input: DeriveInput = syn::parse_str(source)?;
        queryable_derive_impl(input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("post_code"), "POST_CODE");
        assert_eq!(to_screaming_snake_case("fullName"), "FULL_NAME");
        assert_eq!(to_screaming_snake_case("date-of-birth"), "DATE_OF_BIRTH");
        assert_eq!(to_screaming_snake_case("XMLParser"), "XMLPARSER");
    }

    #[test]
    fn test_expands_fields_as_attrs() {
        let out = expand(
            "struct Node { name: String, #[query(rename = \"mom\")] mother: Option<Box<Node>> }",
        )
        .unwrap();
        assert!(out.contains("\"name\" =>"));
        assert!(out.contains("\"mom\" =>"));
        assert!(out.contains("pub const MOM"));
        assert!(!out.contains("\"mother\""));
    }

    #[test]
    fn test_skip_omits_field() {
        let out = expand("struct User { id: u32, #[query(skip)] password: String }").unwrap();
        assert!(out.contains("\"id\" =>"));
        assert!(!out.contains("password"));
    }

    #[test]
    fn test_generics_are_forwarded() {
        let out = expand("struct Wrapper<T: Clone> { inner: T }").unwrap();
        assert!(out.contains("T : Clone"));
        assert!(out.contains("for Wrapper < T >"));
    }

    #[test]
    fn test_bounds_only_exposed_type_params() {
        let input: DeriveInput = syn::parse_str(
            "struct Tagged<T, M> { value: Vec<T>, #[query(skip)] meta: M }",
        )
        .unwrap();
        let out = queryable_derive_impl(input).unwrap().to_string();

        let t_bound = quote!(where T: ::query_filter::Queryable).to_string();
        let m_bound = quote!(M: ::query_filter::Queryable).to_string();
        assert!(out.contains(&t_bound));
        assert!(!out.contains(&m_bound));
    }

    #[test]
    fn test_mentions_walks_groups() {
        let t: Ident = parse_quote!(T);
        assert!(mentions(quote!(Option<Box<T>>), &t));
        assert!(mentions(quote!([T; 3]), &t));
        assert!(mentions(quote!((u8, T)), &t));
        assert!(!mentions(quote!(Option<Tree>), &t));
    }

    #[test]
    fn test_rejects_non_structs() {
        let err = expand("enum Color { Red, Green }").unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));

        let err = expand("struct Pair(u8, u8);").unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn test_unusable_constant_names_are_skipped() {
        let out = expand("struct Odd { #[query(rename = \"2nd\")] second: u8 }").unwrap();
        assert!(out.contains("\"2nd\" =>"));
        assert!(!out.contains("pub const"));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = expand("struct Clash { a: u8, #[query(rename = \"a\")] b: u8 }").unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
