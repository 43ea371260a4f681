//! Attribute parsing for the Queryable derive macro.
//!
//! This module provides the parser for the `#[query(...)]` field
//! attributes used by the `Queryable` derive macro.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, Meta, Result, Token,
};

/// Field-level attributes from `#[query(...)]`.
#[derive(Debug, Clone)]
pub struct QueryAttr {
    /// Hide this field from attribute lookups.
    pub skip: bool,
    /// Attribute name used in lookups (default: field name).
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for QueryAttr {
    fn default() -> Self {
        QueryAttr {
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for QueryAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = QueryAttr {
            span: input.span(),
            ..QueryAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => {
                    attr.skip = true;
                }

                // rename = "custom_name"
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    };
                    if s.value().is_empty() {
                        return Err(Error::new(s.span(), "rename must not be empty"));
                    }
                    attr.rename = Some(s.value());
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown query attribute. Expected: skip or rename = \"...\"",
                    ));
                }
            }
        }

        if attr.skip && attr.rename.is_some() {
            return Err(Error::new(
                attr.span,
                "a skipped field cannot be renamed",
            ));
        }

        Ok(attr)
    }
}

/// Extract `#[query(...)]` attributes from a field's attributes.
pub fn parse_query_attrs(attrs: &[Attribute]) -> Result<QueryAttr> {
    for attr in attrs {
        if attr.path().is_ident("query") {
            return attr.parse_args::<QueryAttr>();
        }
    }
    Ok(QueryAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_query(tokens: &str) -> Result<QueryAttr> {
        syn::parse_str::<QueryAttr>(tokens)
    }

    #[test]
    fn test_empty() {
        let attr = parse_query("").unwrap();
        assert!(!attr.skip);
        assert_eq!(attr.rename, None);
    }

    #[test]
    fn test_skip() {
        let attr = parse_query("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.rename, None);
    }

    #[test]
    fn test_rename() {
        let attr = parse_query(r#"rename = "fullName""#).unwrap();
        assert!(!attr.skip);
        assert_eq!(attr.rename, Some("fullName".to_string()));
    }

    #[test]
    fn test_rename_requires_string() {
        let result = parse_query("rename = 3");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("rename must be a string literal"));
    }

    #[test]
    fn test_rename_rejects_empty() {
        assert!(parse_query(r#"rename = """#).is_err());
    }

    #[test]
    fn test_skip_and_rename_conflict() {
        let result = parse_query(r#"skip, rename = "x""#);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("cannot be renamed"));
    }

    #[test]
    fn test_unknown_attribute() {
        let result = parse_query("String");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown query attribute"));
    }
}
