//! Attribute parsing for the Record derive macro.
//!
//! This module provides the parser for the `#[record(...)]` field
//! attributes used by the `Record` derive macro.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, Meta, Result, Token,
};

/// Field-level attributes from `#[record(...)]`.
#[derive(Debug, Clone)]
pub struct RecordAttr {
    /// Leave this field out of the attribute list.
    pub skip: bool,
    /// Attribute name used in property paths (default: field name).
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for RecordAttr {
    fn default() -> Self {
        RecordAttr {
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for RecordAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RecordAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => {
                    attr.skip = true;
                    attr.span = p.span();
                }

                // rename = "custom_name"
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        if s.value().is_empty() || s.value().contains('.') {
                            return Err(Error::new(
                                s.span(),
                                "rename must be a non-empty name without '.'",
                            ));
                        }
                        if !is_attribute_name(&s.value()) {
                            return Err(Error::new(
                                s.span(),
                                "rename must start with a letter or '_' and contain only letters, digits, '_' or '-'",
                            ));
                        }
                        attr.rename = Some(s.value());
                        attr.span = s.span();
                    } else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown record attribute. Expected: skip or rename = \"...\"",
                    ));
                }
            }
        }

        if attr.skip && attr.rename.is_some() {
            return Err(Error::new(attr.span, "a skipped field cannot be renamed"));
        }

        Ok(attr)
    }
}

/// Names usable both in property paths and as generated constant names.
fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && name.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Extract `#[record(...)]` attributes from a field's attributes.
pub fn parse_record_attrs(attrs: &[Attribute]) -> Result<RecordAttr> {
    for attr in attrs {
        if attr.path().is_ident("record") {
            return attr.parse_args::<RecordAttr>();
        }
    }
    Ok(RecordAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_record(tokens: &str) -> Result<RecordAttr> {
        syn::parse_str::<RecordAttr>(tokens)
    }

    #[test]
    fn test_record_empty() {
        let attr = parse_record("").unwrap();
        assert!(!attr.skip);
        assert_eq!(attr.rename, None);
    }

    #[test]
    fn test_record_skip() {
        let attr = parse_record("skip").unwrap();
        assert!(attr.skip);
    }

    #[test]
    fn test_record_rename() {
        let attr = parse_record(r#"rename = "firstname""#).unwrap();
        assert!(!attr.skip);
        assert_eq!(attr.rename, Some("firstname".to_string()));
    }

    #[test]
    fn test_record_rename_rejects_dots() {
        let result = parse_record(r#"rename = "address.city""#);
        assert!(result.unwrap_err().to_string().contains("without '.'"));
    }

    #[test]
    fn test_record_rename_rejects_non_identifiers() {
        for name in ["first name", "2nd", "-", "_", "naïve"] {
            let result = parse_record(&format!("rename = {name:?}"));
            assert!(
                result.unwrap_err().to_string().contains("must start with a letter"),
                "accepted {name:?}"
            );
        }
        assert!(parse_record(r#"rename = "created-at""#).is_ok());
        assert!(parse_record(r#"rename = "_hidden""#).is_ok());
    }

    #[test]
    fn test_record_rename_requires_string() {
        let result = parse_record("rename = 3");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must be a string literal"));
    }

    #[test]
    fn test_record_skip_and_rename_conflict() {
        let result = parse_record(r#"skip, rename = "x""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_record_unknown() {
        let result = parse_record("nested");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown record attribute"));
    }

    #[test]
    fn test_parse_from_field_attrs() {
        let input: syn::DeriveInput = syn::parse_quote! {
            struct Person {
                #[serde(default)]
                #[record(rename = "age")]
                years: u32,
            }
        };
        let syn::Data::Struct(data) = input.data else {
            panic!("expected struct");
        };
        let field = data.fields.iter().next().unwrap();
        let attr = parse_record_attrs(&field.attrs).unwrap();
        assert_eq!(attr.rename, Some("age".to_string()));
    }
}
