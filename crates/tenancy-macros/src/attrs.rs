//! Attribute parsing for the Filterable derive macro.
//!
//! Parses the `#[filter(...)]` field attributes.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// How a field is exposed to predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// `#[filter(String)]`: a `String` field.
    String,
    /// `#[filter(Bool)]`: a `bool` field.
    Bool,
    /// `#[filter(Number)]`: any integer up to 32 bits, `i64`, `f32` or `f64`.
    Number,
    /// `#[filter(Strings)]`: a `Vec<String>` field.
    Strings,
    /// `#[filter(Enum)]`: a named string type implementing `FilterEnum`.
    Enum,
    /// `#[filter(EnumList)]`: a `Vec` of `FilterEnum` values.
    EnumList,
}

impl FilterKind {
    fn from_ident(ident: &Ident) -> Result<Self> {
        match ident.to_string().as_str() {
            "String" | "string" => Ok(FilterKind::String),
            "Bool" | "boolean" => Ok(FilterKind::Bool),
            "Number" | "number" => Ok(FilterKind::Number),
            "Strings" | "strings" => Ok(FilterKind::Strings),
            "Enum" | "enumeration" => Ok(FilterKind::Enum),
            "EnumList" | "enum_list" => Ok(FilterKind::EnumList),
            other => Err(Error::new(
                ident.span(),
                format!(
                    "unknown filter kind: '{}'. Expected one of: String, Bool, Number, Strings, Enum, EnumList",
                    other
                ),
            )),
        }
    }
}

/// Field-level attributes from `#[filter(...)]`.
#[derive(Debug, Clone)]
pub struct FilterAttr {
    pub kind: Option<FilterKind>,
    pub skip: bool,
    /// Attribute name override (default: field name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for FilterAttr {
    fn default() -> Self {
        FilterAttr {
            kind: None,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for FilterAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FilterAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.kind = Some(FilterKind::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "expected filter kind: String, Bool, Number, Strings, Enum, EnumList, or skip",
                        ));
                    }
                }

                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        attr.rename = Some(s.value());
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
                        "unknown filter attribute. Expected a filter kind, skip, or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[filter(...)]` attributes from a field's attributes.
pub fn parse_filter_attrs(attrs: &[Attribute]) -> Result<FilterAttr> {
    for attr in attrs {
        if attr.path().is_ident("filter") {
            return attr.parse_args::<FilterAttr>();
        }
    }
    Ok(FilterAttr::default())
}
