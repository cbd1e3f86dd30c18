//! `#[storefront(...)]` field attributes shared by every derive

use syn::{spanned::Spanned, Data, DeriveInput, Error, Field, Fields, Ident, Result};

/// Per-field configuration read from `#[storefront(...)]`
pub struct FieldConfig {
    pub ident: Ident,
    /// Field and column name (may be renamed)
    pub name: String,
    pub skip: bool,
    /// Marked as the record identifier
    pub id: bool,
    /// `Option<_>` typed or marked `#[storefront(nullable)]`
    pub nullable: bool,
    pub ty: syn::Type,
}

/// Whether the type is spelled `Option<..>` (or a path ending in it).
fn is_option(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}

fn parse_field_config(field: &Field) -> Result<FieldConfig> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new(field.span(), "tuple structs are not supported"))?;

    let mut name = ident.to_string();
    let mut skip = false;
    let mut id = false;
    let mut nullable = is_option(&field.ty);

    for attr in &field.attrs {
        if attr.path().is_ident("storefront") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value = meta.value()?;
                    let lit: syn::LitStr = value.parse()?;
                    name = lit.value();
                } else if meta.path.is_ident("skip") {
                    skip = true;
                } else if meta.path.is_ident("id") {
                    id = true;
                } else if meta.path.is_ident("nullable") {
                    nullable = true;
                } else {
                    return Err(meta.error(format!(
                        "unknown storefront attribute `{}`",
                        meta.path
                            .get_ident()
                            .map(|i| i.to_string())
                            .unwrap_or_default()
                    )));
                }
                Ok(())
            })?;
        }
    }

    if id && skip {
        return Err(Error::new(field.span(), "the id field cannot be skipped"));
    }

    Ok(FieldConfig {
        ident,
        name,
        skip,
        id,
        nullable,
        ty: field.ty.clone(),
    })
}

/// Field configs of a struct with named fields, in declaration order.
pub fn field_configs(input: &DeriveInput) -> Result<Vec<FieldConfig>> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => return Err(Error::new(input.span(), "only named fields are supported")),
        },
        _ => return Err(Error::new(input.span(), "only structs are supported")),
    };

    fields.iter().map(parse_field_config).collect()
}
