//! Record derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, DeriveInput, Error, Result};

use crate::attrs::{field_configs, FieldConfig};

/// The identifier is the field marked `#[storefront(id)]`, else the field
/// named `id`.
fn id_field<'a>(input: &DeriveInput, fields: &[&'a FieldConfig]) -> Result<&'a FieldConfig> {
    let marked: Vec<&&FieldConfig> = fields.iter().filter(|f| f.id).collect();
    match marked.as_slice() {
        [one] => Ok(**one),
        [] => fields.iter().copied().find(|f| f.name == "id").ok_or_else(|| {
            Error::new(
                input.span(),
                "no identifier field: add a field named `id` or mark one with #[storefront(id)]",
            )
        }),
        [_, second, ..] => Err(Error::new(
            second.ident.span(),
            "only one field can be marked #[storefront(id)]",
        )),
    }
}

pub fn derive_record_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let configs = field_configs(&input)?;
    let fields: Vec<&FieldConfig> = configs.iter().filter(|c| !c.skip).collect();
    let id_name = &id_field(&input, &fields)?.name;

    let field_names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    let nullable_names: Vec<&str> = fields
        .iter()
        .filter(|f| f.nullable)
        .map(|f| f.name.as_str())
        .collect();

    let get_arms: Vec<TokenStream> = fields
        .iter()
        .map(|f| {
            let ident = &f.ident;
            let field_name = &f.name;
            quote! {
                #field_name => Some(storefront::ToValue::to_value(&self.#ident))
            }
        })
        .collect();

    let parse_arms: Vec<TokenStream> = fields
        .iter()
        .map(|f| {
            let ty = &f.ty;
            let field_name = &f.name;
            quote! {
                #field_name => storefront::parse_json_field::<#ty>(field, json)
            }
        })
        .collect();

    Ok(quote! {
        impl #impl_generics storefront::Record for #name #ty_generics #where_clause {
            fn id_field() -> &'static str {
                #id_name
            }

            fn field_names() -> &'static [&'static str] {
                &[#(#field_names),*]
            }

            fn nullable_fields() -> &'static [&'static str] {
                &[#(#nullable_names),*]
            }

            fn get(&self, field: &str) -> Option<storefront::Value> {
                match field {
                    #(#get_arms,)*
                    _ => None,
                }
            }

            fn parse_field(
                field: &str,
                json: &storefront::__private::serde_json::Value,
            ) -> storefront::Result<storefront::Value> {
                match field {
                    #(#parse_arms,)*
                    _ => Err(storefront::Error::InvalidCursor(
                        format!("unknown field `{}`", field),
                    )),
                }
            }
        }
    })
}
