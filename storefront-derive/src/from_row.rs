//! FromRow derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::field_configs;

pub fn derive_from_row_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let configs = field_configs(&input)?;

    let field_extractions: Vec<TokenStream> = configs
        .iter()
        .map(|config| {
            let field_ident = &config.ident;
            let column_name = &config.name;
            let ty = &config.ty;

            if config.skip {
                quote! {
                    #field_ident: <#ty as std::default::Default>::default()
                }
            } else {
                quote! {
                    #field_ident: storefront::RowExt::get::<#ty>(row, #column_name)?
                }
            }
        })
        .collect();

    let column_names: Vec<&str> = configs
        .iter()
        .filter(|c| !c.skip)
        .map(|c| c.name.as_str())
        .collect();

    Ok(quote! {
        impl #impl_generics storefront::FromRow for #name #ty_generics #where_clause {
            fn from_row<R: storefront::Row>(row: &R) -> storefront::Result<Self> {
                Ok(Self {
                    #(#field_extractions),*
                })
            }

            fn column_names() -> &'static [&'static str] {
                &[#(#column_names),*]
            }
        }
    })
}
