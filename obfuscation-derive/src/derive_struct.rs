//! Struct-specific table derivation.
//!
//! Only structs with named fields serialize to JSON objects with stable keys,
//! so tuple and unit structs are rejected.

use proc_macro2::{Ident, TokenStream};
use quote::{quote, quote_spanned};
use syn::{spanned::Spanned, DataStruct, Fields, Result, WherePredicate};

use crate::{
    descriptor::{generate_field_descriptor, DeriveContext},
    serde_attrs::serialized_field,
    strategy::{parse_field_strategy, Strategy},
};

pub(crate) struct StructDeriveOutput {
    pub(crate) descriptors: Vec<TokenStream>,
    pub(crate) table_predicates: Vec<WherePredicate>,
    pub(crate) debug_body: TokenStream,
    pub(crate) debug_predicates: Vec<WherePredicate>,
}

pub(crate) fn derive_struct(
    name: &Ident,
    data: &DataStruct,
    generics: &syn::Generics,
    crate_root: &TokenStream,
) -> Result<StructDeriveOutput> {
    let fields = match &data.fields {
        Fields::Named(fields) => fields,
        Fields::Unnamed(fields) => {
            return Err(syn::Error::new(
                fields.paren_token.span.join(),
                "`Obfuscate` can only be derived for structs with named fields",
            ));
        }
        Fields::Unit => {
            return Err(syn::Error::new(
                data.struct_token.span(),
                "`Obfuscate` cannot be derived for unit structs",
            ));
        }
    };

    let mut ctx = DeriveContext::new(generics, crate_root);
    let mut descriptors = Vec::new();
    let mut debug_fields = Vec::new();

    for field in &fields.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let span = field.span();
        let strategy = parse_field_strategy(&field.attrs)?;
        let serialized = serialized_field(&field.attrs, ident)?;
        if serialized.flatten {
            return Err(syn::Error::new(
                ident.span(),
                "`#[serde(flatten)]` fields cannot be described by the obfuscation table",
            ));
        }

        descriptors.push(generate_field_descriptor(
            &mut ctx,
            &serialized.name,
            &field.ty,
            span,
            &strategy,
        )?);

        let debug_field = if matches!(strategy, Strategy::PassThrough) {
            quote_spanned! { span =>
                debug.field(stringify!(#ident), &self.#ident);
            }
        } else {
            quote_spanned! { span =>
                debug.field(stringify!(#ident), &"[obfuscated]");
            }
        };
        debug_fields.push(debug_field);
    }

    Ok(StructDeriveOutput {
        descriptors,
        table_predicates: ctx.table_predicates,
        debug_body: quote! {
            let mut debug = f.debug_struct(stringify!(#name));
            #(#debug_fields)*
            debug.finish()
        },
        debug_predicates: ctx.debug_predicates,
    })
}
