//! Field descriptor generation.
//!
//! Each field becomes one `FieldDescriptor` constant expression in the
//! record's table. Bounds needed by generic field types are collected along
//! the way.
//!
//! ## Field Rules
//!
//! | Annotation | Descriptor |
//! |------------|------------|
//! | None on a scalar | `FieldDescriptor::pass_through` |
//! | None on any other type | `FieldDescriptor::inferred`, walked if the type has a table |
//! | `#[obfuscate]` | `FieldDescriptor::walk` with the field type's table |
//! | `#[obfuscate(Category)]` | `FieldDescriptor::obfuscate` with the field type's kind |

use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::{Result, WherePredicate};

use crate::{
    generics::{bound_on, mentions_generics},
    strategy::Strategy,
    types::{is_scalar_type, is_unobfuscatable_scalar},
};

/// Accumulated state during field processing.
pub(crate) struct DeriveContext<'a> {
    pub(crate) generics: &'a syn::Generics,
    pub(crate) crate_root: &'a TokenStream,
    /// Bounds for the `ObfuscatedType` impl.
    pub(crate) table_predicates: Vec<WherePredicate>,
    /// Bounds for the `Debug` impl.
    pub(crate) debug_predicates: Vec<WherePredicate>,
}

impl<'a> DeriveContext<'a> {
    pub(crate) fn new(generics: &'a syn::Generics, crate_root: &'a TokenStream) -> Self {
        Self {
            generics,
            crate_root,
            table_predicates: Vec::new(),
            debug_predicates: Vec::new(),
        }
    }
}

/// Generates the descriptor expression for a single field.
pub(crate) fn generate_field_descriptor(
    ctx: &mut DeriveContext<'_>,
    name: &str,
    ty: &syn::Type,
    span: Span,
    strategy: &Strategy,
) -> Result<TokenStream> {
    let crate_root = ctx.crate_root;
    let generic = mentions_generics(ty, ctx.generics);

    match strategy {
        Strategy::PassThrough => {
            if generic {
                ctx.debug_predicates
                    .push(bound_on(ty, &quote! { ::core::fmt::Debug }));
            }
            if is_scalar_type(ty) {
                return Ok(quote_spanned! { span =>
                    #crate_root::FieldDescriptor::pass_through(#name)
                });
            }
            // Resolves to the field type's table when it has one, otherwise to
            // `None`. Type parameters always take the `None` path.
            Ok(quote_spanned! { span =>
                #crate_root::FieldDescriptor::inferred(#name, || {
                    #[allow(unused_imports)]
                    use #crate_root::__private::{HasFieldTable as _, NoFieldTable as _};
                    let lookup = &#crate_root::__private::TableLookup::<#ty>::new();
                    lookup.nested_table()
                })
            })
        }
        Strategy::Walk => {
            if is_scalar_type(ty) {
                return Err(syn::Error::new_spanned(
                    ty,
                    "bare #[obfuscate] walks nested records and cannot be used on a scalar; use #[obfuscate(Category)] or remove the attribute",
                ));
            }
            let walked = quote! { #crate_root::ObfuscatedType };
            if generic {
                ctx.table_predicates.push(bound_on(ty, &walked));
            }
            Ok(quote_spanned! { span =>
                #crate_root::FieldDescriptor::walk(
                    #name,
                    <#ty as #walked>::KIND,
                    <#ty as #walked>::field_table,
                )
            })
        }
        Strategy::Obfuscate(category) => {
            if is_unobfuscatable_scalar(ty) {
                return Err(syn::Error::new_spanned(
                    ty,
                    "obfuscation categories apply to text, integer and text collection fields only",
                ));
            }
            let leaf = quote! { #crate_root::ObfuscatableField };
            if generic {
                ctx.table_predicates.push(bound_on(ty, &leaf));
            }
            Ok(quote_spanned! { span =>
                #crate_root::FieldDescriptor::obfuscate(
                    #name,
                    #crate_root::ObfuscationType::#category,
                    <#ty as #leaf>::KIND,
                )
            })
        }
    }
}
