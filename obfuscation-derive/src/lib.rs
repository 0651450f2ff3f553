//! Derive macros for `obfuscation`.
//!
//! This crate generates the field tables behind `#[derive(Obfuscate)]`. It:
//! - reads `#[obfuscate(...)]` field attributes and `serde` renames
//! - emits an `ObfuscatedType` implementation holding a static field table
//!
//! It does **not** define categories or substitutions. Those live in the main
//! `obfuscation` crate and are applied at serialization time.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

#[cfg(feature = "slog")]
use proc_macro2::Span;
use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, parse_quote, spanned::Spanned, Data, DeriveInput, Result};

mod container;
mod derive_struct;
mod descriptor;
mod generics;
mod serde_attrs;
mod strategy;
mod types;
use container::ContainerOptions;
use derive_struct::{derive_struct, StructDeriveOutput};
use generics::with_predicates;

/// Derives `obfuscation::ObfuscatedType` (and related impls) for structs.
///
/// The type must also implement `serde::Serialize`; the table refers to the
/// keys `serde` writes, including `#[serde(rename = "...")]`.
///
/// # Container Attributes
///
/// - `#[obfuscate(skip_debug)]` - Opt out of `Debug` impl generation.
///
/// # Field Attributes
///
/// - **No annotation**: The field passes through unchanged. Records and
///   collections of records (any type implementing `ObfuscatedType`) are
///   walked as if marked `#[obfuscate]`. A field whose type is a type
///   parameter cannot be inspected this way and needs an explicit
///   `#[obfuscate]` to be walked.
///
/// - `#[obfuscate]`: Walks into a nested record or a collection of records.
///   The field type must implement `ObfuscatedType`, normally by deriving
///   `Obfuscate`. `Option`, `Box`, `Vec`, `VecDeque`, slices, arrays and
///   references of such types work as well.
///
/// - `#[obfuscate(Category)]`: Substitutes the field using the category's
///   policy. `Category` names an `ObfuscationType` variant (`UserName`,
///   `IpAddress`, `Authors`, `UserKey`, `UserNameList`). The field type must
///   implement `ObfuscatableField`: text, integers, text collections, or an
///   `Option` of them.
///
/// Enums, unions, tuple structs and unit structs are rejected at compile
/// time, as are `#[serde(rename_all)]`, `#[serde(transparent)]`,
/// `#[serde(into)]` and `#[serde(flatten)]`.
///
/// # Additional Generated Impls
///
/// - `Debug`: annotated and walked fields are formatted as `"[obfuscated]"`.
///   Use `#[obfuscate(skip_debug)]` on the container to opt out.
/// - `slog::Value` (behind `cfg(feature = "slog")`): logs the obfuscated JSON
///   document through `obfuscation::slog::ObfuscatedJson`. The derive first
///   looks for a top-level `slog` crate; if not found, it checks the
///   `OBFUSCATION_SLOG_CRATE` env var for an alternate path (e.g.,
///   `my_log::slog`).
#[proc_macro_derive(Obfuscate, attributes(obfuscate))]
pub fn derive_obfuscate(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the obfuscation crate root.
///
/// Handles crate renaming (e.g., `audit_obf = { package = "obfuscation", ... }`).
/// `FoundCrate::Itself` is also reported for the package's integration tests,
/// which reach the library under its own name.
fn crate_root() -> TokenStream {
    match crate_name("obfuscation") {
        Ok(FoundCrate::Itself) => {
            if std::env::var("CARGO_CRATE_NAME").as_deref() == Ok("obfuscation") {
                quote! { crate }
            } else {
                quote! { ::obfuscation }
            }
        }
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Err(_) => quote! { ::obfuscation },
    }
}

/// Returns the token stream to reference the slog crate root.
///
/// If the top-level `slog` crate is not available, falls back to the
/// `OBFUSCATION_SLOG_CRATE` env var, which should be a path like `my_log::slog`.
#[cfg(feature = "slog")]
fn slog_crate() -> Result<TokenStream> {
    match crate_name("slog") {
        Ok(FoundCrate::Itself) => Ok(quote! { crate }),
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            Ok(quote! { ::#ident })
        }
        Err(_) => {
            let env_value = std::env::var("OBFUSCATION_SLOG_CRATE").map_err(|_| {
                syn::Error::new(
                    Span::call_site(),
                    "slog support is enabled, but no top-level `slog` crate was found. \
Set the OBFUSCATION_SLOG_CRATE env var to a path (e.g., `my_log::slog`) or add \
`slog` as a direct dependency.",
                )
            })?;
            let path = syn::parse_str::<syn::Path>(&env_value).map_err(|_| {
                syn::Error::new(
                    Span::call_site(),
                    format!("OBFUSCATION_SLOG_CRATE must be a valid Rust path (got `{env_value}`)"),
                )
            })?;
            Ok(quote! { #path })
        }
    }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let ContainerOptions { skip_debug } = ContainerOptions::from_attrs(&attrs)?;

    let crate_root = crate_root();

    let StructDeriveOutput {
        descriptors,
        mut table_predicates,
        debug_body,
        debug_predicates,
    } = match &data {
        Data::Struct(data) => derive_struct(&ident, data, &generics, &crate_root)?,
        Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                "`Obfuscate` cannot be derived for enums",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "`Obfuscate` cannot be derived for unions",
            ));
        }
    };

    let (_, ty_generics, _) = generics.split_for_impl();
    if generics.type_params().next().is_some() {
        table_predicates.push(parse_quote!(
            #ident #ty_generics: #crate_root::__private::Serialize
        ));
    }

    let table_generics = with_predicates(generics.clone(), &table_predicates);
    let (impl_generics, ty_generics, where_clause) = table_generics.split_for_impl();

    let debug_generics = with_predicates(generics.clone(), &debug_predicates);
    let (debug_impl_generics, debug_ty_generics, debug_where_clause) =
        debug_generics.split_for_impl();
    let debug_impl = if skip_debug {
        quote! {}
    } else {
        quote! {
            impl #debug_impl_generics ::core::fmt::Debug for #ident #debug_ty_generics #debug_where_clause {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    #debug_body
                }
            }
        }
    };

    // Only generate slog impl when the slog feature is enabled on obfuscation-derive.
    #[cfg(feature = "slog")]
    let slog_impl = {
        let slog_crate = slog_crate()?;
        let (slog_impl_generics, slog_ty_generics, slog_where_clause) =
            table_generics.split_for_impl();
        quote! {
            impl #slog_impl_generics #slog_crate::Value for #ident #slog_ty_generics #slog_where_clause {
                fn serialize(
                    &self,
                    record: &#slog_crate::Record<'_>,
                    key: #slog_crate::Key,
                    serializer: &mut dyn #slog_crate::Serializer,
                ) -> #slog_crate::Result {
                    let obfuscated = #crate_root::slog::ObfuscatedJson::from_record(self);
                    #slog_crate::Value::serialize(&obfuscated, record, key, serializer)
                }
            }
        }
    };

    #[cfg(not(feature = "slog"))]
    let slog_impl = quote! {};

    Ok(quote! {
        impl #impl_generics #crate_root::ObfuscatedType for #ident #ty_generics #where_clause {
            const KIND: #crate_root::FieldKind = #crate_root::FieldKind::Nested;
            const FIELDS: &'static [#crate_root::FieldDescriptor] = &[
                #(#descriptors),*
            ];
        }

        #debug_impl

        #slog_impl

        // `slog` already provides `impl<V: Value> Value for &V`, so a reference
        // impl here would conflict with the blanket impl.
    })
}
