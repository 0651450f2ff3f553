//! Reading the `serde` attributes that decide serialized field names.
//!
//! Field tables key fields by the name `serde` writes, so renames must be
//! mirrored here and attributes that reshape the record must be refused.

use proc_macro2::{TokenStream, TokenTree};
use syn::{ext::IdentExt, meta::ParseNestedMeta, Attribute, Ident, LitStr, Result, Token};

/// Container options that change keys or shape of the serialized record.
const RESHAPING_CONTAINER_OPTIONS: &[&str] = &["rename_all", "transparent", "into"];

/// How `serde` writes one field.
pub(crate) struct SerializedField {
    /// Key of the field in the serialized object.
    pub(crate) name: String,
    /// Whether the field carries `#[serde(flatten)]`.
    pub(crate) flatten: bool,
}

fn serde_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("serde"))
}

/// Consumes the `= value` or `(...)` part of an option we do not care about.
fn skip_meta_value(meta: &ParseNestedMeta<'_>) -> Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<TokenTree>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        content.parse::<TokenStream>()?;
    }
    Ok(())
}

pub(crate) fn reject_container_reshaping(attrs: &[Attribute]) -> Result<()> {
    for attr in serde_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if let Some(option) = RESHAPING_CONTAINER_OPTIONS
                .iter()
                .find(|option| meta.path.is_ident(option))
            {
                return Err(meta.error(format!(
                    "`#[serde({option})]` changes the serialized field names and cannot be combined with `Obfuscate`"
                )));
            }
            skip_meta_value(&meta)
        })?;
    }
    Ok(())
}

/// Resolves the serialized name of a field declared as `ident`.
pub(crate) fn serialized_field(attrs: &[Attribute], ident: &Ident) -> Result<SerializedField> {
    let mut field = SerializedField {
        name: ident.unraw().to_string(),
        flatten: false,
    };
    for attr in serde_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if meta.input.peek(Token![=]) {
                    field.name = meta.value()?.parse::<LitStr>()?.value();
                    return Ok(());
                }
                meta.parse_nested_meta(|direction| {
                    if direction.path.is_ident("serialize") {
                        field.name = direction.value()?.parse::<LitStr>()?.value();
                        Ok(())
                    } else {
                        skip_meta_value(&direction)
                    }
                })
            } else if meta.path.is_ident("flatten") {
                field.flatten = true;
                Ok(())
            } else {
                skip_meta_value(&meta)
            }
        })?;
    }
    Ok(field)
}
