//! Parsing of `#[obfuscate(...)]` field attributes.
//!
//! This module maps attribute syntax to table rules and produces structured
//! errors for invalid forms.

use proc_macro2::Span;
use syn::{spanned::Spanned, Attribute, Ident, Meta, Result};

/// Field rule selected by `#[obfuscate(...)]` attributes.
///
/// ## Strategy Mapping
///
/// | Attribute | Strategy | Behavior |
/// |-----------|----------|----------|
/// | None | `PassThrough` | Unchanged, unless the type is a record or a collection of records |
/// | `#[obfuscate]` | `Walk` | Walk into the nested record(s) |
/// | `#[obfuscate(Category)]` | `Obfuscate(Category)` | Apply the category's substitution |
#[derive(Clone, Debug)]
pub(crate) enum Strategy {
    /// No annotation: pass through unchanged.
    ///
    /// External types like `DateTime<Utc>` work automatically. Field types
    /// with their own table are still walked.
    PassThrough,
    /// Bare `#[obfuscate]`: walk using the field type's table.
    Walk,
    /// `#[obfuscate(Category)]`: substitute with the category's policy.
    ///
    /// The identifier names an `ObfuscationType` variant.
    Obfuscate(Ident),
}

fn set_strategy(target: &mut Option<Strategy>, next: Strategy, span: Span) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            "multiple #[obfuscate] attributes specified on the same field",
        ));
    }
    *target = Some(next);
    Ok(())
}

pub(crate) fn parse_field_strategy(attrs: &[Attribute]) -> Result<Strategy> {
    let mut strategy: Option<Strategy> = None;
    for attr in attrs {
        if !attr.path().is_ident("obfuscate") {
            continue;
        }

        match &attr.meta {
            Meta::Path(_) => {
                set_strategy(&mut strategy, Strategy::Walk, attr.span())?;
            }
            Meta::List(list) => match syn::parse2::<Ident>(list.tokens.clone()) {
                Ok(category) => {
                    set_strategy(&mut strategy, Strategy::Obfuscate(category), attr.span())?;
                }
                Err(_) => {
                    return Err(syn::Error::new(
                        attr.span(),
                        "expected an obfuscation category (e.g., #[obfuscate(UserName)])",
                    ));
                }
            },
            Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "name-value syntax is not supported for #[obfuscate]",
                ));
            }
        }
    }

    Ok(strategy.unwrap_or(Strategy::PassThrough))
}
