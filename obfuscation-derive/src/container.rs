//! Record-level `#[obfuscate(...)]` options.

use syn::{Attribute, Meta, Result};

use crate::serde_attrs::reject_container_reshaping;

/// What a record-level `#[obfuscate(...)]` can change about the generated impls.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ContainerOptions {
    /// Leave `Debug` to the user.
    pub(crate) skip_debug: bool,
}

impl ContainerOptions {
    /// Reads the options from the record's attributes.
    ///
    /// `serde` attributes that reshape the record's keys are refused here,
    /// since the generated table names fields by their serialized keys.
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        reject_container_reshaping(attrs)?;

        let mut options = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("obfuscate")) {
            let Meta::List(list) = &attr.meta else {
                return Err(syn::Error::new_spanned(
                    attr,
                    "expected `#[obfuscate(skip_debug)]` on a record",
                ));
            };
            list.parse_nested_meta(|option| {
                if !option.path.is_ident("skip_debug") {
                    return Err(option.error(
                        "unsupported record option; the only option is `skip_debug`",
                    ));
                }
                options.skip_debug = true;
                Ok(())
            })?;
        }
        Ok(options)
    }
}
