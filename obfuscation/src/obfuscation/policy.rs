//! Substitution policies and the category registry.
//!
//! Substitutions are pure value transformations. They do not traverse records,
//! choose categories, or inspect anything besides the value handed to them.

use std::{borrow::Cow, collections::BTreeMap, sync::OnceLock};

use serde_json::Value;

use super::field::FieldKind;
use crate::{category::ObfuscationType, error::ConfigurationError};

/// Placeholder written in place of user names.
pub const OBFUSCATED_USER_NAME: &str = "ObfuscatedUserName";

/// Sentinel written in place of account keys.
pub const OBFUSCATED_USER_KEY: i64 = -1;

/// Zeroes the last octet of a dotted-quad IPv4 address.
///
/// Octets are four runs of ASCII digits, each at most 255; leading zeros are
/// allowed and kept. Anything else (IPv6, host names, empty text) is returned
/// unchanged.
pub fn obfuscate_ip(value: &str) -> Cow<'_, str> {
    let is_octet = |part: &&str| {
        !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) && part.parse::<u8>().is_ok()
    };
    let parts: Vec<&str> = value.split('.').collect();
    match parts.as_slice() {
        [a, b, c, _] if parts.iter().all(is_octet) => {
            Cow::Owned(format!("{a}.{b}.{c}.0"))
        }
        _ => Cow::Borrowed(value),
    }
}

/// A substitution for a single text value.
// Use `Cow` so callers can provide borrowed or owned placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextSubstitution {
    /// Replace the value, present or absent, with fixed text.
    Placeholder {
        /// The text written instead of the value.
        placeholder: Cow<'static, str>,
    },
    /// Keep the network part of an IPv4 address; see [`obfuscate_ip`].
    ///
    /// Absent values stay absent.
    ZeroLastOctet,
}

impl TextSubstitution {
    /// Constructs [`TextSubstitution::Placeholder`].
    #[must_use]
    pub fn placeholder<P>(placeholder: P) -> Self
    where
        P: Into<Cow<'static, str>>,
    {
        Self::Placeholder {
            placeholder: placeholder.into(),
        }
    }

    /// Applies the substitution to present text.
    #[must_use]
    pub fn apply_to<'a>(&'a self, value: &'a str) -> Cow<'a, str> {
        match self {
            TextSubstitution::Placeholder { placeholder } => Cow::Borrowed(placeholder.as_ref()),
            TextSubstitution::ZeroLastOctet => obfuscate_ip(value),
        }
    }

    fn apply_to_value(&self, value: &str) -> Value {
        Value::String(self.apply_to(value).into_owned())
    }

    fn apply_to_absent(&self) -> Value {
        match self {
            TextSubstitution::Placeholder { placeholder } => {
                Value::String(placeholder.clone().into_owned())
            }
            TextSubstitution::ZeroLastOctet => Value::Null,
        }
    }
}

/// A substitution bound to a category.
///
/// Each variant accepts exactly one [`FieldKind`]; see [`Substitution::accepts`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Substitution {
    /// Substitutes a text field.
    Text(TextSubstitution),
    /// Writes a fixed integer for an optional integer field, absent or not.
    Sentinel(i64),
    /// Substitutes every element of a text collection, keeping the element count.
    ///
    /// An absent collection is written as an empty one.
    EachElement(TextSubstitution),
}

impl Substitution {
    /// Returns the standard substitution for `category`.
    #[must_use]
    pub fn standard(category: ObfuscationType) -> Self {
        match category {
            ObfuscationType::UserName => {
                Self::Text(TextSubstitution::placeholder(OBFUSCATED_USER_NAME))
            }
            ObfuscationType::IpAddress => Self::Text(TextSubstitution::ZeroLastOctet),
            ObfuscationType::Authors => Self::Text(TextSubstitution::placeholder("")),
            ObfuscationType::UserKey => Self::Sentinel(OBFUSCATED_USER_KEY),
            ObfuscationType::UserNameList => {
                Self::EachElement(TextSubstitution::placeholder(OBFUSCATED_USER_NAME))
            }
        }
    }

    /// Returns whether this substitution can be applied to a field of `kind`.
    #[must_use]
    pub const fn accepts(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (Substitution::Text(_), FieldKind::Text)
                | (Substitution::Sentinel(_), FieldKind::OptionalInteger)
                | (Substitution::EachElement(_), FieldKind::TextCollection)
        )
    }

    /// Applies the substitution to the serialized value of `field`.
    ///
    /// Fails if the value does not have the shape this substitution accepts.
    pub fn apply(&self, field: &'static str, value: &Value) -> Result<Value, ConfigurationError> {
        let unexpected = |expected| ConfigurationError::UnexpectedValue { field, expected };
        match self {
            Substitution::Text(text) => match value {
                Value::String(value) => Ok(text.apply_to_value(value)),
                Value::Null => Ok(text.apply_to_absent()),
                _ => Err(unexpected(FieldKind::Text)),
            },
            Substitution::Sentinel(sentinel) => match value {
                Value::Number(_) | Value::Null => Ok(Value::from(*sentinel)),
                _ => Err(unexpected(FieldKind::OptionalInteger)),
            },
            Substitution::EachElement(text) => match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(item) => Ok(text.apply_to_value(item)),
                        _ => Err(unexpected(FieldKind::TextCollection)),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                Value::Null => Ok(Value::Array(Vec::new())),
                _ => Err(unexpected(FieldKind::TextCollection)),
            },
        }
    }
}

/// Maps categories to substitutions.
///
/// The process-wide [`PolicyRegistry::standard`] registry covers every
/// category. Registries assembled with [`PolicyRegistry::builder`] may be
/// partial; looking up a missing category is a [`ConfigurationError`].
#[derive(Clone, Debug, Default)]
pub struct PolicyRegistry {
    entries: BTreeMap<ObfuscationType, Substitution>,
}

impl PolicyRegistry {
    /// Returns the registry holding [`Substitution::standard`] for every category.
    ///
    /// Built on first use and never mutated afterwards.
    pub fn standard() -> &'static PolicyRegistry {
        static STANDARD: OnceLock<PolicyRegistry> = OnceLock::new();
        STANDARD.get_or_init(|| PolicyRegistry::builder().with_standard_entries().build())
    }

    /// Starts an empty registry.
    #[must_use]
    pub fn builder() -> PolicyRegistryBuilder {
        PolicyRegistryBuilder::default()
    }

    /// Looks up the substitution registered for `category`.
    pub fn lookup(&self, category: ObfuscationType) -> Result<&Substitution, ConfigurationError> {
        self.entries
            .get(&category)
            .ok_or(ConfigurationError::UnregisteredCategory { category })
    }

    /// Iterates registered categories in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = ObfuscationType> + '_ {
        self.entries.keys().copied()
    }

    /// Returns whether every category has a substitution.
    pub fn is_total(&self) -> bool {
        ObfuscationType::ALL
            .iter()
            .all(|category| self.entries.contains_key(category))
    }
}

/// Assembles a [`PolicyRegistry`].
#[derive(Clone, Debug, Default)]
pub struct PolicyRegistryBuilder {
    entries: BTreeMap<ObfuscationType, Substitution>,
}

impl PolicyRegistryBuilder {
    /// Registers `substitution` for `category`, replacing any earlier entry.
    #[must_use]
    pub fn register(mut self, category: ObfuscationType, substitution: Substitution) -> Self {
        self.entries.insert(category, substitution);
        self
    }

    /// Adds the standard substitution for every category not registered yet.
    #[must_use]
    pub fn with_standard_entries(mut self) -> Self {
        for category in ObfuscationType::ALL {
            self.entries
                .entry(category)
                .or_insert_with(|| Substitution::standard(category));
        }
        self
    }

    /// Finishes the registry.
    #[must_use]
    pub fn build(self) -> PolicyRegistry {
        PolicyRegistry {
            entries: self.entries,
        }
    }
}
