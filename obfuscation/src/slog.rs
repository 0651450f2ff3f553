//! Adapters for emitting obfuscated audit records through `slog`.
//!
//! This module connects the obfuscating serializer with `slog` by providing a
//! `slog::Value` that serializes the obfuscated document as structured JSON via
//! `slog`'s nested-value support.
//!
//! It is responsible for:
//! - Ensuring the logged representation comes from an obfuscation pass, never
//!   from the original record.
//! - Avoiding fallible logging APIs: when a pass fails, a fixed placeholder
//!   string is logged instead of the record.
//!
//! It does not configure `slog` or choose the registry for derived impls; those
//! use the standard registry.

use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::obfuscation::{ObfuscatedType, ObfuscatingSerializer};

/// Logged in place of a record whose obfuscation pass failed.
pub const OBFUSCATION_FAILED: &str = "Failed to obfuscate audit record";

/// A `slog::Value` that emits an obfuscated document as structured JSON.
///
/// The document is computed eagerly and stored as a `serde_json::Value`.
#[derive(Clone, Debug)]
pub struct ObfuscatedJson {
    value: JsonValue,
}

impl ObfuscatedJson {
    /// Obfuscates `record` with the standard registry.
    pub fn from_record<T>(record: &T) -> Self
    where
        T: ObfuscatedType + ?Sized,
    {
        Self::with_serializer(&ObfuscatingSerializer::standard(), record)
    }

    /// Obfuscates `record` with a specific serializer.
    ///
    /// If the pass fails, the stored value is the JSON string
    /// [`OBFUSCATION_FAILED`].
    pub fn with_serializer<T>(serializer: &ObfuscatingSerializer<'_>, record: &T) -> Self
    where
        T: ObfuscatedType + ?Sized,
    {
        let value = serializer
            .serialize(record)
            .unwrap_or_else(|_| JsonValue::String(OBFUSCATION_FAILED.to_string()));
        Self { value }
    }

    /// The document that will be logged.
    pub fn value(&self) -> &JsonValue {
        &self.value
    }
}

impl SlogValue for ObfuscatedJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.value.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Converts records into a `slog::Value` that logs their obfuscated form.
///
/// ## Example
/// ```ignore
/// use obfuscation::slog::IntoObfuscatedJson;
///
/// info!(logger, "package deleted"; "record" => record.to_obfuscated_json());
/// ```
pub trait IntoObfuscatedJson: ObfuscatedType {
    /// Obfuscates `self` with the standard registry.
    fn to_obfuscated_json(&self) -> ObfuscatedJson {
        ObfuscatedJson::from_record(self)
    }
}

impl<T> IntoObfuscatedJson for T where T: ObfuscatedType + ?Sized {}
