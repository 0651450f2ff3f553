//! Error types for obfuscation passes.
//!
//! Every failure aborts the pass. A record that cannot be safely obfuscated is
//! never emitted in its original form.

use thiserror::Error;

use crate::{category::ObfuscationType, obfuscation::FieldKind};

/// Errors returned by [`ObfuscatingSerializer`](crate::ObfuscatingSerializer).
#[derive(Error, Debug)]
pub enum ObfuscationError {
    /// The root value cannot be described as a record or a collection of records.
    #[error("Cannot obfuscate root value: {reason}")]
    Construction {
        /// Why the root was rejected.
        reason: &'static str,
    },

    /// The registry or a field declaration does not match the data.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The object graph nests deeper than the serializer allows.
    #[error("Object graph exceeds the maximum depth of {limit}")]
    DepthExceeded {
        /// Configured depth limit.
        limit: usize,
    },

    /// The record's `Serialize` implementation failed.
    #[error("Failed to serialize audit record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Programming-time mistakes detected while applying a policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A field uses a category the registry has no substitution for.
    #[error("No substitution registered for category `{category}`")]
    UnregisteredCategory {
        /// The missing category.
        category: ObfuscationType,
    },

    /// The registered substitution does not accept the field's declared kind.
    #[error("Category `{category}` cannot be applied to {kind} field `{field}`")]
    KindMismatch {
        /// Serialized field name.
        field: &'static str,
        /// Category declared on the field.
        category: ObfuscationType,
        /// Declared kind of the field.
        kind: FieldKind,
    },

    /// The serialized value does not have the shape its declaration promises.
    #[error("Field `{field}` does not hold a {expected} value")]
    UnexpectedValue {
        /// Serialized field name.
        field: &'static str,
        /// Kind the field was declared with.
        expected: FieldKind,
    },
}
