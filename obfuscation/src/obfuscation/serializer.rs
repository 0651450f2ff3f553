//! Application layer: the obfuscating serializer.
//!
//! A pass serializes the root with `serde_json`, then walks the document with
//! the root's field table. Fields are visited in declaration order and the
//! document keeps that order, so identical records always produce identical
//! text. Unannotated values are never rewritten; records found in unannotated
//! fields are still walked. Output is therefore identical to plain `serde_json`
//! output for records without sensitive fields.

use serde_json::{Map, Value};

use super::{
    field::{FieldDescriptor, FieldKind, FieldRule, ObfuscatedType},
    policy::PolicyRegistry,
};
use crate::error::{ConfigurationError, ObfuscationError};

/// Default nesting limit for records inside records.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Field name reported for values that sit directly in the root document.
const ROOT: &str = "<root>";

/// Serializes records into structured documents with sensitive fields substituted.
///
/// The serializer only borrows a registry, so it is cheap to create per call
/// and can be shared freely between threads.
#[derive(Clone, Copy, Debug)]
pub struct ObfuscatingSerializer<'r> {
    registry: &'r PolicyRegistry,
    max_depth: usize,
}

impl ObfuscatingSerializer<'static> {
    /// Uses [`PolicyRegistry::standard`].
    pub fn standard() -> Self {
        Self::new(PolicyRegistry::standard())
    }
}

impl<'r> ObfuscatingSerializer<'r> {
    /// Creates a serializer applying `registry`.
    pub fn new(registry: &'r PolicyRegistry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limits how many records may be nested inside each other.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The registry this serializer applies.
    pub fn registry(&self) -> &'r PolicyRegistry {
        self.registry
    }

    /// Serializes `root` and obfuscates the resulting document.
    ///
    /// The root must serialize to a record or a collection of records. An
    /// absent root (e.g. `None`) is a [`ObfuscationError::Construction`] error.
    pub fn serialize<T>(&self, root: &T) -> Result<Value, ObfuscationError>
    where
        T: ObfuscatedType + ?Sized,
    {
        let mut document = serde_json::to_value(root)?;
        self.obfuscate_document(&mut document, T::field_table())?;
        Ok(document)
    }

    /// Serializes `root` to compact JSON text.
    pub fn to_string<T>(&self, root: &T) -> Result<String, ObfuscationError>
    where
        T: ObfuscatedType + ?Sized,
    {
        let document = self.serialize(root)?;
        Ok(serde_json::to_string(&document)?)
    }

    /// Serializes `root` to indented JSON text.
    pub fn to_string_pretty<T>(&self, root: &T) -> Result<String, ObfuscationError>
    where
        T: ObfuscatedType + ?Sized,
    {
        let document = self.serialize(root)?;
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Obfuscates an already serialized document in place using `fields`.
    pub fn obfuscate_document(
        &self,
        document: &mut Value,
        fields: &'static [FieldDescriptor],
    ) -> Result<(), ObfuscationError> {
        match document {
            Value::Object(_) | Value::Array(_) => {}
            Value::Null => {
                return Err(ObfuscationError::Construction {
                    reason: "the root value is absent",
                })
            }
            _ => {
                return Err(ObfuscationError::Construction {
                    reason: "the root value must be a record or a collection of records",
                })
            }
        }
        self.walk(ROOT, document, fields, 0)
    }

    fn walk(
        &self,
        name: &'static str,
        value: &mut Value,
        fields: &'static [FieldDescriptor],
        depth: usize,
    ) -> Result<(), ObfuscationError> {
        match value {
            Value::Object(object) => self.obfuscate_object(object, fields, depth),
            Value::Array(items) => items
                .iter_mut()
                .try_for_each(|item| self.walk(name, item, fields, depth)),
            Value::Null => Ok(()),
            _ => Err(ConfigurationError::UnexpectedValue {
                field: name,
                expected: FieldKind::Nested,
            }
            .into()),
        }
    }

    fn obfuscate_object(
        &self,
        object: &mut Map<String, Value>,
        fields: &'static [FieldDescriptor],
        depth: usize,
    ) -> Result<(), ObfuscationError> {
        if depth >= self.max_depth {
            return Err(ObfuscationError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        for field in fields {
            // Fields skipped by serde have nothing to substitute.
            let Some(slot) = object.get_mut(field.name()) else {
                continue;
            };
            match field.rule() {
                FieldRule::PassThrough => {}
                FieldRule::Inferred { nested } => {
                    if let Some(table) = nested() {
                        self.walk_field(field.name(), slot, table.kind(), table.fields(), depth)?;
                    }
                }
                FieldRule::Obfuscate { category, kind } => {
                    let mismatch = ConfigurationError::KindMismatch {
                        field: field.name(),
                        category,
                        kind,
                    };
                    if !kind.can_obfuscate() {
                        return Err(mismatch.into());
                    }
                    let substitution = self.registry.lookup(category)?;
                    if !substitution.accepts(kind) {
                        return Err(mismatch.into());
                    }
                    *slot = substitution.apply(field.name(), slot)?;
                }
                FieldRule::Walk {
                    kind,
                    fields: nested,
                } => self.walk_field(field.name(), slot, kind, nested(), depth)?,
            }
        }
        Ok(())
    }

    /// Walks the value of a record field declared as `kind`.
    fn walk_field(
        &self,
        name: &'static str,
        slot: &mut Value,
        kind: FieldKind,
        fields: &'static [FieldDescriptor],
        depth: usize,
    ) -> Result<(), ObfuscationError> {
        let unexpected = ConfigurationError::UnexpectedValue {
            field: name,
            expected: kind,
        };
        if !kind.is_nested() {
            return Err(unexpected.into());
        }
        let shape_matches = match &*slot {
            Value::Null => return Ok(()),
            Value::Object(_) => kind == FieldKind::Nested,
            Value::Array(_) => kind == FieldKind::NestedCollection,
            _ => false,
        };
        if !shape_matches {
            return Err(unexpected.into());
        }
        self.walk(name, slot, fields, depth + 1)
    }
}

impl Default for ObfuscatingSerializer<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

/// Public entrypoint for obfuscation with the standard registry.
///
/// This trait is blanket-implemented for all [`ObfuscatedType`] types.
pub trait Obfuscatable: ObfuscatedType {
    /// Serializes `self` into an obfuscated document.
    fn to_obfuscated_value(&self) -> Result<Value, ObfuscationError> {
        ObfuscatingSerializer::standard().serialize(self)
    }

    /// Serializes `self` into obfuscated compact JSON.
    fn to_obfuscated_string(&self) -> Result<String, ObfuscationError> {
        ObfuscatingSerializer::standard().to_string(self)
    }

    /// Serializes `self` into obfuscated indented JSON.
    fn to_obfuscated_string_pretty(&self) -> Result<String, ObfuscationError> {
        ObfuscatingSerializer::standard().to_string_pretty(self)
    }
}

impl<T> Obfuscatable for T where T: ObfuscatedType + ?Sized {}
