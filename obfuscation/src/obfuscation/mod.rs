//! Obfuscation policies, field tables, and the serializer.
//!
//! This module ties the pieces together:
//!
//! - **`field`**: Domain layer - what is sensitive (`FieldDescriptor`, `ObfuscatedType`)
//! - **`policy`**: Policy layer - how to substitute (`Substitution`, `PolicyRegistry`)
//! - **`serializer`**: Application layer - the pass itself (`ObfuscatingSerializer`)
//!
//! Categories live in `crate::category`.

mod field;
mod policy;
mod serializer;

pub use field::{
    FieldDescriptor, FieldKind, FieldRule, HasFieldTable, NestedTable, NoFieldTable,
    ObfuscatableField, ObfuscatedType, TableLookup, TextValue,
};
pub use policy::{
    obfuscate_ip, PolicyRegistry, PolicyRegistryBuilder, Substitution, TextSubstitution,
    OBFUSCATED_USER_KEY, OBFUSCATED_USER_NAME,
};
pub use serializer::{Obfuscatable, ObfuscatingSerializer, DEFAULT_MAX_DEPTH};
