//! Serialization-time obfuscation for audit records.
//!
//! This crate separates:
//! - **Categories**: what kind of sensitive data a field holds ([`ObfuscationType`]).
//! - **Policy**: how each category is substituted ([`PolicyRegistry`], [`Substitution`]).
//! - **Traversal**: which fields of a record carry which category ([`FieldDescriptor`]
//!   tables generated by `#[derive(Obfuscate)]`).
//!
//! The [`ObfuscatingSerializer`] serializes a record with `serde`, then walks the
//! resulting document with the record's field table and substitutes every
//! annotated value before the document leaves the process.
//!
//! Key rules:
//! - Use `#[obfuscate(Category)]` for text, integer and text-collection leaves.
//! - Use `#[obfuscate]` for nested records and collections of records.
//! - Unannotated fields pass through unchanged, byte for byte, except records
//!   and collections of records, which are walked like `#[obfuscate]` fields.
//! - A value that cannot be safely substituted fails the whole call; nothing
//!   falls back to pass-through.
//!
//! ```ignore
//! use obfuscation::{Obfuscatable, Obfuscate};
//! use serde::Serialize;
//!
//! #[derive(Serialize, Obfuscate)]
//! struct PackageDeleted {
//!     package_id: String,
//!     #[obfuscate(UserName)]
//!     deleted_by: String,
//!     #[obfuscate(IpAddress)]
//!     client_ip: String,
//! }
//!
//! let json = event.to_obfuscated_string()?;
//! ```
//!
//! What this crate does not do:
//! - write audit logs or perform any other I/O
//! - decide which fields of a record are sensitive
//!
//! Structured logging integration lives behind the `slog` feature.

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
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::enum_glob_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use obfuscation_derive::Obfuscate;

// Module declarations
mod category;
mod error;
mod obfuscation;
#[cfg(feature = "slog")]
pub mod slog;

// Re-exports
pub use category::ObfuscationType;
pub use error::{ConfigurationError, ObfuscationError};
pub use obfuscation::{
    obfuscate_ip, FieldDescriptor, FieldKind, FieldRule, NestedTable, Obfuscatable,
    ObfuscatableField, ObfuscatedType, ObfuscatingSerializer, PolicyRegistry,
    PolicyRegistryBuilder, Substitution, TextSubstitution, TextValue, DEFAULT_MAX_DEPTH,
    OBFUSCATED_USER_KEY, OBFUSCATED_USER_NAME,
};

/// The structured document produced by a serialization pass.
pub type StructuredDocument = serde_json::Value;

/// Items referenced by code generated from `#[derive(Obfuscate)]`.
#[doc(hidden)]
pub mod __private {
    pub use serde::Serialize;

    pub use crate::obfuscation::{HasFieldTable, NoFieldTable, TableLookup};
}
