//! Domain layer: field tables describing what is sensitive.
//!
//! This module defines the static description the serializer walks:
//!
//! - [`FieldDescriptor`]: one field of a record and the rule applied to it
//! - [`ObfuscatedType`]: types that *contain* sensitive fields (records and
//!   collections of records)
//! - [`ObfuscatableField`]: types that *are* sensitive leaves (text, integers,
//!   text collections)
//!
//! ## Field Handling
//!
//! The derive macro builds one descriptor per field, in declaration order:
//!
//! | Annotation | Rule | Behavior |
//! |------------|------|----------|
//! | None, scalar type | `PassThrough` | Field unchanged |
//! | None, other type | `Inferred` | Walked if the type has a table, unchanged otherwise (external types work!) |
//! | `#[obfuscate]` | `Walk` | Recurse with the nested record's table |
//! | `#[obfuscate(Category)]` | `Obfuscate` | Apply the category's substitution |
//!
//! Kinds are resolved at compile time through the two traits, so the
//! serializer never inspects Rust types at runtime.

use std::{
    borrow::Cow,
    collections::{BTreeSet, VecDeque},
    fmt,
    marker::PhantomData,
};

use serde::Serialize;

use crate::category::ObfuscationType;

// =============================================================================
// FieldKind
// =============================================================================

/// Declared shape of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Text, present or absent.
    Text,
    /// Integer, present or absent.
    OptionalInteger,
    /// Sequence of text values.
    TextCollection,
    /// A nested record.
    Nested,
    /// A sequence of nested records.
    NestedCollection,
    /// Anything else. Never obfuscated.
    Other,
}

impl FieldKind {
    /// Returns whether a category substitution can be applied to this kind.
    pub const fn can_obfuscate(self) -> bool {
        matches!(
            self,
            FieldKind::Text | FieldKind::OptionalInteger | FieldKind::TextCollection
        )
    }

    /// Returns whether this kind is walked with a nested field table.
    pub const fn is_nested(self) -> bool {
        matches!(self, FieldKind::Nested | FieldKind::NestedCollection)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Text => "text",
            FieldKind::OptionalInteger => "optional integer",
            FieldKind::TextCollection => "text collection",
            FieldKind::Nested => "nested record",
            FieldKind::NestedCollection => "nested record collection",
            FieldKind::Other => "other",
        })
    }
}

// =============================================================================
// FieldDescriptor
// =============================================================================

/// Table of a walkable type together with its kind.
#[derive(Clone, Copy, Debug)]
pub struct NestedTable {
    kind: FieldKind,
    fields: fn() -> &'static [FieldDescriptor],
}

impl NestedTable {
    /// Describes the table of `T`.
    pub fn of<T>() -> Self
    where
        T: ObfuscatedType + ?Sized,
    {
        Self {
            kind: T::KIND,
            fields: T::field_table,
        }
    }

    /// [`FieldKind::Nested`] or [`FieldKind::NestedCollection`].
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Field table applied to every record found at this position.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        (self.fields)()
    }
}

/// What the serializer does with one field.
#[derive(Clone, Copy, Debug)]
pub enum FieldRule {
    /// Emit the serialized value unchanged.
    PassThrough,
    /// Unannotated field: walked when its type has a field table, emitted
    /// unchanged otherwise.
    Inferred {
        /// Returns the table of the field type, if it has one.
        nested: fn() -> Option<NestedTable>,
    },
    /// Replace the value with the category's substitution.
    Obfuscate {
        /// Category declared on the field.
        category: ObfuscationType,
        /// Declared kind, one for which [`FieldKind::can_obfuscate`] holds.
        kind: FieldKind,
    },
    /// Recurse into a nested record or collection of records.
    Walk {
        /// [`FieldKind::Nested`] or [`FieldKind::NestedCollection`].
        kind: FieldKind,
        /// Table of the nested record type.
        ///
        /// Stored as a function so that recursive record types do not form a
        /// cyclic constant.
        fields: fn() -> &'static [FieldDescriptor],
    },
}

/// One entry of a record's field table.
#[derive(Clone, Copy, Debug)]
pub struct FieldDescriptor {
    name: &'static str,
    rule: FieldRule,
}

impl FieldDescriptor {
    /// Describes a field emitted unchanged.
    pub const fn pass_through(name: &'static str) -> Self {
        Self {
            name,
            rule: FieldRule::PassThrough,
        }
    }

    /// Describes an unannotated field whose type may hold records.
    pub const fn inferred(name: &'static str, nested: fn() -> Option<NestedTable>) -> Self {
        Self {
            name,
            rule: FieldRule::Inferred { nested },
        }
    }

    /// Describes a field substituted according to `category`.
    pub const fn obfuscate(name: &'static str, category: ObfuscationType, kind: FieldKind) -> Self {
        Self {
            name,
            rule: FieldRule::Obfuscate { category, kind },
        }
    }

    /// Describes a field walked with a nested table.
    pub const fn walk(
        name: &'static str,
        kind: FieldKind,
        fields: fn() -> &'static [FieldDescriptor],
    ) -> Self {
        Self {
            name,
            rule: FieldRule::Walk { kind, fields },
        }
    }

    /// Serialized field name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Rule applied to the field.
    pub const fn rule(&self) -> FieldRule {
        self.rule
    }

    /// Effective kind; [`FieldKind::Other`] for fields emitted unchanged.
    pub fn kind(&self) -> FieldKind {
        match self.rule {
            FieldRule::PassThrough => FieldKind::Other,
            FieldRule::Inferred { nested } => nested().map_or(FieldKind::Other, |table| table.kind),
            FieldRule::Obfuscate { kind, .. } | FieldRule::Walk { kind, .. } => kind,
        }
    }

    /// Category declared on the field, if any.
    pub const fn category(&self) -> Option<ObfuscationType> {
        match self.rule {
            FieldRule::Obfuscate { category, .. } => Some(category),
            FieldRule::PassThrough | FieldRule::Inferred { .. } | FieldRule::Walk { .. } => None,
        }
    }
}

// =============================================================================
// Table lookup for unannotated fields
// =============================================================================

/// Names a field type in generated code.
///
/// Calling `(&TableLookup::<T>::new()).nested_table()` with both lookup traits
/// in scope resolves to [`HasFieldTable`] when `T: ObfuscatedType` and to
/// [`NoFieldTable`] otherwise. Method resolution only sees through concrete
/// types, so a field typed by a bare type parameter falls back to
/// [`NoFieldTable`] and needs an explicit `#[obfuscate]`.
#[doc(hidden)]
pub struct TableLookup<T: ?Sized>(PhantomData<T>);

impl<T: ?Sized> TableLookup<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: ?Sized> Default for TableLookup<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[doc(hidden)]
pub trait HasFieldTable {
    fn nested_table(&self) -> Option<NestedTable>;
}

impl<T> HasFieldTable for TableLookup<T>
where
    T: ObfuscatedType + ?Sized,
{
    fn nested_table(&self) -> Option<NestedTable> {
        Some(NestedTable::of::<T>())
    }
}

#[doc(hidden)]
pub trait NoFieldTable {
    fn nested_table(&self) -> Option<NestedTable> {
        None
    }
}

impl<T: ?Sized> NoFieldTable for &TableLookup<T> {}

// =============================================================================
// ObfuscatableField - Types that ARE sensitive data (leaf values)
// =============================================================================

/// Text values that may appear as elements of a text collection.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a text value",
    label = "text collections must hold text elements",
    note = "absent elements are not supported; use `Option<Vec<String>>` for an absent collection"
)]
pub trait TextValue {}

impl TextValue for String {}
impl TextValue for str {}
impl TextValue for Cow<'_, str> {}
impl TextValue for Box<str> {}
impl<T> TextValue for &T where T: TextValue + ?Sized {}

/// Leaf types a category can be applied to.
///
/// Booleans, floating point numbers and nested records deliberately do not
/// implement this trait, so `#[obfuscate(Category)]` on them fails to compile.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot carry an obfuscation category",
    label = "categories apply to text, integers and text collections only",
    note = "if `{Self}` derives `Obfuscate`, use bare `#[obfuscate]` to walk into it",
    note = "otherwise remove the attribute to emit the field unchanged"
)]
pub trait ObfuscatableField {
    /// Declared kind of the field.
    const KIND: FieldKind;
}

macro_rules! impl_obfuscatable_field {
    ($kind:ident => $($ty:ty),* $(,)?) => {
        $(
            impl ObfuscatableField for $ty {
                const KIND: FieldKind = FieldKind::$kind;
            }
        )*
    };
}

impl_obfuscatable_field!(Text => String, str, Cow<'_, str>);
impl_obfuscatable_field!(OptionalInteger => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T> ObfuscatableField for Option<T>
where
    T: ObfuscatableField,
{
    const KIND: FieldKind = T::KIND;
}

impl<T> ObfuscatableField for Box<T>
where
    T: ObfuscatableField + ?Sized,
{
    const KIND: FieldKind = T::KIND;
}

impl<T> ObfuscatableField for &T
where
    T: ObfuscatableField + ?Sized,
{
    const KIND: FieldKind = T::KIND;
}

impl<T: TextValue> ObfuscatableField for Vec<T> {
    const KIND: FieldKind = FieldKind::TextCollection;
}

impl<T: TextValue> ObfuscatableField for VecDeque<T> {
    const KIND: FieldKind = FieldKind::TextCollection;
}

impl<T: TextValue> ObfuscatableField for BTreeSet<T> {
    const KIND: FieldKind = FieldKind::TextCollection;
}

impl<T: TextValue> ObfuscatableField for [T] {
    const KIND: FieldKind = FieldKind::TextCollection;
}

impl<T: TextValue, const N: usize> ObfuscatableField for [T; N] {
    const KIND: FieldKind = FieldKind::TextCollection;
}

// =============================================================================
// ObfuscatedType - Types that CONTAIN sensitive data (records)
// =============================================================================

/// A record, or a container of records, that can be walked for obfuscation.
///
/// `#[derive(Obfuscate)]` implements this for records with
/// `KIND = FieldKind::Nested`. The container impls below forward the element
/// table, so an `Option<Vec<Record>>` field is walked with `Record`'s table.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be walked for obfuscation",
    label = "this type has no field table",
    note = "use `#[derive(Obfuscate)]` on the type definition",
    note = "or use `#[obfuscate(Category)]` if this is a text or integer leaf"
)]
pub trait ObfuscatedType: Serialize {
    /// [`FieldKind::Nested`] or [`FieldKind::NestedCollection`].
    const KIND: FieldKind;

    /// Field table applied to every record found at this position.
    const FIELDS: &'static [FieldDescriptor];

    /// Returns [`Self::FIELDS`].
    fn field_table() -> &'static [FieldDescriptor] {
        Self::FIELDS
    }
}

impl<T> ObfuscatedType for Option<T>
where
    T: ObfuscatedType,
{
    const KIND: FieldKind = T::KIND;
    const FIELDS: &'static [FieldDescriptor] = T::FIELDS;
}

impl<T> ObfuscatedType for Box<T>
where
    T: ObfuscatedType + ?Sized,
{
    const KIND: FieldKind = T::KIND;
    const FIELDS: &'static [FieldDescriptor] = T::FIELDS;
}

impl<T> ObfuscatedType for &T
where
    T: ObfuscatedType + ?Sized,
{
    const KIND: FieldKind = T::KIND;
    const FIELDS: &'static [FieldDescriptor] = T::FIELDS;
}

impl<T> ObfuscatedType for Vec<T>
where
    T: ObfuscatedType,
{
    const KIND: FieldKind = FieldKind::NestedCollection;
    const FIELDS: &'static [FieldDescriptor] = T::FIELDS;
}

impl<T> ObfuscatedType for VecDeque<T>
where
    T: ObfuscatedType,
{
    const KIND: FieldKind = FieldKind::NestedCollection;
    const FIELDS: &'static [FieldDescriptor] = T::FIELDS;
}

impl<T> ObfuscatedType for [T]
where
    T: ObfuscatedType,
{
    const KIND: FieldKind = FieldKind::NestedCollection;
    const FIELDS: &'static [FieldDescriptor] = T::FIELDS;
}

impl<T, const N: usize> ObfuscatedType for [T; N]
where
    T: ObfuscatedType,
    [T; N]: Serialize,
{
    const KIND: FieldKind = FieldKind::NestedCollection;
    const FIELDS: &'static [FieldDescriptor] = T::FIELDS;
}
