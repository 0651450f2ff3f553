//! Type utilities for the derive macro.

/// Returns the identifier of a bare single-segment path type like `u32`.
fn bare_ident(ty: &syn::Type) -> Option<String> {
    let syn::Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() || path.path.leading_colon.is_some() {
        return None;
    }
    if path.path.segments.len() != 1 {
        return None;
    }
    let segment = path.path.segments.first()?;
    if !segment.arguments.is_empty() {
        return None;
    }
    Some(segment.ident.to_string())
}

/// Checks if a type is a recognized scalar primitive.
///
/// Returns `false` for qualified paths, generic types, or type aliases, so
/// anything we cannot identify is left to the trait bounds.
pub(crate) fn is_scalar_type(ty: &syn::Type) -> bool {
    bare_ident(ty).is_some_and(|ident| {
        matches!(
            ident.as_str(),
            "i8" | "i16"
                | "i32"
                | "i64"
                | "i128"
                | "isize"
                | "u8"
                | "u16"
                | "u32"
                | "u64"
                | "u128"
                | "usize"
                | "f32"
                | "f64"
                | "bool"
                | "char"
        )
    })
}

/// Scalars that no category can substitute.
///
/// Integer scalars are accepted because `UserKey` applies to them.
pub(crate) fn is_unobfuscatable_scalar(ty: &syn::Type) -> bool {
    bare_ident(ty).is_some_and(|ident| matches!(ident.as_str(), "f32" | "f64" | "bool" | "char"))
}
