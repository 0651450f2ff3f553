//! Generic type parameter handling and trait bound management.
//!
//! Bounds are added as where-predicates on field types, and only for fields
//! whose type mentions a type parameter of the record.
//!
//! ## PhantomData Handling
//!
//! `PhantomData<T>` is skipped when collecting generics:
//!
//! ```ignore
//! struct Tagged<T> {
//!     id: String,
//!     _marker: PhantomData<T>,  // T needs no bound
//! }
//! ```

use syn::{parse_quote, Generics, Ident, WherePredicate};

pub(crate) fn collect_generics_from_type(ty: &syn::Type, generics: &Generics, result: &mut Vec<Ident>) {
    match ty {
        syn::Type::Path(path) => {
            if let Some(qself) = &path.qself {
                collect_generics_from_type(&qself.ty, generics, result);
            }
            let Some(segment) = path.path.segments.last() else {
                return;
            };
            if segment.ident == "PhantomData" {
                return;
            }
            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                for arg in &args.args {
                    if let syn::GenericArgument::Type(inner_ty) = arg {
                        collect_generics_from_type(inner_ty, generics, result);
                    }
                }
            }
            // `T::Assoc` mentions `T` in its first segment.
            let Some(first) = path.path.segments.first() else {
                return;
            };
            for param in generics.type_params() {
                let mentioned = segment.ident == param.ident
                    || (path.path.leading_colon.is_none() && first.ident == param.ident);
                if mentioned && !result.iter().any(|g| g == &param.ident) {
                    result.push(param.ident.clone());
                }
            }
        }
        syn::Type::Reference(reference) => {
            collect_generics_from_type(&reference.elem, generics, result);
        }
        syn::Type::Slice(slice) => collect_generics_from_type(&slice.elem, generics, result),
        syn::Type::Array(array) => collect_generics_from_type(&array.elem, generics, result),
        syn::Type::Paren(paren) => collect_generics_from_type(&paren.elem, generics, result),
        syn::Type::Group(group) => collect_generics_from_type(&group.elem, generics, result),
        syn::Type::Tuple(tuple) => {
            for elem in &tuple.elems {
                collect_generics_from_type(elem, generics, result);
            }
        }
        _ => {}
    }
}

/// Checks whether `ty` mentions any type parameter of `generics`.
pub(crate) fn mentions_generics(ty: &syn::Type, generics: &Generics) -> bool {
    let mut found = Vec::new();
    collect_generics_from_type(ty, generics, &mut found);
    !found.is_empty()
}

/// Returns `generics` extended with `predicates` in its where clause.
pub(crate) fn with_predicates(mut generics: Generics, predicates: &[WherePredicate]) -> Generics {
    if predicates.is_empty() {
        return generics;
    }
    let where_clause = generics.make_where_clause();
    for predicate in predicates {
        where_clause.predicates.push(predicate.clone());
    }
    generics
}

/// Builds `ty: bound` for a field type.
pub(crate) fn bound_on(ty: &syn::Type, bound: &proc_macro2::TokenStream) -> WherePredicate {
    parse_quote!(#ty: #bound)
}
