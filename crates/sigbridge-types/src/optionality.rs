//! Optionality of a declared type.

use crate::decl::DeclContext;
use crate::desugar::MAX_DESUGAR_DEPTH;
use crate::ty::Type;

/// Nullability attached to a declaration site, separate from the type itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Optionality {
    /// Not an optional.
    #[default]
    Absent,
    /// `T!`
    ImplicitlyUnwrapped,
    /// `T?` / `Optional<T>`
    Nullable,
}

/// Split a declared type into its object type and optionality, removing one
/// layer of optional wrapping.
///
/// The optional may be written as sugar, spelled out as `Optional<T>`, or be
/// hidden behind aliases. The returned object type never has syntax sugar at
/// the top, but aliases are preserved when the type was not optional so that
/// alias-specific spellings still apply.
pub fn object_type_and_optionality(decls: &DeclContext, declared: &Type) -> (Type, Optionality) {
    let mut current = declared.clone();
    for _ in 0..=MAX_DESUGAR_DEPTH {
        let next = match &current {
            Type::Optional(inner) => return (decls.strip_sugar(inner), Optionality::Nullable),
            Type::ImplicitlyUnwrapped(inner) => {
                return (decls.strip_sugar(inner), Optionality::ImplicitlyUnwrapped)
            }
            Type::BoundGeneric { decl, args }
                if *decl == decls.optional_decl() && args.len() == 1 =>
            {
                return (decls.strip_sugar(&args[0]), Optionality::Nullable)
            }
            Type::Alias(_) => decls.singly_desugared(&current),
            _ => None,
        };
        match next {
            Some(next) => current = next,
            None => break,
        }
    }
    (decls.strip_sugar(declared), Optionality::Absent)
}
