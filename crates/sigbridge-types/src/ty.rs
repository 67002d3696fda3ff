//! Source type representation.

use crate::decl::DeclId;

/// A source type, possibly sugared.
///
/// Sugar comes in two flavours. Type aliases (`Alias`) keep the identity of
/// the alias declaration so a known-type entry registered for the alias wins
/// over its underlying type. Syntax sugar (`Optional`, `ImplicitlyUnwrapped`,
/// `Array`, `Dictionary`) is pure notation for a standard-library generic and
/// must be stripped before a type is classified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Struct, enum or class without generic arguments.
    Nominal(DeclId),
    /// Reference to a `typealias`.
    Alias(DeclId),
    /// Generic nominal applied to arguments: `Array<Int>`.
    BoundGeneric { decl: DeclId, args: Vec<Type> },
    /// Product type; `()` is the empty product.
    Tuple(Vec<Type>),
    /// `(A, B) -> R`
    Function { params: Vec<Type>, result: Box<Type> },
    /// `T?`
    Optional(Box<Type>),
    /// `T!`
    ImplicitlyUnwrapped(Box<Type>),
    /// `[T]`
    Array(Box<Type>),
    /// `[K: V]`
    Dictionary { key: Box<Type>, value: Box<Type> },
}

/// The closed set of shapes the classifier dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape<'a> {
    Alias(DeclId),
    Nominal(DeclId),
    EmptyTuple,
    Tuple(&'a [Type]),
    /// Bound generics and function types.
    Other,
    /// Syntax sugar; never valid at a dispatch point.
    Sugared,
}

impl Type {
    pub fn unit() -> Self {
        Type::Tuple(Vec::new())
    }

    pub fn optional(inner: Type) -> Self {
        Type::Optional(Box::new(inner))
    }

    pub fn implicitly_unwrapped(inner: Type) -> Self {
        Type::ImplicitlyUnwrapped(Box::new(inner))
    }

    pub fn array(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    pub fn function(params: Vec<Type>, result: Type) -> Self {
        Type::Function {
            params,
            result: Box::new(result),
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Type::Tuple(elems) if elems.is_empty())
    }

    /// True for syntax sugar (not aliases).
    pub fn is_syntax_sugar(&self) -> bool {
        matches!(
            self,
            Type::Optional(_)
                | Type::ImplicitlyUnwrapped(_)
                | Type::Array(_)
                | Type::Dictionary { .. }
        )
    }

    pub fn shape(&self) -> TypeShape<'_> {
        match self {
            Type::Alias(id) => TypeShape::Alias(*id),
            Type::Nominal(id) => TypeShape::Nominal(*id),
            Type::Tuple(elems) if elems.is_empty() => TypeShape::EmptyTuple,
            Type::Tuple(elems) => TypeShape::Tuple(elems),
            Type::BoundGeneric { .. } | Type::Function { .. } => TypeShape::Other,
            Type::Optional(_)
            | Type::ImplicitlyUnwrapped(_)
            | Type::Array(_)
            | Type::Dictionary { .. } => TypeShape::Sugared,
        }
    }
}
