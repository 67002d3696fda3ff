//! Desugaring: syntax sugar to standard generics, aliases to their targets.

use crate::decl::{DeclContext, DeclKind};
use crate::error::ResolveError;
use crate::ty::Type;

/// Upper bound on alias hops followed while desugaring one type.
pub const MAX_DESUGAR_DEPTH: usize = 64;

impl DeclContext {
    /// Rewrite syntax sugar at the top of `ty` into the generic it abbreviates.
    ///
    /// Aliases are left in place: they are looked up by the classifier before
    /// being looked through.
    pub fn strip_sugar(&self, ty: &Type) -> Type {
        match ty {
            Type::Optional(inner) | Type::ImplicitlyUnwrapped(inner) => Type::BoundGeneric {
                decl: self.optional_decl(),
                args: vec![(**inner).clone()],
            },
            Type::Array(elem) => Type::BoundGeneric {
                decl: self.array_decl(),
                args: vec![(**elem).clone()],
            },
            Type::Dictionary { key, value } => Type::BoundGeneric {
                decl: self.dictionary_decl(),
                args: vec![(**key).clone(), (**value).clone()],
            },
            other => other.clone(),
        }
    }

    /// Remove one alias layer. The result has no syntax sugar at the top but
    /// may itself be another alias. `None` if `ty` is not an alias.
    pub fn singly_desugared(&self, ty: &Type) -> Option<Type> {
        let Type::Alias(id) = ty else {
            return None;
        };
        match &self.get(*id).kind {
            DeclKind::Alias { underlying } => Some(self.strip_sugar(underlying)),
            _ => None,
        }
    }

    /// The canonical form of `ty`: no aliases and no syntax sugar anywhere.
    pub fn desugared(&self, ty: &Type) -> Result<Type, ResolveError> {
        self.desugar_with_hops(ty, ty, 0)
    }

    fn desugar_with_hops(
        &self,
        root: &Type,
        ty: &Type,
        hops: usize,
    ) -> Result<Type, ResolveError> {
        if hops > MAX_DESUGAR_DEPTH {
            return Err(ResolveError::AliasDepthExceeded {
                ty: self.display(root).to_string(),
                limit: MAX_DESUGAR_DEPTH,
            });
        }
        match ty {
            Type::Alias(_) => match self.singly_desugared(ty) {
                Some(next) => self.desugar_with_hops(root, &next, hops + 1),
                None => Ok(ty.clone()),
            },
            Type::Optional(_)
            | Type::ImplicitlyUnwrapped(_)
            | Type::Array(_)
            | Type::Dictionary { .. } => self.desugar_with_hops(root, &self.strip_sugar(ty), hops),
            Type::Nominal(_) => Ok(ty.clone()),
            Type::BoundGeneric { decl, args } => Ok(Type::BoundGeneric {
                decl: *decl,
                args: args
                    .iter()
                    .map(|a| self.desugar_with_hops(root, a, hops))
                    .collect::<Result<_, _>>()?,
            }),
            Type::Tuple(elems) => Ok(Type::Tuple(
                elems
                    .iter()
                    .map(|e| self.desugar_with_hops(root, e, hops))
                    .collect::<Result<_, _>>()?,
            )),
            Type::Function { params, result } => Ok(Type::Function {
                params: params
                    .iter()
                    .map(|p| self.desugar_with_hops(root, p, hops))
                    .collect::<Result<_, _>>()?,
                result: Box::new(self.desugar_with_hops(root, result, hops)?),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_sugar_becomes_optional_generic() {
        let ctx = DeclContext::new();
        let int = ctx.std_type("Int").unwrap();
        let stripped = ctx.strip_sugar(&Type::optional(int.clone()));
        assert_eq!(
            stripped,
            Type::BoundGeneric {
                decl: ctx.optional_decl(),
                args: vec![int]
            }
        );
    }

    #[test]
    fn strip_sugar_keeps_aliases() {
        let ctx = DeclContext::new();
        let clong = ctx.std_type("CLong").unwrap();
        assert_eq!(ctx.strip_sugar(&clong), clong);
    }

    #[test]
    fn singly_desugared_removes_one_layer() {
        let mut ctx = DeclContext::new();
        let clong = ctx.std_type("CLong").unwrap();
        let outer = ctx.add_alias("App", "Size", clong.clone()).unwrap();
        assert_eq!(ctx.singly_desugared(&Type::Alias(outer)), Some(clong));
        assert_eq!(ctx.singly_desugared(&Type::unit()), None);
    }

    #[test]
    fn desugared_is_canonical_throughout() {
        let mut ctx = DeclContext::new();
        let void = ctx.std_type("Void").unwrap();
        let alias = ctx.add_alias("App", "Callback", Type::function(vec![], void)).unwrap();
        let ty = Type::array(Type::Alias(alias));
        let canon = ctx.desugared(&ty).unwrap();
        assert_eq!(
            canon,
            Type::BoundGeneric {
                decl: ctx.array_decl(),
                args: vec![Type::function(vec![], Type::unit())],
            }
        );
    }

    #[test]
    fn deep_alias_chain_is_detected() {
        let mut ctx = DeclContext::new();
        let mut ty = ctx.std_type("Int").unwrap();
        for i in 0..=MAX_DESUGAR_DEPTH {
            let id = ctx.add_alias("App", &format!("A{i}"), ty).unwrap();
            ty = Type::Alias(id);
        }
        let err = ctx.desugared(&ty).unwrap_err();
        assert!(matches!(err, ResolveError::AliasDepthExceeded { .. }));
    }
}
