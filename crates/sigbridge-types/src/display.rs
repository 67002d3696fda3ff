use crate::decl::DeclContext;
use crate::ty::Type;
use std::fmt;

/// Human-readable rendering of a type, written the way it is spelled in
/// source (sugar and aliases preserved).
pub struct TypeDisplay<'a> {
    decls: &'a DeclContext,
    ty: &'a Type,
}

impl DeclContext {
    pub fn display<'a>(&'a self, ty: &'a Type) -> TypeDisplay<'a> {
        TypeDisplay { decls: self, ty }
    }
}

impl TypeDisplay<'_> {
    fn child<'b>(&'b self, ty: &'b Type) -> TypeDisplay<'b> {
        TypeDisplay {
            decls: self.decls,
            ty,
        }
    }

    fn list(&self, f: &mut fmt::Formatter<'_>, tys: &[Type]) -> fmt::Result {
        for (i, ty) in tys.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.child(ty))?;
        }
        Ok(())
    }

    /// Postfix sugar binds tighter than `->`.
    fn postfix_operand(&self, f: &mut fmt::Formatter<'_>, inner: &Type) -> fmt::Result {
        if matches!(inner, Type::Function { .. }) {
            write!(f, "({})", self.child(inner))
        } else {
            write!(f, "{}", self.child(inner))
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Nominal(id) | Type::Alias(id) => f.write_str(&self.decls.get(*id).name),
            Type::BoundGeneric { decl, args } => {
                write!(f, "{}<", self.decls.get(*decl).name)?;
                self.list(f, args)?;
                f.write_str(">")
            }
            Type::Tuple(elems) => {
                f.write_str("(")?;
                self.list(f, elems)?;
                f.write_str(")")
            }
            Type::Function { params, result } => {
                f.write_str("(")?;
                self.list(f, params)?;
                write!(f, ") -> {}", self.child(result))
            }
            Type::Optional(inner) => {
                self.postfix_operand(f, inner)?;
                f.write_str("?")
            }
            Type::ImplicitlyUnwrapped(inner) => {
                self.postfix_operand(f, inner)?;
                f.write_str("!")
            }
            Type::Array(elem) => write!(f, "[{}]", self.child(elem)),
            Type::Dictionary { key, value } => {
                write!(f, "[{}: {}]", self.child(key), self.child(value))
            }
        }
    }
}
