use crate::ty::Type;

/// A resolved function declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    /// Name given with `@cdecl`, used as the exported symbol.
    pub cdecl: Option<String>,
    pub params: Vec<ParamDecl>,
    /// Declared result type; `()` when none was written.
    pub result: Type,
}

impl FunctionDecl {
    /// The symbol name the declaration is exported under.
    pub fn external_name(&self) -> &str {
        self.cdecl.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDecl {
    /// Argument label; `None` for `_`.
    pub label: Option<String>,
    /// The parameter's own name; `None` when written as `_`.
    pub name: Option<String>,
    pub ty: Type,
}
