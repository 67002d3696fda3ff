//! Type declarations and the arena that owns them.
//!
//! Every nominal type and alias lives in a [`DeclContext`] and is referred to
//! by [`DeclId`]. A context always starts out with the standard library
//! module registered (see `stdlib.rs`), so sugar such as `T?` has a generic to
//! desugar to.

use crate::error::ResolveError;
use crate::stdlib::{self, StdDecls};
use crate::ty::Type;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub(crate) u32);

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Field of a struct declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Struct { fields: Vec<FieldDef> },
    Enum { cases: Vec<String> },
    Class,
    Alias { underlying: Type },
}

#[derive(Clone, Debug)]
pub struct TypeDecl {
    pub module: String,
    pub name: String,
    /// Generic parameter names (e.g. `["Wrapped"]` for `Optional`).
    pub generic_params: Vec<String>,
    pub kind: DeclKind,
}

impl TypeDecl {
    /// Nominal identity used as the known-type table key: `Module.Name`.
    pub fn identity(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.kind, DeclKind::Alias { .. })
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_params.is_empty()
    }
}

/// Arena of type declarations, keyed by `(module, name)`.
#[derive(Clone, Debug)]
pub struct DeclContext {
    decls: Vec<TypeDecl>,
    by_name: HashMap<(String, String), DeclId>,
    std: StdDecls,
}

impl Default for DeclContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclContext {
    /// A context holding only the standard library.
    pub fn new() -> Self {
        let mut ctx = Self {
            decls: Vec::new(),
            by_name: HashMap::new(),
            std: StdDecls::placeholder(),
        };
        ctx.std = stdlib::register(&mut ctx);
        ctx
    }

    /// Register a declaration; `(module, name)` must be unused.
    pub fn declare(&mut self, decl: TypeDecl) -> Result<DeclId, ResolveError> {
        let key = (decl.module.clone(), decl.name.clone());
        if self.by_name.contains_key(&key) {
            return Err(ResolveError::DuplicateDecl {
                name: decl.identity(),
            });
        }
        Ok(self.push(decl))
    }

    pub(crate) fn push(&mut self, decl: TypeDecl) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.by_name
            .insert((decl.module.clone(), decl.name.clone()), id);
        self.decls.push(decl);
        id
    }

    pub fn add_struct(
        &mut self,
        module: &str,
        name: &str,
        fields: Vec<FieldDef>,
    ) -> Result<DeclId, ResolveError> {
        self.declare(TypeDecl {
            module: module.to_string(),
            name: name.to_string(),
            generic_params: Vec::new(),
            kind: DeclKind::Struct { fields },
        })
    }

    pub fn add_enum(
        &mut self,
        module: &str,
        name: &str,
        cases: Vec<String>,
    ) -> Result<DeclId, ResolveError> {
        self.declare(TypeDecl {
            module: module.to_string(),
            name: name.to_string(),
            generic_params: Vec::new(),
            kind: DeclKind::Enum { cases },
        })
    }

    pub fn add_class(&mut self, module: &str, name: &str) -> Result<DeclId, ResolveError> {
        self.declare(TypeDecl {
            module: module.to_string(),
            name: name.to_string(),
            generic_params: Vec::new(),
            kind: DeclKind::Class,
        })
    }

    /// Aliases can only point at types that already exist, so the alias
    /// graph built through this API is acyclic.
    pub fn add_alias(
        &mut self,
        module: &str,
        name: &str,
        underlying: Type,
    ) -> Result<DeclId, ResolveError> {
        self.declare(TypeDecl {
            module: module.to_string(),
            name: name.to_string(),
            generic_params: Vec::new(),
            kind: DeclKind::Alias { underlying },
        })
    }

    pub(crate) fn set_fields(&mut self, id: DeclId, new_fields: Vec<FieldDef>) {
        if let DeclKind::Struct { fields } = &mut self.decls[id.index()].kind {
            *fields = new_fields;
        }
    }

    pub fn get(&self, id: DeclId) -> &TypeDecl {
        &self.decls[id.index()]
    }

    pub fn lookup(&self, module: &str, name: &str) -> Option<DeclId> {
        self.by_name
            .get(&(module.to_string(), name.to_string()))
            .copied()
    }

    pub fn identity(&self, id: DeclId) -> String {
        self.get(id).identity()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &TypeDecl)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(i, d)| (DeclId(i as u32), d))
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn optional_decl(&self) -> DeclId {
        self.std.optional
    }

    pub fn array_decl(&self) -> DeclId {
        self.std.array
    }

    pub fn dictionary_decl(&self) -> DeclId {
        self.std.dictionary
    }

    /// `Swift.<name>` as a type, if it exists and is not generic.
    pub fn std_type(&self, name: &str) -> Option<Type> {
        let id = self.lookup(stdlib::STDLIB_MODULE, name)?;
        let decl = self.get(id);
        if decl.is_generic() {
            return None;
        }
        Some(if decl.is_alias() {
            Type::Alias(id)
        } else {
            Type::Nominal(id)
        })
    }
}
