//! Lowering of a parsed module into the source type model.
//!
//! Resolution runs in phases so declarations may refer to each other in any
//! order:
//! 1. nominal declarations (struct / enum / class) are registered,
//! 2. type aliases are resolved depth-first, detecting cycles and chains
//!    longer than [`MAX_DESUGAR_DEPTH`],
//! 3. struct fields are filled in,
//! 4. function signatures are resolved and checked for a finite
//!    canonical form.

use crate::decl::{DeclContext, DeclId, FieldDef};
use crate::desugar::MAX_DESUGAR_DEPTH;
use crate::error::ResolveError;
use crate::func::{FunctionDecl, ParamDecl};
use crate::stdlib::STDLIB_MODULE;
use crate::ty::Type;
use sigbridge_ast::ast::{FuncDecl, Ident, Item, Module, TypeAliasDecl, TypeExpr};
use sigbridge_ast::span::Span;
use std::collections::HashMap;
use tracing::debug;

/// Functions of one source module, in declaration order.
#[derive(Clone, Debug)]
pub struct ResolvedModule {
    pub name: String,
    pub functions: Vec<FunctionDecl>,
}

/// Resolve `module` into `decls` under the module name `module_name`.
pub fn resolve_module(
    decls: &mut DeclContext,
    module_name: &str,
    module: &Module,
) -> Result<ResolvedModule, ResolveError> {
    let mut resolver = Resolver {
        decls,
        module: module_name.to_string(),
        aliases: HashMap::new(),
        resolving: Vec::new(),
    };
    resolver.run(module)
}

struct Resolver<'d, 'm> {
    decls: &'d mut DeclContext,
    module: String,
    /// Aliases declared in this module that are not registered yet.
    aliases: HashMap<String, &'m TypeAliasDecl>,
    /// Alias names currently being resolved, outermost first.
    resolving: Vec<String>,
}

impl<'m> Resolver<'_, 'm> {
    fn run(&mut self, module: &'m Module) -> Result<ResolvedModule, ResolveError> {
        // Phase 1: nominal declarations and pending aliases
        let mut structs = Vec::new();
        for item in &module.items {
            match item {
                Item::Struct(s) => {
                    self.check_not_alias(&s.name.text)?;
                    let id = self.decls.add_struct(&self.module, &s.name.text, Vec::new())?;
                    structs.push((id, s));
                }
                Item::Enum(e) => {
                    self.check_not_alias(&e.name.text)?;
                    let cases = e.cases.iter().map(|c| c.text.clone()).collect();
                    self.decls.add_enum(&self.module, &e.name.text, cases)?;
                }
                Item::Class(c) => {
                    self.check_not_alias(&c.name.text)?;
                    self.decls.add_class(&self.module, &c.name.text)?;
                }
                Item::TypeAlias(a) => {
                    let name = &a.name.text;
                    if self.aliases.contains_key(name)
                        || self.decls.lookup(&self.module, name).is_some()
                    {
                        return Err(ResolveError::DuplicateDecl {
                            name: format!("{}.{}", self.module, name),
                        });
                    }
                    self.aliases.insert(name.clone(), a);
                }
                Item::Func(_) => {}
            }
        }

        // Phase 2: aliases, in source order
        for item in &module.items {
            if let Item::TypeAlias(a) = item {
                self.ensure_alias(&a.name.text, a.name.span)?;
            }
        }

        // Phase 3: struct fields
        for (id, s) in structs {
            let fields = s
                .fields
                .iter()
                .map(|f| {
                    Ok(FieldDef {
                        name: f.name.text.clone(),
                        ty: self.resolve_type(&f.ty)?,
                    })
                })
                .collect::<Result<Vec<_>, ResolveError>>()?;
            self.decls.set_fields(id, fields);
        }

        // Phase 4: functions
        let mut functions = Vec::new();
        for item in &module.items {
            if let Item::Func(f) = item {
                functions.push(self.resolve_func(f)?);
            }
        }

        debug!(
            module = %self.module,
            functions = functions.len(),
            "resolved module"
        );
        Ok(ResolvedModule {
            name: self.module.clone(),
            functions,
        })
    }

    fn resolve_func(&mut self, f: &FuncDecl) -> Result<FunctionDecl, ResolveError> {
        let mut params = Vec::with_capacity(f.params.len());
        for p in &f.params {
            let ty = self.resolve_type(&p.ty)?;
            self.check_finite(&ty)?;
            params.push(ParamDecl {
                label: p.label.as_ref().map(|l| l.text.clone()),
                name: p.name.as_ref().map(|n| n.text.clone()),
                ty,
            });
        }

        let result = match &f.ret_ty {
            Some(t) => self.resolve_type(t)?,
            None => Type::unit(),
        };
        self.check_finite(&result)?;

        Ok(FunctionDecl {
            name: f.name.text.clone(),
            cdecl: f.cdecl_name().map(str::to_string),
            params,
            result,
        })
    }

    fn check_not_alias(&self, name: &str) -> Result<(), ResolveError> {
        if self.aliases.contains_key(name) {
            return Err(ResolveError::DuplicateDecl {
                name: format!("{}.{}", self.module, name),
            });
        }
        Ok(())
    }

    fn check_finite(&self, ty: &Type) -> Result<(), ResolveError> {
        self.decls.desugared(ty).map(|_| ())
    }

    fn ensure_alias(&mut self, name: &str, span: Span) -> Result<DeclId, ResolveError> {
        if let Some(id) = self.decls.lookup(&self.module, name) {
            return Ok(id);
        }
        if let Some(pos) = self.resolving.iter().position(|n| n == name) {
            let mut chain = self.resolving[pos..].to_vec();
            chain.push(name.to_string());
            return Err(ResolveError::AliasCycle { chain });
        }
        let Some(decl) = self.aliases.get(name).copied() else {
            return Err(ResolveError::UnknownType {
                name: name.to_string(),
                span,
            });
        };
        if self.resolving.len() >= MAX_DESUGAR_DEPTH {
            return Err(ResolveError::AliasDepthExceeded {
                ty: self.resolving[0].clone(),
                limit: MAX_DESUGAR_DEPTH,
            });
        }

        self.resolving.push(name.to_string());
        let underlying = self.resolve_type(&decl.target);
        self.resolving.pop();

        self.decls.add_alias(&self.module, name, underlying?)
    }

    fn resolve_type(&mut self, expr: &TypeExpr) -> Result<Type, ResolveError> {
        match expr {
            TypeExpr::Path {
                segments,
                generic_args,
                span,
            } => {
                let id = self.lookup_path(segments, *span)?;
                let decl = self.decls.get(id);
                let expected = decl.generic_params.len();
                if expected != generic_args.len() {
                    return Err(ResolveError::GenericArity {
                        name: decl.name.clone(),
                        expected,
                        found: generic_args.len(),
                        span: *span,
                    });
                }
                if decl.is_alias() {
                    return Ok(Type::Alias(id));
                }
                if generic_args.is_empty() {
                    return Ok(Type::Nominal(id));
                }
                let args = generic_args
                    .iter()
                    .map(|a| self.resolve_type(a))
                    .collect::<Result<_, _>>()?;
                Ok(Type::BoundGeneric { decl: id, args })
            }
            TypeExpr::Tuple(elems, _) => Ok(Type::Tuple(
                elems
                    .iter()
                    .map(|e| self.resolve_type(e))
                    .collect::<Result<_, _>>()?,
            )),
            TypeExpr::Function { params, ret, .. } => {
                let params = params
                    .iter()
                    .map(|p| self.resolve_type(p))
                    .collect::<Result<_, _>>()?;
                Ok(Type::function(params, self.resolve_type(ret)?))
            }
            TypeExpr::Optional(inner, _) => Ok(Type::optional(self.resolve_type(inner)?)),
            TypeExpr::ImplicitlyUnwrapped(inner, _) => {
                Ok(Type::implicitly_unwrapped(self.resolve_type(inner)?))
            }
            TypeExpr::Array(elem, _) => Ok(Type::array(self.resolve_type(elem)?)),
            TypeExpr::Dictionary { key, value, .. } => Ok(Type::Dictionary {
                key: Box::new(self.resolve_type(key)?),
                value: Box::new(self.resolve_type(value)?),
            }),
        }
    }

    /// `Name` searches this module, then the standard library.
    /// `Module.Name` searches only the named module.
    fn lookup_path(&mut self, segments: &[Ident], span: Span) -> Result<DeclId, ResolveError> {
        let unknown = || ResolveError::UnknownType {
            name: segments
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join("."),
            span,
        };
        match segments {
            [name] => {
                if let Some(id) = self.lookup_local(&name.text, span)? {
                    return Ok(id);
                }
                self.decls
                    .lookup(STDLIB_MODULE, &name.text)
                    .ok_or_else(unknown)
            }
            [module, name] if module.text == self.module => {
                self.lookup_local(&name.text, span)?.ok_or_else(unknown)
            }
            [module, name] => self
                .decls
                .lookup(&module.text, &name.text)
                .ok_or_else(unknown),
            _ => Err(unknown()),
        }
    }

    fn lookup_local(&mut self, name: &str, span: Span) -> Result<Option<DeclId>, ResolveError> {
        if let Some(id) = self.decls.lookup(&self.module, name) {
            return Ok(Some(id));
        }
        if self.aliases.contains_key(name) {
            return self.ensure_alias(name, span).map(Some);
        }
        Ok(None)
    }
}
