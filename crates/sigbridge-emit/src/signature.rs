//! Function signature printing.

use crate::classify::{Spelling, TypeClassifier};
use crate::dialect::Dialect;
use crate::known_types::KnownTypeTable;
use crate::syntax::{ClangSyntaxPrinter, SyntaxPrinter};
use serde::Serialize;
use sigbridge_types::{object_type_and_optionality, DeclContext, FunctionDecl, Type};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignatureParam {
    pub spelling: Spelling,
    /// Already escaped for the dialect. `None` prints the bare type.
    pub name: Option<String>,
}

/// A forward declaration in one dialect, without the trailing `;`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub dialect: Dialect,
    pub return_spelling: Spelling,
    pub name: String,
    pub params: Vec<SignatureParam>,
}

impl Signature {
    /// True when no placeholder was needed anywhere in the signature.
    pub fn is_complete(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// Placeholder spellings, return type first.
    pub fn placeholders(&self) -> impl Iterator<Item = &Spelling> {
        std::iter::once(&self.return_spelling)
            .chain(self.params.iter().map(|p| &p.spelling))
            .filter(|s| s.is_placeholder())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_spelling, self.name)?;
        if self.params.is_empty() {
            f.write_str(self.dialect.empty_parameter_list())?;
        }
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param.spelling)?;
            if let Some(name) = &param.name {
                write!(f, " {name}")?;
            }
        }
        f.write_str(")")
    }
}

/// Prints function declarations against one declaration context and
/// known-type table.
pub struct SignatureEmitter<'a> {
    decls: &'a DeclContext,
    table: &'a KnownTypeTable,
    syntax: &'a dyn SyntaxPrinter,
}

impl<'a> SignatureEmitter<'a> {
    pub fn new(decls: &'a DeclContext, table: &'a KnownTypeTable) -> Self {
        Self {
            decls,
            table,
            syntax: &ClangSyntaxPrinter,
        }
    }

    pub fn with_syntax_printer(mut self, syntax: &'a dyn SyntaxPrinter) -> Self {
        self.syntax = syntax;
        self
    }

    /// Build the signature of `func` exported as `name` with result type
    /// `result`.
    ///
    /// Unsupported types turn into placeholders; this never fails.
    pub fn signature(
        &self,
        func: &FunctionDecl,
        name: &str,
        result: &Type,
        dialect: Dialect,
    ) -> Signature {
        let classifier = TypeClassifier::new(self.decls, self.table, self.syntax, dialect);

        let (object, optionality) = object_type_and_optionality(self.decls, result);
        let return_spelling = classifier.classify(&object, optionality);

        let mut names: Vec<Option<String>> = func
            .params
            .iter()
            .map(|param| {
                param.name.as_ref().map(|declared| {
                    let mut escaped = String::with_capacity(declared.len() + 1);
                    self.syntax.print_identifier(&mut escaped, declared, dialect);
                    escaped
                })
            })
            .collect();
        // C++ overloads need every parameter named.
        if dialect == Dialect::Cxx {
            let mut taken: HashSet<String> = names.iter().flatten().cloned().collect();
            for (index, slot) in names.iter_mut().enumerate() {
                if slot.is_some() {
                    continue;
                }
                let mut generated = format!("_{}", index + 1);
                if taken.contains(&generated) {
                    while taken.contains(&generated) {
                        generated.push('_');
                    }
                    debug!(function = %func.name, param = index + 1, name = %generated, "positional name taken by a declared parameter");
                }
                taken.insert(generated.clone());
                *slot = Some(generated);
            }
        }

        let params = func
            .params
            .iter()
            .zip(names)
            .map(|(param, name)| {
                let (object, optionality) = object_type_and_optionality(self.decls, &param.ty);
                let spelling = classifier.classify(&object, optionality);
                SignatureParam { spelling, name }
            })
            .collect();

        Signature {
            dialect,
            return_spelling,
            name: name.to_string(),
            params,
        }
    }

    /// Write the signature to `out`. Only `out` is touched; it is neither
    /// flushed nor terminated.
    pub fn emit<W: fmt::Write + ?Sized>(
        &self,
        out: &mut W,
        func: &FunctionDecl,
        name: &str,
        result: &Type,
        dialect: Dialect,
    ) -> fmt::Result {
        write!(out, "{}", self.signature(func, name, result, dialect))
    }

    /// [`emit`](Self::emit) using the declaration's own exported name and
    /// result type.
    pub fn emit_decl<W: fmt::Write + ?Sized>(
        &self,
        out: &mut W,
        func: &FunctionDecl,
        dialect: Dialect,
    ) -> fmt::Result {
        self.emit(out, func, func.external_name(), &func.result, dialect)
    }
}
