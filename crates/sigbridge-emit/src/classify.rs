//! Mapping of source types onto the target vocabulary.
//!
//! Every type the classifier is handed ends in exactly one of two places:
//! a spelling taken from the known-type table (or the dialect's `void`), or a
//! `/* ... */` placeholder naming the type that could not be translated.
//! Nothing is dropped silently.
//!
//! Lookup order:
//! 1. nominal types and aliases with a table entry print that entry,
//! 2. aliases without one are looked through, one layer at a time,
//! 3. `()` prints as `void`,
//! 4. anything else becomes a placeholder.

use crate::dialect::Dialect;
use crate::known_types::KnownTypeTable;
use crate::syntax::{ClangSyntaxPrinter, SyntaxPrinter};
use serde::Serialize;
use sigbridge_types::{DeclContext, DeclId, Optionality, Type, TypeShape, MAX_DESUGAR_DEPTH};
use std::fmt;
use tracing::{debug, trace};

/// Target text for one type occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Spelling {
    pub text: String,
    /// False when `text` is a placeholder.
    pub supported: bool,
}

impl Spelling {
    fn known(text: String) -> Self {
        Self {
            text,
            supported: true,
        }
    }

    fn placeholder(description: impl fmt::Display) -> Self {
        Self {
            text: format!("/* {description} */"),
            supported: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_placeholder(&self) -> bool {
        !self.supported
    }
}

impl fmt::Display for Spelling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub struct TypeClassifier<'a> {
    decls: &'a DeclContext,
    table: &'a KnownTypeTable,
    syntax: &'a dyn SyntaxPrinter,
    dialect: Dialect,
}

impl<'a> TypeClassifier<'a> {
    pub fn new(
        decls: &'a DeclContext,
        table: &'a KnownTypeTable,
        syntax: &'a dyn SyntaxPrinter,
        dialect: Dialect,
    ) -> Self {
        Self {
            decls,
            table,
            syntax,
            dialect,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Spell `ty`, an object type with no syntax sugar at the top.
    ///
    /// # Panics
    ///
    /// If `ty` (or an alias target reached from it) is syntax sugar, or if
    /// more than [`MAX_DESUGAR_DEPTH`] aliases have to be looked through.
    /// Both mean the caller broke the contract of this function.
    pub fn classify(&self, ty: &Type, optionality: Optionality) -> Spelling {
        let mut current = ty.clone();
        let mut hops = 0usize;
        loop {
            let next = match current.shape() {
                TypeShape::Alias(id) => {
                    if let Some(spelling) = self.known(id, optionality) {
                        return spelling;
                    }
                    hops += 1;
                    if hops > MAX_DESUGAR_DEPTH {
                        panic!(
                            "internal error: more than {MAX_DESUGAR_DEPTH} aliases behind `{}`",
                            self.decls.display(ty)
                        );
                    }
                    trace!(alias = %self.decls.identity(id), hops, "looking through alias");
                    match self.decls.singly_desugared(&current) {
                        Some(next) => next,
                        None => panic!(
                            "internal error: `{}` is not a type alias",
                            self.decls.identity(id)
                        ),
                    }
                }
                TypeShape::Nominal(id) => {
                    return self
                        .known(id, optionality)
                        .unwrap_or_else(|| self.unsupported(ty));
                }
                TypeShape::EmptyTuple => {
                    return Spelling::known(self.dialect.no_value_spelling().to_string())
                }
                TypeShape::Tuple(_) | TypeShape::Other => return self.unsupported(ty),
                TypeShape::Sugared => panic!(
                    "internal error: syntax sugar `{}` reached the type classifier",
                    self.decls.display(&current)
                ),
            };
            current = next;
        }
    }

    fn known(&self, id: DeclId, optionality: Optionality) -> Option<Spelling> {
        let identity = self.decls.identity(id);
        let info = self.table.lookup(&identity, self.dialect);
        trace!(%identity, dialect = %self.dialect, hit = info.is_some(), "known-type lookup");
        let info = info?;
        let mut text = info.spelling.clone();
        if info.accepts_nullability_suffix {
            self.syntax
                .print_nullability_suffix(&mut text, optionality, self.dialect);
        }
        Some(Spelling::known(text))
    }

    fn unsupported(&self, ty: &Type) -> Spelling {
        let description = self.decls.display(ty);
        debug!(ty = %description, dialect = %self.dialect, "no translation, emitting placeholder");
        Spelling::placeholder(description)
    }
}

/// Classify one type with the default syntax printer.
pub fn classify(
    decls: &DeclContext,
    table: &KnownTypeTable,
    ty: &Type,
    optionality: Optionality,
    dialect: Dialect,
) -> Spelling {
    TypeClassifier::new(decls, table, &ClangSyntaxPrinter, dialect).classify(ty, optionality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known_types::KnownTypeInfo;

    fn table() -> KnownTypeTable {
        let mut builder = KnownTypeTable::builder().with_builtins();
        builder
            .insert("App.Meters", Dialect::C, KnownTypeInfo::new("meters_t", false))
            .unwrap();
        builder.build()
    }

    #[test]
    fn known_nominal() {
        let decls = DeclContext::new();
        let table = table();
        let int = decls.std_type("Int").unwrap();
        let c = classify(&decls, &table, &int, Optionality::Absent, Dialect::C);
        assert_eq!(c.as_str(), "ptrdiff_t");
        assert!(!c.is_placeholder());
        let cxx = classify(&decls, &table, &int, Optionality::Nullable, Dialect::Cxx);
        assert_eq!(cxx.as_str(), "swift::Int");
    }

    #[test]
    fn suffix_only_when_entry_accepts_it() {
        let decls = DeclContext::new();
        let table = table();
        let raw = decls.std_type("UnsafeRawPointer").unwrap();
        let spell = |o| classify(&decls, &table, &raw, o, Dialect::C).text;
        assert_eq!(spell(Optionality::Absent), "const void *");
        assert_eq!(spell(Optionality::Nullable), "const void * _Nullable");
        assert_eq!(
            spell(Optionality::ImplicitlyUnwrapped),
            "const void * _Null_unspecified"
        );
    }

    #[test]
    fn alias_entry_wins_over_underlying() {
        let mut decls = DeclContext::new();
        let double = decls.std_type("Double").unwrap();
        let meters = decls.add_alias("App", "Meters", double).unwrap();
        let table = table();
        let ty = Type::Alias(meters);
        assert_eq!(
            classify(&decls, &table, &ty, Optionality::Absent, Dialect::C).text,
            "meters_t"
        );
        // No C++ entry: look through to Double.
        assert_eq!(
            classify(&decls, &table, &ty, Optionality::Absent, Dialect::Cxx).text,
            "double"
        );
    }

    #[test]
    fn empty_tuple_is_void_regardless_of_optionality() {
        let decls = DeclContext::new();
        let table = table();
        for o in [Optionality::Absent, Optionality::Nullable] {
            assert_eq!(classify(&decls, &table, &Type::unit(), o, Dialect::C).text, "void");
        }
        let void = decls.std_type("Void").unwrap();
        assert_eq!(
            classify(&decls, &table, &void, Optionality::Absent, Dialect::Cxx).text,
            "void"
        );
    }

    #[test]
    fn fallbacks_are_placeholders() {
        let mut decls = DeclContext::new();
        let table = table();
        let int = decls.std_type("Int").unwrap();
        let string = decls.std_type("String").unwrap();
        let shape = decls.add_struct("App", "Shape", Vec::new()).unwrap();
        let cases = [
            (Type::Nominal(shape), "/* Shape */"),
            (string.clone(), "/* String */"),
            (Type::Tuple(vec![int.clone(), string]), "/* (Int, String) */"),
            (Type::function(vec![int.clone()], Type::unit()), "/* (Int) -> () */"),
            (decls.strip_sugar(&Type::array(int)), "/* Array<Int> */"),
        ];
        for (ty, expected) in cases {
            let s = classify(&decls, &table, &ty, Optionality::Absent, Dialect::C);
            assert_eq!(s.text, expected);
            assert!(s.is_placeholder());
        }
    }

    #[test]
    fn placeholder_names_the_type_as_written() {
        let mut decls = DeclContext::new();
        let shape = decls.add_struct("App", "Shape", Vec::new()).unwrap();
        let alias = decls.add_alias("App", "Figure", Type::Nominal(shape)).unwrap();
        let s = classify(
            &decls,
            &table(),
            &Type::Alias(alias),
            Optionality::Absent,
            Dialect::C,
        );
        assert_eq!(s.text, "/* Figure */");
    }

    #[test]
    fn sugar_behind_alias_is_stripped() {
        let mut decls = DeclContext::new();
        let int = decls.std_type("Int").unwrap();
        let alias = decls.add_alias("App", "Ints", Type::array(int)).unwrap();
        let s = classify(
            &decls,
            &table(),
            &Type::Alias(alias),
            Optionality::Absent,
            Dialect::C,
        );
        assert_eq!(s.text, "/* Ints */");
    }

    #[test]
    #[should_panic(expected = "internal error")]
    fn sugar_at_top_level_panics() {
        let decls = DeclContext::new();
        let int = decls.std_type("Int").unwrap();
        classify(
            &decls,
            &table(),
            &Type::optional(int),
            Optionality::Absent,
            Dialect::C,
        );
    }

    #[test]
    #[should_panic(expected = "internal error")]
    fn alias_chain_past_bound_panics() {
        let mut decls = DeclContext::new();
        let mut ty = decls.add_struct("App", "Leaf", Vec::new()).map(Type::Nominal).unwrap();
        for i in 0..=MAX_DESUGAR_DEPTH {
            ty = Type::Alias(decls.add_alias("App", &format!("A{i}"), ty).unwrap());
        }
        classify(&decls, &table(), &ty, Optionality::Absent, Dialect::C);
    }
}
