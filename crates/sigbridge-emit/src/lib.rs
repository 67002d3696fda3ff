#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![forbid(unsafe_code)]

mod classify;
mod dialect;
pub mod known_types;
mod signature;
mod syntax;

pub use classify::{classify, Spelling, TypeClassifier};
pub use dialect::Dialect;
pub use known_types::{KnownTypeInfo, KnownTypeTable, KnownTypeTableBuilder, TableError};
pub use signature::{Signature, SignatureEmitter, SignatureParam};
pub use syntax::{ClangSyntaxPrinter, SyntaxPrinter};
