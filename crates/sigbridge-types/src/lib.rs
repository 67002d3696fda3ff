#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![forbid(unsafe_code)]

mod decl;
mod desugar;
mod display;
mod error;
mod func;
mod optionality;
pub mod resolve;
mod stdlib;
mod ty;

pub use decl::{DeclContext, DeclId, DeclKind, FieldDef, TypeDecl};
pub use desugar::MAX_DESUGAR_DEPTH;
pub use display::TypeDisplay;
pub use error::ResolveError;
pub use func::{FunctionDecl, ParamDecl};
pub use optionality::{object_type_and_optionality, Optionality};
pub use resolve::{resolve_module, ResolvedModule};
pub use stdlib::STDLIB_MODULE;
pub use ty::{Type, TypeShape};
