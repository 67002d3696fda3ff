use sigbridge_ast::span::Span;
use thiserror::Error;

/// Errors raised while lowering declarations into the source type model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unknown type `{name}` at {span:?}")]
    UnknownType { name: String, span: Span },

    #[error("duplicate declaration of `{name}`")]
    DuplicateDecl { name: String },

    #[error("`{name}` expects {expected} generic argument(s), found {found} at {span:?}")]
    GenericArity {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("type alias cycle: {}", .chain.join(" -> "))]
    AliasCycle { chain: Vec<String> },

    #[error("alias chain of `{ty}` is deeper than {limit} levels")]
    AliasDepthExceeded { ty: String, limit: usize },
}
