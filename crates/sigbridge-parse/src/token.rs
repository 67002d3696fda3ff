use sigbridge_ast::span::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum TokKind {
    // trivia / eof / error
    Eof,
    /// Unrecognized input
    Error(String),
    // punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Lt,
    Gt,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Eq,
    Arrow, // -> for function return types
    Question,
    Bang,
    At,
    Underscore,
    // idents / keywords
    Ident(String),
    KwFunc,
    KwTypealias,
    KwStruct,
    KwEnum,
    KwClass,
    KwCase,
    KwVar,
    KwLet,
    // literals
    Str(String),
}

#[derive(Debug, Clone)]
pub struct Tok {
    pub kind: TokKind,
    pub span: Span,
}
