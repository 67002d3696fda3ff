pub mod span {
    use serde::Serialize;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub struct Span {
        pub start: u32,
        pub end: u32,
    }

    impl Span {
        pub fn to(self, other: Span) -> Span {
            Span {
                start: self.start,
                end: other.end,
            }
        }
    }
}

pub mod ast {
    use super::span::Span;
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    pub struct Module {
        pub items: Vec<Item>,
        pub span: Span,
    }

    #[derive(Debug, Serialize)]
    pub enum Item {
        Func(FuncDecl),
        TypeAlias(TypeAliasDecl),
        Struct(StructDecl),
        Enum(EnumDecl),
        Class(ClassDecl),
    }

    impl Item {
        pub fn name(&self) -> &Ident {
            match self {
                Item::Func(d) => &d.name,
                Item::TypeAlias(d) => &d.name,
                Item::Struct(d) => &d.name,
                Item::Enum(d) => &d.name,
                Item::Class(d) => &d.name,
            }
        }
    }

    /// `@name("arg", ...)` preceding a declaration.
    #[derive(Debug, Clone, Serialize)]
    pub struct Attribute {
        pub name: Ident,
        pub args: Vec<String>,
        pub span: Span,
    }

    #[derive(Debug, Serialize)]
    pub struct FuncDecl {
        pub attrs: Vec<Attribute>,
        pub name: Ident,
        pub params: Vec<Param>,
        pub ret_ty: Option<TypeExpr>, // None means `()`
        pub span: Span,
    }

    impl FuncDecl {
        /// Value of `@cdecl("...")`, if present.
        pub fn cdecl_name(&self) -> Option<&str> {
            self.attrs
                .iter()
                .find(|a| a.name.text == "cdecl")
                .and_then(|a| a.args.first())
                .map(String::as_str)
        }
    }

    /// A function parameter.
    ///
    /// `label` is the argument label used at call sites and `name` the
    /// parameter's own name inside the body. Either is `None` when written
    /// as `_`. A single identifier (`x: Int`) fills both.
    #[derive(Debug, Serialize)]
    pub struct Param {
        pub label: Option<Ident>,
        pub name: Option<Ident>,
        pub ty: TypeExpr,
        pub span: Span,
    }

    #[derive(Debug, Serialize)]
    pub struct TypeAliasDecl {
        pub name: Ident,
        pub target: TypeExpr,
        pub span: Span,
    }

    #[derive(Debug, Serialize)]
    pub struct StructDecl {
        pub name: Ident,
        pub fields: Vec<FieldDecl>,
        pub span: Span,
    }

    #[derive(Debug, Serialize)]
    pub struct FieldDecl {
        pub name: Ident,
        pub ty: TypeExpr,
        pub span: Span,
    }

    #[derive(Debug, Serialize)]
    pub struct EnumDecl {
        pub name: Ident,
        pub cases: Vec<Ident>,
        pub span: Span,
    }

    #[derive(Debug, Serialize)]
    pub struct ClassDecl {
        pub name: Ident,
        pub span: Span,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Ident {
        pub text: String,
        pub span: Span,
    }

    #[derive(Debug, Clone, Serialize)]
    pub enum TypeExpr {
        /// `Int`, `Swift.Int`, `Array<Int>`
        Path {
            segments: Vec<Ident>,
            generic_args: Vec<TypeExpr>,
            span: Span,
        },
        /// `()`, `(Int, Bool)`
        Tuple(Vec<TypeExpr>, Span),
        /// `(A, B) -> R`
        Function {
            params: Vec<TypeExpr>,
            ret: Box<TypeExpr>,
            span: Span,
        },
        /// `T?`
        Optional(Box<TypeExpr>, Span),
        /// `T!`
        ImplicitlyUnwrapped(Box<TypeExpr>, Span),
        /// `[T]`
        Array(Box<TypeExpr>, Span),
        /// `[K: V]`
        Dictionary {
            key: Box<TypeExpr>,
            value: Box<TypeExpr>,
            span: Span,
        },
    }

    impl TypeExpr {
        pub fn span(&self) -> Span {
            match self {
                TypeExpr::Path { span, .. } => *span,
                TypeExpr::Tuple(_, span) => *span,
                TypeExpr::Function { span, .. } => *span,
                TypeExpr::Optional(_, span) => *span,
                TypeExpr::ImplicitlyUnwrapped(_, span) => *span,
                TypeExpr::Array(_, span) => *span,
                TypeExpr::Dictionary { span, .. } => *span,
            }
        }
    }
}
