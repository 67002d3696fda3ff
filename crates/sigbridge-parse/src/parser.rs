use crate::lexer::Lexer;
use crate::token::{Tok, TokKind};
use anyhow::{bail, Result};
use sigbridge_ast::ast::{
    Attribute, ClassDecl, EnumDecl, FieldDecl, FuncDecl, Ident, Item, Module, Param, StructDecl,
    TypeAliasDecl, TypeExpr,
};
use sigbridge_ast::span::Span;

/// Maximum nesting of type expressions (`[[[Int]]]`, `((Int))`, ...).
pub const MAX_TYPE_DEPTH: usize = 128;

pub fn parse_str(_file: &str, src: &str) -> Result<Module> {
    let mut p = Parser::new(src);
    p.parse_module()
}

struct Parser<'a> {
    lex: Lexer<'a>,
    cur: Tok,
    type_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        let mut lex = Lexer::new(src);
        let cur = lex.next_tok();
        Self {
            lex,
            cur,
            type_depth: 0,
        }
    }

    fn bump(&mut self) {
        self.cur = self.lex.next_tok();
    }

    fn at(&self, k: &TokKind) -> bool {
        std::mem::discriminant(&self.cur.kind) == std::mem::discriminant(k)
    }

    fn eat(&mut self, k: &TokKind) -> bool {
        if self.at(k) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, k: TokKind) -> Result<Tok> {
        if let TokKind::Error(msg) = &self.cur.kind {
            bail!("{} at {:?}", msg, self.cur.span)
        }
        if self.at(&k) {
            let t = self.cur.clone();
            self.bump();
            Ok(t)
        } else {
            bail!("expected {:?}, found {:?}", k, self.cur.kind)
        }
    }

    fn span_from(&self, start: u32, end: u32) -> Span {
        Span { start, end }
    }

    // ======= module / items =======

    fn parse_module(&mut self) -> Result<Module> {
        let start = self.cur.span.start;
        let mut items = Vec::new();
        while !matches!(self.cur.kind, TokKind::Eof) {
            items.push(self.parse_item()?);
            while self.eat(&TokKind::Semicolon) {}
        }
        Ok(Module {
            items,
            span: self.span_from(start, self.cur.span.end),
        })
    }

    fn parse_item(&mut self) -> Result<Item> {
        let attrs = self.parse_attributes()?;
        if !attrs.is_empty() && !matches!(self.cur.kind, TokKind::KwFunc) {
            bail!("attributes are only supported on functions");
        }
        match self.cur.kind {
            TokKind::KwFunc => Ok(Item::Func(self.parse_func(attrs)?)),
            TokKind::KwTypealias => Ok(Item::TypeAlias(self.parse_typealias()?)),
            TokKind::KwStruct => Ok(Item::Struct(self.parse_struct()?)),
            TokKind::KwEnum => Ok(Item::Enum(self.parse_enum()?)),
            TokKind::KwClass => Ok(Item::Class(self.parse_class()?)),
            TokKind::Error(ref msg) => bail!("{} at {:?}", msg, self.cur.span),
            _ => bail!("unexpected token at top level: {:?}", self.cur.kind),
        }
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        match &self.cur.kind {
            TokKind::Ident(s) => {
                let id = Ident {
                    text: s.clone(),
                    span: self.cur.span,
                };
                self.bump();
                Ok(id)
            }
            _ => bail!("expected identifier, found {:?}", self.cur.kind),
        }
    }

    /// An identifier or `_`, which yields `None`.
    fn parse_name_or_wildcard(&mut self) -> Result<Option<Ident>> {
        if self.eat(&TokKind::Underscore) {
            Ok(None)
        } else {
            Ok(Some(self.parse_ident()?))
        }
    }

    fn parse_attributes(&mut self) -> Result<Vec<Attribute>> {
        let mut attrs = Vec::new();
        while matches!(self.cur.kind, TokKind::At) {
            let start = self.cur.span.start;
            self.bump();
            let name = self.parse_ident()?;
            let mut args = Vec::new();
            let mut end = name.span.end;
            if self.eat(&TokKind::LParen) {
                if !matches!(self.cur.kind, TokKind::RParen) {
                    loop {
                        match &self.cur.kind {
                            TokKind::Str(s) => {
                                args.push(s.clone());
                                self.bump();
                            }
                            _ => bail!("expected string argument, found {:?}", self.cur.kind),
                        }
                        if !self.eat(&TokKind::Comma) {
                            break;
                        }
                    }
                }
                end = self.expect(TokKind::RParen)?.span.end;
            }
            let attr = Attribute {
                name,
                args,
                span: self.span_from(start, end),
            };
            check_attribute(&attr)?;
            if attrs.iter().any(|a: &Attribute| a.name.text == attr.name.text) {
                bail!("duplicate `@{}` at {:?}", attr.name.text, attr.span);
            }
            attrs.push(attr);
        }
        Ok(attrs)
    }

    fn parse_func(&mut self, attrs: Vec<Attribute>) -> Result<FuncDecl> {
        let start = attrs
            .first()
            .map(|a| a.span.start)
            .unwrap_or(self.cur.span.start);
        self.expect(TokKind::KwFunc)?;
        let name = self.parse_ident()?;

        self.expect(TokKind::LParen)?;
        let params = self.parse_params()?;
        let mut end = self.expect(TokKind::RParen)?.span.end;

        let ret_ty = if self.eat(&TokKind::Arrow) {
            let ty = self.parse_type()?;
            end = ty.span().end;
            Some(ty)
        } else {
            None
        };

        Ok(FuncDecl {
            attrs,
            name,
            params,
            ret_ty,
            span: self.span_from(start, end),
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();
        if matches!(self.cur.kind, TokKind::RParen) {
            return Ok(params);
        }
        params.push(self.parse_param()?);
        while self.eat(&TokKind::Comma) {
            params.push(self.parse_param()?);
        }
        Ok(params)
    }

    /// `name: T`, `label name: T`, `_ name: T`, `label _: T`, `_: T`
    fn parse_param(&mut self) -> Result<Param> {
        let start = self.cur.span.start;
        let first = self.parse_name_or_wildcard()?;
        let (label, name) = if matches!(self.cur.kind, TokKind::Colon) {
            (first.clone(), first)
        } else {
            let second = self.parse_name_or_wildcard()?;
            (first, second)
        };
        self.expect(TokKind::Colon)?;
        let ty = self.parse_type()?;
        let span = self.span_from(start, ty.span().end);
        Ok(Param {
            label,
            name,
            ty,
            span,
        })
    }

    fn parse_typealias(&mut self) -> Result<TypeAliasDecl> {
        let start = self.cur.span.start;
        self.expect(TokKind::KwTypealias)?;
        let name = self.parse_ident()?;
        self.expect(TokKind::Eq)?;
        let target = self.parse_type()?;
        let span = self.span_from(start, target.span().end);
        Ok(TypeAliasDecl { name, target, span })
    }

    fn parse_struct(&mut self) -> Result<StructDecl> {
        let start = self.cur.span.start;
        self.expect(TokKind::KwStruct)?;
        let name = self.parse_ident()?;
        self.expect(TokKind::LBrace)?;

        let mut fields = Vec::new();
        while !matches!(self.cur.kind, TokKind::RBrace) {
            let field_start = self.cur.span.start;
            if !self.eat(&TokKind::KwVar) && !self.eat(&TokKind::KwLet) {
                bail!("expected field declaration, found {:?}", self.cur.kind);
            }
            let field_name = self.parse_ident()?;
            self.expect(TokKind::Colon)?;
            let ty = self.parse_type()?;
            fields.push(FieldDecl {
                name: field_name,
                span: self.span_from(field_start, ty.span().end),
                ty,
            });
            while self.eat(&TokKind::Semicolon) {}
        }

        let end = self.expect(TokKind::RBrace)?.span.end;
        Ok(StructDecl {
            name,
            fields,
            span: self.span_from(start, end),
        })
    }

    fn parse_enum(&mut self) -> Result<EnumDecl> {
        let start = self.cur.span.start;
        self.expect(TokKind::KwEnum)?;
        let name = self.parse_ident()?;
        self.expect(TokKind::LBrace)?;

        let mut cases = Vec::new();
        while !matches!(self.cur.kind, TokKind::RBrace) {
            self.expect(TokKind::KwCase)?;
            cases.push(self.parse_ident()?);
            while self.eat(&TokKind::Comma) {
                cases.push(self.parse_ident()?);
            }
            while self.eat(&TokKind::Semicolon) {}
        }

        let end = self.expect(TokKind::RBrace)?.span.end;
        Ok(EnumDecl {
            name,
            cases,
            span: self.span_from(start, end),
        })
    }

    fn parse_class(&mut self) -> Result<ClassDecl> {
        let start = self.cur.span.start;
        self.expect(TokKind::KwClass)?;
        let name = self.parse_ident()?;
        self.expect(TokKind::LBrace)?;
        let end = self.expect(TokKind::RBrace)?.span.end;
        Ok(ClassDecl {
            name,
            span: self.span_from(start, end),
        })
    }

    // ======= types =======

    fn parse_type(&mut self) -> Result<TypeExpr> {
        self.type_depth += 1;
        if self.type_depth > MAX_TYPE_DEPTH {
            bail!(
                "type nesting exceeds {} levels at {:?}",
                MAX_TYPE_DEPTH,
                self.cur.span
            );
        }
        let ty = self.parse_type_inner();
        self.type_depth -= 1;
        ty
    }

    fn parse_type_inner(&mut self) -> Result<TypeExpr> {
        let start = self.cur.span.start;

        let mut ty = match self.cur.kind {
            // (), (T), (A, B), (A) -> R
            TokKind::LParen => {
                self.bump();
                let elems = self.parse_type_list(&TokKind::RParen)?;
                let end = self.expect(TokKind::RParen)?.span.end;
                if self.eat(&TokKind::Arrow) {
                    let ret = self.parse_type()?;
                    let span = self.span_from(start, ret.span().end);
                    TypeExpr::Function {
                        params: elems,
                        ret: Box::new(ret),
                        span,
                    }
                } else if elems.len() == 1 {
                    // parentheses alone carry no meaning
                    let mut elems = elems;
                    elems.remove(0)
                } else {
                    TypeExpr::Tuple(elems, self.span_from(start, end))
                }
            }
            // [T], [K: V]
            TokKind::LBracket => {
                self.bump();
                let first = self.parse_type()?;
                if self.eat(&TokKind::Colon) {
                    let value = self.parse_type()?;
                    let end = self.expect(TokKind::RBracket)?.span.end;
                    TypeExpr::Dictionary {
                        key: Box::new(first),
                        value: Box::new(value),
                        span: self.span_from(start, end),
                    }
                } else {
                    let end = self.expect(TokKind::RBracket)?.span.end;
                    TypeExpr::Array(Box::new(first), self.span_from(start, end))
                }
            }
            TokKind::Ident(_) => self.parse_path_type()?,
            _ => bail!("expected type, found {:?}", self.cur.kind),
        };

        // postfix sugar: T? / T!, each wrapper is one more nesting level
        let mut wrappers = 0usize;
        loop {
            let end = self.cur.span.end;
            if matches!(self.cur.kind, TokKind::Question | TokKind::Bang) {
                wrappers += 1;
                if self.type_depth + wrappers > MAX_TYPE_DEPTH {
                    bail!(
                        "type nesting exceeds {} levels at {:?}",
                        MAX_TYPE_DEPTH,
                        self.cur.span
                    );
                }
            }
            if self.eat(&TokKind::Question) {
                ty = TypeExpr::Optional(Box::new(ty), self.span_from(start, end));
            } else if self.eat(&TokKind::Bang) {
                ty = TypeExpr::ImplicitlyUnwrapped(Box::new(ty), self.span_from(start, end));
            } else {
                break;
            }
        }

        Ok(ty)
    }

    fn parse_path_type(&mut self) -> Result<TypeExpr> {
        let start = self.cur.span.start;
        let mut segments = vec![self.parse_ident()?];
        while self.eat(&TokKind::Dot) {
            segments.push(self.parse_ident()?);
        }
        let mut end = segments.last().map(|s| s.span.end).unwrap_or(start);

        let mut generic_args = Vec::new();
        if self.eat(&TokKind::Lt) {
            generic_args = self.parse_type_list(&TokKind::Gt)?;
            if generic_args.is_empty() {
                bail!("expected at least one generic argument");
            }
            end = self.expect(TokKind::Gt)?.span.end;
        }

        Ok(TypeExpr::Path {
            segments,
            generic_args,
            span: self.span_from(start, end),
        })
    }

    /// Comma separated types up to (not including) `close`.
    fn parse_type_list(&mut self, close: &TokKind) -> Result<Vec<TypeExpr>> {
        let mut tys = Vec::new();
        if self.at(close) {
            return Ok(tys);
        }
        tys.push(self.parse_type()?);
        while self.eat(&TokKind::Comma) {
            tys.push(self.parse_type()?);
        }
        Ok(tys)
    }
}

/// `@cdecl("name")` is the only attribute, and its name must be usable as a
/// C identifier.
fn check_attribute(attr: &Attribute) -> Result<()> {
    if attr.name.text != "cdecl" {
        bail!("unknown attribute `@{}` at {:?}", attr.name.text, attr.span);
    }
    let [name] = attr.args.as_slice() else {
        bail!("`@cdecl` expects one string argument at {:?}", attr.span);
    };
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        bail!("`@cdecl` name {:?} is not a valid C identifier at {:?}", name, attr.span);
    }
    Ok(())
}
