use crate::token::{Tok, TokKind};
use sigbridge_ast::span::Span;

pub struct Lexer<'a> {
    text: &'a str,
    src: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            text: src,
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn bump(&mut self) -> Option<u8> {
        if self.pos >= self.src.len() {
            None
        } else {
            let b = self.src[self.pos];
            self.pos += 1;
            Some(b)
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }
    fn peek2(&self) -> Option<u8> {
        self.src.get(self.pos + 1).copied()
    }

    fn span(&self, start: usize) -> Span {
        Span {
            start: start as u32,
            end: self.pos as u32,
        }
    }

    fn tok(&self, kind: TokKind, start: usize) -> Tok {
        Tok {
            kind,
            span: self.span(start),
        }
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(b) if (b as char).is_whitespace()) {
                self.bump();
            }
            // line comment: //
            if self.peek() == Some(b'/') && self.peek2() == Some(b'/') {
                self.bump();
                self.bump();
                while let Some(b) = self.peek() {
                    if b == b'\n' {
                        break;
                    }
                    self.bump();
                }
                continue;
            }
            break;
        }
    }

    pub fn next_tok(&mut self) -> Tok {
        self.skip_ws_and_comments();
        let start = self.pos;
        let Some(b) = self.bump() else {
            return self.tok(TokKind::Eof, start);
        };
        let c = b as char;

        // Arrow: ->
        if c == '-' && self.peek() == Some(b'>') {
            self.bump();
            return self.tok(TokKind::Arrow, start);
        }

        let single = match c {
            '(' => Some(TokKind::LParen),
            ')' => Some(TokKind::RParen),
            '{' => Some(TokKind::LBrace),
            '}' => Some(TokKind::RBrace),
            '[' => Some(TokKind::LBracket),
            ']' => Some(TokKind::RBracket),
            '<' => Some(TokKind::Lt),
            '>' => Some(TokKind::Gt),
            ',' => Some(TokKind::Comma),
            ':' => Some(TokKind::Colon),
            ';' => Some(TokKind::Semicolon),
            '.' => Some(TokKind::Dot),
            '=' => Some(TokKind::Eq),
            '?' => Some(TokKind::Question),
            '!' => Some(TokKind::Bang),
            '@' => Some(TokKind::At),
            _ => None,
        };
        if let Some(k) = single {
            return self.tok(k, start);
        }

        // string (attribute arguments); only ASCII bytes end a run, so the
        // copied slices always fall on char boundaries
        if c == '"' {
            let mut s = String::new();
            let mut run = self.pos;
            while let Some(b) = self.bump() {
                match b {
                    b'"' => {
                        s.push_str(&self.text[run..self.pos - 1]);
                        return self.tok(TokKind::Str(s), start);
                    }
                    b'\\' => {
                        s.push_str(&self.text[run..self.pos - 1]);
                        match self.peek() {
                            Some(b'n') => {
                                self.bump();
                                s.push('\n');
                                run = self.pos;
                            }
                            Some(b't') => {
                                self.bump();
                                s.push('\t');
                                run = self.pos;
                            }
                            // anything else is kept as written, minus the backslash
                            Some(_) => {
                                run = self.pos;
                                self.bump();
                            }
                            None => break,
                        }
                    }
                    _ => {}
                }
            }
            return self.tok(TokKind::Error("unterminated string".into()), start);
        }

        // ident / keywords
        if c.is_ascii_alphabetic() || c == '_' {
            let mut s = String::from(c);
            while let Some(p) = self.peek() {
                let ch = p as char;
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    s.push(ch);
                    self.bump();
                } else {
                    break;
                }
            }
            let kind = match s.as_str() {
                "_" => TokKind::Underscore,
                "func" => TokKind::KwFunc,
                "typealias" => TokKind::KwTypealias,
                "struct" => TokKind::KwStruct,
                "enum" => TokKind::KwEnum,
                "class" => TokKind::KwClass,
                "case" => TokKind::KwCase,
                "var" => TokKind::KwVar,
                "let" => TokKind::KwLet,
                _ => TokKind::Ident(s),
            };
            return self.tok(kind, start);
        }

        self.tok(TokKind::Error(format!("unexpected character {c:?}")), start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokKind> {
        let mut lex = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let t = lex.next_tok();
            if t.kind == TokKind::Eof {
                break;
            }
            out.push(t.kind);
        }
        out
    }

    #[test]
    fn underscore_is_its_own_token() {
        assert_eq!(
            kinds("_ _x"),
            vec![TokKind::Underscore, TokKind::Ident("_x".into())]
        );
    }

    #[test]
    fn sugar_and_arrow() {
        assert_eq!(
            kinds("Int? -> [T]!"),
            vec![
                TokKind::Ident("Int".into()),
                TokKind::Question,
                TokKind::Arrow,
                TokKind::LBracket,
                TokKind::Ident("T".into()),
                TokKind::RBracket,
                TokKind::Bang,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("// nothing\nfunc"), vec![TokKind::KwFunc]);
    }

    #[test]
    fn strings_keep_non_ascii_text() {
        assert_eq!(kinds(r#""café""#), vec![TokKind::Str("café".into())]);
        assert_eq!(kinds(r#""a\"é\\b\n""#), vec![TokKind::Str("a\"é\\b\n".into())]);
        assert_eq!(kinds(r#""\é""#), vec![TokKind::Str("é".into())]);
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        assert!(matches!(kinds(r#""abc"#)[0], TokKind::Error(_)));
        assert!(matches!(kinds(r#""abc\"#)[0], TokKind::Error(_)));
    }

    #[test]
    fn unknown_character_is_an_error_token() {
        assert!(matches!(kinds("#")[0], TokKind::Error(_)));
    }
}
