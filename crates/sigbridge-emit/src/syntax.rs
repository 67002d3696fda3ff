//! Low-level syntax helpers shared by every printer.

use crate::dialect::Dialect;
use sigbridge_types::Optionality;

/// Token-level printing the classifier and emitter delegate to.
pub trait SyntaxPrinter: Send + Sync {
    /// Append the nullability qualifier for `optionality`, leading space
    /// included. Writes nothing for [`Optionality::Absent`].
    fn print_nullability_suffix(&self, out: &mut String, optionality: Optionality, dialect: Dialect);

    /// Append `name`, escaped if it collides with a keyword of `dialect`.
    fn print_identifier(&self, out: &mut String, name: &str, dialect: Dialect);
}

/// Clang spelling of nullability qualifiers and keyword escaping by
/// appending `_`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClangSyntaxPrinter;

impl ClangSyntaxPrinter {
    pub fn is_keyword(name: &str, dialect: Dialect) -> bool {
        let is_c = C_KEYWORDS.binary_search(&name).is_ok();
        match dialect {
            Dialect::C => is_c,
            Dialect::Cxx => is_c || CXX_KEYWORDS.binary_search(&name).is_ok(),
        }
    }
}

impl SyntaxPrinter for ClangSyntaxPrinter {
    fn print_nullability_suffix(&self, out: &mut String, optionality: Optionality, _: Dialect) {
        match optionality {
            Optionality::Absent => {}
            Optionality::Nullable => out.push_str(" _Nullable"),
            Optionality::ImplicitlyUnwrapped => out.push_str(" _Null_unspecified"),
        }
    }

    fn print_identifier(&self, out: &mut String, name: &str, dialect: Dialect) {
        out.push_str(name);
        if Self::is_keyword(name, dialect) {
            out.push('_');
        }
    }
}

// Both lists are sorted for binary search.
const C_KEYWORDS: &[&str] = &[
    "_Alignas",
    "_Alignof",
    "_Atomic",
    "_Bool",
    "_Complex",
    "_Generic",
    "_Imaginary",
    "_Noreturn",
    "_Static_assert",
    "_Thread_local",
    "auto",
    "break",
    "case",
    "char",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extern",
    "float",
    "for",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "register",
    "restrict",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "struct",
    "switch",
    "typedef",
    "union",
    "unsigned",
    "void",
    "volatile",
    "while",
];

const CXX_KEYWORDS: &[&str] = &[
    "alignas",
    "alignof",
    "and",
    "and_eq",
    "asm",
    "bitand",
    "bitor",
    "bool",
    "catch",
    "char16_t",
    "char32_t",
    "char8_t",
    "class",
    "co_await",
    "co_return",
    "co_yield",
    "compl",
    "concept",
    "const_cast",
    "consteval",
    "constexpr",
    "constinit",
    "decltype",
    "delete",
    "dynamic_cast",
    "explicit",
    "export",
    "false",
    "friend",
    "mutable",
    "namespace",
    "new",
    "noexcept",
    "not",
    "not_eq",
    "nullptr",
    "operator",
    "or",
    "or_eq",
    "private",
    "protected",
    "public",
    "reinterpret_cast",
    "requires",
    "static_assert",
    "static_cast",
    "template",
    "this",
    "thread_local",
    "throw",
    "true",
    "try",
    "typeid",
    "typename",
    "using",
    "virtual",
    "wchar_t",
    "xor",
    "xor_eq",
];
