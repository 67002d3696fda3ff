use serde::{Deserialize, Serialize};
use std::fmt;

/// Target declaration syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Plain C: the strict ABI-level form.
    C,
    /// C++ interop: allows overloading, so every parameter gets a name.
    Cxx,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::C, Dialect::Cxx];

    /// Spelling of the empty product type.
    pub fn no_value_spelling(self) -> &'static str {
        match self {
            Dialect::C | Dialect::Cxx => "void",
        }
    }

    /// What goes between the parentheses of a parameterless declaration.
    pub fn empty_parameter_list(self) -> &'static str {
        match self {
            Dialect::C => "void",
            Dialect::Cxx => "",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::C => "c",
            Dialect::Cxx => "c++",
        })
    }
}
