//! The standard library module every [`DeclContext`] starts with.

use crate::decl::{DeclContext, DeclId, DeclKind, TypeDecl};
use crate::ty::Type;

pub const STDLIB_MODULE: &str = "Swift";

const VALUE_TYPES: &[&str] = &[
    "Bool",
    "Int",
    "UInt",
    "Int8",
    "Int16",
    "Int32",
    "Int64",
    "UInt8",
    "UInt16",
    "UInt32",
    "UInt64",
    "Float",
    "Double",
    "String",
    "Character",
    "OpaquePointer",
    "UnsafeRawPointer",
    "UnsafeMutableRawPointer",
];

const GENERIC_STRUCTS: &[(&str, &[&str])] = &[
    ("Array", &["Element"]),
    ("Dictionary", &["Key", "Value"]),
    ("UnsafePointer", &["Pointee"]),
    ("UnsafeMutablePointer", &["Pointee"]),
];

/// `(alias, target)`; targets are value types above.
const ALIASES: &[(&str, &str)] = &[
    ("Float32", "Float"),
    ("Float64", "Double"),
    ("CBool", "Bool"),
    ("CChar", "Int8"),
    ("CSignedChar", "Int8"),
    ("CUnsignedChar", "UInt8"),
    ("CShort", "Int16"),
    ("CUnsignedShort", "UInt16"),
    ("CInt", "Int32"),
    ("CUnsignedInt", "UInt32"),
    ("CLong", "Int"),
    ("CUnsignedLong", "UInt"),
    ("CLongLong", "Int64"),
    ("CUnsignedLongLong", "UInt64"),
    ("CFloat", "Float"),
    ("CDouble", "Double"),
];

/// Declarations sugar desugars to.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StdDecls {
    pub optional: DeclId,
    pub array: DeclId,
    pub dictionary: DeclId,
}

impl StdDecls {
    /// Stand-in used only while `register` runs.
    pub(crate) fn placeholder() -> Self {
        Self {
            optional: DeclId(0),
            array: DeclId(0),
            dictionary: DeclId(0),
        }
    }
}

fn std_decl(name: &str, generic_params: &[&str], kind: DeclKind) -> TypeDecl {
    TypeDecl {
        module: STDLIB_MODULE.to_string(),
        name: name.to_string(),
        generic_params: generic_params.iter().map(|p| p.to_string()).collect(),
        kind,
    }
}

pub(crate) fn register(ctx: &mut DeclContext) -> StdDecls {
    let mut value_ids = Vec::with_capacity(VALUE_TYPES.len());
    for name in VALUE_TYPES {
        let id = ctx.push(std_decl(name, &[], DeclKind::Struct { fields: Vec::new() }));
        value_ids.push((*name, id));
    }

    let optional = ctx.push(std_decl(
        "Optional",
        &["Wrapped"],
        DeclKind::Enum {
            cases: vec!["none".into(), "some".into()],
        },
    ));

    let mut generic_ids = Vec::new();
    for (name, params) in GENERIC_STRUCTS {
        let id = ctx.push(std_decl(name, params, DeclKind::Struct { fields: Vec::new() }));
        generic_ids.push((*name, id));
    }

    ctx.push(std_decl(
        "Void",
        &[],
        DeclKind::Alias {
            underlying: Type::unit(),
        },
    ));

    for (alias, target) in ALIASES {
        let Some(&(_, target_id)) = value_ids.iter().find(|(n, _)| n == target) else {
            continue;
        };
        ctx.push(std_decl(
            alias,
            &[],
            DeclKind::Alias {
                underlying: Type::Nominal(target_id),
            },
        ));
    }

    let generic = |name: &str| {
        generic_ids
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, id)| *id)
            .unwrap_or(optional)
    };

    StdDecls {
        optional,
        array: generic("Array"),
        dictionary: generic("Dictionary"),
    }
}
