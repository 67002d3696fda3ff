//! Registry of source types with a fixed spelling in each dialect.
//!
//! Entries are keyed by the nominal identity of a declaration
//! (`Module.Name`) and then by [`Dialect`]. A table is assembled once with
//! [`KnownTypeTableBuilder`] and never changes afterwards; it is `Send + Sync`
//! and can be shared by reference across threads.

use crate::dialect::Dialect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Precomputed spelling for a known type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnownTypeInfo {
    pub spelling: String,
    /// Whether a nullability qualifier may follow the spelling.
    #[serde(rename = "nullable", default)]
    pub accepts_nullability_suffix: bool,
}

impl KnownTypeInfo {
    pub fn new(spelling: impl Into<String>, accepts_nullability_suffix: bool) -> Self {
        Self {
            spelling: spelling.into(),
            accepts_nullability_suffix,
        }
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("duplicate {dialect} entry for `{identity}`")]
    Duplicate { identity: String, dialect: Dialect },

    #[error("invalid type identity `{0}` (expected `Module.Name`)")]
    InvalidIdentity(String),

    #[error("invalid known-type overlay: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Default)]
struct DialectEntries {
    c: Option<KnownTypeInfo>,
    cxx: Option<KnownTypeInfo>,
}

impl DialectEntries {
    fn get(&self, dialect: Dialect) -> Option<&KnownTypeInfo> {
        match dialect {
            Dialect::C => self.c.as_ref(),
            Dialect::Cxx => self.cxx.as_ref(),
        }
    }

    fn slot(&mut self, dialect: Dialect) -> &mut Option<KnownTypeInfo> {
        match dialect {
            Dialect::C => &mut self.c,
            Dialect::Cxx => &mut self.cxx,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct KnownTypeTable {
    entries: BTreeMap<String, DialectEntries>,
}

impl KnownTypeTable {
    pub fn builder() -> KnownTypeTableBuilder {
        KnownTypeTableBuilder::new()
    }

    /// The standard-library mapping and nothing else.
    pub fn with_builtins() -> Self {
        KnownTypeTableBuilder::new().with_builtins().build()
    }

    pub fn lookup(&self, identity: &str, dialect: Dialect) -> Option<&KnownTypeInfo> {
        self.entries.get(identity)?.get(dialect)
    }

    /// Entries for one dialect, ordered by identity.
    pub fn iter(&self, dialect: Dialect) -> impl Iterator<Item = (&str, &KnownTypeInfo)> {
        self.entries
            .iter()
            .filter_map(move |(id, e)| e.get(dialect).map(|info| (id.as_str(), info)))
    }

    /// Number of `(identity, dialect)` entries.
    pub fn len(&self) -> usize {
        Dialect::ALL.iter().map(|d| self.iter(*d).count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Overlay file entry: `{"type": "App.Meters", "c": {...}, "cxx": {...}}`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OverlayEntry {
    #[serde(rename = "type")]
    identity: String,
    #[serde(default)]
    c: Option<KnownTypeInfo>,
    #[serde(default)]
    cxx: Option<KnownTypeInfo>,
}

#[derive(Debug, Default)]
pub struct KnownTypeTableBuilder {
    entries: BTreeMap<String, DialectEntries>,
}

impl KnownTypeTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the standard-library mapping.
    ///
    /// Builtins never collide with each other; an entry that is already
    /// present is kept.
    pub fn with_builtins(mut self) -> Self {
        for (name, c, cxx, nullable) in BUILTINS {
            let identity = format!("Swift.{name}");
            for (dialect, spelling) in [(Dialect::C, c), (Dialect::Cxx, cxx)] {
                let slot = self.entries.entry(identity.clone()).or_default().slot(dialect);
                if slot.is_none() {
                    *slot = Some(KnownTypeInfo::new(*spelling, *nullable));
                }
            }
        }
        self
    }

    pub fn insert(
        &mut self,
        identity: impl Into<String>,
        dialect: Dialect,
        info: KnownTypeInfo,
    ) -> Result<&mut Self, TableError> {
        let identity = identity.into();
        match identity.split_once('.') {
            Some((module, name)) if !module.is_empty() && !name.is_empty() => {}
            _ => return Err(TableError::InvalidIdentity(identity)),
        }
        let slot = self.entries.entry(identity.clone()).or_default().slot(dialect);
        if slot.is_some() {
            return Err(TableError::Duplicate { identity, dialect });
        }
        *slot = Some(info);
        Ok(self)
    }

    /// Add the entries of a JSON overlay (a list of [`OverlayEntry`]).
    pub fn extend_from_json(&mut self, json: &str) -> Result<&mut Self, TableError> {
        let overlay: Vec<OverlayEntry> = serde_json::from_str(json)?;
        debug!(entries = overlay.len(), "loading known-type overlay");
        for entry in overlay {
            if let Some(info) = entry.c {
                self.insert(entry.identity.clone(), Dialect::C, info)?;
            }
            if let Some(info) = entry.cxx {
                self.insert(entry.identity, Dialect::Cxx, info)?;
            }
        }
        Ok(self)
    }

    pub fn build(self) -> KnownTypeTable {
        KnownTypeTable {
            entries: self.entries,
        }
    }
}

/// `(Swift type, C spelling, C++ spelling, accepts nullability suffix)`.
///
/// C typealiases are listed under their own names so `CLong` prints as
/// `long` rather than as the `ptrdiff_t` of the type it aliases.
const BUILTINS: &[(&str, &str, &str, bool)] = &[
    ("Bool", "bool", "bool", false),
    ("Int", "ptrdiff_t", "swift::Int", false),
    ("UInt", "size_t", "swift::UInt", false),
    ("Int8", "int8_t", "int8_t", false),
    ("Int16", "int16_t", "int16_t", false),
    ("Int32", "int32_t", "int32_t", false),
    ("Int64", "int64_t", "int64_t", false),
    ("UInt8", "uint8_t", "uint8_t", false),
    ("UInt16", "uint16_t", "uint16_t", false),
    ("UInt32", "uint32_t", "uint32_t", false),
    ("UInt64", "uint64_t", "uint64_t", false),
    ("Float", "float", "float", false),
    ("Double", "double", "double", false),
    ("CBool", "bool", "bool", false),
    ("CChar", "char", "char", false),
    ("CSignedChar", "signed char", "signed char", false),
    ("CUnsignedChar", "unsigned char", "unsigned char", false),
    ("CShort", "short", "short", false),
    ("CUnsignedShort", "unsigned short", "unsigned short", false),
    ("CInt", "int", "int", false),
    ("CUnsignedInt", "unsigned int", "unsigned int", false),
    ("CLong", "long", "long", false),
    ("CUnsignedLong", "unsigned long", "unsigned long", false),
    ("CLongLong", "long long", "long long", false),
    ("CUnsignedLongLong", "unsigned long long", "unsigned long long", false),
    ("CFloat", "float", "float", false),
    ("CDouble", "double", "double", false),
    ("OpaquePointer", "void *", "void *", true),
    ("UnsafeMutableRawPointer", "void *", "void *", true),
    ("UnsafeRawPointer", "const void *", "const void *", true),
];
