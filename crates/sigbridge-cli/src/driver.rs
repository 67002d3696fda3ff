//! Load, resolve and print: the work behind each subcommand.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use sigbridge_ast::ast::Module;
use sigbridge_emit::{Dialect, KnownTypeTable, Signature, SignatureEmitter};
use sigbridge_parse::parse_str;
use sigbridge_types::{resolve_module, DeclContext, ResolvedModule};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{info, warn};

/// Maximum source file size in bytes (1MB)
pub const MAX_SOURCE_SIZE: usize = 1_000_000;

pub fn read_source(path: &Path) -> Result<String> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    if src.len() > MAX_SOURCE_SIZE {
        bail!(
            "source file exceeds {}MB limit ({} bytes)",
            MAX_SOURCE_SIZE / 1_000_000,
            src.len()
        );
    }
    Ok(src)
}

pub fn parse_file(path: &Path) -> Result<Module> {
    let src = read_source(path)?;
    let file = path.display().to_string();
    parse_str(&file, &src).with_context(|| format!("failed to parse `{file}`"))
}

/// Module name derived from the file stem, with anything that cannot appear
/// in an identifier replaced by `_`.
pub fn module_name_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// A source file lowered into the type model.
pub struct Session {
    pub decls: DeclContext,
    pub module: ResolvedModule,
}

pub fn load_session(path: &Path, module_name: Option<&str>) -> Result<Session> {
    let ast = parse_file(path)?;
    let name = module_name
        .map(str::to_string)
        .unwrap_or_else(|| module_name_for(path));
    let mut decls = DeclContext::new();
    let module = resolve_module(&mut decls, &name, &ast)
        .with_context(|| format!("failed to resolve `{}`", path.display()))?;
    info!(module = %module.name, functions = module.functions.len(), "loaded");
    Ok(Session { decls, module })
}

/// Built-ins (unless disabled) plus an optional JSON overlay file.
pub fn load_table(overlay: Option<&Path>, builtins: bool) -> Result<KnownTypeTable> {
    let mut builder = if builtins {
        KnownTypeTable::builder().with_builtins()
    } else {
        KnownTypeTable::builder()
    };
    if let Some(path) = overlay {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        builder
            .extend_from_json(&json)
            .with_context(|| format!("in known-type overlay `{}`", path.display()))?;
    }
    Ok(builder.build())
}

/// One printed declaration.
#[derive(Debug, Serialize)]
pub struct EmittedDecl {
    pub function: String,
    pub text: String,
    pub complete: bool,
    pub signature: Signature,
}

/// Signatures of every function in `session`, grouped by dialect in the
/// order given.
pub fn emit_all(session: &Session, table: &KnownTypeTable, dialects: &[Dialect]) -> Vec<EmittedDecl> {
    let emitter = SignatureEmitter::new(&session.decls, table);
    let mut out = Vec::new();
    for &dialect in dialects {
        for func in &session.module.functions {
            let signature =
                emitter.signature(func, func.external_name(), &func.result, dialect);
            let complete = signature.is_complete();
            if !complete {
                let missing: Vec<_> = signature.placeholders().map(|s| s.as_str()).collect();
                warn!(
                    function = %func.name,
                    %dialect,
                    placeholders = ?missing,
                    "signature has untranslated types"
                );
            }
            out.push(EmittedDecl {
                function: func.name.clone(),
                text: signature.to_string(),
                complete,
                signature,
            });
        }
    }
    out
}

/// Render `decls` as declarations ending in `;`. With more than one
/// dialect, each block is introduced by a `// <dialect>` line.
pub fn render_text(decls: &[EmittedDecl], dialects: &[Dialect]) -> String {
    let mut out = String::new();
    let headed = dialects.len() > 1;
    for (i, &dialect) in dialects.iter().enumerate() {
        if headed {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "// {dialect}");
        }
        for d in decls.iter().filter(|d| d.signature.dialect == dialect) {
            let _ = writeln!(out, "{};", d.text);
        }
    }
    out
}

/// `identity<TAB>spelling[<TAB>nullable]`, one per line.
pub fn render_table(table: &KnownTypeTable, dialects: &[Dialect]) -> String {
    let mut out = String::new();
    let headed = dialects.len() > 1;
    for (i, &dialect) in dialects.iter().enumerate() {
        if headed {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "// {dialect}");
        }
        for (identity, info) in table.iter(dialect) {
            let _ = write!(out, "{identity}\t{}", info.spelling);
            if info.accepts_nullability_suffix {
                out.push_str("\tnullable");
            }
            out.push('\n');
        }
    }
    out
}
