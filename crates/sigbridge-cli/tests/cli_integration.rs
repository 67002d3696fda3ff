//! CLI integration tests for `sigbridge emit` / `parse` / `types`.
//!
//! These tests invoke the compiled binary to verify end-to-end behavior.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn sigbridge_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sigbridge"));
    cmd.env_remove("SIGBRIDGE_LOG").env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write file");
    path
}

fn run(args: &[&str]) -> Output {
    sigbridge_bin().args(args).output().expect("run binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const GEOMETRY: &str = r#"
    // geometry
    typealias Length = Double
    struct Point { var x: Length; var y: Length }

    @cdecl("geo_scale") func scale(_ by: Length, into out: UnsafeMutableRawPointer?) -> Bool
    func reset(_: Int, flag: Bool)
    func origin() -> Point
"#;

#[test]
fn emit_c_declarations() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write(dir.path(), "geometry.decl", GEOMETRY);

    let output = run(&["emit", file.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "bool geo_scale(double by, void * _Nullable out);\n\
         void reset(ptrdiff_t, bool flag);\n\
         /* Point */ origin(void);\n"
    );
    assert!(
        stderr(&output).contains("untranslated types"),
        "placeholder should be reported: {}",
        stderr(&output)
    );
}

#[test]
fn emit_both_dialects() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write(dir.path(), "geometry.decl", GEOMETRY);

    let output = run(&["emit", file.to_str().unwrap(), "--dialect", "both"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    let (c, cxx) = out.split_once("\n\n").expect("two blocks");
    assert!(c.starts_with("// c\n"), "{c}");
    assert!(c.contains("void reset(ptrdiff_t, bool flag);"), "{c}");
    assert!(cxx.starts_with("// c++\n"), "{cxx}");
    assert!(cxx.contains("void reset(swift::Int _1, bool flag);"), "{cxx}");
    assert!(cxx.contains("/* Point */ origin();"), "{cxx}");
}

#[test]
fn strict_mode_fails_on_placeholders() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write(dir.path(), "geometry.decl", GEOMETRY);

    let output = run(&["emit", file.to_str().unwrap(), "--strict"]);
    assert_eq!(output.status.code(), Some(2), "stderr: {}", stderr(&output));
    // Output is still printed in full.
    assert!(stdout(&output).contains("/* Point */ origin(void);"));
}

#[test]
fn strict_mode_passes_when_complete() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write(dir.path(), "ok.decl", "func f(a: Int32) -> UInt8");

    let output = run(&["emit", file.to_str().unwrap(), "--strict", "--dialect", "cxx"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "uint8_t f(int32_t a);\n");
}

#[test]
fn overlay_supplies_user_types() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write(dir.path(), "geometry.decl", GEOMETRY);
    let types = write(
        dir.path(),
        "types.json",
        r#"[{"type": "geometry.Point", "c": {"spelling": "struct geo_point"}}]"#,
    );

    let output = run(&[
        "emit",
        file.to_str().unwrap(),
        "--types",
        types.to_str().unwrap(),
        "--strict",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("struct geo_point origin(void);"));
}

#[test]
fn module_flag_changes_identity() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write(dir.path(), "geometry.decl", GEOMETRY);
    let types = write(
        dir.path(),
        "types.json",
        r#"[{"type": "Geo.Point", "c": {"spelling": "geo_point_t"}}]"#,
    );

    let output = run(&[
        "emit",
        file.to_str().unwrap(),
        "--module",
        "Geo",
        "--types",
        types.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("geo_point_t origin(void);"));
}

#[test]
fn duplicate_overlay_entry_is_an_error() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write(dir.path(), "a.decl", "func f()");
    let types = write(
        dir.path(),
        "types.json",
        r#"[{"type": "Swift.Int", "c": {"spelling": "long"}}]"#,
    );

    let output = run(&["emit", file.to_str().unwrap(), "--types", types.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("duplicate c entry for `Swift.Int`"),
        "stderr: {}",
        stderr(&output)
    );
}

#[test]
fn emit_json() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write(dir.path(), "geometry.decl", GEOMETRY);

    let output = run(&["emit", file.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let decls = json.as_array().expect("array");
    assert_eq!(decls.len(), 3);
    assert_eq!(decls[0]["function"], "scale");
    assert_eq!(decls[0]["text"], "bool geo_scale(double by, void * _Nullable out)");
    assert_eq!(decls[0]["complete"], true);
    assert_eq!(decls[2]["complete"], false);
    assert_eq!(decls[2]["signature"]["dialect"], "c");
}

#[test]
fn resolve_errors_are_reported() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write(dir.path(), "bad.decl", "func f(x: Missing)");

    let output = run(&["emit", file.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("unknown type `Missing`"),
        "stderr: {}",
        stderr(&output)
    );
}

#[test]
fn parse_errors_are_reported() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write(dir.path(), "bad.decl", "func f(x Int)");

    let output = run(&["parse", file.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to parse"), "stderr: {}", stderr(&output));
}

#[test]
fn oversized_file_is_rejected() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let big = format!("func f()\n{}", "// padding\n".repeat(100_000));
    let file = write(dir.path(), "big.decl", &big);

    let output = run(&["emit", file.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("1MB limit"), "stderr: {}", stderr(&output));
}

#[test]
fn parse_json_dump() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write(dir.path(), "geometry.decl", GEOMETRY);

    let output = run(&["parse", file.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["items"].as_array().map(Vec::len), Some(5));
}

#[test]
fn types_lists_the_table() {
    let output = run(&["types", "--dialect", "c"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Swift.Int\tptrdiff_t\n"), "{out}");
    assert!(out.contains("Swift.UnsafeRawPointer\tconst void *\tnullable\n"), "{out}");
    assert!(!out.contains("// c"), "{out}");
}

#[test]
fn types_without_builtins_is_empty() {
    let output = run(&["types", "--no-builtins"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "// c\n\n// c++\n");
}

#[test]
fn format_values_are_per_subcommand() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write(dir.path(), "a.decl", "func f()");
    let path = file.to_str().unwrap();

    for args in [
        ["emit", path, "--format", "pretty"],
        ["parse", path, "--format", "text"],
    ] {
        let output = run(&args);
        assert_eq!(output.status.code(), Some(2), "{args:?} should be a usage error");
        assert!(stderr(&output).contains("invalid value"), "stderr: {}", stderr(&output));
    }

    assert!(run(&["emit", path, "--format", "text"]).status.success());
    assert!(run(&["parse", path, "--format", "pretty"]).status.success());
}
