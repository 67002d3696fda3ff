//! Type nesting limits.

use sigbridge_parse::{parse_str, MAX_TYPE_DEPTH};

fn nested_array(depth: usize) -> String {
    let mut src = String::from("func f(x: ");
    for _ in 0..depth {
        src.push('[');
    }
    src.push_str("Int");
    for _ in 0..depth {
        src.push(']');
    }
    src.push(')');
    src
}

#[test]
fn moderate_nesting_works() {
    assert!(parse_str("<test>", &nested_array(50)).is_ok());
}

#[test]
fn nesting_past_limit_is_rejected() {
    let err = parse_str("<test>", &nested_array(MAX_TYPE_DEPTH + 1))
        .unwrap_err()
        .to_string();
    assert!(err.contains("type nesting exceeds"), "{err}");
}

#[test]
fn limit_is_reasonable() {
    assert!(MAX_TYPE_DEPTH >= 64);
}

fn postfix_chain(count: usize) -> String {
    format!("func f(a: Int{})", "?".repeat(count))
}

#[test]
fn postfix_sugar_within_limit_parses() {
    assert!(parse_str("<test>", &postfix_chain(MAX_TYPE_DEPTH - 1)).is_ok());
    assert!(parse_str("<test>", "func f(a: Int?!) -> [Int!]?").is_ok());
}

#[test]
fn postfix_sugar_past_limit_is_rejected() {
    let err = parse_str("<test>", &postfix_chain(MAX_TYPE_DEPTH))
        .unwrap_err()
        .to_string();
    assert!(err.contains("type nesting exceeds"), "{err}");

    // A very long chain fails the same way instead of building a deep tree.
    let err = parse_str("<test>", &postfix_chain(20_000))
        .unwrap_err()
        .to_string();
    assert!(err.contains("type nesting exceeds"), "{err}");
}

#[test]
fn postfix_sugar_counts_enclosing_nesting() {
    let depth = MAX_TYPE_DEPTH / 2;
    let src = format!(
        "func f(a: {}Int{}{})",
        "[".repeat(depth),
        "?".repeat(MAX_TYPE_DEPTH - depth),
        "]".repeat(depth)
    );
    let err = parse_str("<test>", &src).unwrap_err().to_string();
    assert!(err.contains("type nesting exceeds"), "{err}");
}
