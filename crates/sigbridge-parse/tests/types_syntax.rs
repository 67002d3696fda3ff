use sigbridge_ast::ast::{Item, TypeExpr};
use sigbridge_parse::parse_str;

fn param_type(src_ty: &str) -> TypeExpr {
    let src = format!("func f(x: {src_ty})");
    let mut module = parse_str("<test>", &src).expect("parse failed");
    match module.items.remove(0) {
        Item::Func(mut f) => f.params.remove(0).ty,
        other => panic!("expected func, got {other:?}"),
    }
}

#[test]
fn qualified_path() {
    match param_type("Swift.Int") {
        TypeExpr::Path { segments, .. } => {
            let names: Vec<_> = segments.iter().map(|s| s.text.as_str()).collect();
            assert_eq!(names, ["Swift", "Int"]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn generic_arguments() {
    match param_type("Dictionary<String, Array<Int>>") {
        TypeExpr::Path { generic_args, .. } => {
            assert_eq!(generic_args.len(), 2);
            assert!(matches!(generic_args[1], TypeExpr::Path { .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn parens_around_single_type_are_dropped() {
    assert!(matches!(param_type("(Int)"), TypeExpr::Path { .. }));
}

#[test]
fn empty_and_multi_tuples() {
    assert!(matches!(param_type("()"), TypeExpr::Tuple(ref e, _) if e.is_empty()));
    assert!(matches!(param_type("(Int, Bool)"), TypeExpr::Tuple(ref e, _) if e.len() == 2));
}

#[test]
fn postfix_sugar_stacks() {
    match param_type("Int?!") {
        TypeExpr::ImplicitlyUnwrapped(inner, _) => {
            assert!(matches!(*inner, TypeExpr::Optional(..)));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn array_and_dictionary_sugar() {
    assert!(matches!(param_type("[Int]"), TypeExpr::Array(..)));
    assert!(matches!(param_type("[String: Int]"), TypeExpr::Dictionary { .. }));
}

#[test]
fn optional_function_type() {
    match param_type("((Int) -> Void)?") {
        TypeExpr::Optional(inner, _) => assert!(matches!(*inner, TypeExpr::Function { .. })),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn spans_cover_the_type() {
    let src = "func f(x: [Int])";
    let module = parse_str("<test>", src).expect("parse");
    let Item::Func(f) = &module.items[0] else {
        panic!("expected func");
    };
    let span = f.params[0].ty.span();
    assert_eq!(&src[span.start as usize..span.end as usize], "[Int]");
}
