//! Integration tests for end-to-end compilation.
//!
//! These tests verify that the complete pipeline works from source code
//! through tokenization, parsing and analysis to JavaScript generation.

use customc::{
    analyzer::analyzer::analyze,
    ast::{
        ast::NodeKind,
        types::{Type, BOOL, INT, STRING},
    },
    compile, compile_with_config,
    config::LanguageConfig,
    lexer::lexer::tokenize,
    parser::parser::{parse, parse_source},
    render_error,
};

fn error_name(source: &str) -> String {
    compile(source, Some("test.custom".to_string()))
        .unwrap_err()
        .get_error_name()
        .to_string()
}

#[test]
fn test_type_equivalence_properties() {
    let types = [
        INT,
        STRING,
        Type::array(INT),
        Type::set(INT),
        Type::dict(STRING, Type::array(BOOL)),
        Type::function(vec![INT], STRING),
    ];

    for a in &types {
        assert!(a.is_equivalent(a), "{} should be equivalent to itself", a);
        for b in &types {
            assert_eq!(a.is_equivalent(b), b.is_equivalent(a));
        }
    }
    assert!(!Type::array(INT).is_equivalent(&Type::set(INT)));
}

#[test]
fn test_declaration_must_be_assignable() {
    assert!(compile("int x = 1", None).is_ok());
    assert_eq!(error_name("int x = \"hi\""), "TypeMismatch");
}

#[test]
fn test_no_shadowing() {
    assert_eq!(
        error_name("int x = 1 while (true) { if (true) { bool x = false } }"),
        "DuplicateDeclaration"
    );
}

#[test]
fn test_break_placement() {
    assert_eq!(error_name("break"), "IllegalBreak");
    assert_eq!(
        error_name("while (true) { void f() { break } }"),
        "IllegalBreak"
    );
}

#[test]
fn test_collection_literal_errors() {
    assert_eq!(error_name("string{} s = {\"brie\", \"brie\"}"), "DuplicateElement");
    assert_eq!(error_name("int[] a = [1, \"x\"]"), "TypeMismatch");
}

#[test]
fn test_function_round_trip() {
    let source = "int add(int a, int b) { return (a + b); } add(1,2);";

    let program = analyze(parse_source(source, None).unwrap()).unwrap();
    let call = program.body()[1];
    assert!(matches!(program.ast.kind(call), NodeKind::Call { .. }));
    assert_eq!(program.ast.ty(call), Some(&INT));

    assert_eq!(
        compile(source, None).unwrap(),
        "function add(a, b) {\n  return (a + b);\n}\nadd(1, 2);\n"
    );
}

#[test]
fn test_loop_round_trip() {
    assert_eq!(
        compile("int i = 0; while (i < 10) { i++; } i--;", None).unwrap(),
        "let i = 0;\nwhile (i < 10) {\n  i++;\n}\ni--;\n"
    );
}

#[test]
fn test_dictionary_indexing() {
    let dict = "<int, string> d = {1: \"one\", 2: \"two\"} ";

    assert_eq!(
        error_name(&format!("{}string s = d[\"one\"]", dict)),
        "IndexTypeMismatch"
    );

    let program = analyze(parse_source(&format!("{}string s = d[1]", dict), None).unwrap()).unwrap();
    let NodeKind::Declaration { source, .. } = program.ast.kind(program.body()[1]) else {
        panic!("expected declaration");
    };
    assert_eq!(program.ast.ty(*source), Some(&STRING));
}

#[test]
fn test_larger_program() {
    let source = r#"
        // Sum the even squares
        int square(int n) { return n ^ 2 }

        int[] numbers = [1, 2, 3, 4, 5]
        int[] evens = [square(n) for n in numbers if n % 2 == 0]
        int total = 0
        for (int i = 0; i < evens.length; i++) {
            total = total + evens[i]
        }
        /* report */
        if (total > 10) {
            print("big")
        } else {
            print("small")
        }
    "#;

    let expected = [
        "function square(n) {",
        "  return Math.trunc(n ** 2);",
        "}",
        "let numbers = [1, 2, 3, 4, 5];",
        "let evens = numbers.filter((n) => ((n % 2) === 0)).map((n) => square(n));",
        "let total = 0;",
        "for (let i = 0; i < evens.length; i++) {",
        "  total = (total + evens[i]);",
        "}",
        "if (total > 10) {",
        "  console.log(\"big\");",
        "} else {",
        "  console.log(\"small\");",
        "}",
    ];
    assert_eq!(compile(source, None).unwrap(), expected.join("\n") + "\n");
}

#[test]
fn test_configured_keywords() {
    let config = LanguageConfig::from_json_str(
        r#"{"if": "se", "else": "alie", "int": "entjero", "print": "pres", "true": "vera"}"#,
    )
    .unwrap();
    let source = "entjero x = 1 se (vera) { pres(\"jes\") } alie { x++ }";

    assert_eq!(
        compile_with_config(source, None, &config).unwrap(),
        "let x = 1;\nif (true) {\n  console.log(\"jes\");\n} else {\n  x++;\n}\n"
    );
    assert!(compile_with_config("int x = 1", None, &config).is_err());
}

#[test]
fn test_no_output_on_failure() {
    assert!(compile("print(\"before\") int x = y", None).is_err());
}

#[test]
fn test_error_rendering() {
    let source = "int total = 0\ntotal = \"zero\"\n";
    let error = compile(source, Some("main.custom".to_string())).unwrap_err();

    assert_eq!(error.get_position().0, 22);
    let rendered = render_error(&error, source);
    assert!(rendered.starts_with("Error: TypeMismatch (Expected type `int`, received `string`)\n"));
    assert!(rendered.contains("-> main.custom\n"));
    assert!(rendered.contains("2 | total = \"zero\"\n"));
}

#[test]
fn test_tree_dump() {
    let tokens = tokenize("int x = 1 + 2", None).unwrap();
    let program = parse(tokens, std::rc::Rc::new("shell".to_string())).unwrap();
    let parsed = program.to_string();
    assert!(parsed.contains("Binary op=+"));
    assert!(parsed.contains("Identifier name=x"));
    assert!(parsed
        .lines()
        .filter(|line| line.contains("Literal") || line.contains("Binary"))
        .all(|line| !line.contains("type=")));

    let analyzed = analyze(program).unwrap().to_string();
    assert!(analyzed.contains("Variable name=x type=int"));
    assert!(analyzed
        .lines()
        .filter(|line| line.contains("Literal") || line.contains("Binary"))
        .all(|line| line.ends_with("type=int")));
}
