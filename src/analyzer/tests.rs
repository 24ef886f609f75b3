//! Unit tests for the analyzer module.
//!
//! This module contains tests for semantic analysis including:
//! - Scope resolution and the no-shadowing rule
//! - Declaration, assignment and call type checks
//! - Operator typing
//! - Collections, indexing, properties and comprehensions
//! - Control flow legality (break, return)
//! - Identifier replacement by entities

use crate::{
    ast::{
        ast::{NodeId, NodeKind, Program},
        types::{Type, BOOL, FLOAT, INT, STRING},
    },
    config::LanguageConfig,
    errors::errors::Error,
    parser::parser::parse_source,
};

use super::analyzer::{analyze, analyze_with_config};

fn analyze_source(source: &str) -> Result<Program, Error> {
    analyze(parse_source(source, Some("test.custom".to_string()))?)
}

fn error_name(source: &str) -> String {
    analyze_source(source)
        .unwrap_err()
        .get_error_name()
        .to_string()
}

fn assert_ok(source: &str) -> Program {
    match analyze_source(source) {
        Ok(program) => program,
        Err(error) => panic!("analysis of {:?} failed: {}", source, error),
    }
}

/// Initializer of the `n`th top-level declaration.
fn declaration_source(program: &Program, n: usize) -> NodeId {
    match program.ast.kind(program.body()[n]) {
        NodeKind::Declaration { source, .. } => *source,
        other => panic!("expected declaration, got {:?}", other),
    }
}

// Declarations and scopes

#[test]
fn test_declaration_checks_initializer_type() {
    assert_ok("int x = 1 float f = 1.5 bool b = true string s = \"s\"");
    assert_eq!(error_name("int x = \"hi\""), "TypeMismatch");
    assert_eq!(error_name("float f = 1"), "TypeMismatch");
}

#[test]
fn test_initializer_cannot_see_its_variable() {
    assert_eq!(error_name("int x = x"), "UndeclaredIdentifier");
}

#[test]
fn test_identifiers_are_replaced_by_entities() {
    let program = assert_ok("int x = 1 int y = x");

    let NodeKind::Declaration { target, .. } = program.ast.kind(program.body()[0]) else {
        panic!("expected declaration");
    };
    let reference = declaration_source(&program, 1);

    assert_eq!(reference, *target);
    assert!(matches!(
        program.ast.kind(reference),
        NodeKind::Variable(variable) if variable.name == "x" && variable.var_type == INT
    ));
}

#[test]
fn test_redeclaration_is_rejected() {
    assert_eq!(error_name("int x = 1 int x = 2"), "DuplicateDeclaration");
}

#[test]
fn test_redeclaration_of_ancestor_binding_is_rejected() {
    assert_eq!(
        error_name("int x = 1 while (true) { int x = 2 }"),
        "DuplicateDeclaration"
    );
    assert_eq!(
        error_name("int x = 1 void f() { string x = \"a\" }"),
        "DuplicateDeclaration"
    );
}

#[test]
fn test_sibling_scopes_may_reuse_names() {
    assert_ok("while (true) { int i = 0 } while (true) { int i = 1 }");
    assert_ok("if (true) { int a = 1 } else if (true) { int a = 2 } else { int a = 3 }");
}

#[test]
fn test_loop_variable_is_scoped_to_the_loop() {
    assert_ok("for (int i = 0; i < 3; i++) { print(\"tick\") }");
    assert_eq!(
        error_name("for (int i = 0; i < 3; i++) { } i++"),
        "UndeclaredIdentifier"
    );
}

#[test]
fn test_declare_before_use() {
    assert_eq!(
        error_name("int f() { return g() } int g() { return 1 }"),
        "UndeclaredIdentifier"
    );
}

#[test]
fn test_void_variables_are_rejected() {
    assert_eq!(error_name("void x = 1"), "VoidVariable");
    assert_eq!(error_name("int f(void a) { return 1 }"), "VoidVariable");
}

// Assignment

#[test]
fn test_assignment() {
    assert_ok("int x = 1 x = 2");
    assert_eq!(error_name("int x = 1 x = \"two\""), "TypeMismatch");
    assert_eq!(error_name("y = 1"), "UndeclaredIdentifier");
}

#[test]
fn test_functions_are_read_only() {
    assert_eq!(
        error_name("int f() { return 1 } f = 2"),
        "ReadOnlyAssignment"
    );
    assert_eq!(error_name("int f() { return 1 } f++"), "ReadOnlyAssignment");
}

#[test]
fn test_increment_requires_integer() {
    assert_ok("int i = 0 i++ i--");
    assert_eq!(error_name("float f = 1.0 f++"), "TypeMismatch");
}

// Functions

#[test]
fn test_function_call_type() {
    let program = assert_ok("int add(int a, int b) { return (a + b) } int sum = add(1, 2)");
    let call = declaration_source(&program, 1);

    assert_eq!(program.ast.ty(call), Some(&INT));
    let NodeKind::FunctionDeclaration { function, .. } = program.ast.kind(program.body()[0])
    else {
        panic!("expected function declaration");
    };
    assert_eq!(
        program.ast.ty(function.unwrap()),
        Some(&Type::function(vec![INT, INT], INT))
    );
}

#[test]
fn test_recursion() {
    assert_ok("int fact(int n) { return n < 2 ? 1 : n * fact(n - 1) }");
}

#[test]
fn test_parameter_named_like_its_function() {
    let program = assert_ok("int f(int f) { return f }");

    let NodeKind::FunctionDeclaration { params, body, .. } = program.ast.kind(program.body()[0])
    else {
        panic!("expected function declaration");
    };
    let NodeKind::Parameter { variable, .. } = program.ast.kind(params[0]) else {
        panic!("expected parameter");
    };
    let NodeKind::Block { body } = program.ast.kind(*body) else {
        panic!("expected block");
    };
    let NodeKind::Return { value } = program.ast.kind(body[0]) else {
        panic!("expected return");
    };
    assert_eq!(Some(*value), *variable);
    assert_eq!(program.ast.ty(*value), Some(&INT));

    assert_eq!(
        error_name("int f(int a) { int f = a return f }"),
        "DuplicateDeclaration"
    );
}

#[test]
fn test_call_checks() {
    let add = "int add(int a, int b) { return a + b } ";

    assert_eq!(error_name(&format!("{}add(1)", add)), "ArityMismatch");
    assert_eq!(error_name(&format!("{}add(1, 2.0)", add)), "TypeMismatch");
    assert_eq!(error_name("int x = 1 x()"), "NotCallable");
}

#[test]
fn test_stdlib_functions() {
    assert_ok("print(\"hello\") int n = length([1, 2])");
    assert_eq!(error_name("print(1)"), "TypeMismatch");
}

#[test]
fn test_configured_stdlib_names() {
    let config = LanguageConfig::from_json_str(r#"{ "print": "pres" }"#).unwrap();
    let parse = |source: &str| parse_source(source, None).unwrap();

    assert!(analyze_with_config(parse("pres(\"saluton\")"), &config).is_ok());
    let error = analyze_with_config(parse("print(\"hello\")"), &config).unwrap_err();
    assert_eq!(error.get_error_name(), "UndeclaredIdentifier");
}

// Control flow

#[test]
fn test_break_outside_loop() {
    assert_eq!(error_name("break"), "IllegalBreak");
    assert_eq!(error_name("if (true) { break }"), "IllegalBreak");
}

#[test]
fn test_break_inside_loop() {
    assert_ok("while (true) { break }");
    assert_ok("while (true) { if (true) { break } }");
}

#[test]
fn test_break_does_not_cross_function_boundary() {
    assert_eq!(
        error_name("while (true) { void f() { break } }"),
        "IllegalBreak"
    );
}

#[test]
fn test_return_rules() {
    assert_eq!(error_name("return 1"), "IllegalReturn");
    assert_eq!(error_name("return"), "IllegalReturn");
    assert_eq!(error_name("void f() { return 1 }"), "IllegalReturn");
    assert_eq!(error_name("int f() { return }"), "IllegalReturn");
    assert_eq!(error_name("int f() { return \"one\" }"), "TypeMismatch");
    assert_ok("void f() { return }");
}

#[test]
fn test_conditions_must_be_boolean() {
    assert_eq!(error_name("if (1) { }"), "TypeMismatch");
    assert_eq!(error_name("while (\"yes\") { }"), "TypeMismatch");
    assert_eq!(error_name("for (int i = 0; i; i++) { }"), "TypeMismatch");
}

// Operators

#[test]
fn test_binary_operators() {
    assert_ok("int x = 1 + 2 * 3 % 2 - 4 / 2 ^ 2");
    assert_ok("string s = \"a\" + \"b\"");
    assert_ok("bool b = 1 < 2 && \"a\" <= \"b\" || 1.5 == 2.5");
    assert_eq!(error_name("int x = 1 + 2.0"), "TypeMismatch");
    assert_eq!(error_name("bool b = true + false"), "TypeMismatch");
    assert_eq!(error_name("string s = \"a\" - \"b\""), "TypeMismatch");
    assert_eq!(error_name("bool b = 1 && true"), "TypeMismatch");
    assert_eq!(error_name("bool b = \"a\" == 1"), "TypeMismatch");
    assert_eq!(error_name("bool b = true < false"), "TypeMismatch");
}

#[test]
fn test_binary_result_types() {
    let program = assert_ok("float f = 2.0 ^ 3.0 bool b = [1] == [2]");

    assert_eq!(program.ast.ty(declaration_source(&program, 0)), Some(&FLOAT));
    assert_eq!(program.ast.ty(declaration_source(&program, 1)), Some(&BOOL));
}

#[test]
fn test_unary_operators() {
    assert_ok("int x = -1 float f = -2.5 bool b = !true");
    assert_eq!(error_name("int x = -true"), "TypeMismatch");
    assert_eq!(error_name("bool b = !1"), "TypeMismatch");
}

#[test]
fn test_conditional_branches_must_match() {
    assert_ok("int x = true ? 1 : 2");
    assert_eq!(error_name("int x = true ? 1 : \"a\""), "TypeMismatch");
}

// Collections

#[test]
fn test_array_elements_must_share_a_type() {
    let program = assert_ok("int[] a = [1, 2, 3]");
    assert_eq!(
        program.ast.ty(declaration_source(&program, 0)),
        Some(&Type::array(INT))
    );
    assert_eq!(error_name("int[] a = [1, \"x\"]"), "TypeMismatch");
}

#[test]
fn test_set_elements_must_be_distinct() {
    assert_ok("string{} s = {\"brie\", \"gouda\"}");
    assert_eq!(error_name("string{} s = {\"brie\", \"brie\"}"), "DuplicateElement");
    assert_eq!(error_name("int{} s = {-1, 2, -1}"), "DuplicateElement");
    assert_eq!(error_name("int a = 1 int{} s = {a, a}"), "DuplicateElement");
    assert_ok("int a = 1 int{} s = {a, 1, -1}");
}

#[test]
fn test_signed_zeros_are_the_same_element() {
    assert_eq!(error_name("float{} s = {0.0, -0.0}"), "DuplicateElement");
    assert_eq!(error_name("<float, int> d = {-0.0: 1, 0.0: 2}"), "DuplicateElement");
    assert_eq!(error_name("int{} s = {0, -0}"), "DuplicateElement");
    assert_ok("float{} s = {1.5, -1.5}");
}

#[test]
fn test_dict_literals() {
    let program = assert_ok("<int, string> d = {1: \"a\", 2: \"b\"}");
    assert_eq!(
        program.ast.ty(declaration_source(&program, 0)),
        Some(&Type::dict(INT, STRING))
    );
    assert_eq!(error_name("<int, string> d = {1: \"a\", 1: \"b\"}"), "DuplicateElement");
    assert_eq!(error_name("<int, string> d = {1: \"a\", \"2\": \"b\"}"), "TypeMismatch");
    assert_eq!(error_name("<int, string> d = {1: \"a\", 2: 3}"), "TypeMismatch");
}

#[test]
fn test_empty_literals_take_the_declared_type() {
    let program = assert_ok("int[] a = [] int{} s = {} <string, int> d = {}");

    assert_eq!(
        program.ast.ty(declaration_source(&program, 0)),
        Some(&Type::array(INT))
    );
    assert_eq!(
        program.ast.ty(declaration_source(&program, 1)),
        Some(&Type::set(INT))
    );
    assert_eq!(
        program.ast.ty(declaration_source(&program, 2)),
        Some(&Type::dict(STRING, INT))
    );
}

#[test]
fn test_empty_literals_reconcile_at_every_binding_site() {
    let program = assert_ok("int[] a = [1] a = [] int n = length([])");

    let NodeKind::Assignment { source, .. } = program.ast.kind(program.body()[1]) else {
        panic!("expected assignment");
    };
    assert_eq!(program.ast.ty(*source), Some(&Type::array(INT)));

    assert_ok("int{} f() { return {} }");
}

#[test]
fn test_empty_literal_must_fit_the_target() {
    assert_eq!(error_name("int x = {}"), "TypeMismatch");
    assert_eq!(error_name("int[] a = {}"), "TypeMismatch");
    assert_eq!(error_name("string{} s = []"), "TypeMismatch");
}

#[test]
fn test_nested_empty_literals_must_fit_the_element_type() {
    assert_eq!(error_name("int[] x = [{}]"), "TypeMismatch");
    assert_eq!(error_name("int y = [{}][0]"), "TypeMismatch");
    assert_eq!(error_name("<string, int[]> d = {\"a\": {}}"), "TypeMismatch");
    assert_eq!(error_name("bool b = true int[][] x = b ? [[1]] : [{}]"), "TypeMismatch");
}

#[test]
fn test_nested_empty_literals_take_the_element_type() {
    let program = assert_ok("int{}[] x = [{}] int[][] a = [[1], []] <string, int[]> d = {\"a\": []}");

    let NodeKind::Array { elements } = program.ast.kind(declaration_source(&program, 0)) else {
        panic!("expected array literal");
    };
    assert_eq!(program.ast.ty(elements[0]), Some(&Type::set(INT)));

    let outer = declaration_source(&program, 1);
    assert_eq!(program.ast.ty(outer), Some(&Type::array(Type::array(INT))));
    let NodeKind::Array { elements } = program.ast.kind(outer) else {
        panic!("expected array literal");
    };
    assert_eq!(program.ast.ty(elements[1]), Some(&Type::array(INT)));

    let NodeKind::Dict { entries } = program.ast.kind(declaration_source(&program, 2)) else {
        panic!("expected dict literal");
    };
    let NodeKind::KeyValue { value, .. } = program.ast.kind(entries[0]) else {
        panic!("expected entry");
    };
    assert_eq!(program.ast.ty(*value), Some(&Type::array(INT)));
}

#[test]
fn test_indexing() {
    let program = assert_ok("<int, string> d = {1: \"a\"} string s = d[1]");
    assert_eq!(program.ast.ty(declaration_source(&program, 1)), Some(&STRING));

    assert_eq!(
        error_name("<int, string> d = {1: \"a\"} string s = d[\"a\"]"),
        "IndexTypeMismatch"
    );
    assert_eq!(
        error_name("int[] a = [1] int x = a[\"0\"]"),
        "IndexTypeMismatch"
    );
    assert_eq!(error_name("int x = 1 int y = x[0]"), "NotIndexable");
    assert_ok("int{} s = {1} int x = s[0]");
}

#[test]
fn test_length_property() {
    assert_ok("int[] a = [1] int n = a.length string s = \"abc\" int m = s.length");
    assert_eq!(error_name("int x = 1 int n = x.length"), "UnknownProperty");
    assert_eq!(error_name("int[] a = [1] int n = a.size"), "UnknownProperty");
}

#[test]
fn test_list_comprehension() {
    let program = assert_ok("int[] a = [1, 2, 3] string[] b = [\"n\" for n in a if n > 1]");
    assert_eq!(
        program.ast.ty(declaration_source(&program, 1)),
        Some(&Type::array(STRING))
    );

    assert_eq!(
        error_name("int[] a = [1] int[] b = [n for n in a if n]"),
        "TypeMismatch"
    );
    assert_eq!(error_name("int a = 1 int[] b = [n for n in a]"), "TypeMismatch");
    assert_eq!(
        error_name("int[] a = [1] int[] b = [n for n in a] n++"),
        "UndeclaredIdentifier"
    );
}

#[test]
fn test_every_expression_is_typed() {
    let program = assert_ok("int x = (1 + 2) * 3");

    for id in 0..program.ast.len() {
        let id = NodeId(id);
        let is_expression = matches!(
            program.ast.kind(id),
            NodeKind::Binary { .. } | NodeKind::Literal(_) | NodeKind::Variable(_)
        );
        if is_expression {
            assert!(program.ast.ty(id).is_some(), "node {} has no type", id);
        }
    }
}
