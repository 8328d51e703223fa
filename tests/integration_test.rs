// Integration tests for the minic front end

use minic::parser::{parse_source, AstNode, Parser, SyntaxErrorKind};
use minic::semantic::{analyze, SemanticAnalyzer, SemanticErrorKind};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parse, assert no syntax errors, then analyze
fn check(source: &str) -> minic::semantic::AnalysisReport {
    let (program, syntax_errors) = parse_source(source);
    assert!(
        syntax_errors.is_empty(),
        "Syntax errors: {:?}",
        syntax_errors
    );
    analyze(&program)
}

#[test]
fn test_full_program_passes() {
    init_logging();
    let source = r#"
        // sum the first n factorials into an array
        int n;
        int i;
        int total;
        int fact[5];

        n = 5;
        i = 0;
        total = 0;
        while (i < n) {
            fact[i] = factorial(i + 1);
            total = total + fact[i];
            i = i + 1;
        }

        repeat {
            total = total - 1;
        } until (total == 0);

        if (total != 0) print total;
        /* done */
        print fact[4];
    "#;

    let report = check(source);
    assert!(report.passed, "Errors: {:?}", report.errors);
    assert!(report.warnings.is_empty(), "Warnings: {:?}", report.warnings);
}

#[test]
fn test_declared_and_assigned_if_program() {
    let report = check("int x; x = 1; if (x == 1) { print x; }");
    assert!(report.passed);
    assert!(report.errors.is_empty());
}

#[test]
fn test_uninitialized_read_is_reported_but_passes() {
    let report = check("int x; print x;");
    assert!(report.passed);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].kind, SemanticErrorKind::Uninitialized);
    assert_eq!(
        report.warnings[0].message,
        "Variable 'x' may be used uninitialized"
    );
}

#[test]
fn test_redeclaration_vs_shadowing() {
    let report = check("int x; int x;");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, SemanticErrorKind::Redeclared);

    let report = check("int x; x = 1; if (x) { int x; x = 2; print x; }");
    assert!(report.passed);
    assert!(report.errors.is_empty());
}

#[test]
fn test_scope_exit_restores_outer_symbol() {
    // The inner array shadows x; after the block x is a scalar again
    let report = check("int x; x = 1; while (x < 2) { int x[3]; x[0] = 1; } x = x + 1;");
    assert!(report.passed, "Errors: {:?}", report.errors);
}

#[test]
fn test_array_bounds() {
    let report = check("int a[3]; a[5] = 1;");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, SemanticErrorKind::ArrayIndexOutOfBounds);

    let report = check("int a[3]; int i; i = 2; a[i] = 1;");
    assert!(report.errors.is_empty());
}

#[test]
fn test_semantic_error_positions() {
    let report = check("int a;\n\nprint   b;");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].location.line, 3);
    assert_eq!(report.errors[0].location.column, 9);
}

#[test]
fn test_syntax_errors_are_all_reported() {
    let source = "int x\nprint 1;\nx = ;\nwhile (x) print x;\nprint x;";
    let mut parser = Parser::new(source);
    let program = parser.parse();

    let kinds: Vec<SyntaxErrorKind> = parser.errors().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxErrorKind::MissingSemicolon,
            SyntaxErrorKind::InvalidExpression,
            SyntaxErrorKind::MissingBlockBraces,
        ]
    );

    // The declaration with the missing semicolon and the final print survive
    let statements = program.statements().unwrap();
    assert!(matches!(statements[0], AstNode::VarDecl { .. }));
    assert!(matches!(statements.last(), Some(AstNode::Print { .. })));
}

#[test]
fn test_repeated_runs_are_identical() {
    let source = "int a[2]; a[2] = b; print a;";
    let mut parser = Parser::new(source);
    let first_tree = parser.parse();
    let second_tree = parser.parse();
    assert_eq!(first_tree, second_tree);

    let mut analyzer = SemanticAnalyzer::new();
    analyzer.analyze(&first_tree);
    let first = analyzer.report();
    analyzer.analyze(&second_tree);
    assert_eq!(first, analyzer.report());
    assert_eq!(first.errors.len(), 3);
}

#[test]
fn test_ast_display() {
    let (program, _) = parse_source("repeat { print 1; } until (1 < 2);");
    let rendered = program.to_string();
    assert_eq!(
        rendered,
        "Program\n  Repeat\n    Block\n      Print\n        Number: 1\n    BinaryOp: <\n      Number: 1\n      Number: 2\n"
    );
}
