// Syntax error recovery and parser limits

use minic::constants::{MAX_ERRORS, MAX_NESTING_DEPTH};
use minic::parser::{parse_source, parse_tokens, Lexer, Parser, ParserConfig, SyntaxErrorKind};

/// Inputs that exercise every recovery path
const MALFORMED: &[&str] = &[
    "",
    ";;;;",
    "}}}}",
    "{{{{",
    "((((",
    "int",
    "int int int",
    "x",
    "x =",
    "x = = = ;",
    "if",
    "if (",
    "if ( )",
    "if (x",
    "while (x) {",
    "repeat {",
    "repeat { } until",
    "repeat { } until (",
    "print",
    "factorial(",
    "a[",
    "a[1",
    "int a[",
    "int a[1",
    "@ # $ % ^ &",
    "12ab 34cd = 1;",
    "/* unterminated",
    "x = 1 + + + 2;",
    "float x; char y;",
    "until until until",
    ") ] ( [",
];

#[test]
fn test_malformed_inputs_terminate() {
    for source in MALFORMED {
        let mut parser = Parser::new(source);
        parser.parse();
        // Each statement attempt consumes a token, so errors never exceed tokens
        let token_count = Lexer::new(source).tokenize().len();
        assert!(
            parser.error_count() <= token_count,
            "{:?}: {} errors for {} tokens",
            source,
            parser.error_count(),
            token_count
        );
    }
}

#[test]
fn test_malformed_inputs_report_errors() {
    for source in MALFORMED.iter().skip(1) {
        let (_, errors) = parse_source(source);
        assert!(!errors.is_empty(), "no error for {:?}", source);
    }

    // Empty input is a valid empty program
    assert!(parse_source("").1.is_empty());
}

#[test]
fn test_concatenated_malformed_input_terminates() {
    let source = MALFORMED.join("\n").repeat(20);
    let (_, errors) = parse_source(&source);
    assert!(!errors.is_empty());
    assert!(errors.len() <= MAX_ERRORS);
}

#[test]
fn test_error_capacity_counts_overflow() {
    let source = "} ".repeat(MAX_ERRORS + 10);
    let mut parser = Parser::new(&source);
    parser.parse();

    assert_eq!(parser.error_count(), MAX_ERRORS);
    assert!(parser.diagnostics().is_truncated());
    assert_eq!(parser.diagnostics().dropped(), 10);

    let report = parser.diagnostics().to_string();
    assert!(report.contains("... 10 more not shown"));
}

#[test]
fn test_custom_capacity() {
    let config = ParserConfig {
        max_errors: 3,
        ..ParserConfig::default()
    };
    let mut parser = Parser::with_config(Lexer::new("} } } } } } }"), config);
    parser.parse();

    assert_eq!(parser.error_count(), 3);
    assert_eq!(parser.diagnostics().dropped(), 4);
}

#[test]
fn test_deep_block_nesting_is_rejected_not_overflowed() {
    let depth = MAX_NESTING_DEPTH * 4;
    let source = format!("{}print 1;{}", "{".repeat(depth), "}".repeat(depth));
    let mut parser = Parser::new(&source);
    parser.parse();

    assert!(parser.has_errors());
    assert_eq!(parser.errors()[0].kind, SyntaxErrorKind::NestingTooDeep);
}

#[test]
fn test_deep_if_chain_is_rejected_not_overflowed() {
    let source = format!("{}print 1;", "if (1) ".repeat(MAX_NESTING_DEPTH * 2));
    let (_, errors) = parse_source(&source);

    assert!(errors
        .iter()
        .any(|e| e.kind == SyntaxErrorKind::NestingTooDeep));
}

#[test]
fn test_long_operator_chain_is_rejected_not_overflowed() {
    let source = format!("int x; x = 1{}; print x;", " + 1".repeat(50_000));
    let (program, errors) = parse_source(&source);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SyntaxErrorKind::NestingTooDeep);

    // The surviving tree is shallow enough to walk and drop
    let report = minic::semantic::analyze(&program);
    assert_eq!(program.statements().unwrap().len(), 2);
    assert!(report.passed);
    drop(program);
}

#[test]
fn test_operator_chain_within_limit_is_accepted() {
    let source = format!("int x; x = 1{}; print x;", " + 1".repeat(MAX_NESTING_DEPTH / 2));
    let (program, errors) = parse_source(&source);
    assert!(errors.is_empty(), "{:?}", errors);
    assert!(minic::semantic::analyze(&program).passed);
}

#[test]
fn test_nesting_within_limit_is_accepted() {
    let depth = 50;
    let source = format!(
        "int x; x = {}1{}; {}print x;{}",
        "(".repeat(depth),
        ")".repeat(depth),
        "{".repeat(depth),
        "}".repeat(depth)
    );
    let (_, errors) = parse_source(&source);
    assert!(errors.is_empty(), "{:?}", errors);
}

#[test]
fn test_token_sequence_without_eof() {
    let mut tokens = Lexer::new("int x; x = 1").tokenize();
    tokens.pop(); // drop Eof

    let (program, errors) = parse_tokens(tokens);
    assert_eq!(program.statements().unwrap().len(), 2);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SyntaxErrorKind::MissingSemicolon);
}

#[test]
fn test_error_messages_and_positions() {
    let (_, errors) = parse_source("int x;\nx = 5\nprint x;");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Missing semicolon after '5'");
    assert_eq!(errors[0].location.line, 2);
    assert_eq!(errors[0].location.column, 6);
}
