use lox_core::{CoreError, Interpreter, TokenKind, Value, lex, parse, run};

#[test]
fn rescanning_and_reparsing_is_deterministic() {
    let source = "(1 + 2) * -(3 - \"x\") /* note */ == nil // trailing";

    let first = lex(source);
    let second = lex(source);
    assert_eq!(first.tokens, second.tokens);
    assert_eq!(first.diagnostics, second.diagnostics);

    let first_tree = parse(&first.tokens);
    let second_tree = parse(&second.tokens);
    assert_eq!(first_tree.expr, second_tree.expr);
    assert!(first_tree.expr.is_some());
}

#[test]
fn token_sequence_always_ends_with_single_eof() {
    for source in ["", "1", "\"open", "@@@", "/* never closed", "a\nb\nc"] {
        let tokens = lex(source).tokens;
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        assert_eq!(eofs, 1, "source {source:?}");
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }
}

#[test]
fn unterminated_block_comment_is_silent() {
    let lexed = lex("/* never closed");
    assert!(lexed.diagnostics.is_empty());
    let kinds: Vec<TokenKind> = lexed.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Eof]);
}

#[test]
fn deep_nesting_fails_without_crashing() {
    let levels = lox_core::parser::MAX_DEPTH + 1;

    let grouped = format!("{}1{}", "(".repeat(levels), ")".repeat(levels));
    assert!(matches!(run(&grouped), Err(CoreError::Syntax(_))));

    let negated = format!("{}1", "-".repeat(50_000));
    assert!(matches!(run(&negated), Err(CoreError::Syntax(_))));

    let sum = vec!["1"; 10_000].join(" + ");
    assert!(matches!(run(&sum), Err(CoreError::Syntax(_))));
}

#[test]
fn evaluates_mixed_program() {
    let evaluation = run("\"ab\" + \"cd\" == \"abcd\"").expect("run");
    assert_eq!(evaluation.value, Value::Bool(true));

    let evaluation = run("-(-2.5) * 4 >= 10").expect("run");
    assert_eq!(evaluation.value, Value::Bool(true));
}

#[test]
fn multi_line_input_reports_correct_line() {
    let err = run("1 +\n\n  )").unwrap_err();
    assert_eq!(err.to_string(), "[line 2] Error at ')': expect expression");
}

#[test]
fn runtime_error_renders_at_operator() {
    let err = run("1 +\n-\"abc\"").unwrap_err();
    assert!(matches!(err, CoreError::Runtime(_)));
    assert_eq!(
        err.to_string(),
        "[line 1] Error at '-': \"abc\" is not a number"
    );
}

#[test]
fn independent_sessions_do_not_share_errors() {
    let mut failing = Interpreter::new();
    let mut clean = Interpreter::new();

    assert!(failing.run("1 +").is_err());
    assert!(clean.run("1 + 1").is_ok());

    assert!(failing.had_error());
    assert!(!clean.had_error());
}
