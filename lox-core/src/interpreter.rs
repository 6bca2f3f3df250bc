//! Pipeline driver: source text -> tokens -> tree -> value.

use crate::ast::Expr;
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::error::CoreError;
use crate::evaluator::evaluate;
use crate::lexer::{LexResult, lex};
use crate::parser::parse;
use crate::value::Value;

/// A successfully evaluated unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub expr: Expr,
    pub value: Value,
}

/// Run one expression unit with a fresh diagnostic sink.
pub fn run(source: &str) -> Result<Evaluation, CoreError> {
    Interpreter::new().run(source)
}

/// A session that keeps one diagnostic sink across units.
///
/// The sink's error latch is only cleared by [`Interpreter::reset`], so
/// a host can run several units and check `had_error` once at the end.
#[derive(Debug, Default)]
pub struct Interpreter {
    diagnostics: Diagnostics,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn had_error(&self) -> bool {
        self.diagnostics.had_error()
    }

    pub fn reset(&mut self) {
        self.diagnostics.reset();
    }

    /// Scan a unit. Scanner diagnostics are recorded in the session
    /// sink and also returned with the tokens, which always end in
    /// `Eof` even when some input was skipped.
    pub fn scan(&mut self, source: &str) -> LexResult {
        let lexed = lex(source);
        self.diagnostics.extend(lexed.diagnostics.iter().cloned());
        lexed
    }

    /// Scan and parse a unit. Parsing is skipped when scanning failed.
    pub fn parse(&mut self, source: &str) -> Result<Expr, CoreError> {
        let lexed = self.scan(source);
        fail_on(lexed.diagnostics)?;

        let parsed = parse(&lexed.tokens);
        self.diagnostics.extend(parsed.diagnostics.iter().cloned());
        fail_on(parsed.diagnostics)?;
        parsed
            .expr
            .ok_or_else(|| CoreError::Syntax(Diagnostics::new()))
    }

    /// Scan, parse and evaluate a unit.
    pub fn run(&mut self, source: &str) -> Result<Evaluation, CoreError> {
        let expr = self.parse(source)?;
        match evaluate(&expr) {
            Ok(value) => Ok(Evaluation { expr, value }),
            Err(err) => {
                self.diagnostics.report(err.to_diagnostic());
                Err(CoreError::Runtime(err))
            }
        }
    }
}

/// Any diagnostic from a stage fails the unit.
fn fail_on(reported: Vec<Diagnostic>) -> Result<(), CoreError> {
    if reported.is_empty() {
        return Ok(());
    }
    Err(CoreError::Syntax(reported.into_iter().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    #[test]
    fn evaluates_source_end_to_end() {
        let evaluation = run("3 + 5").expect("run");
        assert_eq!(evaluation.value, Value::Number(8.0));
        assert_eq!(evaluation.expr.to_string(), "(+ 3 5)");
    }

    #[test]
    fn scan_errors_skip_parsing() {
        // `#` is bad input; the dangling `+` would be a parse error too.
        let err = run("1 # +").unwrap_err();
        let CoreError::Syntax(diagnostics) = err else {
            panic!("expected syntax error");
        };
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.to_string(),
            "[line 0] Error: unexpected character: #"
        );
    }

    #[test]
    fn parse_errors_are_syntax_errors() {
        let err = run("(1 +").unwrap_err();
        assert!(matches!(err, CoreError::Syntax(_)));
        assert_eq!(err.to_string(), "[line 0] Error at end: expect expression");
    }

    #[test]
    fn runtime_errors_carry_the_operator() {
        let err = run("\"a\" * 2").unwrap_err();
        match err {
            CoreError::Runtime(runtime) => {
                assert_eq!(runtime.operator.kind, TokenKind::Star);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn session_latches_errors_until_reset() {
        let mut session = Interpreter::new();
        assert!(session.run("1 + 1").is_ok());
        assert!(!session.had_error());

        assert!(session.run("-nil").is_err());
        assert!(session.had_error());

        // A later success does not clear the latch.
        assert!(session.run("2").is_ok());
        assert!(session.had_error());
        assert_eq!(session.diagnostics().len(), 1);

        session.reset();
        assert!(!session.had_error());
    }

    #[test]
    fn scan_returns_terminated_sequence() {
        let mut session = Interpreter::new();
        let lexed = session.scan("1 + 2");
        assert!(lexed.diagnostics.is_empty());
        assert_eq!(lexed.tokens.len(), 4);
        assert_eq!(lexed.tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        assert!(!session.had_error());
    }

    #[test]
    fn scan_keeps_tokens_around_bad_input() {
        let mut session = Interpreter::new();
        let lexed = session.scan("1 @ 2");
        let kinds: Vec<TokenKind> = lexed.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof]
        );
        assert_eq!(lexed.diagnostics.len(), 1);
        assert!(session.had_error());
        assert_eq!(session.diagnostics().len(), 1);
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let levels = crate::parser::MAX_DEPTH + 1;
        let source = format!("{}1{}", "(".repeat(levels), ")".repeat(levels));
        let err = run(&source).unwrap_err();
        assert!(matches!(err, CoreError::Syntax(_)));
        assert!(err.to_string().ends_with("too much nesting"));
    }
}
