//! Recursive-descent parser over a fixed precedence grammar:
//!
//! ```text
//! expression → equality
//! equality   → comparison ( ( "!=" | "==" ) comparison )*
//! comparison → term ( ( ">" | ">=" | "<" | "<=" ) term )*
//! term       → factor ( ( "-" | "+" ) factor )*
//! factor     → unary ( ( "/" | "*" ) unary )*
//! unary      → ( "!" | "-" ) unary | primary
//! primary    → NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
//! ```

use thiserror::Error;

use crate::ast::Expr;
use crate::diagnostic::{Diagnostic, Location};
use crate::lexer::{Token, TokenKind};
use crate::value::Value;

/// Signals that a grammar rule failed. The matching diagnostic has
/// already been recorded by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("parse error")]
pub struct ParseError;

type ParseOutcome = Result<Expr, ParseError>;

/// Result of parsing one expression unit.
///
/// `expr` may be present even when `diagnostics` is not empty (for
/// instance a group missing its `)`); callers must treat any
/// diagnostic as failure of the whole unit.
#[derive(Debug)]
pub struct ParseResult {
    pub expr: Option<Expr>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a token sequence into a single expression tree.
pub fn parse(tokens: &[Token]) -> ParseResult {
    let mut parser = Parser::new(tokens);
    let expr = match parser.expression() {
        Ok(expr) => {
            if !parser.is_at_end() {
                let _ = parser.error_at_current("expect end of expression");
            }
            Some(expr)
        }
        Err(ParseError) => None,
    };

    ParseResult {
        expr,
        diagnostics: parser.into_diagnostics(),
    }
}

const BINARY_EQUALITY: &[TokenKind] = &[TokenKind::BangEqual, TokenKind::EqualEqual];
const BINARY_COMPARISON: &[TokenKind] = &[
    TokenKind::Greater,
    TokenKind::GreaterEqual,
    TokenKind::Less,
    TokenKind::LessEqual,
];
const BINARY_TERM: &[TokenKind] = &[TokenKind::Minus, TokenKind::Plus];
const BINARY_FACTOR: &[TokenKind] = &[TokenKind::Slash, TokenKind::Star];
const UNARY: &[TokenKind] = &[TokenKind::Bang, TokenKind::Minus];

/// Deepest tree the parser will build. Groups, unary operators and each
/// binary fold count one level, so evaluating, printing and dropping an
/// accepted tree stays within a default thread stack.
pub const MAX_DEPTH: usize = 200;

/// Cursor over a token sequence. The cursor only moves forward.
pub struct Parser<'t> {
    tokens: &'t [Token],
    current: usize,
    /// Stand-in for a sequence that is missing its terminal token.
    eof: Token,
    depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        let line = tokens.last().map_or(0, |token| token.line);
        Parser {
            tokens,
            current: 0,
            eof: Token::eof(line),
            depth: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn expression(&mut self) -> ParseOutcome {
        self.equality()
    }

    fn equality(&mut self) -> ParseOutcome {
        self.left_assoc(BINARY_EQUALITY, Self::comparison)
    }

    fn comparison(&mut self) -> ParseOutcome {
        self.left_assoc(BINARY_COMPARISON, Self::term)
    }

    fn term(&mut self) -> ParseOutcome {
        self.left_assoc(BINARY_TERM, Self::factor)
    }

    fn factor(&mut self) -> ParseOutcome {
        self.left_assoc(BINARY_FACTOR, Self::unary)
    }

    /// One left-associative binary level: `operand ( op operand )*`,
    /// folded into a left-nested tree.
    fn left_assoc(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> ParseOutcome,
    ) -> ParseOutcome {
        let depth = self.depth;
        let folded = self.fold_left(operators, operand);
        self.depth = depth;
        folded
    }

    fn fold_left(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> ParseOutcome,
    ) -> ParseOutcome {
        let mut expr = operand(self)?;
        while self.matches(operators) {
            let operator = self.previous().clone();
            self.descend()?;
            let right = operand(self)?;
            expr = Expr::binary(expr, operator, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ParseOutcome {
        if self.matches(UNARY) {
            let operator = self.previous().clone();
            let operand = self.nested(Self::unary)?;
            return Ok(Expr::unary(operator, operand));
        }
        self.primary()
    }

    fn primary(&mut self) -> ParseOutcome {
        if self.matches(&[TokenKind::False]) {
            return Ok(Expr::Literal(Value::Bool(false)));
        }
        if self.matches(&[TokenKind::True]) {
            return Ok(Expr::Literal(Value::Bool(true)));
        }
        if self.matches(&[TokenKind::Nil]) {
            return Ok(Expr::Literal(Value::Nil));
        }
        if self.matches(&[TokenKind::Number, TokenKind::String]) {
            let value = self
                .previous()
                .literal
                .clone()
                .map_or(Value::Nil, Value::from);
            return Ok(Expr::Literal(value));
        }
        if self.matches(&[TokenKind::LeftParen]) {
            let inner = self.nested(Self::expression)?;
            // A missing ')' is reported but the group is still returned.
            let _ = self.consume(TokenKind::RightParen, "expect ')' after expression");
            return Ok(Expr::grouping(inner));
        }

        Err(self.error_at_current("expect expression"))
    }

    /// Discard tokens until just past a `;` or just before a keyword
    /// that starts a new unit.
    pub fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn nested(&mut self, rule: fn(&mut Self) -> ParseOutcome) -> ParseOutcome {
        self.descend()?;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_at_current("too much nesting"));
        }
        self.depth += 1;
        Ok(())
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<&Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(self.error_at_current(message))
    }

    fn error_at_current(&mut self, message: &str) -> ParseError {
        let token = self.peek();
        let location = if token.kind == TokenKind::Eof {
            Location::AtEnd
        } else {
            Location::At(token.lexeme.clone())
        };
        let diagnostic = Diagnostic::error(token.line, message).with_location(location);
        self.diagnostics.push(diagnostic);
        ParseError
    }

    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|kind| self.check(*kind)) {
            self.advance();
            return true;
        }
        false
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.eof)
    }

    fn previous(&self) -> &Token {
        self.current
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .unwrap_or(&self.eof)
    }
}
