use thiserror::Error;

use crate::diagnostic::{Diagnostic, Diagnostics, Location};
use crate::lexer::{Token, TokenKind};

/// An operator was applied to operands of the wrong kind.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct RuntimeError {
    /// Operator token, kept for line and location context.
    pub operator: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(operator: &Token, message: impl Into<String>) -> Self {
        RuntimeError {
            operator: operator.clone(),
            message: message.into(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let location = if self.operator.kind == TokenKind::Eof {
            Location::AtEnd
        } else {
            Location::At(self.operator.lexeme.clone())
        };
        Diagnostic::error(self.operator.line, self.message.clone()).with_location(location)
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    /// Scanning or parsing failed; every diagnostic for the unit is kept.
    #[error("{0}")]
    Syntax(Diagnostics),
    #[error("{}", .0.to_diagnostic())]
    Runtime(#[from] RuntimeError),
}

impl CoreError {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            CoreError::Syntax(diagnostics) => diagnostics.iter().cloned().collect(),
            CoreError::Runtime(err) => vec![err.to_diagnostic()],
        }
    }
}
