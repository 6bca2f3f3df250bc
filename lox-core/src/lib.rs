//! Core pipeline for the Lox expression language.
//!
//! The pipeline is:
//!
//!   source text
//!     -> lexer       (tokens)
//!     -> parser      (expression tree)
//!     -> evaluator   (runtime value)
//!
//! Every stage reports problems as `Diagnostic`s instead of printing,
//! so hosts (the CLI, tests, embedders) decide how to surface them.

// ---------------------------------------------------------------------
// Error handling and diagnostics
// ---------------------------------------------------------------------

pub mod diagnostic;
pub mod error;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod lexer;
pub mod parser;
pub mod ast;
pub mod printer;

// ---------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------

pub mod value;
pub mod evaluator;
pub mod interpreter;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use ast::Expr;
pub use diagnostic::{Diagnostic, Diagnostics, Location};
pub use error::{CoreError, RuntimeError};
pub use evaluator::evaluate;
pub use interpreter::{Evaluation, Interpreter, run};
pub use lexer::{Token, TokenKind, lex};
pub use parser::parse;
pub use value::Value;
