//! Tree-walking evaluation of expression trees.

use crate::ast::Expr;
use crate::error::RuntimeError;
use crate::lexer::{Token, TokenKind};
use crate::value::Value;

/// Evaluate an expression tree to a value.
///
/// Children are evaluated before their parent, left operand before
/// right. The first type error aborts the whole evaluation.
pub fn evaluate(expr: &Expr) -> Result<Value, RuntimeError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Grouping(inner) => evaluate(inner),
        Expr::Unary { operator, operand } => {
            let operand = evaluate(operand)?;
            unary(operator, operand)
        }
        Expr::Binary {
            left,
            operator,
            right,
        } => {
            let left = evaluate(left)?;
            let right = evaluate(right)?;
            binary(operator, left, right)
        }
    }
}

fn unary(operator: &Token, operand: Value) -> Result<Value, RuntimeError> {
    match operator.kind {
        TokenKind::Minus => match operand {
            Value::Number(value) => Ok(Value::Number(-value)),
            other => Err(RuntimeError::new(
                operator,
                format!("{} is not a number", describe(&other)),
            )),
        },
        TokenKind::Bang => Ok(Value::Bool(!operand.is_truthy())),
        _ => Err(RuntimeError::new(
            operator,
            format!("'{}' is not a unary operator", operator.lexeme),
        )),
    }
}

fn binary(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match operator.kind {
        TokenKind::Minus => arithmetic(operator, left, right, |l, r| l - r),
        TokenKind::Slash => arithmetic(operator, left, right, |l, r| l / r),
        TokenKind::Star => arithmetic(operator, left, right, |l, r| l * r),
        TokenKind::Plus => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
            (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
            (left, right) => Err(RuntimeError::new(
                operator,
                format!(
                    "operands must be two numbers or two strings, got {} and {}",
                    describe(&left),
                    describe(&right)
                ),
            )),
        },
        TokenKind::Greater => compare(operator, left, right, |l, r| l > r),
        TokenKind::GreaterEqual => compare(operator, left, right, |l, r| l >= r),
        TokenKind::Less => compare(operator, left, right, |l, r| l < r),
        TokenKind::LessEqual => compare(operator, left, right, |l, r| l <= r),
        TokenKind::BangEqual => Ok(Value::Bool(left != right)),
        TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
        _ => Err(RuntimeError::new(
            operator,
            format!("'{}' is not a binary operator", operator.lexeme),
        )),
    }
}

fn arithmetic(
    operator: &Token,
    left: Value,
    right: Value,
    op: impl FnOnce(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    let (l, r) = number_operands(operator, &left, &right)?;
    Ok(Value::Number(op(l, r)))
}

fn compare(
    operator: &Token,
    left: Value,
    right: Value,
    predicate: impl FnOnce(f64, f64) -> bool,
) -> Result<Value, RuntimeError> {
    let (l, r) = number_operands(operator, &left, &right)?;
    Ok(Value::Bool(predicate(l, r)))
}

fn number_operands(
    operator: &Token,
    left: &Value,
    right: &Value,
) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
        _ => Err(RuntimeError::new(
            operator,
            format!(
                "{} or {} is not a number",
                describe(left),
                describe(right)
            ),
        )),
    }
}

/// Strings are quoted so messages stay readable around empty or
/// whitespace-only operands.
fn describe(value: &Value) -> String {
    match value {
        Value::String(text) => format!("{text:?}"),
        other => other.to_string(),
    }
}
