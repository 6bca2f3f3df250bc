//! Parenthesized prefix rendering of expression trees, e.g.
//! `-123 * (45.67)` becomes `(* (- 123) (group 45.67))`.

use crate::ast::Expr;

pub fn print(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(expr, &mut out);
    out
}

fn write_expr(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Literal(value) => out.push_str(&value.to_string()),
        Expr::Grouping(inner) => parenthesize("group", &[&**inner], out),
        Expr::Unary { operator, operand } => parenthesize(&operator.lexeme, &[&**operand], out),
        Expr::Binary {
            left,
            operator,
            right,
        } => parenthesize(&operator.lexeme, &[&**left, &**right], out),
    }
}

fn parenthesize(name: &str, exprs: &[&Expr], out: &mut String) {
    out.push('(');
    out.push_str(name);
    for expr in exprs {
        out.push(' ');
        write_expr(expr, out);
    }
    out.push(')');
}
