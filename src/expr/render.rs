//! Human-readable renderings. Not meant to be parsed back.
use std::fmt::Write;

use crate::types::Value;

use super::{BinaryOp, Expr, Node, NodeId, UnaryOp};

/// Parenthesised infix form: `(len(l) + 3)`, `(true and x)`, `("a" + s)`.
pub fn render(expr: &Expr) -> String {
    render_node(expr, expr.root())
}

pub(crate) fn render_node(expr: &Expr, id: NodeId) -> String {
    let mut out = String::new();
    write_infix(expr, id, &mut out);
    out
}

fn write_infix(expr: &Expr, id: NodeId, out: &mut String) {
    match expr.node(id) {
        Node::Const(value) => write_literal(value, out),
        Node::ParamRef { name, .. } => out.push_str(name),
        Node::Binary { op, lhs, rhs } => {
            let symbol = match op {
                BinaryOp::IntAdd | BinaryOp::StrConcat => "+",
                BinaryOp::BoolAnd => "and",
            };
            out.push('(');
            write_infix(expr, *lhs, out);
            let _ = write!(out, " {symbol} ");
            write_infix(expr, *rhs, out);
            out.push(')');
        }
        Node::Unary { op: UnaryOp::ListLen, operand } => {
            out.push_str("len(");
            write_infix(expr, *operand, out);
            out.push(')');
        }
    }
}

fn write_literal(value: &Value, out: &mut String) {
    // Value's Display already quotes strings and prints bools as true/false
    let _ = write!(out, "{value}");
}

/// Constructor-style dump, e.g. `IntAdd(ListLen(ParamRef("l")), IntConst(3))`.
pub fn render_structure(expr: &Expr) -> String {
    let mut out = String::new();
    write_structure(expr, expr.root(), &mut out);
    out
}

fn write_structure(expr: &Expr, id: NodeId, out: &mut String) {
    match expr.node(id) {
        Node::Const(value) => {
            let ctor = match value {
                Value::Int(_) => "IntConst",
                Value::Bool(_) => "BoolConst",
                Value::Str(_) => "StrConst",
                Value::List(_) => "ListConst",
            };
            let _ = write!(out, "{ctor}({value})");
        }
        Node::ParamRef { name, .. } => {
            let _ = write!(out, "ParamRef({name:?})");
        }
        Node::Binary { op, lhs, rhs } => {
            let _ = write!(out, "{op:?}(");
            write_structure(expr, *lhs, out);
            out.push_str(", ");
            write_structure(expr, *rhs, out);
            out.push(')');
        }
        Node::Unary { op, operand } => {
            let _ = write!(out, "{op:?}(");
            write_structure(expr, *operand, out);
            out.push(')');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprBuilder;
    use crate::types::SemanticType;

    #[test]
    fn constants_render_as_literals() {
        let mut b = ExprBuilder::new();
        let t = b.constant(Value::Bool(true));
        assert_eq!(render(&b.finish(t).unwrap()), "true");

        let mut b = ExprBuilder::new();
        let s = b.constant(Value::Str("say \"hi\"".into()));
        assert_eq!(render(&b.finish(s).unwrap()), r#""say \"hi\"""#);

        let mut b = ExprBuilder::new();
        let n = b.constant(Value::Int(-4));
        assert_eq!(render(&b.finish(n).unwrap()), "-4");
    }

    #[test]
    fn operators_render_infix() {
        let mut b = ExprBuilder::new();
        let l = b.param("l", SemanticType::ANY_LIST);
        let len = b.unary(UnaryOp::ListLen, l).unwrap();
        let three = b.constant(Value::Int(3));
        let root = b.binary(BinaryOp::IntAdd, len, three).unwrap();
        let expr = b.finish(root).unwrap();
        assert_eq!(render(&expr), "(len(l) + 3)");
        assert_eq!(expr.to_string(), "(len(l) + 3)");
        assert_eq!(expr.structure(), r#"IntAdd(ListLen(ParamRef("l")), IntConst(3))"#);

        let mut b = ExprBuilder::new();
        let t = b.constant(Value::Bool(true));
        let f = b.constant(Value::Bool(false));
        let root = b.binary(BinaryOp::BoolAnd, t, f).unwrap();
        assert_eq!(render(&b.finish(root).unwrap()), "(true and false)");
    }
}
