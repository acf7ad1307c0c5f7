use crate::error::{Error, Result};
use crate::types::{Environment, SemanticType, Value};

use super::{BinaryOp, Expr, Node, NodeId, UnaryOp};

/// Evaluate `expr` against `env`.
///
/// Pure and deterministic: the same tree and environment always give the
/// same result. Operands are evaluated left to right; `and` stops at the
/// first `false`, so an unbound parameter on its right-hand side is only
/// reported when the left-hand side is `true`.
pub fn evaluate(expr: &Expr, env: &Environment) -> Result<Value> {
    eval_node(expr, expr.root(), env)
}

fn eval_node(expr: &Expr, id: NodeId, env: &Environment) -> Result<Value> {
    match expr.node(id) {
        Node::Const(value) => Ok(value.clone()),
        Node::ParamRef { name, ty } => {
            let value = env.get(name).ok_or_else(|| Error::UnboundParameter(name.clone()))?;
            if !value.conforms_to(ty) {
                return Err(Error::TypeMismatch {
                    name: name.clone(),
                    expected: *ty,
                    found: value.kind().to_string(),
                });
            }
            Ok(value.clone())
        }
        Node::Binary { op: BinaryOp::IntAdd, lhs, rhs } => {
            let a = expect_int(expr, *lhs, env)?;
            let b = expect_int(expr, *rhs, env)?;
            a.checked_add(b).map(Value::Int).ok_or(Error::IntegerOverflow)
        }
        Node::Binary { op: BinaryOp::BoolAnd, lhs, rhs } => {
            if !expect_bool(expr, *lhs, env)? {
                return Ok(Value::Bool(false));
            }
            expect_bool(expr, *rhs, env).map(Value::Bool)
        }
        Node::Binary { op: BinaryOp::StrConcat, lhs, rhs } => {
            let mut a = expect_str(expr, *lhs, env)?;
            a.push_str(&expect_str(expr, *rhs, env)?);
            Ok(Value::Str(a))
        }
        Node::Unary { op: UnaryOp::ListLen, operand } => match eval_node(expr, *operand, env)? {
            Value::List(items) => Ok(Value::Int(items.len() as i64)),
            other => Err(mismatch(expr, *operand, UnaryOp::ListLen.operand_type(), &other)),
        },
    }
}

// ExprBuilder only links operands of the right type and parameters are
// checked on lookup, so the mismatch arms below are a last guard.

fn expect_int(expr: &Expr, id: NodeId, env: &Environment) -> Result<i64> {
    match eval_node(expr, id, env)? {
        Value::Int(i) => Ok(i),
        other => Err(mismatch(expr, id, SemanticType::Integer, &other)),
    }
}

fn expect_bool(expr: &Expr, id: NodeId, env: &Environment) -> Result<bool> {
    match eval_node(expr, id, env)? {
        Value::Bool(b) => Ok(b),
        other => Err(mismatch(expr, id, SemanticType::Boolean, &other)),
    }
}

fn expect_str(expr: &Expr, id: NodeId, env: &Environment) -> Result<String> {
    match eval_node(expr, id, env)? {
        Value::Str(s) => Ok(s),
        other => Err(mismatch(expr, id, SemanticType::String, &other)),
    }
}

/// `expected` is what the enclosing operator requires of the operand.
fn mismatch(expr: &Expr, id: NodeId, expected: SemanticType, found: &Value) -> Error {
    Error::TypeMismatch {
        name: super::render::render_node(expr, id),
        expected,
        found: found.kind().to_string(),
    }
}
