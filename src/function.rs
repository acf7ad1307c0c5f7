//! Binding a synthesized tree to an ordered parameter list.
use std::fmt;

use crate::error::{Error, Result};
use crate::expr::{Expr, evaluate};
use crate::types::{Environment, Parameter, Value};

/// A tree plus the positional parameters it is called with.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    expr: Expr,
    params: Vec<Parameter>,
}

/// Bind `expr` to `params`. Names must be distinct, otherwise one binding
/// would shadow the other in the environment.
pub fn compile(expr: Expr, params: Vec<Parameter>) -> Result<Function> {
    for (i, param) in params.iter().enumerate() {
        if params[..i].iter().any(|earlier| earlier.name == param.name) {
            return Err(Error::DuplicateParameter(param.name.clone()));
        }
    }
    Ok(Function { expr, params })
}

impl Function {
    pub fn expr(&self) -> &Expr { &self.expr }

    pub fn params(&self) -> &[Parameter] { &self.params }

    pub fn arity(&self) -> usize { self.params.len() }

    /// Bind `args` positionally and evaluate.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        if args.len() != self.params.len() {
            return Err(Error::ArityMismatch { expected: self.params.len(), got: args.len() });
        }
        let mut env = Environment::with_capacity(args.len());
        for (param, arg) in self.params.iter().zip(args) {
            if !arg.conforms_to(&param.ty) {
                return Err(Error::TypeMismatch {
                    name: param.name.clone(),
                    expected: param.ty,
                    found: arg.kind().to_string(),
                });
            }
            env.insert(param.name.clone(), arg.clone());
        }
        evaluate(&self.expr, &env)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();
        write!(f, "|{}| {}", names.join(", "), self.expr)
    }
}
