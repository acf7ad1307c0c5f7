//! Production registry.
//!
//! A static table describing, for every semantic type, which productions
//! exist, whether they are terminal and which operand types a non-terminal
//! needs. The per-run [`Pools`] say which of them a synthesis run may use and
//! which literal values feed the constant productions.
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::SemanticType;

// ------------------------------ Registry --------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Production {
    IntConst,
    IntAdd,
    ListLen,
    BoolConst,
    BoolAnd,
    StrConst,
    StrConcat,
}

const INT_PRODUCTIONS: &[Production] = &[Production::IntConst, Production::IntAdd, Production::ListLen];
const BOOL_PRODUCTIONS: &[Production] = &[Production::BoolConst, Production::BoolAnd];
const STR_PRODUCTIONS: &[Production] = &[Production::StrConst, Production::StrConcat];

impl Production {
    pub const ALL: [Production; 7] = [
        Production::IntConst,
        Production::IntAdd,
        Production::ListLen,
        Production::BoolConst,
        Production::BoolAnd,
        Production::StrConst,
        Production::StrConcat,
    ];

    pub fn result_type(self) -> SemanticType {
        match self {
            Production::IntConst | Production::IntAdd | Production::ListLen => SemanticType::Integer,
            Production::BoolConst | Production::BoolAnd => SemanticType::Boolean,
            Production::StrConst | Production::StrConcat => SemanticType::String,
        }
    }

    /// Operand types, left to right. Empty for terminals.
    pub fn operands(self) -> &'static [SemanticType] {
        match self {
            Production::IntConst | Production::BoolConst | Production::StrConst => &[],
            Production::IntAdd => &[SemanticType::Integer, SemanticType::Integer],
            Production::BoolAnd => &[SemanticType::Boolean, SemanticType::Boolean],
            Production::StrConcat => &[SemanticType::String, SemanticType::String],
            Production::ListLen => &[SemanticType::ANY_LIST],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.operands().is_empty()
    }

    pub fn name(self) -> &'static str {
        match self {
            Production::IntConst => "int_const",
            Production::IntAdd => "int_add",
            Production::ListLen => "list_len",
            Production::BoolConst => "bool_const",
            Production::BoolAnd => "bool_and",
            Production::StrConst => "str_const",
            Production::StrConcat => "str_concat",
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Productions registered for `ty`. Lists have no literal constant and
/// parameters are never built by an operator, so both are empty.
pub fn productions_for(ty: &SemanticType) -> &'static [Production] {
    match ty {
        SemanticType::Integer => INT_PRODUCTIONS,
        SemanticType::Boolean => BOOL_PRODUCTIONS,
        SemanticType::String => STR_PRODUCTIONS,
        SemanticType::List(_) | SemanticType::Parameter => &[],
    }
}

// -------------------------------- Pools ---------------------------------- //

/// Literal values and enabled productions for one synthesis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pools {
    pub int_literals: Vec<i64>,
    pub int_ops: Vec<Production>,
    pub bool_literals: Vec<bool>,
    pub bool_ops: Vec<Production>,
    pub str_literals: Vec<String>,
    pub str_ops: Vec<Production>,
}

impl Default for Pools {
    fn default() -> Self {
        Self {
            int_literals: (0..10).collect(),
            int_ops: INT_PRODUCTIONS.to_vec(),
            bool_literals: vec![true, false],
            bool_ops: BOOL_PRODUCTIONS.to_vec(),
            str_literals: vec!["hello".to_string()],
            str_ops: STR_PRODUCTIONS.to_vec(),
        }
    }
}

impl Pools {
    /// Pools with nothing enabled; useful as a base for hand-built configs.
    pub fn empty() -> Self {
        Self {
            int_literals: Vec::new(),
            int_ops: Vec::new(),
            bool_literals: Vec::new(),
            bool_ops: Vec::new(),
            str_literals: Vec::new(),
            str_ops: Vec::new(),
        }
    }

    /// Enabled productions for `ty`, in pool order.
    pub fn ops_for(&self, ty: &SemanticType) -> &[Production] {
        match ty {
            SemanticType::Integer => &self.int_ops,
            SemanticType::Boolean => &self.bool_ops,
            SemanticType::String => &self.str_ops,
            SemanticType::List(_) | SemanticType::Parameter => &[],
        }
    }

    /// Size of the literal pool feeding the constant production of `ty`.
    pub fn literal_count(&self, ty: &SemanticType) -> usize {
        match ty {
            SemanticType::Integer => self.int_literals.len(),
            SemanticType::Boolean => self.bool_literals.len(),
            SemanticType::String => self.str_literals.len(),
            SemanticType::List(_) | SemanticType::Parameter => 0,
        }
    }

    /// Every operator pool may only hold productions of its own type.
    pub fn validate(&self) -> Result<()> {
        for ty in [SemanticType::Integer, SemanticType::Boolean, SemanticType::String] {
            for &production in self.ops_for(&ty) {
                if production.result_type() != ty {
                    return Err(Error::InvalidOperatorPool { production, expected: ty });
                }
            }
        }
        Ok(())
    }
}

// ------------------------------- Weights --------------------------------- //

/// Relative draw weights. Anything not listed weighs 1, so the default is a
/// uniform draw. A weight of 0 removes the candidate entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub productions: HashMap<Production, u32>,
    pub parameter: u32,
}

impl Default for Weights {
    fn default() -> Self {
        Self { productions: HashMap::new(), parameter: 1 }
    }
}

impl Weights {
    pub fn uniform() -> Self {
        Self::default()
    }

    pub fn with(mut self, production: Production, weight: u32) -> Self {
        self.productions.insert(production, weight);
        self
    }

    pub fn of(&self, production: Production) -> u32 {
        self.productions.get(&production).copied().unwrap_or(1)
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_consistent() {
        for production in Production::ALL {
            let ty = production.result_type();
            assert!(productions_for(&ty).contains(&production), "{production} not registered for {ty}");
        }
        // every registered type carries exactly one literal production
        for ty in [SemanticType::Integer, SemanticType::Boolean, SemanticType::String] {
            let terminals = productions_for(&ty).iter().filter(|p| p.is_terminal()).count();
            assert_eq!(terminals, 1);
        }
        assert!(productions_for(&SemanticType::ANY_LIST).is_empty());
    }

    #[test]
    fn len_crosses_into_lists() {
        assert_eq!(Production::ListLen.result_type(), SemanticType::Integer);
        assert_eq!(Production::ListLen.operands(), &[SemanticType::ANY_LIST]);
        assert!(!Production::ListLen.is_terminal());
    }

    #[test]
    fn mistyped_operator_pool_is_rejected() {
        let mut pools = Pools::default();
        assert!(pools.validate().is_ok());
        pools.bool_ops.push(Production::IntAdd);
        assert_eq!(
            pools.validate(),
            Err(Error::InvalidOperatorPool { production: Production::IntAdd, expected: SemanticType::Boolean })
        );
    }

    #[test]
    fn pools_deserialize_with_defaults() {
        let pools: Pools = serde_json::from_str(r#"{"int_ops": ["int_const"], "int_literals": [7]}"#).unwrap();
        assert_eq!(pools.int_ops, vec![Production::IntConst]);
        assert_eq!(pools.int_literals, vec![7]);
        assert_eq!(pools.str_literals, vec!["hello".to_string()]);
    }

    #[test]
    fn missing_weights_are_one() {
        let weights = Weights::uniform().with(Production::IntAdd, 5);
        assert_eq!(weights.of(Production::IntAdd), 5);
        assert_eq!(weights.of(Production::ListLen), 1);
    }
}
