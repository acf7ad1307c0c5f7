//! Semantic types, runtime values and parameters.
//!
//! The type set is closed: every synthesized expression produces one of the
//! [`SemanticType`] tags, and every runtime [`Value`] can be checked against
//! a tag with [`Value::conforms_to`].
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ------------------------------- Types ----------------------------------- //

/// Element tag of a list type. `Any` only appears on the requiring side
/// (e.g. `len` takes a list of anything).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Integer,
    Boolean,
    String,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SemanticType {
    Integer,
    Boolean,
    String,
    List(ElementType),
    /// Any declared parameter, whatever its own type.
    Parameter,
}

impl SemanticType {
    pub const ANY_LIST: SemanticType = SemanticType::List(ElementType::Any);

    /// Whether a value or parameter declared as `declared` satisfies a
    /// requirement of type `self`.
    pub fn accepts(&self, declared: &SemanticType) -> bool {
        match (self, declared) {
            (SemanticType::Parameter, _) => true,
            (SemanticType::List(ElementType::Any), SemanticType::List(_)) => true,
            (required, declared) => required == declared,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, SemanticType::List(_))
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Integer => write!(f, "int"),
            SemanticType::Boolean => write!(f, "bool"),
            SemanticType::String => write!(f, "str"),
            SemanticType::List(ElementType::Any) => write!(f, "list"),
            SemanticType::List(ElementType::Integer) => write!(f, "list<int>"),
            SemanticType::List(ElementType::Boolean) => write!(f, "list<bool>"),
            SemanticType::List(ElementType::String) => write!(f, "list<str>"),
            SemanticType::Parameter => write!(f, "param"),
        }
    }
}

impl FromStr for SemanticType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim() {
            "int" | "integer" => SemanticType::Integer,
            "bool" | "boolean" => SemanticType::Boolean,
            "str" | "string" => SemanticType::String,
            "list" | "list<any>" => SemanticType::ANY_LIST,
            "list<int>" => SemanticType::List(ElementType::Integer),
            "list<bool>" => SemanticType::List(ElementType::Boolean),
            "list<str>" => SemanticType::List(ElementType::String),
            "param" | "parameter" => SemanticType::Parameter,
            other => return Err(Error::InvalidType(other.to_string())),
        };
        Ok(ty)
    }
}

impl TryFrom<String> for SemanticType {
    type Error = Error;
    fn try_from(s: String) -> Result<Self, Error> { s.parse() }
}

impl From<SemanticType> for String {
    fn from(ty: SemanticType) -> String { ty.to_string() }
}

// ------------------------------- Values ---------------------------------- //

/// A concrete runtime value. Untagged so JSON literals map directly:
/// `3`, `true`, `"a"`, `[1, 2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn conforms_to(&self, ty: &SemanticType) -> bool {
        match (self, ty) {
            (_, SemanticType::Parameter) => true,
            (Value::Int(_), SemanticType::Integer) => true,
            (Value::Bool(_), SemanticType::Boolean) => true,
            (Value::Str(_), SemanticType::String) => true,
            (Value::List(items), SemanticType::List(elem)) => {
                let elem = match elem {
                    ElementType::Any => return true,
                    ElementType::Integer => SemanticType::Integer,
                    ElementType::Boolean => SemanticType::Boolean,
                    ElementType::String => SemanticType::String,
                };
                items.iter().all(|item| item.conforms_to(&elem))
            }
            _ => false,
        }
    }

    /// Short tag used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

// ----------------------------- Parameters -------------------------------- //

/// A named, typed input of a synthesized function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: SemanticType,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: SemanticType) -> Self {
        Self { name: name.into(), ty }
    }
}

impl FromStr for Parameter {
    type Err = Error;

    /// `name:type`, e.g. `l:list<int>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((name, ty)) = s.split_once(':') else {
            return Err(Error::InvalidParameter(s.to_string()));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidParameter(s.to_string()));
        }
        Ok(Parameter::new(name, ty.parse()?))
    }
}

/// Parameter name → bound value, supplied at evaluation time only.
pub type Environment = IndexMap<String, Value>;

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_list_accepts_every_list() {
        let any = SemanticType::ANY_LIST;
        assert!(any.accepts(&SemanticType::List(ElementType::Integer)));
        assert!(any.accepts(&SemanticType::List(ElementType::Any)));
        assert!(!any.accepts(&SemanticType::Integer));
        assert!(!SemanticType::List(ElementType::Integer).accepts(&SemanticType::List(ElementType::String)));
        assert!(SemanticType::Parameter.accepts(&SemanticType::Boolean));
    }

    #[test]
    fn list_values_check_their_elements() {
        let ints = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert!(ints.conforms_to(&SemanticType::List(ElementType::Integer)));
        assert!(ints.conforms_to(&SemanticType::ANY_LIST));
        assert!(!ints.conforms_to(&SemanticType::List(ElementType::String)));
        assert!(!Value::Int(1).conforms_to(&SemanticType::Boolean));
    }

    #[test]
    fn types_and_parameters_parse() {
        assert_eq!("list<str>".parse::<SemanticType>().unwrap(), SemanticType::List(ElementType::String));
        assert_eq!("int".parse::<SemanticType>().unwrap().to_string(), "int");
        assert!("float".parse::<SemanticType>().is_err());

        let p: Parameter = "l:list".parse().unwrap();
        assert_eq!(p, Parameter::new("l", SemanticType::ANY_LIST));
        assert!(matches!("nocolon".parse::<Parameter>(), Err(Error::InvalidParameter(_))));
        assert!(matches!(":int".parse::<Parameter>(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn values_come_from_plain_json() {
        let v: Value = serde_json::from_str(r#"[1, true, "x", [2]]"#).unwrap();
        assert_eq!(v, Value::List(vec![
            Value::Int(1),
            Value::Bool(true),
            Value::Str("x".into()),
            Value::List(vec![Value::Int(2)]),
        ]));
        assert_eq!(v.to_string(), r#"[1, true, "x", [2]]"#);
    }
}
