//! Failure taxonomy shared by synthesis, evaluation and compiled functions.
use crate::grammar::Production;
use crate::types::SemanticType;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// No terminal is available for `ty` and the remaining depth (or the
    /// operator pool) forbids every non-terminal.
    #[error("cannot synthesize {ty} at depth {depth}: no feasible production")]
    SynthesisExhausted { ty: SemanticType, depth: usize },

    /// Lists have no literal constant, so a list parameter must exist.
    #[error("cannot synthesize {ty}: no parameter of a list type is declared")]
    NoListParameter { ty: SemanticType },

    #[error("depth budget must be at least 1")]
    InvalidDepth,

    #[error("operator pool for {expected} contains `{production}`, which produces {}", production.result_type())]
    InvalidOperatorPool { production: Production, expected: SemanticType },

    #[error("invalid production weights: {0}")]
    InvalidWeights(String),

    #[error("`{op}` needs an operand of type {expected}, got {found}")]
    OperandType { op: String, expected: SemanticType, found: SemanticType },

    #[error("malformed expression tree: {0}")]
    MalformedTree(String),

    #[error("parameter `{0}` is declared more than once")]
    DuplicateParameter(String),

    #[error("parameter `{0}` is not bound in the environment")]
    UnboundParameter(String),

    #[error("`{name}` expects a value of type {expected}, got {found}")]
    TypeMismatch { name: String, expected: SemanticType, found: String },

    #[error("integer addition overflowed")]
    IntegerOverflow,

    #[error("expected {expected} argument(s), got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("unknown type `{0}` (expected int, bool, str, list, list<T> or param)")]
    InvalidType(String),

    #[error("malformed parameter `{0}` (expected name:type)")]
    InvalidParameter(String),
}

impl Error {
    /// True for every flavour of "ran out of productions".
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Error::SynthesisExhausted { .. } | Error::NoListParameter { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
