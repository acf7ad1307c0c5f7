//! Typed, grammar-driven random program synthesis.
//!
//! Pick an output type, a depth budget, some typed parameters and per-type
//! literal/operator pools; [`synthesize`] draws a random expression tree of
//! that type, [`evaluate`] and [`render`] read it, and [`compile`] turns it
//! into a function over the parameters.
pub mod cli;
pub mod config;
pub mod error;
pub mod expr;
pub mod function;
pub mod grammar;
pub mod synth;
pub mod types;

pub use config::SynthConfig;
pub use error::{Error, Result};
pub use expr::{Expr, evaluate, render};
pub use function::{Function, compile};
pub use grammar::{Pools, Production, Weights};
pub use synth::{Synthesizer, can_synthesize, can_synthesize_weighted, synthesize, synthesize_batch};
pub use types::{ElementType, Environment, Parameter, SemanticType, Value};
