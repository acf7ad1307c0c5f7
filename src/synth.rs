//! Depth-bounded random synthesis.
//!
//! For a requested type `T` and depth budget `d` the engine collects every
//! feasible production (literal constants with a non-empty pool, parameters
//! whose declared type fits `T`, and operators enabled for `T` when `d > 1`),
//! draws one by weight and, for an operator, recurses into each operand with
//! `d - 1` using the operand's own type. Terminals consume no depth, so the
//! finished tree never nests deeper than `d`.
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::SynthConfig;
use crate::error::{Error, Result};
use crate::expr::{BinaryOp, Expr, ExprBuilder, NodeId, UnaryOp};
use crate::grammar::{Pools, Production, Weights};
use crate::types::{Parameter, SemanticType, Value};

// ------------------------------ Candidates -------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq)]
enum ChoiceKind<'p> {
    Literal(Production),
    Param(&'p Parameter),
    Operator(Production),
}

#[derive(Debug, Clone, Copy)]
struct Choice<'p> {
    kind: ChoiceKind<'p>,
    weight: u32,
}

// ------------------------------ Front API --------------------------------- //

/// Uniform synthesis of one tree of type `ty` within `depth`.
pub fn synthesize<R: Rng + ?Sized>(
    rng: &mut R,
    ty: SemanticType,
    depth: usize,
    params: &[Parameter],
    pools: &Pools,
) -> Result<Expr> {
    Synthesizer::new(rng, params, pools).synthesize(ty, depth)
}

pub struct Synthesizer<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    params: &'a [Parameter],
    pools: &'a Pools,
    weights: Option<&'a Weights>,
    lookahead: bool,
}

impl<'a, R: Rng + ?Sized> Synthesizer<'a, R> {
    pub fn new(rng: &'a mut R, params: &'a [Parameter], pools: &'a Pools) -> Self {
        Self { rng, params, pools, weights: None, lookahead: false }
    }

    pub fn with_weights(mut self, weights: &'a Weights) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Skip operators whose operands could never be built at the remaining
    /// depth under the active weights (see [`can_synthesize_weighted`]).
    pub fn with_lookahead(mut self, lookahead: bool) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Build one tree. Either the whole tree is returned or an error; no
    /// partially built tree escapes.
    pub fn synthesize(&mut self, ty: SemanticType, depth: usize) -> Result<Expr> {
        if depth == 0 {
            return Err(Error::InvalidDepth);
        }
        self.pools.validate()?;

        let mut builder = ExprBuilder::new();
        let root = self.build(&mut builder, ty, depth)?;
        let expr = builder.finish(root)?;
        tracing::info!(%ty, depth, nodes = expr.len(), expr = %expr, "synthesized");
        Ok(expr)
    }

    fn build(&mut self, b: &mut ExprBuilder, ty: SemanticType, depth: usize) -> Result<NodeId> {
        let candidates = self.candidates(&ty, depth);
        tracing::trace!(%ty, depth, candidates = candidates.len(), "candidate set");

        if candidates.is_empty() {
            // a declared but zero-weighted list parameter is plain exhaustion
            if ty.is_list() && !self.params.iter().any(|p| ty.accepts(&p.ty)) {
                return Err(Error::NoListParameter { ty });
            }
            return Err(Error::SynthesisExhausted { ty, depth });
        }

        // summed as u64 so no mix of u32 weights can overflow the total
        let dist = WeightedIndex::new(candidates.iter().map(|c| u64::from(c.weight)))
            .map_err(|error| Error::InvalidWeights(error.to_string()))?;
        let chosen = candidates[dist.sample(&mut *self.rng)].kind;
        tracing::debug!(%ty, depth, ?chosen, "production chosen");

        match chosen {
            ChoiceKind::Literal(production) => {
                let value = self.draw_literal(production);
                Ok(b.constant(value))
            }
            ChoiceKind::Param(param) => Ok(b.param(param.name.clone(), param.ty)),
            ChoiceKind::Operator(production) => {
                let mut children = Vec::with_capacity(production.operands().len());
                for operand in production.operands() {
                    children.push(self.build(b, *operand, depth - 1)?);
                }
                assemble(b, production, &children)
            }
        }
    }

    fn candidates(&self, ty: &SemanticType, depth: usize) -> Vec<Choice<'a>> {
        let mut out: Vec<Choice<'a>> = Vec::new();

        for &production in self.pools.ops_for(ty) {
            let kind = if production.is_terminal() {
                if self.pools.literal_count(ty) == 0 {
                    continue;
                }
                ChoiceKind::Literal(production)
            } else {
                if depth <= 1 {
                    continue;
                }
                if self.lookahead
                    && !production
                        .operands()
                        .iter()
                        .all(|operand| feasible(operand, depth - 1, self.params, self.pools, self.weights))
                {
                    continue;
                }
                ChoiceKind::Operator(production)
            };
            // a production listed twice is still one candidate
            if out.iter().any(|c| c.kind == kind) {
                continue;
            }
            out.push(Choice { kind, weight: self.weight_of(production) });
        }

        let params: &'a [Parameter] = self.params;
        for param in params.iter().filter(|p| ty.accepts(&p.ty)) {
            let weight = self.weights.map_or(1, |w| w.parameter);
            out.push(Choice { kind: ChoiceKind::Param(param), weight });
        }

        out.retain(|c| c.weight > 0);
        out
    }

    fn weight_of(&self, production: Production) -> u32 {
        self.weights.map_or(1, |w| w.of(production))
    }

    fn draw_literal(&mut self, production: Production) -> Value {
        let pools = self.pools;
        match production {
            Production::IntConst => Value::Int(pools.int_literals[self.rng.gen_range(0..pools.int_literals.len())]),
            Production::BoolConst => Value::Bool(pools.bool_literals[self.rng.gen_range(0..pools.bool_literals.len())]),
            Production::StrConst => {
                Value::Str(pools.str_literals[self.rng.gen_range(0..pools.str_literals.len())].clone())
            }
            other => unreachable!("{other} is not a literal production"),
        }
    }
}

fn assemble(b: &mut ExprBuilder, production: Production, children: &[NodeId]) -> Result<NodeId> {
    match production {
        Production::IntAdd => b.binary(BinaryOp::IntAdd, children[0], children[1]),
        Production::BoolAnd => b.binary(BinaryOp::BoolAnd, children[0], children[1]),
        Production::StrConcat => b.binary(BinaryOp::StrConcat, children[0], children[1]),
        Production::ListLen => b.unary(UnaryOp::ListLen, children[0]),
        Production::IntConst | Production::BoolConst | Production::StrConst => {
            unreachable!("terminal {production} has no operands")
        }
    }
}

// ----------------------------- Feasibility -------------------------------- //

/// Whether some tree of type `ty` fits in `depth` with these parameters and
/// pools under a uniform draw: a terminal is available, or `depth > 1` and an
/// enabled operator has every operand synthesizable at `depth - 1`.
pub fn can_synthesize(ty: &SemanticType, depth: usize, params: &[Parameter], pools: &Pools) -> bool {
    feasible(ty, depth, params, pools, None)
}

/// [`can_synthesize`] with zero-weighted productions and parameters treated
/// as absent, which is exactly what a weighted draw can reach.
pub fn can_synthesize_weighted(
    ty: &SemanticType,
    depth: usize,
    params: &[Parameter],
    pools: &Pools,
    weights: &Weights,
) -> bool {
    feasible(ty, depth, params, pools, Some(weights))
}

fn feasible(ty: &SemanticType, depth: usize, params: &[Parameter], pools: &Pools, weights: Option<&Weights>) -> bool {
    if depth == 0 {
        return false;
    }
    let param_weight = weights.map_or(1, |w| w.parameter);
    if param_weight > 0 && params.iter().any(|p| ty.accepts(&p.ty)) {
        return true;
    }
    pools.ops_for(ty).iter().any(|&production| {
        if weights.map_or(1, |w| w.of(production)) == 0 {
            return false;
        }
        if production.is_terminal() {
            pools.literal_count(ty) > 0
        } else {
            depth > 1
                && production
                    .operands()
                    .iter()
                    .all(|operand| feasible(operand, depth - 1, params, pools, weights))
        }
    })
}

// -------------------------------- Batch ----------------------------------- //

/// Synthesize `count` independent trees in parallel. Run `i` owns an RNG
/// seeded with `seed + i`, so the output only depends on `seed`, never on
/// thread scheduling. Results come back in run order.
pub fn synthesize_batch(
    seed: u64,
    count: usize,
    ty: SemanticType,
    depth: usize,
    params: &[Parameter],
    config: &SynthConfig,
) -> Vec<Result<Expr>> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            Synthesizer::new(&mut rng, params, &config.pools)
                .with_weights(&config.weights)
                .with_lookahead(config.lookahead)
                .synthesize(ty, depth)
        })
        .collect()
}

// ------------------------------- Tests ------------------------------------ //
