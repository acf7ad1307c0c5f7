//! Property tests: depth bound, type soundness, determinism, exhaustion.

use func_synth::*;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn all_params() -> Vec<Parameter> {
    vec![
        Parameter::new("l", SemanticType::List(ElementType::Integer)),
        Parameter::new("x", SemanticType::Integer),
        Parameter::new("b", SemanticType::Boolean),
        Parameter::new("s", SemanticType::String),
    ]
}

fn full_env() -> Environment {
    let mut env = Environment::new();
    env.insert("l".into(), Value::List(vec![Value::Int(4), Value::Int(5)]));
    env.insert("x".into(), Value::Int(-7));
    env.insert("b".into(), Value::Bool(true));
    env.insert("s".into(), Value::Str("s".into()));
    env
}

fn arb_type() -> impl Strategy<Value = SemanticType> {
    prop_oneof![
        Just(SemanticType::Integer),
        Just(SemanticType::Boolean),
        Just(SemanticType::String),
        Just(SemanticType::ANY_LIST),
        Just(SemanticType::Parameter),
    ]
}

/// Pools where any literal pool may be empty and any production disabled.
fn arb_pools() -> impl Strategy<Value = Pools> {
    (
        prop::collection::vec(-5i64..5, 0..3),
        prop::sample::subsequence(vec![Production::IntConst, Production::IntAdd, Production::ListLen], 0..=3),
        prop::collection::vec(any::<bool>(), 0..2),
        prop::sample::subsequence(vec![Production::BoolConst, Production::BoolAnd], 0..=2),
        prop::collection::vec("[a-z]{0,3}", 0..2),
        prop::sample::subsequence(vec![Production::StrConst, Production::StrConcat], 0..=2),
    )
        .prop_map(|(int_literals, int_ops, bool_literals, bool_ops, str_literals, str_ops)| Pools {
            int_literals,
            int_ops,
            bool_literals,
            bool_ops,
            str_literals,
            str_ops,
        })
}

/// Weights in 0..3, so some candidates are switched off entirely.
fn arb_weights() -> impl Strategy<Value = Weights> {
    (prop::collection::vec(0u32..3, Production::ALL.len()), 0u32..3).prop_map(|(per_production, parameter)| {
        let mut weights = Weights { parameter, ..Weights::uniform() };
        for (production, weight) in Production::ALL.into_iter().zip(per_production) {
            weights = weights.with(production, weight);
        }
        weights
    })
}

fn arb_params() -> impl Strategy<Value = Vec<Parameter>> {
    prop::sample::subsequence(all_params(), 0..=4)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn depth_never_exceeds_budget(seed in any::<u64>(), depth in 1usize..8, ty in arb_type()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let expr = synthesize(&mut rng, ty, depth, &all_params(), &Pools::default()).unwrap();
        prop_assert!(expr.depth() <= depth, "{} deeper than {}", expr, depth);
    }

    #[test]
    fn values_match_declared_types(seed in any::<u64>(), depth in 1usize..7, ty in arb_type()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let expr = synthesize(&mut rng, ty, depth, &all_params(), &Pools::default()).unwrap();
        prop_assert!(ty.accepts(&expr.ty()));
        let value = evaluate(&expr, &full_env()).unwrap();
        prop_assert!(value.conforms_to(&expr.ty()), "{} gave {}", expr, value);
        prop_assert!(value.conforms_to(&ty));
    }

    #[test]
    fn evaluation_and_synthesis_are_deterministic(seed in any::<u64>(), depth in 1usize..7, ty in arb_type()) {
        let params = all_params();
        let a = synthesize(&mut StdRng::seed_from_u64(seed), ty, depth, &params, &Pools::default()).unwrap();
        let b = synthesize(&mut StdRng::seed_from_u64(seed), ty, depth, &params, &Pools::default()).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(evaluate(&a, &full_env()), evaluate(&a, &full_env()));
        prop_assert_eq!(render(&a), render(&b));
    }

    #[test]
    fn dropping_a_referenced_binding_is_unbound(seed in any::<u64>(), depth in 1usize..6) {
        // integer trees never contain `and`, so every reference is evaluated
        let mut rng = StdRng::seed_from_u64(seed);
        let expr = synthesize(&mut rng, SemanticType::Integer, depth, &all_params(), &Pools::default()).unwrap();
        for name in expr.referenced_parameters() {
            let mut env = full_env();
            env.shift_remove(name);
            prop_assert_eq!(evaluate(&expr, &env), Err(Error::UnboundParameter(name.to_string())));
        }
    }

    #[test]
    fn infeasible_requests_always_fail(
        seed in any::<u64>(),
        depth in 1usize..6,
        ty in arb_type(),
        pools in arb_pools(),
        params in arb_params(),
    ) {
        let feasible = can_synthesize(&ty, depth, &params, &pools);
        let mut rng = StdRng::seed_from_u64(seed);
        let plain = synthesize(&mut rng, ty, depth, &params, &pools);
        match &plain {
            Ok(expr) => {
                prop_assert!(feasible);
                prop_assert!(expr.depth() <= depth);
            }
            Err(err) => prop_assert!(err.is_exhausted(), "{}", err),
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let guided = Synthesizer::new(&mut rng, &params, &pools).with_lookahead(true).synthesize(ty, depth);
        prop_assert_eq!(guided.is_ok(), feasible);
    }

    #[test]
    fn weighted_lookahead_fails_exactly_when_infeasible(
        seed in any::<u64>(),
        depth in 1usize..6,
        ty in arb_type(),
        pools in arb_pools(),
        params in arb_params(),
        weights in arb_weights(),
    ) {
        let feasible = can_synthesize_weighted(&ty, depth, &params, &pools, &weights);

        let mut rng = StdRng::seed_from_u64(seed);
        let plain = Synthesizer::new(&mut rng, &params, &pools).with_weights(&weights).synthesize(ty, depth);
        if let Err(err) = &plain {
            prop_assert!(err.is_exhausted(), "{}", err);
        } else {
            prop_assert!(feasible);
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let guided = Synthesizer::new(&mut rng, &params, &pools)
            .with_weights(&weights)
            .with_lookahead(true)
            .synthesize(ty, depth);
        prop_assert_eq!(guided.is_ok(), feasible);
    }
}
