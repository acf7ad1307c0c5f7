//! Run configuration: pools, weights and search switches, loadable from JSON.
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::grammar::{Pools, Weights};

/// Everything a synthesis run reads besides the parameters and the depth.
/// Omitted JSON fields fall back to [`Pools::default`] and uniform weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    #[serde(flatten)]
    pub pools: Pools,
    pub weights: Weights,
    pub lookahead: bool,
}

impl SynthConfig {
    pub fn from_json_str(src: &str) -> anyhow::Result<Self> {
        let config: SynthConfig = serde_json::from_str(src).context("invalid synthesis config")?;
        config.pools.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json_str(&src).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Production;

    #[test]
    fn empty_object_is_the_demo_setup() {
        let config = SynthConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SynthConfig::default());
        assert_eq!(config.pools.int_literals, (0..10).collect::<Vec<_>>());
        assert!(!config.lookahead);
    }

    #[test]
    fn pools_sit_at_the_top_level() {
        let config = SynthConfig::from_json_str(
            r#"{
                "int_literals": [1, 2],
                "str_ops": ["str_const"],
                "weights": { "productions": { "int_add": 3 }, "parameter": 2 },
                "lookahead": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.pools.int_literals, vec![1, 2]);
        assert_eq!(config.pools.str_ops, vec![Production::StrConst]);
        assert_eq!(config.weights.of(Production::IntAdd), 3);
        assert_eq!(config.weights.parameter, 2);
        assert!(config.lookahead);
    }

    #[test]
    fn mistyped_pool_is_a_config_error() {
        let err = SynthConfig::from_json_str(r#"{"int_ops": ["bool_and"]}"#).unwrap_err();
        assert!(err.to_string().contains("bool_and"), "{err}");
    }

    #[test]
    fn unknown_production_is_a_parse_error() {
        assert!(SynthConfig::from_json_str(r#"{"int_ops": ["int_mul"]}"#).is_err());
    }
}
