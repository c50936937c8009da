//! Configuration for the mask engine.

use qa_common::{QaMaskError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Grids with at least this many cells are scanned in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 18;

pub const PARALLEL_THRESHOLD_VAR: &str = "QA_MASK_PARALLEL_THRESHOLD";
pub const MULTI_STRATEGY_VAR: &str = "QA_MASK_MULTI_STRATEGY";

/// Configuration for mask computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskerConfig {
    /// Minimum number of cells before the scan is split across threads.
    /// `usize::MAX` disables parallel scans.
    pub parallel_threshold: usize,

    /// How composite (multi-condition) masks are evaluated.
    pub multi_strategy: MultiStrategy,
}

impl Default for MaskerConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            multi_strategy: MultiStrategy::Aggregate,
        }
    }
}

impl MaskerConfig {
    /// A configuration that always scans on the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from a variable lookup. Unparsable values are
    /// logged and leave the default in place.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup(PARALLEL_THRESHOLD_VAR) {
            match val.trim().parse() {
                Ok(threshold) => config.parallel_threshold = threshold,
                Err(_) => warn!(
                    var = PARALLEL_THRESHOLD_VAR,
                    value = %val,
                    default = config.parallel_threshold,
                    "Ignoring unparsable parallel threshold"
                ),
            }
        }

        if let Some(val) = lookup(MULTI_STRATEGY_VAR) {
            match MultiStrategy::parse(&val) {
                Some(strategy) => config.multi_strategy = strategy,
                None => warn!(
                    var = MULTI_STRATEGY_VAR,
                    value = %val,
                    default = %config.multi_strategy,
                    "Ignoring unknown multi-condition strategy"
                ),
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.parallel_threshold == 0 {
            return Err(QaMaskError::config("parallel_threshold must be > 0"));
        }
        Ok(())
    }

    /// Whether a grid of `cells` cells should be scanned in parallel.
    pub fn use_parallel(&self, cells: usize) -> bool {
        cells >= self.parallel_threshold
    }
}

/// Evaluation strategy for composite masks. Both produce identical grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MultiStrategy {
    /// Fold all fields into one bit mask / value mask pair and scan once.
    #[default]
    Aggregate,
    /// Scan once per condition and AND the masks together.
    PerCondition,
}

impl MultiStrategy {
    /// Parse a strategy name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "aggregate" => Some(Self::Aggregate),
            "per_condition" | "per-condition" => Some(Self::PerCondition),
            _ => None,
        }
    }

    /// Parse from string (case-insensitive), falling back to `Aggregate`.
    pub fn from_str(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aggregate => "aggregate",
            Self::PerCondition => "per_condition",
        }
    }
}

impl std::fmt::Display for MultiStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MaskerConfig::default();
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert_eq!(config.multi_strategy, MultiStrategy::Aggregate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = MaskerConfig {
            parallel_threshold: 0,
            ..MaskerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sequential_never_parallel() {
        let config = MaskerConfig::sequential();
        assert!(!config.use_parallel(usize::MAX - 1));
        assert!(MaskerConfig::default().use_parallel(DEFAULT_PARALLEL_THRESHOLD));
    }

    #[test]
    fn test_multi_strategy_from_str() {
        assert_eq!(MultiStrategy::from_str("aggregate"), MultiStrategy::Aggregate);
        assert_eq!(
            MultiStrategy::from_str("PER_CONDITION"),
            MultiStrategy::PerCondition
        );
        assert_eq!(
            MultiStrategy::from_str("per-condition"),
            MultiStrategy::PerCondition
        );
        assert_eq!(MultiStrategy::from_str("bogus"), MultiStrategy::Aggregate);
        assert_eq!(MultiStrategy::parse("bogus"), None);
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = MaskerConfig::from_lookup(lookup(&[
            (PARALLEL_THRESHOLD_VAR, " 4096 "),
            (MULTI_STRATEGY_VAR, "per_condition"),
        ]));
        assert_eq!(config.parallel_threshold, 4096);
        assert_eq!(config.multi_strategy, MultiStrategy::PerCondition);
    }

    #[test]
    fn test_from_lookup_ignores_bad_values() {
        let config = MaskerConfig::from_lookup(lookup(&[
            (PARALLEL_THRESHOLD_VAR, "lots"),
            (MULTI_STRATEGY_VAR, "per_conditon"),
        ]));
        assert_eq!(config, MaskerConfig::default());
    }

    #[test]
    fn test_from_lookup_unset() {
        assert_eq!(MaskerConfig::from_lookup(|_| None), MaskerConfig::default());
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        // Only this test touches the variable
        std::env::set_var(MULTI_STRATEGY_VAR, "per-condition");
        let config = MaskerConfig::from_env();
        std::env::remove_var(MULTI_STRATEGY_VAR);
        assert_eq!(config.multi_strategy, MultiStrategy::PerCondition);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: MaskerConfig =
            serde_json::from_str(r#"{"multi_strategy":"per_condition"}"#).unwrap();
        assert_eq!(config.multi_strategy, MultiStrategy::PerCondition);
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }
}
