use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::{AllocatorError, Result};

fn default_shard_balance() -> f64 {
    0.45
}

fn default_index_balance() -> f64 {
    0.55
}

fn default_threshold() -> f64 {
    1.0
}

/// The three cluster-wide, dynamic knobs the balancer reads each pass.
///
/// `shard_balance` and `index_balance` are θ₀/θ₁'s numerators in
/// [`crate::weight::WeightFunction`]; `threshold` is the minimum weight
/// delta that justifies a rebalance move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancerSettings {
    #[serde(default = "default_shard_balance", rename = "balance.shard")]
    pub shard_balance: f64,

    #[serde(default = "default_index_balance", rename = "balance.index")]
    pub index_balance: f64,

    #[serde(default = "default_threshold", rename = "balance.threshold")]
    pub threshold: f64,
}

impl Default for BalancerSettings {
    fn default() -> Self {
        Self {
            shard_balance: default_shard_balance(),
            index_balance: default_index_balance(),
            threshold: default_threshold(),
        }
    }
}

impl BalancerSettings {
    /// Load defaults, then an optional `path`, then `BSA_*` environment
    /// overrides (e.g. `BSA_BALANCE_THRESHOLD=2.0`).
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("balance.shard", default_shard_balance())?
            .set_default("balance.index", default_index_balance())?
            .set_default("balance.threshold", default_threshold())?;

        if let Some(path) = path {
            builder = builder.add_source(File::new(path, FileFormat::Toml).required(false));
        }

        builder = builder.add_source(Environment::with_prefix("BSA").separator("_"));

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Construction fails if the factors sum to zero, or if any
    /// factor/the threshold is negative.
    pub fn validate(&self) -> Result<()> {
        if self.shard_balance < 0.0 || self.index_balance < 0.0 {
            return Err(AllocatorError::InvalidArgument(
                "balance.shard and balance.index must be non-negative".into(),
            ));
        }
        if self.shard_balance + self.index_balance <= 0.0 {
            return Err(AllocatorError::InvalidArgument(
                "balance.shard + balance.index must be > 0".into(),
            ));
        }
        if self.threshold < 0.0 {
            return Err(AllocatorError::InvalidArgument(
                "balance.threshold must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
