//! The weight function: how "heavy" a node is for an index, given
//! the two balance factors. Lower weight means a more attractive
//! destination; the balancer always moves shards from heavy nodes to light
//! ones.

use crate::error::{AllocatorError, Result};
use crate::model::ModelNode;

#[derive(Debug, Clone, Copy)]
pub struct WeightFunction {
    /// Normalized shard-balance factor (θ0).
    theta0: f64,
    /// Normalized index-balance factor (θ1).
    theta1: f64,
}

impl WeightFunction {
    /// `shard_balance` and `index_balance` are the raw configured factors;
    /// they're normalized here so θ0 + θ1 == 1.
    pub fn new(index_balance: f64, shard_balance: f64) -> Result<Self> {
        if index_balance < 0.0 || shard_balance < 0.0 {
            return Err(AllocatorError::InvalidArgument(
                "balance factors must be non-negative".into(),
            ));
        }
        let sum = index_balance + shard_balance;
        if sum <= 0.0 {
            return Err(AllocatorError::InvalidArgument(
                "index_balance + shard_balance must be greater than zero".into(),
            ));
        }
        Ok(Self {
            theta0: shard_balance / sum,
            theta1: index_balance / sum,
        })
    }

    /// `weight(node, index) = θ0 * (node.totalShardCount + delta - avgShards)
    ///                       + θ1 * (node.shardsOfIndex(index) + delta - avgShardsOfIndex)`
    pub fn weight(
        &self,
        node: &ModelNode,
        index: &str,
        delta: i64,
        avg_shards: f64,
        avg_shards_of_index: f64,
    ) -> f64 {
        let node_total = node.total_shard_count() as f64 + delta as f64;
        let node_index = node.shards_of_index(index) as f64 + delta as f64;
        self.theta0 * (node_total - avg_shards) + self.theta1 * (node_index - avg_shards_of_index)
    }

    pub fn weight_after_add(
        &self,
        node: &ModelNode,
        index: &str,
        avg_shards: f64,
        avg_shards_of_index: f64,
    ) -> f64 {
        self.weight(node, index, 1, avg_shards, avg_shards_of_index)
    }

    pub fn weight_after_remove(
        &self,
        node: &ModelNode,
        index: &str,
        avg_shards: f64,
        avg_shards_of_index: f64,
    ) -> f64 {
        self.weight(node, index, -1, avg_shards, avg_shards_of_index)
    }
}
