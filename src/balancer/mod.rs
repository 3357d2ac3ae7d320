//! The balancer itself: one pass runs `AllocateUnassigned`, then
//! `MoveShards`, then `Rebalance`, in that order, all inside
//! a single [`Balancer`] built fresh from the current [`RoutingAllocation`].

mod allocate_unassigned;
mod move_shards;
mod rebalance;

use rustc_hash::FxHashMap as HashMap;

use crate::config::BalancerSettings;
use crate::deciders::AllocationDeciders;
use crate::error::Result;
use crate::model::{Model, RoutingAllocation, ShardRouting};
use crate::sorter::NodeSorter;
use crate::weight::WeightFunction;

/// Per-index average shard counts across the cluster, computed once per
/// pass and consulted by every weight calculation in that pass.
pub(crate) struct Averages {
    pub avg_shards: f64,
    per_index: HashMap<String, f64>,
}

impl Averages {
    fn compute(allocation: &RoutingAllocation, node_count: usize) -> Self {
        let node_count = node_count.max(1) as f64;
        let avg_shards = allocation.metadata.total_shards_all_indexes() as f64 / node_count;
        let per_index = allocation
            .metadata
            .index_names()
            .map(|name| {
                let avg = allocation.metadata.total_shards_of_index(name) as f64 / node_count;
                (name.to_string(), avg)
            })
            .collect();
        Self { avg_shards, per_index }
    }

    pub fn avg_shards_of_index(&self, index: &str) -> f64 {
        *self.per_index.get(index).unwrap_or(&0.0)
    }
}

pub(crate) struct Balancer {
    model: Model,
    averages: Averages,
    weight_function: WeightFunction,
    threshold: f64,
    sorter: NodeSorter,
}

impl Balancer {
    fn build(allocation: &RoutingAllocation, settings: &BalancerSettings) -> Result<Self> {
        let weight_function = WeightFunction::new(settings.index_balance, settings.shard_balance)?;
        let model = Model::build(&allocation.routing_nodes);
        let averages = Averages::compute(allocation, model.len());
        let sorter = NodeSorter::new(model.node_ids().map(str::to_string));

        Ok(Self {
            model,
            averages,
            weight_function,
            threshold: settings.threshold,
            sorter,
        })
    }
}

/// Runs one full balancer pass: `AllocateUnassigned`, then `MoveShards`,
/// then `Rebalance`. Mutates `allocation.routing_nodes` in place.
pub fn allocate(
    settings: &BalancerSettings,
    deciders: &AllocationDeciders,
    allocation: &mut RoutingAllocation,
) -> Result<()> {
    if allocation.routing_nodes.size() == 0 {
        tracing::debug!("allocate: no nodes in cluster, skipping pass");
        return Ok(());
    }

    let mut balancer = Balancer::build(allocation, settings)?;
    balancer.allocate_unassigned(deciders, allocation);
    balancer.move_shards(deciders, allocation);
    balancer.rebalance(deciders, allocation);
    Ok(())
}

/// Computes, for every node, `currentNodeWeight - nodeWeight` for `shard`.
/// Never mutates `allocation` — useful for explain APIs and tests
/// that want a weight snapshot without running a pass.
pub fn weigh_shard(
    settings: &BalancerSettings,
    allocation: &RoutingAllocation,
    shard: &ShardRouting,
) -> Result<HashMap<String, f64>> {
    let mut balancer = Balancer::build(allocation, settings)?;
    Ok(balancer.weigh_shard(shard))
}

impl Balancer {
    fn weigh_shard(&mut self, shard: &ShardRouting) -> HashMap<String, f64> {
        let avg_shards = self.averages.avg_shards;
        let avg_index = self.averages.avg_shards_of_index(&shard.index);

        let current_weight = shard
            .current_node_id
            .as_ref()
            .and_then(|id| self.model.node(id))
            .map(|node| self.weight_function.weight(node, &shard.index, 0, avg_shards, avg_index))
            .unwrap_or(0.0);

        self.model
            .nodes()
            .map(|node| {
                let w = self.weight_function.weight(node, &shard.index, 0, avg_shards, avg_index);
                (node.node_id.clone(), current_weight - w)
            })
            .collect()
    }
}
