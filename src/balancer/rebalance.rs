//! Rebalance: visits indices heaviest-spread-first and, for
//! each, slides a two-pointer window over nodes sorted by weight, moving
//! one shard at a time from the heaviest node to the lightest until the
//! spread settles under the threshold (or the window exhausts).

use crate::decision::Decision;
use crate::deciders::AllocationDeciders;
use crate::model::{RoutingAllocation, ShardRouting};
use crate::sorter::NodeSorter;

use super::Balancer;

/// Safety net against a logic error turning the window-shrink loop into an
/// infinite one; a correct implementation never gets close to this.
const MAX_ITERATIONS_PER_INDEX: usize = 10_000;

impl Balancer {
    pub(crate) fn rebalance(&mut self, deciders: &AllocationDeciders, allocation: &mut RoutingAllocation) {
        if allocation.has_pending_async_fetch {
            tracing::debug!("rebalance: skipped, pending async fetch");
            return;
        }
        if deciders.can_rebalance(allocation) != Decision::Yes {
            tracing::debug!("rebalance: skipped, canRebalance is not YES");
            return;
        }
        if self.model.len() < 2 {
            tracing::debug!("rebalance: skipped, fewer than two nodes");
            return;
        }

        let mut weighted_indices: Vec<(String, f64)> = allocation
            .metadata
            .index_names()
            .map(|name| {
                self.sorter.reset(
                    &self.model,
                    name,
                    self.averages.avg_shards,
                    self.averages.avg_shards_of_index(name),
                    &self.weight_function,
                );
                (name.to_string(), self.sorter.delta())
            })
            .collect();
        weighted_indices.sort_by(|a, b| b.1.total_cmp(&a.1));

        for (index, _) in weighted_indices {
            self.rebalance_index(&index, deciders, allocation);
        }
    }

    fn rebalance_index(&mut self, index: &str, deciders: &AllocationDeciders, allocation: &mut RoutingAllocation) {
        let Some(index_meta) = allocation.metadata.index(index) else {
            return;
        };

        let all_node_ids: Vec<String> = self.model.node_ids().map(str::to_string).collect();
        let relevant: Vec<String> = all_node_ids
            .into_iter()
            .filter(|id| {
                let node = self.model.node(id).expect("model out of sync");
                node.shards_of_index(index) > 0
                    || deciders.can_allocate_index(index_meta, node, allocation) != Decision::No
            })
            .collect();

        if relevant.len() < 2 {
            return;
        }

        let mut sorter = NodeSorter::new(relevant.iter().cloned());
        sorter.reset(
            &self.model,
            index,
            self.averages.avg_shards,
            self.averages.avg_shards_of_index(index),
            &self.weight_function,
        );

        let relevant_count = relevant.len();
        let mut low = 0usize;
        let mut high = relevant_count - 1;
        let mut iterations = 0usize;

        loop {
            iterations += 1;
            if iterations > MAX_ITERATIONS_PER_INDEX {
                tracing::warn!(%index, "rebalance: exceeded iteration safety net, aborting index");
                break;
            }

            let min_id = sorter.node_id(low).to_string();
            let max_id = sorter.node_id(high).to_string();
            let max_has_shards = self
                .model
                .node(&max_id)
                .map(|n| n.shards_of_index(index) > 0)
                .unwrap_or(false);

            let mut attempt = false;
            if max_has_shards {
                let delta = sorter.weight(high) - sorter.weight(low);
                let within_threshold = delta <= self.threshold + 0.001;
                let escape = within_threshold
                    && high >= 1
                    && (sorter.weight(high - 1) - sorter.weight(0)) > self.threshold + 0.001;

                if within_threshold && !escape {
                    break;
                }
                attempt = true;
            }

            let relocated = if attempt {
                let delta = sorter.weight(high) - sorter.weight(low);
                self.try_relocate_shard(&min_id, &max_id, index, delta, deciders, allocation)
            } else {
                false
            };

            if relocated {
                sorter.reset(
                    &self.model,
                    index,
                    self.averages.avg_shards,
                    self.averages.avg_shards_of_index(index),
                    &self.weight_function,
                );
                low = 0;
                high = relevant_count - 1;
                continue;
            }

            if low + 1 < high {
                low += 1;
            } else if low > 0 {
                low = 0;
                high -= 1;
            } else {
                break;
            }

            if high == 0 {
                break;
            }
        }
    }

    /// Tries to move one shard of `index` from `max_id` to `min_id`.
    /// Only shards whose move strictly improves on `delta` (the current
    /// max-min spread) are candidates; among those, the smallest resulting
    /// gap wins, tie-broken by the lowest shard-id for determinism.
    fn try_relocate_shard(
        &mut self,
        min_id: &str,
        max_id: &str,
        index: &str,
        delta: f64,
        deciders: &AllocationDeciders,
        allocation: &mut RoutingAllocation,
    ) -> bool {
        let avg_shards = self.averages.avg_shards;
        let avg_index = self.averages.avg_shards_of_index(index);

        let candidates: Vec<ShardRouting> = {
            let max_node = self.model.node(max_id).expect("max node must exist");
            max_node.started_shards_of_index(index).cloned().collect()
        };

        let mut best: Option<(ShardRouting, f64, Decision)> = None;

        for shard in candidates {
            let min_node = self.model.node(min_id).expect("min node must exist");
            let can_allocate = deciders.can_allocate_shard(&shard, min_node, allocation);
            if can_allocate == Decision::No {
                continue;
            }
            let can_rebalance = deciders.can_rebalance_shard(&shard, allocation);
            if can_rebalance == Decision::No {
                continue;
            }

            let max_node = self.model.node(max_id).expect("max node must exist");
            let min_node = self.model.node(min_id).expect("min node must exist");
            let gain = self.weight_function.weight_after_add(min_node, index, avg_shards, avg_index)
                - self.weight_function.weight_after_remove(max_node, index, avg_shards, avg_index);

            if gain >= delta {
                continue;
            }

            let combined = if can_allocate == Decision::Throttle || can_rebalance == Decision::Throttle {
                Decision::Throttle
            } else {
                Decision::Yes
            };

            let is_better = match &best {
                None => true,
                Some((b_shard, b_gain, _)) => {
                    gain < *b_gain - f64::EPSILON
                        || ((gain - *b_gain).abs() < f64::EPSILON && shard.shard_id < b_shard.shard_id)
                }
            };
            if is_better {
                best = Some((shard, gain, combined));
            }
        }

        match best {
            Some((shard, _, Decision::Yes)) => {
                self.model.node_mut(max_id).unwrap().remove_shard(index, shard.shard_id);
                let shard_size = allocation.cluster_info.get_shard_size(&shard, 0);
                let (_, initializing_target) =
                    allocation
                        .routing_nodes
                        .relocate_shard(&shard, min_id, shard_size, &mut allocation.changes);
                self.model.node_mut(min_id).unwrap().add_shard(initializing_target);
                tracing::debug!(%index, shard = shard.shard_id, from = %max_id, to = %min_id, "rebalance: relocated");
                true
            }
            Some((shard, _, Decision::Throttle)) => {
                // Reflect the simulated move in the model only; the real
                // routing state is untouched, so the outer loop treats this
                // as "no progress" and shrinks the window.
                self.model.node_mut(max_id).unwrap().remove_shard(index, shard.shard_id);
                let simulated = shard.into_initializing(min_id);
                self.model.node_mut(min_id).unwrap().add_shard(simulated);
                false
            }
            _ => false,
        }
    }
}
