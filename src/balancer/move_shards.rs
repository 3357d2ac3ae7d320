//! MoveShards: scans every `Started` shard, node-interleaved, and
//! relocates any whose decider `canRemain` verdict is `No`. Shards that can
//! stay are left untouched; this phase never creates unassigned shards.

use crate::decision::{AllocationStatus, Decision, MoveDecision, NodeExplanation, ShardAllocationDecision};
use crate::deciders::AllocationDeciders;
use crate::model::{RoutingAllocation, ShardRouting, ShardState};

use super::Balancer;

impl Balancer {
    pub(crate) fn move_shards(&mut self, deciders: &AllocationDeciders, allocation: &mut RoutingAllocation) {
        let candidates = allocation.routing_nodes.node_interleaved_started_shards();

        for shard in candidates {
            let (decision, target) = self.decide_move(&shard, deciders, allocation);

            let Some(target_id) = target else {
                tracing::trace!(
                    index = %shard.index,
                    shard = shard.shard_id,
                    final_decision = ?decision.allocation_decision.final_decision,
                    "move_shards: shard stays"
                );
                continue;
            };

            let source_id = shard
                .current_node_id
                .clone()
                .expect("started shard must be assigned");

            self.model
                .node_mut(&source_id)
                .and_then(|n| n.remove_shard(&shard.index, shard.shard_id));

            let shard_size = allocation.cluster_info.get_shard_size(&shard, 0);
            let (_, initializing_target) =
                allocation
                    .routing_nodes
                    .relocate_shard(&shard, &target_id, shard_size, &mut allocation.changes);
            self.model
                .node_mut(&target_id)
                .expect("target node must exist")
                .add_shard(initializing_target);

            tracing::debug!(
                index = %shard.index,
                shard = shard.shard_id,
                from = %source_id,
                to = %target_id,
                "move_shards: relocated"
            );
        }
    }

    /// Pure decision: does `shard` need to move, and if so, to where?
    /// Never mutates `self` or `allocation`.
    fn decide_move(
        &mut self,
        shard: &ShardRouting,
        deciders: &AllocationDeciders,
        allocation: &RoutingAllocation,
    ) -> (MoveDecision, Option<String>) {
        if shard.state != ShardState::Started {
            return (MoveDecision::not_taken(), None);
        }

        let source_id = shard
            .current_node_id
            .clone()
            .expect("started shard must be assigned");
        let source_node = self
            .model
            .node(&source_id)
            .expect("model out of sync with routing nodes");

        let can_remain = deciders.can_remain(shard, source_node, allocation);
        if can_remain != Decision::No {
            return (MoveDecision::stay(can_remain), None);
        }

        let explain = allocation.debug_decision;
        self.sorter.reset(
            &self.model,
            &shard.index,
            self.averages.avg_shards,
            self.averages.avg_shards_of_index(&shard.index),
            &self.weight_function,
        );

        let mut best_seen = Decision::No;
        let mut chosen: Option<String> = None;
        let mut per_node = Vec::new();

        for i in 0..self.sorter.len() {
            let candidate_id = self.sorter.node_id(i).to_string();
            if candidate_id == source_id {
                continue;
            }
            let candidate = self.model.node(&candidate_id).expect("node vanished from model");
            let decision = deciders.can_allocate_shard(shard, candidate, allocation);

            if explain {
                per_node.push(NodeExplanation {
                    node_id: candidate_id.clone(),
                    decision,
                    weight: self.sorter.weight(i),
                });
            }

            if decision.better_than(best_seen) {
                best_seen = decision;
            }

            if decision == Decision::Yes {
                chosen = Some(candidate_id);
                if !explain {
                    break;
                }
            }
        }

        let allocation_decision = match &chosen {
            Some(node_id) => {
                ShardAllocationDecision::decided(Decision::Yes, node_id.clone(), explain.then_some(per_node))
            }
            None if best_seen == Decision::Throttle => {
                ShardAllocationDecision::no(AllocationStatus::DecidersThrottled, explain.then_some(per_node))
            }
            None => ShardAllocationDecision::no(AllocationStatus::DecidersNo, explain.then_some(per_node)),
        };

        (
            MoveDecision {
                allocation_decision,
                can_remain_decision: can_remain,
            },
            chosen,
        )
    }
}
