//! AllocateUnassigned: drains the unassigned queue, sorted
//! primaries-first, and assigns (or throttles, or ignores) each shard in
//! turn.

use std::cmp::Ordering;
use rustc_hash::FxHashSet as HashSet;

use crate::decision::{AllocationStatus, Decision, NodeExplanation, ShardAllocationDecision};
use crate::deciders::AllocationDeciders;
use crate::model::{ModelNode, RoutingAllocation, ShardRouting};

use super::Balancer;

impl Balancer {
    pub(crate) fn allocate_unassigned(
        &mut self,
        deciders: &AllocationDeciders,
        allocation: &mut RoutingAllocation,
    ) {
        let mut primary: Vec<ShardRouting> = allocation.routing_nodes.unassigned().drain();
        primary.sort_by(|a, b| unassigned_sort_key(a, b, allocation));

        let mut secondary: Vec<ShardRouting> = Vec::new();
        let mut throttled_nodes: HashSet<String> = HashSet::new();
        let total_nodes = self.model.len();

        let mut i = 0;
        while i < primary.len() || !secondary.is_empty() {
            if i >= primary.len() {
                primary = std::mem::take(&mut secondary);
                primary.sort_by(|a, b| unassigned_sort_key(a, b, allocation));
                i = 0;
                if primary.is_empty() {
                    break;
                }
            }

            let shard = primary[i].clone();

            if !allocation.debug_decision && throttled_nodes.len() >= total_nodes {
                allocation
                    .routing_nodes
                    .unassigned()
                    .ignore_shard(shard, AllocationStatus::DecidersThrottled, &mut allocation.changes);
                i += 1;
                continue;
            }

            let decision = self.decide_allocate_unassigned(&shard, &throttled_nodes, deciders, allocation);
            let is_replica = !shard.primary;

            match (decision.final_decision, decision.target_node_id) {
                (crate::decision::FinalDecision::Yes, Some(node_id)) => {
                    let shard_size = allocation.cluster_info.get_shard_size(&shard, 0);
                    let initializing =
                        allocation
                            .routing_nodes
                            .initialize_shard(&shard, &node_id, shard_size, &mut allocation.changes);
                    self.model.node_mut(&node_id).expect("target node must exist").add_shard(initializing);
                    tracing::debug!(index = %shard.index, shard = shard.shard_id, node = %node_id, "allocate_unassigned: assigned");

                    // Only one copy of a shard is initialized per batch: a
                    // replica that just placed defers its equally-comparing
                    // siblings (other replica copies of the same shard) to
                    // the next batch, where they're weighed against the
                    // now-updated model rather than all at once.
                    if is_replica {
                        let mut j = i + 1;
                        while j < primary.len() && unassigned_sort_key(&shard, &primary[j], allocation) == Ordering::Equal {
                            secondary.push(primary.remove(j));
                        }
                    }
                }
                (_, Some(node_id)) => {
                    // THROTTLE: reflect the simulated placement in the model
                    // only, so later candidates see the node as busier,
                    // without touching the real routing state.
                    let simulated = shard.clone().into_initializing(node_id.clone());
                    self.model.node_mut(&node_id).expect("target node must exist").add_shard(simulated);

                    if let Some(node) = self.model.node(&node_id) {
                        if deciders.can_allocate_node(node, allocation) == Decision::No {
                            throttled_nodes.insert(node_id.clone());
                        }
                    }

                    allocation.routing_nodes.unassigned().ignore_shard(
                        shard.clone(),
                        AllocationStatus::DecidersThrottled,
                        &mut allocation.changes,
                    );
                }
                (_, None) => {
                    allocation.routing_nodes.unassigned().ignore_shard(
                        shard.clone(),
                        AllocationStatus::DecidersNo,
                        &mut allocation.changes,
                    );

                    // No node at all can take this shard, so there's no
                    // point retrying its other replica copies either —
                    // ignore them immediately instead of waiting for them
                    // to re-fail on a later batch.
                    if is_replica {
                        let mut j = i + 1;
                        while j < primary.len() && unassigned_sort_key(&shard, &primary[j], allocation) == Ordering::Equal {
                            let duplicate = primary.remove(j);
                            allocation.routing_nodes.unassigned().ignore_shard(
                                duplicate,
                                AllocationStatus::DecidersNo,
                                &mut allocation.changes,
                            );
                        }
                    }
                }
            }

            i += 1;
        }
    }

    fn decide_allocate_unassigned(
        &self,
        shard: &ShardRouting,
        throttled_nodes: &HashSet<String>,
        deciders: &AllocationDeciders,
        allocation: &RoutingAllocation,
    ) -> ShardAllocationDecision {
        if shard.is_assigned() {
            return ShardAllocationDecision::not_taken();
        }

        if deciders.can_allocate_shard_globally(shard, allocation) == Decision::No {
            return ShardAllocationDecision::no(AllocationStatus::DecidersNo, None);
        }

        let explain = allocation.debug_decision;
        let mut min_weight = f64::INFINITY;
        let mut best_decision: Option<Decision> = None;
        let mut min_node: Option<&ModelNode> = None;
        let mut per_node = Vec::new();

        for node in self.model.nodes() {
            if !explain
                && (throttled_nodes.contains(&node.node_id)
                    || node.contains_shard(&shard.index, shard.shard_id))
            {
                continue;
            }

            let w = self.weight_function.weight_after_add(
                node,
                &shard.index,
                self.averages.avg_shards,
                self.averages.avg_shards_of_index(&shard.index),
            );

            if !explain && w > min_weight {
                continue;
            }

            let decision = deciders.can_allocate_shard(shard, node, allocation);

            if explain {
                per_node.push(NodeExplanation {
                    node_id: node.node_id.clone(),
                    decision,
                    weight: w,
                });
            }

            if decision == Decision::No {
                continue;
            }

            let take = match min_node {
                None => true,
                Some(current) => {
                    if w < min_weight {
                        true
                    } else if w == min_weight {
                        let current_decision = best_decision.expect("min_node implies best_decision");
                        if decision != current_decision {
                            decision == Decision::Yes
                        } else {
                            prefer_by_rotation(current, node, shard.shard_id, &shard.index)
                        }
                    } else {
                        false
                    }
                }
            };

            if take {
                best_decision = Some(decision);
                min_weight = w;
                min_node = Some(node);
            }
        }

        match (best_decision, min_node) {
            (Some(decision), Some(node)) => ShardAllocationDecision::decided(
                decision,
                node.node_id.clone(),
                explain.then_some(per_node),
            ),
            _ => ShardAllocationDecision::no(AllocationStatus::DecidersNo, explain.then_some(per_node)),
        }
    }
}

fn prefer_by_rotation(current: &ModelNode, candidate: &ModelNode, shard_id: u32, index: &str) -> bool {
    rotation_score(candidate.highest_primary_id(index), shard_id)
        < rotation_score(current.highest_primary_id(index), shard_id)
}

/// Lower is more preferred: nodes whose highest primary shard-id for this
/// index sits just above `shard_id` are preferred, rotating replica
/// placement across nodes rather than always picking the same one.
fn rotation_score(highest_primary: i64, shard_id: u32) -> i64 {
    let shard_id = shard_id as i64;
    if highest_primary > shard_id {
        highest_primary - shard_id
    } else {
        i64::MAX
    }
}


/// Primaries first, then the caller's secondary comparator (if any), then
/// index name, then shard-id. Replica copies of the same `(index,
/// shard_id)` compare equal, which is what lets the two-buffer loop defer
/// all-but-one of them.
fn unassigned_sort_key(a: &ShardRouting, b: &ShardRouting, allocation: &RoutingAllocation) -> Ordering {
    b.primary
        .cmp(&a.primary)
        .then_with(|| match &allocation.secondary_comparator {
            Some(cmp) => cmp(a, b),
            None => Ordering::Equal,
        })
        .then_with(|| a.index.cmp(&b.index))
        .then_with(|| a.shard_id.cmp(&b.shard_id))
}
