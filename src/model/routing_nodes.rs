//! The cluster's authoritative routing state: every node's shards,
//! plus the unassigned queue. This is the caller-owned structure the
//! balancer mutates in place during `AllocateUnassigned` and `MoveShards`,
//! and reads (never mutates) during `Rebalance`'s weighing step.

use rustc_hash::FxHashMap as HashMap;

use super::routing_changes::RoutingChanges;
use super::routing_node::RoutingNode;
use super::shard_routing::{ShardRouting, ShardState};
use super::unassigned::UnassignedShards;

#[derive(Debug, Default)]
pub struct RoutingNodes {
    nodes: HashMap<String, RoutingNode>,
    order: Vec<String>,
    unassigned: UnassignedShards,
}

impl RoutingNodes {
    pub fn new(node_ids: impl IntoIterator<Item = String>) -> Self {
        let mut nodes = HashMap::new();
        let mut order = Vec::new();
        for id in node_ids {
            order.push(id.clone());
            nodes.insert(id.clone(), RoutingNode::new(id));
        }
        Self {
            nodes,
            order,
            unassigned: UnassignedShards::default(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&RoutingNode> {
        self.nodes.get(id)
    }

    pub fn node_ids(&self) -> &[String] {
        &self.order
    }

    pub fn size(&self) -> usize {
        self.order.len()
    }

    pub fn unassigned(&mut self) -> &mut UnassignedShards {
        &mut self.unassigned
    }

    pub fn unassigned_ref(&self) -> &UnassignedShards {
        &self.unassigned
    }

    /// Setup helper: seed the unassigned queue before the first pass. Not
    /// part of the balancer's own API surface — a caller builds the
    /// starting routing state this way (e.g. a new index's shards).
    pub fn add_unassigned(&mut self, shard: ShardRouting) {
        self.unassigned.push(shard);
    }

    /// Setup helper: place `shard` directly onto `node_id` in the `Started`
    /// state, bypassing the allocator entirely. Not part of the balancer's
    /// own API surface — for building fixtures and test scenarios that
    /// start from an already-balanced (or intentionally unbalanced)
    /// cluster, rather than from an empty unassigned queue.
    pub fn add_started(&mut self, shard: ShardRouting, node_id: &str) {
        let started = ShardRouting {
            state: ShardState::Started,
            current_node_id: Some(node_id.to_string()),
            relocating_node_id: None,
            ..shard
        };
        self.nodes
            .get_mut(node_id)
            .unwrap_or_else(|| panic!("unknown node {node_id}"))
            .add(started);
    }

    pub fn initialize_shard(
        &mut self,
        shard: &ShardRouting,
        to_node: &str,
        shard_size: u64,
        changes: &mut RoutingChanges,
    ) -> ShardRouting {
        let initializing = shard.clone().into_initializing(to_node);
        self.nodes
            .get_mut(to_node)
            .unwrap_or_else(|| panic!("unknown node {to_node}"))
            .add(initializing.clone());
        changes.record(format!(
            "initialized {}[{}] primary={} on {to_node} (size={shard_size})",
            shard.index, shard.shard_id, shard.primary
        ));
        initializing
    }

    /// Moves an already-assigned shard from its current node to `to_node`.
    /// Returns `(source_relocating, target_initializing)`: the source node
    /// keeps the former until the move completes, the target node gets
    /// the latter immediately.
    pub fn relocate_shard(
        &mut self,
        shard: &ShardRouting,
        to_node: &str,
        shard_size: u64,
        changes: &mut RoutingChanges,
    ) -> (ShardRouting, ShardRouting) {
        let from_node = shard
            .current_node_id
            .clone()
            .expect("relocate_shard requires an assigned shard");
        let relocating_source = shard.clone().into_relocating(to_node.to_string());
        let initializing_target = shard.into_relocation_target(to_node);

        self.nodes
            .get_mut(&from_node)
            .unwrap_or_else(|| panic!("unknown node {from_node}"))
            .replace(&shard.index, shard.shard_id, relocating_source.clone());
        self.nodes
            .get_mut(to_node)
            .unwrap_or_else(|| panic!("unknown node {to_node}"))
            .add(initializing_target.clone());

        changes.record(format!(
            "relocating {}[{}] primary={} from {from_node} to {to_node} (size={shard_size})",
            shard.index, shard.shard_id, shard.primary
        ));

        (relocating_source, initializing_target)
    }

    /// A round-robin pass over every `Started` shard, one node at a time,
    /// cycling through nodes in insertion order until every node's started
    /// shards are exhausted. Used by `MoveShards` so no single node's
    /// shards dominate the scan order.
    pub fn node_interleaved_started_shards(&self) -> Vec<ShardRouting> {
        let mut per_node: Vec<Vec<&ShardRouting>> = self
            .order
            .iter()
            .map(|id| {
                self.nodes[id]
                    .shards()
                    .filter(|s| s.state == ShardState::Started)
                    .collect()
            })
            .collect();

        let mut result = Vec::new();
        loop {
            let mut any = false;
            for bucket in per_node.iter_mut() {
                if let Some(shard) = bucket.pop() {
                    result.push(shard.clone());
                    any = true;
                }
            }
            if !any {
                break;
            }
        }
        result
    }

    /// Whether the primary copy of `(index, shard_id)` is active (`Started`
    /// or `Relocating`) anywhere in the cluster.
    pub fn primary_is_started(&self, index: &str, shard_id: u32) -> bool {
        self.order.iter().any(|id| {
            self.nodes[id].shards().any(|s| {
                s.index == index
                    && s.shard_id == shard_id
                    && s.primary
                    && matches!(s.state, ShardState::Started | ShardState::Relocating)
            })
        })
    }
}
