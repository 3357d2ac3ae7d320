//! The per-pass allocation context: everything a decider or the balancer
//! needs to read (and the routing state it's allowed to mutate), bundled
//! the way callers hand it to `balancer::allocate`.

use std::cmp::Ordering;
use rustc_hash::FxHashMap as HashMap;
use std::sync::Arc;

use super::cluster_info::ClusterInfo;
use super::metadata::Metadata;
use super::routing_changes::RoutingChanges;
use super::routing_nodes::RoutingNodes;
use super::shard_routing::ShardRouting;

/// A caller-supplied secondary ordering for unassigned shards, e.g.
/// by index creation time. Consulted only to break ties left by the
/// primary-before-replica rule.
pub type SecondaryComparator = Arc<dyn Fn(&ShardRouting, &ShardRouting) -> Ordering + Send + Sync>;

#[derive(Debug, Clone, Default)]
pub struct DiscoveryNode {
    pub id: String,
    pub attributes: HashMap<String, String>,
}

impl DiscoveryNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

pub struct RoutingAllocation {
    pub nodes: HashMap<String, DiscoveryNode>,
    pub routing_nodes: RoutingNodes,
    pub metadata: Metadata,
    pub cluster_info: ClusterInfo,
    pub has_pending_async_fetch: bool,
    pub debug_decision: bool,
    pub changes: RoutingChanges,
    pub secondary_comparator: Option<SecondaryComparator>,
}

impl RoutingAllocation {
    pub fn new(
        nodes: Vec<DiscoveryNode>,
        routing_nodes: RoutingNodes,
        metadata: Metadata,
        cluster_info: ClusterInfo,
    ) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
            routing_nodes,
            metadata,
            cluster_info,
            has_pending_async_fetch: false,
            debug_decision: false,
            changes: RoutingChanges::default(),
            secondary_comparator: None,
        }
    }

    pub fn with_explain(mut self, debug_decision: bool) -> Self {
        self.debug_decision = debug_decision;
        self
    }

    pub fn with_pending_async_fetch(mut self, pending: bool) -> Self {
        self.has_pending_async_fetch = pending;
        self
    }

    pub fn with_secondary_comparator(mut self, cmp: SecondaryComparator) -> Self {
        self.secondary_comparator = Some(cmp);
        self
    }

    pub fn node_attribute(&self, node_id: &str, key: &str) -> Option<&str> {
        self.nodes.get(node_id)?.attributes.get(key).map(String::as_str)
    }
}
