//! The deciders façade: a pluggable, composable set of allocation
//! rules. Each [`AllocationDecider`] answers a narrow question; the
//! composite [`AllocationDeciders`] combines every registered decider's
//! verdict by keeping the most restrictive one, short-circuiting on the
//! first `No` unless explain mode wants the full per-decider picture.

mod enable_allocation;
mod filter;
mod replica_after_primary;
mod same_shard;
mod throttling;
mod zone_awareness;

pub use enable_allocation::{AllocationEnable, EnableAllocationDecider};
pub use filter::FilterAllocationDecider;
pub use replica_after_primary::ReplicaAfterPrimaryActiveDecider;
pub use same_shard::SameShardAllocationDecider;
pub use throttling::ThrottlingDecider;
pub use zone_awareness::ZoneAwarenessDecider;

use std::fmt;

use crate::decision::Decision;
use crate::model::{IndexMetadata, ModelNode, RoutingAllocation, ShardRouting};

/// One allocation rule. Every hook defaults to `Yes`, so a decider that
/// only cares about one question needs to override only that method.
pub trait AllocationDecider: fmt::Debug + Send + Sync {
    fn can_allocate_shard_globally(
        &self,
        _shard: &ShardRouting,
        _allocation: &RoutingAllocation,
    ) -> Decision {
        Decision::Yes
    }

    fn can_allocate_shard(
        &self,
        _shard: &ShardRouting,
        _node: &ModelNode,
        _allocation: &RoutingAllocation,
    ) -> Decision {
        Decision::Yes
    }

    fn can_allocate_index(
        &self,
        _index: &IndexMetadata,
        _node: &ModelNode,
        _allocation: &RoutingAllocation,
    ) -> Decision {
        Decision::Yes
    }

    fn can_allocate_node(&self, _node: &ModelNode, _allocation: &RoutingAllocation) -> Decision {
        Decision::Yes
    }

    fn can_remain(
        &self,
        _shard: &ShardRouting,
        _node: &ModelNode,
        _allocation: &RoutingAllocation,
    ) -> Decision {
        Decision::Yes
    }

    fn can_rebalance(&self, _allocation: &RoutingAllocation) -> Decision {
        Decision::Yes
    }

    fn can_rebalance_shard(&self, _shard: &ShardRouting, _allocation: &RoutingAllocation) -> Decision {
        Decision::Yes
    }

    fn name(&self) -> &'static str;
}

#[derive(Debug, Default)]
pub struct AllocationDeciders {
    deciders: Vec<Box<dyn AllocationDecider>>,
}

impl AllocationDeciders {
    pub fn new(deciders: Vec<Box<dyn AllocationDecider>>) -> Self {
        Self { deciders }
    }

    fn combine(&self, explain: bool, f: impl Fn(&dyn AllocationDecider) -> Decision) -> Decision {
        let mut result = Decision::Yes;
        for decider in &self.deciders {
            let d = f(decider.as_ref());
            result = result.most_restrictive(d);
            if result == Decision::No && !explain {
                return result;
            }
        }
        result
    }

    pub fn can_allocate_shard_globally(
        &self,
        shard: &ShardRouting,
        allocation: &RoutingAllocation,
    ) -> Decision {
        self.combine(allocation.debug_decision, |d| {
            d.can_allocate_shard_globally(shard, allocation)
        })
    }

    pub fn can_allocate_shard(
        &self,
        shard: &ShardRouting,
        node: &ModelNode,
        allocation: &RoutingAllocation,
    ) -> Decision {
        self.combine(allocation.debug_decision, |d| {
            d.can_allocate_shard(shard, node, allocation)
        })
    }

    pub fn can_allocate_index(
        &self,
        index: &IndexMetadata,
        node: &ModelNode,
        allocation: &RoutingAllocation,
    ) -> Decision {
        self.combine(allocation.debug_decision, |d| {
            d.can_allocate_index(index, node, allocation)
        })
    }

    pub fn can_allocate_node(&self, node: &ModelNode, allocation: &RoutingAllocation) -> Decision {
        self.combine(allocation.debug_decision, |d| d.can_allocate_node(node, allocation))
    }

    pub fn can_remain(
        &self,
        shard: &ShardRouting,
        node: &ModelNode,
        allocation: &RoutingAllocation,
    ) -> Decision {
        self.combine(allocation.debug_decision, |d| d.can_remain(shard, node, allocation))
    }

    pub fn can_rebalance(&self, allocation: &RoutingAllocation) -> Decision {
        self.combine(allocation.debug_decision, |d| d.can_rebalance(allocation))
    }

    pub fn can_rebalance_shard(&self, shard: &ShardRouting, allocation: &RoutingAllocation) -> Decision {
        self.combine(allocation.debug_decision, |d| d.can_rebalance_shard(shard, allocation))
    }
}
