use crate::decision::Decision;
use crate::model::{ModelNode, RoutingAllocation, ShardRouting, ShardState};

use super::AllocationDecider;

/// Caps the number of concurrent recoveries (shards in the `Initializing`
/// state) a single node will take on at once, so one allocator pass can't
/// saturate a node's recovery bandwidth.
#[derive(Debug)]
pub struct ThrottlingDecider {
    pub max_concurrent_per_node: usize,
}

impl ThrottlingDecider {
    pub fn new(max_concurrent_per_node: usize) -> Self {
        Self { max_concurrent_per_node }
    }
}

impl AllocationDecider for ThrottlingDecider {
    fn can_allocate_shard(
        &self,
        _shard: &ShardRouting,
        node: &ModelNode,
        _allocation: &RoutingAllocation,
    ) -> Decision {
        if recovering_shard_count(node) >= self.max_concurrent_per_node {
            Decision::Throttle
        } else {
            Decision::Yes
        }
    }

    fn can_allocate_node(&self, node: &ModelNode, _allocation: &RoutingAllocation) -> Decision {
        if recovering_shard_count(node) >= self.max_concurrent_per_node {
            Decision::No
        } else {
            Decision::Yes
        }
    }

    fn name(&self) -> &'static str {
        "throttling"
    }
}

fn recovering_shard_count(node: &ModelNode) -> usize {
    node.shards().filter(|s| s.state == ShardState::Initializing).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClusterInfo, Metadata, Model, RoutingNodes, RoutingChanges};

    fn model_with_initializing(count: u32) -> Model {
        let mut routing_nodes = RoutingNodes::new(["n1".to_string()]);
        let mut changes = RoutingChanges::default();
        for shard_id in 0..count {
            let shard = ShardRouting::new_unassigned("idx", shard_id, true);
            routing_nodes.initialize_shard(&shard, "n1", 0, &mut changes);
        }
        Model::build(&routing_nodes)
    }

    #[test]
    fn throttles_once_limit_reached() {
        let model = model_with_initializing(2);
        let allocation = RoutingAllocation::new(
            vec![],
            RoutingNodes::new(["n1".to_string()]),
            Metadata::new([]),
            ClusterInfo::default(),
        );
        let decider = ThrottlingDecider::new(2);
        let node = model.node("n1").unwrap();
        let candidate = ShardRouting::new_unassigned("idx", 99, true);
        assert_eq!(decider.can_allocate_shard(&candidate, node, &allocation), Decision::Throttle);
        assert_eq!(decider.can_allocate_node(node, &allocation), Decision::No);
    }

    #[test]
    fn allows_below_limit() {
        let model = model_with_initializing(1);
        let allocation = RoutingAllocation::new(
            vec![],
            RoutingNodes::new(["n1".to_string()]),
            Metadata::new([]),
            ClusterInfo::default(),
        );
        let decider = ThrottlingDecider::new(2);
        let node = model.node("n1").unwrap();
        let candidate = ShardRouting::new_unassigned("idx", 99, true);
        assert_eq!(decider.can_allocate_shard(&candidate, node, &allocation), Decision::Yes);
        assert_eq!(decider.can_allocate_node(node, &allocation), Decision::Yes);
    }
}
