use crate::decision::Decision;
use crate::model::{IndexMetadata, ModelNode, RoutingAllocation, ShardRouting};

use super::AllocationDecider;

/// Node-attribute include/exclude/require filters, scoped per index
/// (`index.routing.allocation.{include,exclude,require}.*` in spirit).
#[derive(Debug, Default)]
pub struct FilterAllocationDecider;

impl AllocationDecider for FilterAllocationDecider {
    fn can_allocate_shard(
        &self,
        shard: &ShardRouting,
        node: &ModelNode,
        allocation: &RoutingAllocation,
    ) -> Decision {
        match allocation.metadata.index(&shard.index) {
            Some(meta) if matches(meta, node, allocation) => Decision::Yes,
            Some(_) => Decision::No,
            None => Decision::Yes,
        }
    }

    fn can_allocate_index(
        &self,
        index: &IndexMetadata,
        node: &ModelNode,
        allocation: &RoutingAllocation,
    ) -> Decision {
        if matches(index, node, allocation) {
            Decision::Yes
        } else {
            Decision::No
        }
    }

    fn name(&self) -> &'static str {
        "filter"
    }
}

fn matches(meta: &IndexMetadata, node: &ModelNode, allocation: &RoutingAllocation) -> bool {
    for (key, value) in &meta.include {
        if allocation.node_attribute(&node.node_id, key) != Some(value.as_str()) {
            return false;
        }
    }
    for (key, value) in &meta.exclude {
        if allocation.node_attribute(&node.node_id, key) == Some(value.as_str()) {
            return false;
        }
    }
    for (key, value) in &meta.require {
        if allocation.node_attribute(&node.node_id, key) != Some(value.as_str()) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClusterInfo, DiscoveryNode, Model, RoutingNodes};

    fn allocation_with_zone(node_id: &str, zone: &str) -> (RoutingAllocation, Model) {
        let routing_nodes = RoutingNodes::new([node_id.to_string()]);
        let model = Model::build(&routing_nodes);
        let discovery_node = DiscoveryNode::new(node_id).with_attribute("zone", zone);
        let mut index = IndexMetadata::new("idx", 1, 0);
        index.require.insert("zone".into(), "z1".into());
        let allocation = RoutingAllocation::new(
            vec![discovery_node],
            routing_nodes,
            crate::model::Metadata::new([index]),
            ClusterInfo::default(),
        );
        (allocation, model)
    }

    #[test]
    fn require_blocks_non_matching_zone() {
        let (allocation, model) = allocation_with_zone("n1", "z2");
        let decider = FilterAllocationDecider;
        let shard = ShardRouting::new_unassigned("idx", 0, true);
        assert_eq!(
            decider.can_allocate_shard(&shard, model.node("n1").unwrap(), &allocation),
            Decision::No
        );
    }

    #[test]
    fn require_allows_matching_zone() {
        let (allocation, model) = allocation_with_zone("n1", "z1");
        let decider = FilterAllocationDecider;
        let shard = ShardRouting::new_unassigned("idx", 0, true);
        assert_eq!(
            decider.can_allocate_shard(&shard, model.node("n1").unwrap(), &allocation),
            Decision::Yes
        );
    }

    #[test]
    fn shard_of_unknown_index_is_unfiltered() {
        let (allocation, model) = allocation_with_zone("n1", "z2");
        let decider = FilterAllocationDecider;
        let shard = ShardRouting::new_unassigned("other", 0, true);
        assert_eq!(
            decider.can_allocate_shard(&shard, model.node("n1").unwrap(), &allocation),
            Decision::Yes
        );
    }
}
