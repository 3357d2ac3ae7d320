use crate::decision::Decision;
use crate::model::{ModelNode, RoutingAllocation, ShardRouting};

use super::AllocationDecider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocationEnable {
    #[default]
    All,
    PrimariesOnly,
    NewPrimariesOnly,
    None,
}

/// The operator-facing on/off switch for allocation, mirroring a common
/// cluster-wide "allocation enable" setting.
#[derive(Debug)]
pub struct EnableAllocationDecider {
    pub enable: AllocationEnable,
}

impl EnableAllocationDecider {
    pub fn new(enable: AllocationEnable) -> Self {
        Self { enable }
    }
}

impl AllocationDecider for EnableAllocationDecider {
    fn can_allocate_shard(
        &self,
        shard: &ShardRouting,
        _node: &ModelNode,
        _allocation: &RoutingAllocation,
    ) -> Decision {
        match self.enable {
            AllocationEnable::All => Decision::Yes,
            // A fresh index's primaries still need to land somewhere even
            // when replica allocation is paused; we can't distinguish a
            // "new" primary from a long-lived one without a creation
            // timestamp, so both primary-only modes treat all primaries
            // the same.
            AllocationEnable::PrimariesOnly | AllocationEnable::NewPrimariesOnly => {
                if shard.primary {
                    Decision::Yes
                } else {
                    Decision::No
                }
            }
            AllocationEnable::None => Decision::No,
        }
    }

    fn name(&self) -> &'static str {
        "enable_allocation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClusterInfo, Metadata, Model, RoutingNodes};

    fn node_and_allocation() -> (RoutingAllocation, Model) {
        let routing_nodes = RoutingNodes::new(["n1".to_string()]);
        let model = Model::build(&routing_nodes);
        let allocation = RoutingAllocation::new(vec![], routing_nodes, Metadata::new([]), ClusterInfo::default());
        (allocation, model)
    }

    #[test]
    fn none_blocks_everything() {
        let (allocation, model) = node_and_allocation();
        let decider = EnableAllocationDecider::new(AllocationEnable::None);
        let primary = ShardRouting::new_unassigned("idx", 0, true);
        assert_eq!(
            decider.can_allocate_shard(&primary, model.node("n1").unwrap(), &allocation),
            Decision::No
        );
    }

    #[test]
    fn primaries_only_allows_primary_blocks_replica() {
        let (allocation, model) = node_and_allocation();
        let decider = EnableAllocationDecider::new(AllocationEnable::PrimariesOnly);
        let node = model.node("n1").unwrap();
        let primary = ShardRouting::new_unassigned("idx", 0, true);
        let replica = ShardRouting::new_unassigned("idx", 0, false);
        assert_eq!(decider.can_allocate_shard(&primary, node, &allocation), Decision::Yes);
        assert_eq!(decider.can_allocate_shard(&replica, node, &allocation), Decision::No);
    }

    #[test]
    fn all_allows_everything() {
        let (allocation, model) = node_and_allocation();
        let decider = EnableAllocationDecider::new(AllocationEnable::All);
        let node = model.node("n1").unwrap();
        let replica = ShardRouting::new_unassigned("idx", 0, false);
        assert_eq!(decider.can_allocate_shard(&replica, node, &allocation), Decision::Yes);
    }
}
