use crate::decision::Decision;
use crate::model::{ModelNode, RoutingAllocation, ShardRouting};

use super::AllocationDecider;

/// Vetoes placing a shard on a node that already hosts a copy of the same
/// `(index, shard_id)` pair.
#[derive(Debug, Default)]
pub struct SameShardAllocationDecider;

impl AllocationDecider for SameShardAllocationDecider {
    fn can_allocate_shard(
        &self,
        shard: &ShardRouting,
        node: &ModelNode,
        _allocation: &RoutingAllocation,
    ) -> Decision {
        if node.contains_shard(&shard.index, shard.shard_id) {
            Decision::No
        } else {
            Decision::Yes
        }
    }

    fn name(&self) -> &'static str {
        "same_shard"
    }
}
