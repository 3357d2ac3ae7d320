use crate::decision::Decision;
use crate::model::{RoutingAllocation, ShardRouting};

use super::AllocationDecider;

/// Vetoes allocating a replica before its primary is active (`Started` or
/// `Relocating`) anywhere in the cluster — there's nothing to recover from
/// otherwise.
#[derive(Debug, Default)]
pub struct ReplicaAfterPrimaryActiveDecider;

impl AllocationDecider for ReplicaAfterPrimaryActiveDecider {
    fn can_allocate_shard_globally(
        &self,
        shard: &ShardRouting,
        allocation: &RoutingAllocation,
    ) -> Decision {
        if shard.primary {
            return Decision::Yes;
        }
        if allocation
            .routing_nodes
            .primary_is_started(&shard.index, shard.shard_id)
        {
            Decision::Yes
        } else {
            Decision::No
        }
    }

    fn name(&self) -> &'static str {
        "replica_after_primary_active"
    }
}
