//! The unassigned-shards queue: shards waiting for a home, plus the
//! ones a pass gave up on for this cycle.

use crate::decision::AllocationStatus;

use super::routing_changes::RoutingChanges;
use super::shard_routing::ShardRouting;

#[derive(Debug, Default)]
pub struct UnassignedShards {
    pending: Vec<ShardRouting>,
    ignored: Vec<(ShardRouting, AllocationStatus)>,
}

impl UnassignedShards {
    pub fn push(&mut self, shard: ShardRouting) {
        self.pending.push(shard);
    }

    /// Removes and returns every pending shard, in the order it will be
    /// re-sorted by `AllocateUnassigned`.
    pub fn drain(&mut self) -> Vec<ShardRouting> {
        std::mem::take(&mut self.pending)
    }

    pub fn ignore_shard(
        &mut self,
        shard: ShardRouting,
        status: AllocationStatus,
        changes: &mut RoutingChanges,
    ) {
        changes.record(format!(
            "ignored {}[{}] primary={} status={status:?}",
            shard.index, shard.shard_id, shard.primary
        ));
        self.ignored.push((shard, status));
    }

    pub fn ignored(&self) -> &[(ShardRouting, AllocationStatus)] {
        &self.ignored
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
