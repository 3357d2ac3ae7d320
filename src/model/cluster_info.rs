//! Disk-usage estimates for shards, consumed by logging/explain output and
//! by deciders that veto placement on disk-usage grounds (not shipped as a
//! reference decider here, but the hook other deciders can read from).

use rustc_hash::FxHashMap as HashMap;

use super::shard_routing::ShardRouting;

#[derive(Debug, Clone, Default)]
pub struct ClusterInfo {
    shard_sizes: HashMap<(String, u32, bool), u64>,
}

impl ClusterInfo {
    pub fn set_shard_size(&mut self, index: impl Into<String>, shard_id: u32, primary: bool, size: u64) {
        self.shard_sizes.insert((index.into(), shard_id, primary), size);
    }

    pub fn get_shard_size(&self, shard: &ShardRouting, default: u64) -> u64 {
        self.shard_sizes
            .get(&(shard.index.clone(), shard.shard_id, shard.primary))
            .copied()
            .unwrap_or(default)
    }
}
