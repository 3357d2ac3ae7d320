//! A single shard copy and its place in the routing lifecycle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of one shard copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShardState {
    Unassigned,
    Initializing,
    Started,
    Relocating,
}

/// One copy (primary or replica) of one shard of one index.
///
/// Identity for dedup purposes is `(index, shard_id)` within a single node's
/// shard set (a node never hosts two copies of the same
/// `(index, shard_id)` pair, whether primary+replica or replica+replica).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardRouting {
    pub index: String,
    pub shard_id: u32,
    pub primary: bool,
    pub allocation_id: Uuid,
    pub state: ShardState,
    pub current_node_id: Option<String>,
    pub relocating_node_id: Option<String>,
}

impl ShardRouting {
    /// A fresh unassigned shard copy, as it would sit in the unassigned queue.
    pub fn new_unassigned(index: impl Into<String>, shard_id: u32, primary: bool) -> Self {
        Self {
            index: index.into(),
            shard_id,
            primary,
            allocation_id: Uuid::new_v4(),
            state: ShardState::Unassigned,
            current_node_id: None,
            relocating_node_id: None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.state != ShardState::Unassigned
    }

    pub fn is_relocating(&self) -> bool {
        self.state == ShardState::Relocating
    }

    /// Returns the `Initializing` copy that results from assigning this
    /// (previously unassigned) shard to `node_id`.
    pub fn into_initializing(self, node_id: impl Into<String>) -> Self {
        Self {
            allocation_id: Uuid::new_v4(),
            state: ShardState::Initializing,
            current_node_id: Some(node_id.into()),
            relocating_node_id: None,
            ..self
        }
    }

    /// Returns the source-side `Relocating` view of a shard being moved to
    /// `target_node_id`. The source node keeps this entry until the move
    /// completes.
    pub fn into_relocating(self, target_node_id: impl Into<String>) -> Self {
        let target = target_node_id.into();
        Self {
            state: ShardState::Relocating,
            relocating_node_id: Some(target),
            ..self
        }
    }

    /// Returns the target-side `Initializing` view of a shard being moved
    /// in from `self.current_node_id`.
    pub fn into_relocation_target(&self, target_node_id: impl Into<String>) -> Self {
        Self {
            index: self.index.clone(),
            shard_id: self.shard_id,
            primary: self.primary,
            allocation_id: Uuid::new_v4(),
            state: ShardState::Initializing,
            current_node_id: Some(target_node_id.into()),
            relocating_node_id: None,
        }
    }

    pub fn into_started(self) -> Self {
        Self {
            state: ShardState::Started,
            relocating_node_id: None,
            ..self
        }
    }
}
