use rustc_hash::FxHashSet as HashSet;

use crate::decision::Decision;
use crate::model::{ModelNode, RoutingAllocation, ShardRouting};

use super::AllocationDecider;

/// Vetoes moving a primary shard between specific pairs of zones (keyed by
/// a node attribute, e.g. `"zone"`). Forbidding a direction rather than a
/// zone pair lets an operator, say, allow `z1 -> z2` failover while still
/// blocking the balancer from routinely rebalancing primaries back `z2 -> z1`.
#[derive(Debug)]
pub struct ZoneAwarenessDecider {
    pub zone_attribute: String,
    pub forbidden_moves: HashSet<(String, String)>,
}

impl ZoneAwarenessDecider {
    pub fn new(zone_attribute: impl Into<String>, forbidden_moves: HashSet<(String, String)>) -> Self {
        Self {
            zone_attribute: zone_attribute.into(),
            forbidden_moves,
        }
    }
}

impl AllocationDecider for ZoneAwarenessDecider {
    fn can_allocate_shard(
        &self,
        shard: &ShardRouting,
        node: &ModelNode,
        allocation: &RoutingAllocation,
    ) -> Decision {
        if !shard.primary {
            return Decision::Yes;
        }
        let Some(current_node_id) = &shard.current_node_id else {
            return Decision::Yes;
        };
        if current_node_id == &node.node_id {
            return Decision::Yes;
        }

        let from_zone = allocation.node_attribute(current_node_id, &self.zone_attribute);
        let to_zone = allocation.node_attribute(&node.node_id, &self.zone_attribute);

        match (from_zone, to_zone) {
            (Some(from), Some(to)) if self.forbidden_moves.contains(&(from.to_string(), to.to_string())) => {
                Decision::No
            }
            _ => Decision::Yes,
        }
    }

    fn name(&self) -> &'static str {
        "zone_awareness"
    }
}
