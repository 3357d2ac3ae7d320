//! Caller-facing data model: the routing state the allocator reads and
//! mutates, plus `Model`/`ModelNode`/`ModelIndex`, the balancer's own
//! lightweight mirror of that state used internally during a pass.

mod allocation;
mod balancer_model;
mod cluster_info;
mod metadata;
mod routing_changes;
mod routing_node;
mod routing_nodes;
mod shard_routing;
mod unassigned;

pub use allocation::{DiscoveryNode, RoutingAllocation, SecondaryComparator};
pub use balancer_model::{Model, ModelIndex, ModelNode};
pub use cluster_info::ClusterInfo;
pub use metadata::{IndexMetadata, Metadata};
pub use routing_changes::RoutingChanges;
pub use routing_node::RoutingNode;
pub use routing_nodes::RoutingNodes;
pub use shard_routing::{ShardRouting, ShardState};
pub use unassigned::UnassignedShards;
