//! balanced-shards-allocator - the decision engine behind shard placement
//! in a distributed search/index cluster.
//!
//! Main modules:
//! - `model` — caller-facing routing state (`ShardRouting`, `RoutingNodes`,
//!   `Metadata`, `RoutingAllocation`) plus the balancer's internal mirror
//!   (`Model`, `ModelNode`, `ModelIndex`)
//! - `decision` — decision and explain types (`Decision`, `ShardAllocationDecision`,
//!   `MoveDecision`)
//! - `deciders` — the pluggable allocation-rule façade and reference deciders
//! - `weight` — the weight function driving every placement choice
//! - `sorter` — keeps nodes ordered by weight for one index
//! - `balancer` — the three-phase pass: AllocateUnassigned, MoveShards, Rebalance
//! - `config` — layered settings (defaults / file / env)
//! - `error` — common error type
//! - `logging` — structured logging (formatting, filters, sinks)

/// The three-phase balancer pass and its public entry points.
pub mod balancer;
/// Layered configuration (defaults / file / env).
pub mod config;
/// Decision and explain types.
pub mod decision;
/// The pluggable allocation-rule façade and reference deciders.
pub mod deciders;
/// Common error type.
pub mod error;
/// Structured logging (formatting, filters, sinks).
pub mod logging;
/// Caller-facing routing state and the balancer's internal model.
pub mod model;
/// Node ordering by weight, for one index at a time.
pub mod sorter;
/// The weight function driving every placement choice.
pub mod weight;

pub use balancer::{allocate, weigh_shard};
pub use config::BalancerSettings;
pub use decision::{
    AllocationStatus, Decision as AllocationDecision, FinalDecision, MoveDecision, NodeExplanation,
    ShardAllocationDecision,
};
pub use deciders::{AllocationDecider, AllocationDeciders};
pub use error::{AllocatorError, Result};
pub use model::{
    ClusterInfo, DiscoveryNode, IndexMetadata, Metadata, Model, ModelIndex, ModelNode,
    RoutingAllocation, RoutingChanges, RoutingNode, RoutingNodes, SecondaryComparator,
    ShardRouting, ShardState, UnassignedShards,
};
pub use sorter::NodeSorter;
pub use weight::WeightFunction;
