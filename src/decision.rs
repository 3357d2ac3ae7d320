//! Decision types shared by deciders, the balancer, and explain output.

use serde::{Deserialize, Serialize};

/// A single decider's (or the composite's) verdict.
///
/// Ordered by restrictiveness: `No` is the most restrictive, `Yes` the
/// least. [`AllocationDeciders`](crate::deciders::AllocationDeciders)
/// combines per-decider verdicts by keeping the most restrictive one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Yes,
    Throttle,
    No,
}

impl Decision {
    /// Restrictiveness rank: higher is more restrictive.
    fn rank(self) -> u8 {
        match self {
            Decision::Yes => 0,
            Decision::Throttle => 1,
            Decision::No => 2,
        }
    }

    pub fn most_restrictive(self, other: Decision) -> Decision {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    /// True if `self` is strictly less restrictive (a "better" outcome) than `other`.
    pub fn better_than(self, other: Decision) -> bool {
        self.rank() < other.rank()
    }
}

/// Why a shard was not assigned anywhere this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationStatus {
    /// No decision was attempted (the shard was already assigned).
    NoAttempt,
    /// Every candidate node's deciders said `No`.
    DecidersNo,
    /// Every candidate was `Throttle` (or a `No`/`Throttle` mix with no `Yes`).
    DecidersThrottled,
}

/// One candidate node's verdict, carried only when explain mode is on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeExplanation {
    pub node_id: String,
    pub decision: Decision,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalDecision {
    Yes,
    Throttle,
    No,
    NotTaken,
}

/// The outcome of deciding where (if anywhere) to place one shard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardAllocationDecision {
    pub final_decision: FinalDecision,
    pub target_node_id: Option<String>,
    pub status: Option<AllocationStatus>,
    pub per_node: Option<Vec<NodeExplanation>>,
}

impl ShardAllocationDecision {
    pub fn not_taken() -> Self {
        Self {
            final_decision: FinalDecision::NotTaken,
            target_node_id: None,
            status: Some(AllocationStatus::NoAttempt),
            per_node: None,
        }
    }

    pub fn no(status: AllocationStatus, per_node: Option<Vec<NodeExplanation>>) -> Self {
        Self {
            final_decision: FinalDecision::No,
            target_node_id: None,
            status: Some(status),
            per_node,
        }
    }

    pub fn decided(
        decision: Decision,
        node_id: String,
        per_node: Option<Vec<NodeExplanation>>,
    ) -> Self {
        let final_decision = match decision {
            Decision::Yes => FinalDecision::Yes,
            Decision::Throttle => FinalDecision::Throttle,
            Decision::No => panic!("a No decision cannot carry a target node"),
        };
        Self {
            final_decision,
            target_node_id: Some(node_id),
            status: None,
            per_node,
        }
    }

    pub fn is_decided(&self) -> bool {
        matches!(self.final_decision, FinalDecision::Yes | FinalDecision::Throttle)
    }
}

#[cfg(test)]
mod decision_tests {
    use super::*;

    #[test]
    fn no_is_most_restrictive() {
        assert_eq!(Decision::Yes.most_restrictive(Decision::No), Decision::No);
        assert_eq!(Decision::Throttle.most_restrictive(Decision::No), Decision::No);
        assert_eq!(Decision::No.most_restrictive(Decision::Yes), Decision::No);
    }

    #[test]
    fn throttle_beats_yes_but_loses_to_no() {
        assert_eq!(Decision::Yes.most_restrictive(Decision::Throttle), Decision::Throttle);
        assert_eq!(Decision::Throttle.most_restrictive(Decision::No), Decision::No);
    }

    #[test]
    fn better_than_orders_by_restrictiveness() {
        assert!(Decision::Yes.better_than(Decision::Throttle));
        assert!(Decision::Throttle.better_than(Decision::No));
        assert!(!Decision::No.better_than(Decision::Yes));
        assert!(!Decision::Yes.better_than(Decision::Yes));
    }

    #[test]
    fn decided_maps_decision_to_final_decision() {
        let decided = ShardAllocationDecision::decided(Decision::Throttle, "n1".into(), None);
        assert_eq!(decided.final_decision, FinalDecision::Throttle);
        assert_eq!(decided.target_node_id.as_deref(), Some("n1"));
        assert!(decided.is_decided());
    }

    #[test]
    #[should_panic]
    fn decided_panics_on_no() {
        ShardAllocationDecision::decided(Decision::No, "n1".into(), None);
    }

    #[test]
    fn not_taken_is_not_decided() {
        assert!(!ShardAllocationDecision::not_taken().is_decided());
        assert!(!MoveDecision::not_taken().allocation_decision.is_decided());
    }
}

/// The outcome of deciding whether an already-started shard should move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveDecision {
    pub allocation_decision: ShardAllocationDecision,
    pub can_remain_decision: Decision,
}

impl MoveDecision {
    /// No decision was attempted (the shard was not in the `Started` state).
    pub fn not_taken() -> Self {
        Self {
            allocation_decision: ShardAllocationDecision::not_taken(),
            can_remain_decision: Decision::Yes,
        }
    }

    /// The shard can remain where it is; no move is considered.
    pub fn stay(can_remain_decision: Decision) -> Self {
        Self {
            allocation_decision: ShardAllocationDecision::no(AllocationStatus::NoAttempt, None),
            can_remain_decision,
        }
    }

    /// The shard cannot remain, and no destination accepted it.
    pub fn cannot_move(per_node: Option<Vec<NodeExplanation>>) -> Self {
        Self {
            allocation_decision: ShardAllocationDecision::no(AllocationStatus::DecidersNo, per_node),
            can_remain_decision: Decision::No,
        }
    }
}
