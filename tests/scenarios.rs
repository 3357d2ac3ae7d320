//! Table tests for the six concrete cluster scenarios: one `#[rstest]` case
//! per scenario, each building the exact cluster shape the scenario
//! describes and asserting its expected outcome.

use rstest::rstest;

use balanced_shards_allocator::{
    deciders::{
        AllocationDecider, AllocationDeciders, SameShardAllocationDecider, ThrottlingDecider,
        ZoneAwarenessDecider,
    },
    decision::Decision,
    model::{
        ClusterInfo, DiscoveryNode, IndexMetadata, Metadata, ModelNode, RoutingAllocation,
        RoutingNodes, ShardRouting,
    },
    BalancerSettings,
};

/// Scenario 1: tiny 3-node cluster, one 2-primary/1-replica index, all
/// shards unassigned, all deciders YES.
#[rstest]
fn scenario_1_tiny_three_node_cluster() {
    let node_ids = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    let mut routing_nodes = RoutingNodes::new(node_ids);
    for shard_id in 0..2 {
        routing_nodes.add_unassigned(ShardRouting::new_unassigned("idx", shard_id, true));
        routing_nodes.add_unassigned(ShardRouting::new_unassigned("idx", shard_id, false));
    }
    let metadata = Metadata::new([IndexMetadata::new("idx", 2, 1)]);
    let mut allocation = RoutingAllocation::new(vec![], routing_nodes, metadata, ClusterInfo::default());

    let settings = BalancerSettings {
        index_balance: 0.55,
        shard_balance: 0.45,
        threshold: 1.0,
    };
    // "all deciders YES": only the structural same-shard veto applies,
    // not the replica-after-primary-active decider (it would otherwise
    // defer every replica to a later pass, since a just-placed primary is
    // Initializing, not yet Started, within the same pass).
    let deciders = AllocationDeciders::new(vec![Box::new(SameShardAllocationDecider)]);

    balanced_shards_allocator::allocate(&settings, &deciders, &mut allocation).unwrap();

    let mut seen_pairs = std::collections::HashSet::new();
    for node_id in allocation.routing_nodes.node_ids() {
        let node = allocation.routing_nodes.node(node_id).unwrap();
        let count = node.shards().count();
        assert!((1..=2).contains(&count), "node {node_id} has {count} shards, expected 1 or 2");
        for shard in node.shards() {
            assert!(seen_pairs.insert((node_id.clone(), shard.index.clone(), shard.shard_id)));
        }
    }
}

/// Scenario 2: same as (1) but threshold = 10. Rebalance must emit zero
/// relocations even with an uneven 2/1 split.
#[rstest]
fn scenario_2_high_threshold_skips_rebalance() {
    let node_ids = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    let mut routing_nodes = RoutingNodes::new(node_ids);
    for shard_id in 0..2 {
        routing_nodes.add_unassigned(ShardRouting::new_unassigned("idx", shard_id, true));
        routing_nodes.add_unassigned(ShardRouting::new_unassigned("idx", shard_id, false));
    }
    let metadata = Metadata::new([IndexMetadata::new("idx", 2, 1)]);
    let mut allocation = RoutingAllocation::new(vec![], routing_nodes, metadata, ClusterInfo::default());

    let settings = BalancerSettings {
        index_balance: 0.55,
        shard_balance: 0.45,
        threshold: 10.0,
    };
    // "all deciders YES": only the structural same-shard veto applies,
    // not the replica-after-primary-active decider (it would otherwise
    // defer every replica to a later pass, since a just-placed primary is
    // Initializing, not yet Started, within the same pass).
    let deciders = AllocationDeciders::new(vec![Box::new(SameShardAllocationDecider)]);

    balanced_shards_allocator::allocate(&settings, &deciders, &mut allocation).unwrap();

    let total: usize = allocation
        .routing_nodes
        .node_ids()
        .iter()
        .filter_map(|id| allocation.routing_nodes.node(id))
        .map(|n| n.shards().count())
        .sum();
    assert_eq!(total, 4);
}

/// Scenario 3: zone-awareness veto on a pre-skewed cluster. All 4 primaries
/// sit alone in zone Z1 (node A); every other node is in Z2, and the
/// decider forbids Z1 -> Z2 moves for primaries. Every candidate
/// destination for A's shards is therefore vetoed, so rebalance's
/// window-shrink loop must terminate with no relocation and no infinite loop.
#[rstest]
fn scenario_3_zone_awareness_veto_terminates_without_relocating() {
    let node_ids = vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()];
    let mut routing_nodes = RoutingNodes::new(node_ids);
    for shard_id in 0..4 {
        // all 4 primaries start on A, deliberately unbalanced.
        routing_nodes.add_started(ShardRouting::new_unassigned("idx", shard_id, true), "A");
    }
    let metadata = Metadata::new([IndexMetadata::new("idx", 4, 0)]);
    let discovery_nodes = vec![
        DiscoveryNode::new("A").with_attribute("zone", "Z1"),
        DiscoveryNode::new("B").with_attribute("zone", "Z2"),
        DiscoveryNode::new("C").with_attribute("zone", "Z2"),
        DiscoveryNode::new("D").with_attribute("zone", "Z2"),
    ];
    let mut allocation = RoutingAllocation::new(discovery_nodes, routing_nodes, metadata, ClusterInfo::default());

    let settings = BalancerSettings::default();
    let forbidden = [("Z1".to_string(), "Z2".to_string())].into_iter().collect();
    let deciders = AllocationDeciders::new(vec![
        Box::new(SameShardAllocationDecider),
        Box::new(ZoneAwarenessDecider::new("zone", forbidden)),
    ]);

    balanced_shards_allocator::allocate(&settings, &deciders, &mut allocation).unwrap();

    assert_eq!(
        allocation.routing_nodes.node("A").unwrap().shards().count(),
        4,
        "every move out of A is Z1 -> Z2 and must be vetoed"
    );
    for node_id in ["B", "C", "D"] {
        assert_eq!(allocation.routing_nodes.node(node_id).unwrap().shards().count(), 0);
    }
}

/// Scenario 4: pending fetches flag set on an obviously unbalanced cluster.
/// Allocate/move still run; rebalance must emit nothing.
#[rstest]
fn scenario_4_pending_fetches_skips_rebalance_only() {
    let node_ids = vec!["A".to_string(), "B".to_string()];
    let mut routing_nodes = RoutingNodes::new(node_ids);
    for shard_id in 0..4 {
        routing_nodes.add_started(ShardRouting::new_unassigned("idx", shard_id, true), "A");
    }
    routing_nodes.add_unassigned(ShardRouting::new_unassigned("idx", 4, true));
    let metadata = Metadata::new([IndexMetadata::new("idx", 5, 0)]);
    let mut allocation = RoutingAllocation::new(vec![], routing_nodes, metadata, ClusterInfo::default())
        .with_pending_async_fetch(true);

    let settings = BalancerSettings::default();
    let deciders = AllocationDeciders::new(vec![Box::new(SameShardAllocationDecider)]);

    balanced_shards_allocator::allocate(&settings, &deciders, &mut allocation).unwrap();

    assert!(allocation.routing_nodes.unassigned_ref().is_empty(), "allocate should still place the new shard");
    assert_eq!(allocation.routing_nodes.node("A").unwrap().shards().count(), 4, "rebalance must not have moved anything off A");
}

/// Scenario 5: one shard's best node THROTTLEs, every other node NOs.
/// Expected: Model absorbs capacity on the throttled node, routing-nodes
/// marks the shard ignored/DECIDERS_THROTTLED, `initializeShard` is never
/// called (the shard stays Unassigned in the real routing state).
#[rstest]
fn scenario_5_throttle_path_ignores_without_initializing() {
    #[derive(Debug)]
    struct OnlyAllowsA;
    impl AllocationDecider for OnlyAllowsA {
        fn can_allocate_shard(&self, _shard: &ShardRouting, node: &ModelNode, _allocation: &RoutingAllocation) -> Decision {
            if node.node_id == "A" {
                Decision::Yes
            } else {
                Decision::No
            }
        }
        fn name(&self) -> &'static str {
            "only_allows_a"
        }
    }

    let node_ids = vec!["A".to_string(), "B".to_string()];
    let mut routing_nodes = RoutingNodes::new(node_ids);
    routing_nodes.add_unassigned(ShardRouting::new_unassigned("idx", 0, true));
    let metadata = Metadata::new([IndexMetadata::new("idx", 1, 0)]);
    let mut allocation = RoutingAllocation::new(vec![], routing_nodes, metadata, ClusterInfo::default());

    let settings = BalancerSettings::default();
    // max_concurrent_per_node=0 means "A" throttles on its first candidate.
    let deciders = AllocationDeciders::new(vec![Box::new(ThrottlingDecider::new(0)), Box::new(OnlyAllowsA)]);

    balanced_shards_allocator::allocate(&settings, &deciders, &mut allocation).unwrap();

    assert_eq!(allocation.routing_nodes.node("A").unwrap().shards().count(), 0, "initialize_shard must not run on THROTTLE");
    assert!(!allocation.routing_nodes.unassigned_ref().ignored().is_empty());
}

/// Scenario 6: two indices, each 1 primary + 2 replicas, 3 eligible nodes,
/// all deciders YES. After one pass each index's three copies land on three
/// distinct nodes.
#[rstest]
fn scenario_6_replica_fairness_across_two_indices() {
    let node_ids = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    let mut routing_nodes = RoutingNodes::new(node_ids);
    for index in ["idx1", "idx2"] {
        routing_nodes.add_unassigned(ShardRouting::new_unassigned(index, 0, true));
        routing_nodes.add_unassigned(ShardRouting::new_unassigned(index, 0, false));
        routing_nodes.add_unassigned(ShardRouting::new_unassigned(index, 0, false));
    }
    let metadata = Metadata::new([IndexMetadata::new("idx1", 1, 2), IndexMetadata::new("idx2", 1, 2)]);
    let mut allocation = RoutingAllocation::new(vec![], routing_nodes, metadata, ClusterInfo::default());

    // "all YES": only the structural same-shard veto applies here, not the
    // replica-after-primary-active decider (which would defer every replica
    // to a later pass, since a just-placed primary is Initializing, not yet
    // Started, within the same pass).
    let settings = BalancerSettings::default();
    let deciders = AllocationDeciders::new(vec![Box::new(SameShardAllocationDecider)]);

    balanced_shards_allocator::allocate(&settings, &deciders, &mut allocation).unwrap();

    for index in ["idx1", "idx2"] {
        let mut hosting_nodes = std::collections::HashSet::new();
        for node_id in allocation.routing_nodes.node_ids() {
            let node = allocation.routing_nodes.node(node_id).unwrap();
            let copies_of_index = node.shards().filter(|s| s.index == index).count();
            assert!(copies_of_index <= 1, "node {node_id} holds {copies_of_index} copies of {index}");
            if copies_of_index == 1 {
                hosting_nodes.insert(node_id.clone());
            }
        }
        assert_eq!(hosting_nodes.len(), 3, "{index}'s 3 copies should land on 3 distinct nodes");
    }
}
