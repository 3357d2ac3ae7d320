//! Library-usage demo: a tiny 3-node cluster, one 2-primary/1-replica-each
//! index, every shard unassigned. Runs one
//! `allocate` pass and prints the resulting placement, then asks
//! `weigh_shard` for shard 0's breakdown.

use balanced_shards_allocator::{
    deciders::{AllocationDeciders, ReplicaAfterPrimaryActiveDecider, SameShardAllocationDecider},
    model::{ClusterInfo, DiscoveryNode, IndexMetadata, Metadata, RoutingAllocation, RoutingNodes, ShardRouting},
    BalancerSettings,
};

const INDEX: &str = "articles";

fn main() {
    println!("=== Balanced Shards Allocator: three-node cluster demo ===\n");

    let node_ids = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    let discovery_nodes: Vec<DiscoveryNode> = node_ids.iter().cloned().map(DiscoveryNode::new).collect();

    let mut routing_nodes = RoutingNodes::new(node_ids);
    for shard_id in 0..2 {
        routing_nodes.add_unassigned(ShardRouting::new_unassigned(INDEX, shard_id, true));
        routing_nodes.add_unassigned(ShardRouting::new_unassigned(INDEX, shard_id, false));
    }

    let metadata = Metadata::new([IndexMetadata::new(INDEX, 2, 1)]);
    let mut allocation = RoutingAllocation::new(discovery_nodes, routing_nodes, metadata, ClusterInfo::default());

    let settings = BalancerSettings::default();
    let deciders = AllocationDeciders::new(vec![
        Box::new(SameShardAllocationDecider),
        Box::new(ReplicaAfterPrimaryActiveDecider),
    ]);

    balanced_shards_allocator::allocate(&settings, &deciders, &mut allocation).expect("allocate should not fail");

    println!("placement after one pass:");
    for node_id in allocation.routing_nodes.node_ids() {
        let node = allocation.routing_nodes.node(node_id).unwrap();
        let shards: Vec<String> = node
            .shards()
            .map(|s| format!("{}[{}] primary={}", s.index, s.shard_id, s.primary))
            .collect();
        println!("  {node_id}: {}", shards.join(", "));
    }

    let primary_shard_0 = allocation
        .routing_nodes
        .node_ids()
        .iter()
        .filter_map(|id| allocation.routing_nodes.node(id))
        .flat_map(|n| n.shards())
        .find(|s| s.index == INDEX && s.shard_id == 0 && s.primary)
        .expect("primary of shard 0 was placed")
        .clone();

    let weights = balanced_shards_allocator::weigh_shard(&settings, &allocation, &primary_shard_0)
        .expect("weigh_shard should not fail");

    println!("\nweigh_shard {INDEX}[0]:");
    let mut rows: Vec<(&String, &f64)> = weights.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    for (node_id, delta) in rows {
        println!("  {node_id}: {delta:.4}");
    }
}
