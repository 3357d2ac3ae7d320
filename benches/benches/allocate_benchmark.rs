//! Benchmark: `allocate()` over synthetic cluster shapes.
//!
//! Builds a fresh, fully-unassigned cluster (n nodes, one index of m
//! primary+replica shards) per iteration and measures one full
//! AllocateUnassigned -> MoveShards -> Rebalance pass. Construction happens
//! in the setup phase so only the pass itself is timed.
//!
//! Throughput "elements" are shard copies placed (m * (1 + replicas)).

use balanced_shards_allocator::{
    deciders::{AllocationDeciders, SameShardAllocationDecider},
    model::{ClusterInfo, DiscoveryNode, IndexMetadata, Metadata, RoutingAllocation, RoutingNodes, ShardRouting},
    BalancerSettings,
};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};

const INDEX_NAME: &str = "bench-index";
const REPLICAS: u32 = 1;

fn build_allocation(node_count: usize, shard_count: u32) -> RoutingAllocation {
    let node_ids: Vec<String> = (0..node_count).map(|i| format!("node-{i}")).collect();
    let discovery_nodes: Vec<DiscoveryNode> = node_ids.iter().cloned().map(DiscoveryNode::new).collect();

    let mut routing_nodes = RoutingNodes::new(node_ids);
    for shard_id in 0..shard_count {
        routing_nodes.add_unassigned(ShardRouting::new_unassigned(INDEX_NAME, shard_id, true));
        for _ in 0..REPLICAS {
            routing_nodes.add_unassigned(ShardRouting::new_unassigned(INDEX_NAME, shard_id, false));
        }
    }

    let metadata = Metadata::new([IndexMetadata::new(INDEX_NAME, shard_count, REPLICAS)]);
    RoutingAllocation::new(discovery_nodes, routing_nodes, metadata, ClusterInfo::default())
}

fn bench_allocate(c: &mut Criterion) {
    let settings = BalancerSettings::default();
    let deciders = AllocationDeciders::new(vec![Box::new(SameShardAllocationDecider)]);

    let mut group = c.benchmark_group("allocate");
    for &(nodes, shards) in &[(3usize, 10u32), (10, 100), (50, 1_000)] {
        group.throughput(Throughput::Elements((shards * (1 + REPLICAS)) as u64));
        group.bench_with_input(BenchmarkId::new("nodes", format!("{nodes}n-{shards}s")), &(nodes, shards), |b, &(nodes, shards)| {
            b.iter_batched(
                || build_allocation(nodes, shards),
                |mut allocation| {
                    balanced_shards_allocator::allocate(&settings, &deciders, &mut allocation)
                        .expect("allocate must not fail on a valid fixture");
                    criterion::black_box(&allocation);
                },
                BatchSize::PerIteration,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_allocate);
criterion_main!(benches);
