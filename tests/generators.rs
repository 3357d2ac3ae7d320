//! Strategies for building synthetic cluster shapes: node counts, and per
//! index shard/replica counts, with a few boundary-case variants mixed in
//! alongside the general-purpose ranges.

use proptest::prelude::*;

const MIN_NODES: usize = 1;
const MAX_NODES: usize = 8;
const MIN_SHARDS: u32 = 1;
const MAX_SHARDS: u32 = 6;
const MAX_REPLICAS: u32 = 3;

#[derive(Debug, Clone)]
pub struct IndexShape {
    pub name: String,
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
}

#[derive(Debug, Clone)]
pub struct ClusterShape {
    pub node_count: usize,
    pub indices: Vec<IndexShape>,
}

pub fn node_count_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(MIN_NODES),
        Just(2usize),
        (MIN_NODES..=MAX_NODES),
    ]
}

pub fn shard_count_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![Just(MIN_SHARDS), (MIN_SHARDS..=MAX_SHARDS)]
}

pub fn replica_count_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), (0u32..=MAX_REPLICAS)]
}

fn index_shape_strategy(name: String) -> impl Strategy<Value = IndexShape> {
    (shard_count_strategy(), replica_count_strategy())
        .prop_map(move |(number_of_shards, number_of_replicas)| IndexShape {
            name: name.clone(),
            number_of_shards,
            number_of_replicas,
        })
}

/// A cluster of 1-8 nodes hosting 1-4 indices, each with its own
/// shard/replica counts.
pub fn cluster_shape_strategy() -> impl Strategy<Value = ClusterShape> {
    node_count_strategy().prop_flat_map(|node_count| {
        prop::collection::vec(1u32..=4, 1)
            .prop_flat_map(|_| Just(()))
            .prop_flat_map(move |_| {
                let index_count = 1..=3usize;
                index_count.prop_flat_map(move |count| {
                    let shapes: Vec<_> = (0..count)
                        .map(|i| index_shape_strategy(format!("idx{i}")))
                        .collect();
                    shapes.prop_map(move |indices| ClusterShape { node_count, indices })
                })
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn cluster_shapes_stay_within_bounds(shape in cluster_shape_strategy()) {
            prop_assert!(shape.node_count >= MIN_NODES && shape.node_count <= MAX_NODES);
            for index in &shape.indices {
                prop_assert!(index.number_of_shards >= MIN_SHARDS && index.number_of_shards <= MAX_SHARDS);
                prop_assert!(index.number_of_replicas <= MAX_REPLICAS);
            }
        }
    }
}
