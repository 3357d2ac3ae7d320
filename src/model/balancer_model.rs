//! The balancer's private mirror of cluster state, the Model: a
//! lightweight, cheap-to-mutate view of which shards sit on which node,
//! rebuilt at the start of every pass from [`RoutingNodes`] and kept in
//! sync as the pass itself moves shards around. Cheaper than touching the
//! real routing table for every candidate weight calculation.

use std::cell::Cell;
use rustc_hash::FxHashMap as HashMap;

use super::routing_nodes::RoutingNodes;
use super::shard_routing::{ShardRouting, ShardState};

#[derive(Debug)]
pub struct ModelIndex {
    index_name: String,
    shards: HashMap<u32, ShardRouting>,
    highest_primary_id: Cell<i64>,
    highest_primary_id_valid: Cell<bool>,
}

impl ModelIndex {
    fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            shards: HashMap::new(),
            highest_primary_id: Cell::new(-1),
            highest_primary_id_valid: Cell::new(false),
        }
    }

    fn add_shard(&mut self, shard: ShardRouting) {
        debug_assert!(
            !self.shards.contains_key(&shard.shard_id),
            "index {} already has a copy of shard {}",
            self.index_name,
            shard.shard_id
        );
        self.highest_primary_id_valid.set(false);
        self.shards.insert(shard.shard_id, shard);
    }

    fn remove_shard(&mut self, shard_id: u32) -> Option<ShardRouting> {
        self.highest_primary_id_valid.set(false);
        self.shards.remove(&shard_id)
    }

    pub fn contains(&self, shard_id: u32) -> bool {
        self.shards.contains_key(&shard_id)
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    pub fn shards(&self) -> impl Iterator<Item = &ShardRouting> {
        self.shards.values()
    }

    pub fn started_shards(&self) -> impl Iterator<Item = &ShardRouting> {
        self.shards.values().filter(|s| s.state == ShardState::Started)
    }

    /// Highest shard-id among primaries in this index on this node, or -1
    /// if none. Lazily cached; invalidated on any add/remove.
    pub fn highest_primary_id(&self) -> i64 {
        if !self.highest_primary_id_valid.get() {
            let max = self
                .shards
                .values()
                .filter(|s| s.primary)
                .map(|s| s.shard_id as i64)
                .max()
                .unwrap_or(-1);
            self.highest_primary_id.set(max);
            self.highest_primary_id_valid.set(true);
        }
        self.highest_primary_id.get()
    }
}

#[derive(Debug)]
pub struct ModelNode {
    pub node_id: String,
    indices: HashMap<String, ModelIndex>,
    total_shard_count: usize,
}

impl ModelNode {
    fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            indices: HashMap::new(),
            total_shard_count: 0,
        }
    }

    pub fn add_shard(&mut self, shard: ShardRouting) {
        let index = shard.index.clone();
        self.indices
            .entry(index.clone())
            .or_insert_with(|| ModelIndex::new(index))
            .add_shard(shard);
        self.total_shard_count += 1;
    }

    pub fn remove_shard(&mut self, index: &str, shard_id: u32) -> Option<ShardRouting> {
        let removed = self.indices.get_mut(index).and_then(|i| i.remove_shard(shard_id));
        if removed.is_some() {
            self.total_shard_count -= 1;
        }
        removed
    }

    pub fn contains_shard(&self, index: &str, shard_id: u32) -> bool {
        self.indices.get(index).map(|i| i.contains(shard_id)).unwrap_or(false)
    }

    pub fn total_shard_count(&self) -> usize {
        self.total_shard_count
    }

    pub fn shards_of_index(&self, index: &str) -> usize {
        self.indices.get(index).map(ModelIndex::len).unwrap_or(0)
    }

    pub fn highest_primary_id(&self, index: &str) -> i64 {
        self.indices.get(index).map(ModelIndex::highest_primary_id).unwrap_or(-1)
    }

    pub fn started_shards_of_index<'a>(&'a self, index: &str) -> Box<dyn Iterator<Item = &'a ShardRouting> + 'a> {
        match self.indices.get(index) {
            Some(idx) => Box::new(idx.started_shards()),
            None => Box::new(std::iter::empty()),
        }
    }

    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    pub fn shards(&self) -> impl Iterator<Item = &ShardRouting> {
        self.indices.values().flat_map(ModelIndex::shards)
    }
}

/// The balancer's node-id-ordered view of cluster state for one pass.
/// Iteration order matches `RoutingNodes`' node insertion order, which
/// keeps weight comparisons and the rebalance tie-break rotation deterministic.
#[derive(Debug)]
pub struct Model {
    nodes: Vec<ModelNode>,
    index_of: HashMap<String, usize>,
}

impl Model {
    pub fn build(routing_nodes: &RoutingNodes) -> Self {
        let node_ids = routing_nodes.node_ids();
        let mut nodes = Vec::with_capacity(node_ids.len());
        let mut index_of = HashMap::with_capacity(node_ids.len());

        for (i, id) in node_ids.iter().enumerate() {
            nodes.push(ModelNode::new(id.clone()));
            index_of.insert(id.clone(), i);
        }

        for id in node_ids {
            let routing_node = routing_nodes.node(id).expect("node_ids is authoritative");
            let model_node = &mut nodes[index_of[id]];
            for shard in routing_node.shards() {
                // A RELOCATING entry is mirrored only as its target's
                // Initializing view, never as the source's own copy, so the
                // source frees up weight immediately once a move starts.
                if shard.state != ShardState::Relocating {
                    model_node.add_shard(shard.clone());
                }
            }
        }

        Self { nodes, index_of }
    }

    pub fn node(&self, id: &str) -> Option<&ModelNode> {
        self.index_of.get(id).map(|&i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut ModelNode> {
        let i = *self.index_of.get(id)?;
        Some(&mut self.nodes[i])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ModelNode> {
        self.nodes.iter()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.node_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
