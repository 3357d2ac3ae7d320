//! Index- and cluster-level metadata consumed by deciders and the balancer.

use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, Default)]
pub struct IndexMetadata {
    pub name: String,
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
    /// Creation order, lowest first. Available to a caller-supplied
    /// secondary comparator for tie-breaking unassigned-shard order.
    pub creation_priority: i64,
    pub include: HashMap<String, String>,
    pub exclude: HashMap<String, String>,
    pub require: HashMap<String, String>,
}

impl IndexMetadata {
    pub fn new(name: impl Into<String>, number_of_shards: u32, number_of_replicas: u32) -> Self {
        Self {
            name: name.into(),
            number_of_shards,
            number_of_replicas,
            creation_priority: 0,
            include: HashMap::new(),
            exclude: HashMap::new(),
            require: HashMap::new(),
        }
    }

    /// Primaries plus replicas, the total number of shard copies this index
    /// contributes to the cluster.
    pub fn total_shards(&self) -> u32 {
        self.number_of_shards * (1 + self.number_of_replicas)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Metadata {
    indices: HashMap<String, IndexMetadata>,
}

impl Metadata {
    pub fn new(indices: impl IntoIterator<Item = IndexMetadata>) -> Self {
        Self {
            indices: indices.into_iter().map(|m| (m.name.clone(), m)).collect(),
        }
    }

    pub fn index(&self, name: &str) -> Option<&IndexMetadata> {
        self.indices.get(name)
    }

    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indices.keys().map(String::as_str)
    }

    pub fn total_shards_of_index(&self, name: &str) -> u32 {
        self.index(name).map(IndexMetadata::total_shards).unwrap_or(0)
    }

    pub fn total_shards_all_indexes(&self) -> u32 {
        self.indices.values().map(IndexMetadata::total_shards).sum()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
