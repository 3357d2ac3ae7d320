//! Node sorter: keeps a set of nodes ordered by weight for one index,
//! recomputed (and re-sorted, stably so ties preserve prior order) whenever
//! the balancer needs a fresh ranking.

use crate::model::{Model, ModelNode};
use crate::weight::WeightFunction;

#[derive(Debug, Clone)]
struct SortEntry {
    node_id: String,
    weight: f64,
}

#[derive(Debug, Clone)]
pub struct NodeSorter {
    entries: Vec<SortEntry>,
}

impl NodeSorter {
    pub fn new(node_ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            entries: node_ids
                .into_iter()
                .map(|node_id| SortEntry { node_id, weight: 0.0 })
                .collect(),
        }
    }

    /// Recomputes weight for every entry for `index` and stably sorts
    /// ascending by weight (lightest node first).
    pub fn reset(
        &mut self,
        model: &Model,
        index: &str,
        avg_shards: f64,
        avg_shards_of_index: f64,
        weight_function: &WeightFunction,
    ) {
        for entry in &mut self.entries {
            let node = model_node_or_panic(model, &entry.node_id);
            entry.weight = weight_function.weight(node, index, 0, avg_shards, avg_shards_of_index);
        }
        self.entries.sort_by(|a, b| a.weight.total_cmp(&b.weight));
    }

    pub fn node_id(&self, i: usize) -> &str {
        &self.entries[i].node_id
    }

    pub fn weight(&self, i: usize) -> f64 {
        self.entries[i].weight
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `weight(last) - weight(first)` over the current ordering: the spread
    /// that drives the rebalance threshold check.
    pub fn delta(&self) -> f64 {
        if self.entries.is_empty() {
            0.0
        } else {
            self.entries.last().unwrap().weight - self.entries[0].weight
        }
    }
}

fn model_node_or_panic<'a>(model: &'a Model, node_id: &str) -> &'a ModelNode {
    model
        .node(node_id)
        .unwrap_or_else(|| panic!("node sorter out of sync with model: {node_id} missing"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RoutingNodes, ShardRouting};

    fn model_with_shards(per_node: &[(&str, usize)]) -> Model {
        let node_ids: Vec<String> = per_node.iter().map(|(id, _)| id.to_string()).collect();
        let mut routing_nodes = RoutingNodes::new(node_ids);
        for (node_id, count) in per_node {
            for shard_id in 0..*count {
                routing_nodes.add_started(ShardRouting::new_unassigned("idx", shard_id as u32, true), node_id);
            }
        }
        Model::build(&routing_nodes)
    }

    #[test]
    fn reset_sorts_ascending_by_weight() {
        let model = model_with_shards(&[("heavy", 5), ("light", 1), ("mid", 3)]);
        let weight_function = WeightFunction::new(0.55, 0.45).unwrap();
        let mut sorter = NodeSorter::new(model.node_ids().map(str::to_string));

        sorter.reset(&model, "idx", 3.0, 3.0, &weight_function);

        assert_eq!(sorter.node_id(0), "light");
        assert_eq!(sorter.node_id(sorter.len() - 1), "heavy");
        assert!(sorter.weight(0) <= sorter.weight(1));
        assert!(sorter.weight(1) <= sorter.weight(2));
    }

    #[test]
    fn delta_is_spread_between_first_and_last() {
        let model = model_with_shards(&[("a", 2), ("b", 2)]);
        let weight_function = WeightFunction::new(0.55, 0.45).unwrap();
        let mut sorter = NodeSorter::new(model.node_ids().map(str::to_string));
        sorter.reset(&model, "idx", 2.0, 2.0, &weight_function);
        assert_eq!(sorter.delta(), 0.0);
    }

    #[test]
    fn empty_sorter_has_zero_delta() {
        let sorter = NodeSorter::new(std::iter::empty());
        assert!(sorter.is_empty());
        assert_eq!(sorter.delta(), 0.0);
    }
}
