//! CLI demo for the Balanced Shards Allocator.
//!
//! Loads a routing-state fixture (JSON: nodes, indices — every shard of
//! every index starts unassigned), runs one `allocate` pass, and prints the
//! resulting placement. With `--explain <index>/<shard-id>` it instead
//! prints the `weigh_shard` breakdown for that shard's primary copy
//! after the pass, the closest in-repo analogue to an "allocation explain"
//! API.

use std::{collections::HashMap as StdHashMap, fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;

use balanced_shards_allocator::{
    deciders::{
        AllocationDeciders, AllocationEnable, EnableAllocationDecider,
        ReplicaAfterPrimaryActiveDecider, SameShardAllocationDecider, ThrottlingDecider,
    },
    logging::{init_logging, LoggingConfig},
    model::{ClusterInfo, DiscoveryNode, IndexMetadata, Metadata, RoutingAllocation, RoutingNodes, ShardRouting},
    BalancerSettings,
};

#[derive(Parser)]
#[command(name = "bsa-cli")]
#[command(author = "Balanced Shards Allocator Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Runs one allocator pass over a routing-state fixture", long_about = None)]
struct Cli {
    /// Path to a routing-state fixture (JSON).
    fixture: PathBuf,

    /// Optional settings file (defaults → this file → BSA_* env).
    #[arg(long)]
    settings: Option<String>,

    /// Print the weigh_shard breakdown for `<index>/<shard-id>` instead of
    /// the placement table.
    #[arg(long, value_name = "INDEX/SHARD_ID")]
    explain: Option<String>,

    /// Enable debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    nodes: Vec<FixtureNode>,
    indices: Vec<FixtureIndex>,
}

#[derive(Debug, Deserialize)]
struct FixtureNode {
    id: String,
    #[serde(default)]
    attributes: StdHashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct FixtureIndex {
    name: String,
    number_of_shards: u32,
    number_of_replicas: u32,
    #[serde(default)]
    creation_priority: i64,
    #[serde(default)]
    include: StdHashMap<String, String>,
    #[serde(default)]
    exclude: StdHashMap<String, String>,
    #[serde(default)]
    require: StdHashMap<String, String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default();
    if cli.verbose {
        logging.level = "debug".into();
    }
    let _logging_handle = init_logging(logging).context("failed to initialize logging")?;

    let settings = BalancerSettings::load(cli.settings.as_deref()).context("failed to load balancer settings")?;

    let raw = fs::read_to_string(&cli.fixture)
        .with_context(|| format!("failed to read fixture {}", cli.fixture.display()))?;
    let fixture: Fixture = serde_json::from_str(&raw).context("failed to parse fixture JSON")?;

    let mut allocation = build_allocation(fixture)?;
    let deciders = default_deciders();

    balanced_shards_allocator::allocate(&settings, &deciders, &mut allocation)?;

    match cli.explain {
        Some(spec) => explain_shard(&settings, &allocation, &spec)?,
        None => print_placement(&allocation),
    }

    Ok(())
}

fn build_allocation(fixture: Fixture) -> Result<RoutingAllocation> {
    if fixture.nodes.is_empty() {
        bail!("fixture must declare at least one node");
    }

    let node_ids: Vec<String> = fixture.nodes.iter().map(|n| n.id.clone()).collect();
    let discovery_nodes: Vec<DiscoveryNode> = fixture
        .nodes
        .into_iter()
        .map(|n| {
            n.attributes
                .into_iter()
                .fold(DiscoveryNode::new(n.id), |node, (k, v)| node.with_attribute(k, v))
        })
        .collect();

    let mut routing_nodes = RoutingNodes::new(node_ids);
    let mut index_metas = Vec::with_capacity(fixture.indices.len());

    for index in &fixture.indices {
        for shard_id in 0..index.number_of_shards {
            routing_nodes.add_unassigned(ShardRouting::new_unassigned(&index.name, shard_id, true));
            for _ in 0..index.number_of_replicas {
                routing_nodes.add_unassigned(ShardRouting::new_unassigned(&index.name, shard_id, false));
            }
        }

        let mut meta = IndexMetadata::new(&index.name, index.number_of_shards, index.number_of_replicas);
        meta.creation_priority = index.creation_priority;
        meta.include = index.include.clone().into_iter().collect();
        meta.exclude = index.exclude.clone().into_iter().collect();
        meta.require = index.require.clone().into_iter().collect();
        index_metas.push(meta);
    }

    let metadata = Metadata::new(index_metas);
    let cluster_info = ClusterInfo::default();

    Ok(RoutingAllocation::new(discovery_nodes, routing_nodes, metadata, cluster_info))
}

/// A reasonable default pipeline for the CLI demo: the always-on
/// same-shard veto, replica-after-primary ordering, an open enable-switch,
/// and a generous recovery throttle. Zone-awareness and node-attribute
/// filters depend on fixture-specific policy, so the CLI leaves them out —
/// a caller embedding the library wires up whatever subset it needs.
fn default_deciders() -> AllocationDeciders {
    AllocationDeciders::new(vec![
        Box::new(SameShardAllocationDecider),
        Box::new(ReplicaAfterPrimaryActiveDecider),
        Box::new(EnableAllocationDecider::new(AllocationEnable::All)),
        Box::new(ThrottlingDecider::new(4)),
    ])
}

fn print_placement(allocation: &RoutingAllocation) {
    println!("placement:");
    for node_id in allocation.routing_nodes.node_ids() {
        let node = allocation.routing_nodes.node(node_id).expect("node_ids is authoritative");
        println!("  {node_id}:");
        for shard in node.shards() {
            println!(
                "    {}[{}] primary={} state={:?}",
                shard.index, shard.shard_id, shard.primary, shard.state
            );
        }
    }

    let ignored = allocation.routing_nodes.unassigned_ref().ignored();
    if !ignored.is_empty() {
        println!("ignored:");
        for (shard, status) in ignored {
            println!(
                "  {}[{}] primary={} status={:?}",
                shard.index, shard.shard_id, shard.primary, status
            );
        }
    }
}

fn explain_shard(settings: &BalancerSettings, allocation: &RoutingAllocation, spec: &str) -> Result<()> {
    let (index, shard_id) = spec
        .split_once('/')
        .context("--explain expects <index>/<shard-id>")?;
    let shard_id: u32 = shard_id.parse().context("shard-id must be a non-negative integer")?;

    let shard = allocation
        .routing_nodes
        .node_ids()
        .iter()
        .filter_map(|id| allocation.routing_nodes.node(id))
        .flat_map(|node| node.shards())
        .find(|s| s.index == index && s.shard_id == shard_id && s.primary)
        .with_context(|| format!("no primary copy of {index}[{shard_id}] found after allocation"))?;

    let weights = balanced_shards_allocator::weigh_shard(settings, allocation, shard)?;
    println!("weigh_shard {index}[{shard_id}]:");
    let mut rows: Vec<(&String, &f64)> = weights.iter().collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    for (node_id, delta) in rows {
        println!("  {node_id}: {delta:.4}");
    }
    Ok(())
}
