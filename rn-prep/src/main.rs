#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]
//! Routing shortcut preparation command line interface.
//!
//! Loads a road graph document (JSON or `MessagePack`), collapses every chain of through-nodes
//! into a shortcut edge, and writes the prepared graph plus run metadata into a timestamped
//! directory. See binary --help for more information.

use std::path::PathBuf;

use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use indicatif::{
    ProgressBar,
    ProgressFinish,
    ProgressStyle,
};
use rn_core::PriorityGraph;
use rn_prep::utils::{
    create_timestamped_output_dir,
    write_graph_visualization,
    write_metadata,
};
use rn_prep::ShortcutPreparation;
use tracing::{
    info,
    warn,
};

/// rn-prep command-line interface to add routing shortcuts to a road graph
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a graph document serialized as either JSON or `MessagePack`.
    #[arg(short, long)]
    input_graph: PathBuf,

    /// Directory under which a timestamped run directory is created.
    #[arg(short, long, default_value = "runs")]
    output_dir: PathBuf,

    /// Logging verbosity level (`trace`, `debug`, `info`, `warn`, `error`) or any filter directive.
    #[arg(short, long, default_value = "info")]
    verbosity: String,

    /// Also write DOT renderings of the graph before and after preparation.
    #[arg(long)]
    dot: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Conform to crate-standard logging.
    rn_core::logging::setup(&args.verbosity);

    info!("Loading graph from {}", args.input_graph.display());
    let mut graph = rn_core::load_graph(&args.input_graph)
        .with_context(|| format!("failed to load graph from {}", args.input_graph.display()))?;
    let node_count = graph.node_count();
    info!(nodes = node_count, edges = graph.edge_count(), "graph loaded");
    if node_count == 0 {
        warn!("Input graph has no nodes; nothing to prepare");
    }

    let output_dir = create_timestamped_output_dir(&args.output_dir)?;
    if args.dot {
        write_graph_visualization(&graph, &output_dir, "initial_graph.dot", "Initial graph")?;
    }

    let pb = ProgressBar::new(node_count as u64)
        .with_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.yellow/blue}] {pos}/{len} nodes ({percent}%) {msg}")?,
        )
        .with_message("Preparing shortcuts")
        .with_finish(ProgressFinish::AndLeave);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = ShortcutPreparation::new(&mut graph).run_with_progress(|visited| {
        if visited % 1024 == 0 || visited == node_count {
            pb.set_position(visited as u64);
        }
    })?;
    pb.finish_using_style();

    let graph_path = output_dir.join("prepared_graph.json");
    rn_core::save_graph(&graph_path, &graph)
        .with_context(|| format!("failed to write prepared graph to {}", graph_path.display()))?;
    info!("Prepared graph written to: {}", graph_path.display());

    if args.dot {
        write_graph_visualization(&graph, &output_dir, "prepared_graph.dot", "Prepared graph")?;
    }
    write_metadata(&output_dir, &args.input_graph, &report)?;

    info!(
        created = report.created,
        updated = report.updated,
        contracted = report.contracted_nodes,
        "Preparation complete"
    );
    Ok(())
}
