//! Output helpers for the preparation binary: run directories, metadata and DOT renderings.

use std::fs::File;
use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};
use std::time::SystemTime;

use anyhow::Result;
use chrono::{
    DateTime,
    Utc,
};
use petgraph::dot::Dot;
use rn_core::RoadGraph;
use serde_json::json;
use tracing::{
    debug,
    info,
    instrument,
};

use crate::shortcuts::ShortcutReport;

/// Create a fresh `prep-<UTC timestamp>` run directory under `base_dir`, creating `base_dir` too.
#[instrument]
pub fn create_timestamped_output_dir(base_dir: &Path) -> Result<PathBuf> {
    let started: DateTime<Utc> = SystemTime::now().into();
    let run_dir = base_dir.join(format!("prep-{}", started.format("%Y%m%dT%H%M%S%.3fZ")));
    std::fs::create_dir_all(&run_dir)?;

    debug!("Run directory: {}", run_dir.display());
    Ok(run_dir)
}

/// Record what was run and what it produced as `metadata.json` in `output_dir`.
#[instrument(skip(report))]
pub fn write_metadata(output_dir: &Path, input_graph: &Path, report: &ShortcutReport) -> Result<PathBuf> {
    let now: DateTime<Utc> = SystemTime::now().into();
    let metadata = json!({
        "timestamp": now.to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "command_args": std::env::args().collect::<Vec<_>>(),
        "input_graph": input_graph.display().to_string(),
        "report": report,
    });

    let metadata_path = output_dir.join("metadata.json");
    let mut file = File::create(&metadata_path)?;
    file.write_all(serde_json::to_string_pretty(&metadata)?.as_bytes())?;

    Ok(metadata_path)
}

/// Render `graph` in DOT, labelling contracted nodes and shortcut edges.
#[must_use]
pub fn render_dot(graph: &RoadGraph) -> String {
    let graphable = graph.as_petgraph().map(
        |i, n| {
            if n.priority.is_contracted() {
                format!("{} (contracted)", i.index())
            } else {
                i.index().to_string()
            }
        },
        |_, e| match e.skipped_node {
            Some(skipped) => format!("{:.1} via {}", e.distance.into_inner(), skipped.index()),
            None => format!("{:.1}", e.distance.into_inner()),
        },
    );
    format!("{}", Dot::new(&graphable))
}

/// Render `graph` into `filename` within `output_dir`; `description` names it in the log.
#[instrument(skip(graph))]
pub fn write_graph_visualization(
    graph: &RoadGraph,
    output_dir: &Path,
    filename: &str,
    description: &str,
) -> Result<PathBuf> {
    let dot_path = output_dir.join(filename);
    std::fs::write(&dot_path, render_dot(graph))?;

    info!("{} written to: {}", description, dot_path.display());
    Ok(dot_path)
}
