//! Serialized form of a [`RoadGraph`], used to hand graphs to and from the preparation binary.

use std::fs;
use std::path::Path;

use ordered_float::OrderedFloat;
use petgraph::graph::NodeIndex;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    instrument,
};

use crate::errors::{
    GraphError,
    GraphResult,
};
use crate::flags::EdgeFlags;
use crate::graph::{
    Priority,
    PriorityGraph,
    RoadEdge,
    RoadGraph,
};

/// A node as stored on disk; its id is its position in [`GraphDocument::nodes`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Contraction state of the node.
    #[serde(default)]
    pub priority: Priority,
}

/// An edge as stored on disk, oriented from `from` to `to`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Base node id.
    pub from: u32,
    /// Adjacent node id.
    pub to: u32,
    /// Length of the edge.
    pub distance: f64,
    /// Encoded traversal attributes relative to `from`.
    pub flags: EdgeFlags,
    /// For shortcuts, the first contracted node behind the edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_node: Option<u32>,
}

/// A whole graph as stored on disk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// All nodes, indexed by id.
    pub nodes: Vec<NodeRecord>,
    /// All edges, in insertion order.
    pub edges: Vec<EdgeRecord>,
}

impl TryFrom<GraphDocument> for RoadGraph {
    type Error = GraphError;

    fn try_from(document: GraphDocument) -> GraphResult<Self> {
        let mut graph = Self::new();
        for node in &document.nodes {
            graph.add_node(node.priority);
        }

        let node_count = document.nodes.len();
        for (position, record) in document.edges.iter().enumerate() {
            let skipped_node = match record.skipped_node {
                Some(node) if node as usize >= node_count => {
                    return Err(GraphError::SkippedNodeOutOfRange { edge: position, node: node as usize, node_count });
                },
                other => other.map(NodeIndex::from),
            };
            graph.insert_edge(
                NodeIndex::from(record.from),
                NodeIndex::from(record.to),
                RoadEdge { distance: OrderedFloat(record.distance), flags: record.flags, skipped_node },
            )?;
        }

        Ok(graph)
    }
}

impl From<&RoadGraph> for GraphDocument {
    fn from(graph: &RoadGraph) -> Self {
        let nodes = (0..graph.node_count())
            .map(|node| NodeRecord { priority: graph.priority(NodeIndex::new(node)) })
            .collect();
        let edges = graph
            .edges()
            .map(|edge| EdgeRecord {
                from: index_to_u32(edge.source),
                to: index_to_u32(edge.target),
                distance: edge.distance.into_inner(),
                flags: edge.flags,
                skipped_node: edge.skipped_node.map(index_to_u32),
            })
            .collect();

        Self { nodes, edges }
    }
}

/// Node indices are `u32`-backed, so this never truncates.
#[allow(clippy::cast_possible_truncation)]
fn index_to_u32(node: NodeIndex) -> u32 {
    node.index() as u32
}

/// Load a graph file, accepting either JSON or `MessagePack`.
///
/// # Errors
///
/// Fails when the file cannot be read, is in neither format, or describes an invalid graph.
#[instrument]
pub fn load_graph(path: &Path) -> GraphResult<RoadGraph> {
    let bytes = fs::read(path)?;
    let document: GraphDocument = match serde_json::from_slice(&bytes) {
        Ok(document) => document,
        Err(err) => {
            debug!("not a JSON graph ({err}), trying MessagePack");
            rmp_serde::from_slice(&bytes)?
        },
    };
    debug!(nodes = document.nodes.len(), edges = document.edges.len(), "graph document loaded");
    RoadGraph::try_from(document)
}

/// Write a graph as pretty-printed JSON.
///
/// # Errors
///
/// Fails when the file cannot be written.
#[instrument(skip(graph))]
pub fn save_graph(path: &Path, graph: &RoadGraph) -> GraphResult<()> {
    let document = GraphDocument::from(graph);
    fs::write(path, serde_json::to_vec_pretty(&document)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[fixture]
    fn document() -> GraphDocument {
        GraphDocument {
            nodes: vec![
                NodeRecord::default(),
                NodeRecord { priority: Priority::Contracted },
                NodeRecord { priority: Priority::Rank(4) },
            ],
            edges: vec![
                EdgeRecord { from: 0, to: 1, distance: 1.5, flags: EdgeFlags::FORWARD, skipped_node: None },
                EdgeRecord { from: 1, to: 2, distance: 2.5, flags: EdgeFlags::FORWARD, skipped_node: None },
                EdgeRecord { from: 0, to: 2, distance: 4.0, flags: EdgeFlags::FORWARD, skipped_node: Some(1) },
            ],
        }
    }

    #[rstest]
    fn test_document_survives_graph_conversion(document: GraphDocument) {
        let graph = RoadGraph::try_from(document.clone()).unwrap();

        assert_eq!(graph.priority(1.into()), Priority::Contracted);
        assert_eq!(GraphDocument::from(&graph), document);
    }

    #[rstest]
    fn test_skipped_node_out_of_range(mut document: GraphDocument) {
        document.edges[2].skipped_node = Some(9);

        let result = RoadGraph::try_from(document);
        assert!(matches!(result, Err(GraphError::SkippedNodeOutOfRange { edge: 2, node: 9, node_count: 3 })));
    }

    #[rstest]
    fn test_dangling_edge_is_rejected(mut document: GraphDocument) {
        document.edges[0].to = 3;

        assert_err!(RoadGraph::try_from(document));
    }

    #[rstest]
    fn test_priority_serialization(document: GraphDocument) {
        let json = serde_json::to_string(&document).unwrap();

        assert_contains!(json, r#""priority":"contracted""#);
        assert_contains!(json, r#""priority":{"rank":4}"#);
        assert_not_contains!(json, r#""skipped_node":null"#);
    }

    #[rstest]
    fn test_load_json_and_msgpack(document: GraphDocument) {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("graph.json");
        fs::write(&json_path, serde_json::to_vec(&document).unwrap()).unwrap();
        let msgpack_path = dir.path().join("graph.msgpack");
        fs::write(&msgpack_path, rmp_serde::to_vec_named(&document).unwrap()).unwrap();

        let from_json = load_graph(&json_path).unwrap();
        let from_msgpack = load_graph(&msgpack_path).unwrap();
        assert_eq!(GraphDocument::from(&from_json), GraphDocument::from(&from_msgpack));
    }

    #[rstest]
    fn test_save_then_load(document: GraphDocument) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let graph = RoadGraph::try_from(document.clone()).unwrap();

        save_graph(&path, &graph).unwrap();

        assert_eq!(GraphDocument::from(&load_graph(&path).unwrap()), document);
    }
}
