//! Error types shared by graph construction, persistence and the preparation pass.

use petgraph::graph::{
    EdgeIndex,
    NodeIndex,
};
use thiserror::Error;

/// Result alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Everything that can go wrong while building, loading or preparing a road graph.
///
/// All of these are precondition violations: a graph that produces one of them is never partially
/// processed.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An edge or record refers to a node id outside `0..node_count`.
    #[error("node {node} is out of range (graph has {node_count} nodes)")]
    NodeOutOfRange {
        /// The offending id.
        node: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },

    /// An edge starts and ends at the same node.
    #[error("self loop at node {0:?}")]
    SelfLoop(NodeIndex),

    /// Edge distances must be finite and non-negative.
    #[error("invalid distance {distance} on edge {from:?} -> {to:?}")]
    InvalidDistance {
        /// Base node of the edge.
        from: NodeIndex,
        /// Adjacent node of the edge.
        to: NodeIndex,
        /// The rejected value.
        distance: f64,
    },

    /// A stored skipped node refers to a node id outside `0..node_count`.
    #[error("skipped node {node} on edge {edge} is out of range (graph has {node_count} nodes)")]
    SkippedNodeOutOfRange {
        /// Position of the edge record.
        edge: usize,
        /// The offending id.
        node: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },

    /// A node classified as a through-node does not have two distinct incident edges.
    #[error("through-node {node:?} does not have two distinct incident edges")]
    MalformedThroughNode {
        /// The node being walked through.
        node: NodeIndex,
    },

    /// A shortcut cannot be expanded back into a chain of contracted nodes.
    #[error("shortcut {edge:?} cannot be unpacked: {reason}")]
    BrokenShortcut {
        /// The shortcut edge.
        edge: EdgeIndex,
        /// What went wrong while following the chain.
        reason: String,
    },

    /// Reading or writing a graph file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The graph file is not valid JSON, or could not be encoded as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The graph file is neither JSON nor valid `MessagePack`.
    #[error("graph file is neither JSON nor MessagePack: {0}")]
    MessagePack(#[from] rmp_serde::decode::Error),
}
