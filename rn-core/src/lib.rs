#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]
//! # rn-core – road network graph storage
//!
//! The graph collaborator of the routing preparation pipeline: compact edge flags, a
//! petgraph-backed road graph exposing the [`PriorityGraph`] contract, the on-disk graph document,
//! error types, and logging setup shared by the workspace binaries.

pub mod document;
pub mod errors;
pub mod flags;
pub mod graph;
pub mod logging;

#[cfg(feature = "testutils")]
pub mod testutils;

pub use document::{
    load_graph,
    save_graph,
    GraphDocument,
};
pub use errors::{
    GraphError,
    GraphResult,
};
pub use flags::{
    EdgeFlags,
    TraversalDirection,
};
pub use graph::{
    find_edge,
    EdgeView,
    Priority,
    PriorityGraph,
    RoadEdge,
    RoadGraph,
    RoadNode,
};
pub use petgraph::graph::{
    EdgeIndex,
    NodeIndex,
};
