//! Small road graphs shared by the tests of the workspace crates.
#![allow(missing_docs, clippy::missing_docs_in_private_items, clippy::missing_panics_doc)]

use petgraph::graph::NodeIndex;
use rstest::fixture;

use crate::flags::EdgeFlags;
use crate::graph::RoadGraph;

pub const J1: usize = 0;
pub const A: usize = 1;
pub const B: usize = 2;
pub const C: usize = 3;
pub const J2: usize = 4;

pub fn node(id: usize) -> NodeIndex {
    NodeIndex::new(id)
}

/// One-way chain `J1 -> A -> B -> C -> J2` with the given segment lengths.
///
/// `J1` and `J2` have a single incident edge each, so both are junctions.
pub fn chain_graph(distances: [f64; 4]) -> RoadGraph {
    let mut graph = RoadGraph::with_nodes(5);
    for (from, distance) in [J1, A, B, C].into_iter().zip(distances) {
        graph
            .add_edge(node(from), node(from + 1), distance, EdgeFlags::FORWARD)
            .expect("chain edge is valid");
    }
    graph
}

#[fixture]
pub fn chain() -> RoadGraph {
    chain_graph([1.0, 2.0, 3.0, 4.0])
}

/// One-way loop `J1 -> A -> B -> J1`, plus a spur `J1 -> C` so that `J1` is a junction.
#[fixture]
pub fn closed_loop() -> RoadGraph {
    let mut graph = RoadGraph::with_nodes(4);
    for (from, to) in [(J1, A), (A, B), (B, J1), (J1, C)] {
        graph.add_edge(node(from), node(to), 1.0, EdgeFlags::FORWARD).expect("loop edge is valid");
    }
    graph
}

/// One-way cycle `A -> B -> C -> A` with no junction anywhere on it.
#[fixture]
pub fn isolated_cycle() -> RoadGraph {
    let mut graph = RoadGraph::with_nodes(4);
    for (from, to) in [(A, B), (B, C), (C, A)] {
        graph.add_edge(node(from), node(to), 1.0, EdgeFlags::FORWARD).expect("cycle edge is valid");
    }
    graph
}
