use rn_core::{
    find_edge,
    EdgeIndex,
    NodeIndex,
    PriorityGraph,
};

use super::walker::ChainCandidate;

/// What happened to the connection between a junction and the end of its chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// No matching edge existed; a new shortcut was appended.
    Inserted(EdgeIndex),
    /// A longer matching edge was shortened in place and now records the chain.
    Updated(EdgeIndex),
    /// A matching edge at most as long as the chain already exists and was left alone.
    Kept(EdgeIndex),
}

/// Make sure `junction` reaches `candidate.end` through exactly one edge with the chain's flags,
/// and that this edge is no longer than the chain.
pub fn resolve<G: PriorityGraph>(graph: &mut G, junction: NodeIndex, candidate: &ChainCandidate) -> Resolution {
    let existing = find_edge(graph.outgoing_edges(junction), candidate.end, candidate.flags);

    match existing {
        Some(edge) if edge.distance > candidate.distance => {
            let weight = graph.edge_weight_mut(edge.id);
            weight.distance = candidate.distance;
            weight.skipped_node = Some(candidate.first_skipped);
            Resolution::Updated(edge.id)
        },
        Some(edge) => Resolution::Kept(edge.id),
        None => Resolution::Inserted(graph.create_shortcut(
            junction,
            candidate.end,
            candidate.distance,
            candidate.flags,
            candidate.first_skipped,
        )),
    }
}
