use rn_core::{
    EdgeView,
    NodeIndex,
    PriorityGraph,
    TraversalDirection,
};

/// The two incident edges of `node`, if it is a through-node.
///
/// A through-node has exactly two incident edges, one traversable only away from the node and one
/// traversable only towards it, i.e. it sits in the middle of a single one-way segment. Dead
/// ends, branches and nodes touching a bidirectional edge are junctions.
pub fn through_edges<G: PriorityGraph>(graph: &G, node: NodeIndex) -> Option<[EdgeView; 2]> {
    let mut incident = graph.incident_edges(node);
    let first = incident.next()?;
    let second = incident.next()?;
    if incident.next().is_some() {
        return None;
    }

    match (first.flags.direction(), second.flags.direction()) {
        (TraversalDirection::Forward, TraversalDirection::Backward)
        | (TraversalDirection::Backward, TraversalDirection::Forward) => Some([first, second]),
        _ => None,
    }
}

/// Whether `node` can be contracted away as part of a chain.
pub fn is_through_node<G: PriorityGraph>(graph: &G, node: NodeIndex) -> bool {
    through_edges(graph, node).is_some()
}
