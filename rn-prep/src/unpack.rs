//! Expanding shortcut edges back into the node sequence they replace.
//!
//! A shortcut only stores the first node it skips. That is enough because every node behind it
//! is a contracted through-node with exactly two incident edges, so the rest of the chain is
//! forced: keep leaving each node by the edge that was not used to enter it until the shortcut's
//! target is reached.

use rn_core::{
    EdgeIndex,
    EdgeView,
    GraphError,
    GraphResult,
    NodeIndex,
    PriorityGraph,
};

use crate::shortcuts::through_edges;

/// The nodes `edge` stands for, from its source to its target inclusive.
///
/// Original edges unpack to their two endpoints.
///
/// # Errors
///
/// [`GraphError::BrokenShortcut`] if the recorded chain is not a run of contracted through-nodes
/// leading to the target.
pub fn unpack_edge<G: PriorityGraph>(graph: &G, edge: &EdgeView) -> GraphResult<Vec<NodeIndex>> {
    let Some(first) = edge.skipped_node else {
        return Ok(vec![edge.source, edge.target]);
    };
    let broken = |reason: String| GraphError::BrokenShortcut { edge: edge.id, reason };

    let mut path = vec![edge.source];
    let mut previous = edge.source;
    let mut arrival: Option<EdgeIndex> = None;
    let mut current = first;

    while current != edge.target {
        if path.len() > graph.node_count() {
            return Err(broken("chain is longer than the graph".to_owned()));
        }
        if !graph.priority(current).is_contracted() {
            return Err(broken(format!("node {} is not contracted", current.index())));
        }
        let [a, b] = through_edges(graph, current)
            .ok_or_else(|| broken(format!("node {} is not a through-node", current.index())))?;

        let entered_by = |candidate: &EdgeView| match arrival {
            Some(id) => candidate.id == id,
            None => candidate.target == previous,
        };
        let onward = match (entered_by(&a), entered_by(&b)) {
            (true, false) => b,
            (false, true) => a,
            _ => return Err(broken(format!("cannot tell how node {} was entered", current.index()))),
        };

        path.push(current);
        previous = current;
        arrival = Some(onward.id);
        current = onward.target;
    }

    path.push(current);
    Ok(path)
}
