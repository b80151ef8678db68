use ordered_float::OrderedFloat;
use rn_core::{
    EdgeFlags,
    EdgeIndex,
    EdgeView,
    GraphError,
    GraphResult,
    NodeIndex,
    Priority,
    PriorityGraph,
};
use tracing::trace;

use super::classifier::through_edges;

/// A run of contracted through-nodes behind a junction, ready to be resolved into a shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainCandidate {
    /// First node after the chain; never one of the contracted nodes.
    pub end: NodeIndex,
    /// Sum of all segment lengths from the junction to `end`.
    pub distance: OrderedFloat<f64>,
    /// Flags shared by every segment of the chain.
    pub flags: EdgeFlags,
    /// The node right after the junction, recorded on the shortcut for unpacking.
    pub first_skipped: NodeIndex,
    /// Number of nodes this walk contracted.
    pub contracted: usize,
}

/// Outcome of walking one outgoing edge of a junction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainWalk {
    /// The edge already is a shortcut; the nodes behind it were contracted earlier.
    AlreadyShortcut,
    /// The edge does not lead into a contractible chain.
    Unchanged,
    /// The chain leads back to the junction it started from.
    ClosedLoop {
        /// Number of nodes contracted before the loop closed.
        contracted: usize,
    },
    /// A chain ending at another node.
    Chain(ChainCandidate),
}

/// Follow `seed` away from `junction` through consecutive through-nodes, contracting each one.
///
/// The walk stops at the first node that is not a through-node, whose onward edge carries
/// different flags than `seed`, or that has been contracted already. Every node passed is
/// marked [`Priority::Contracted`] immediately.
///
/// # Errors
///
/// [`GraphError::MalformedThroughNode`] if a through-node's two incident edges are not two distinct
/// edges, one of them the edge the walk arrived on.
pub fn walk_chain<G: PriorityGraph>(graph: &mut G, junction: NodeIndex, seed: EdgeView) -> GraphResult<ChainWalk> {
    if graph.edge_weight(seed.id).is_shortcut() {
        return Ok(ChainWalk::AlreadyShortcut);
    }

    let flags = seed.flags;
    let mut arrival = seed.id;
    let mut current = seed.target;
    let mut distance = seed.distance;
    let mut contracted = 0;

    while let Some(edges) = through_edges(&*graph, current) {
        let onward = continuation(edges, arrival).ok_or(GraphError::MalformedThroughNode { node: current })?;
        if onward.flags != flags || graph.priority(current).is_contracted() {
            break;
        }

        trace!(node = current.index(), "contracting through-node");
        graph.set_priority(current, Priority::Contracted);
        contracted += 1;
        distance += onward.distance;
        arrival = onward.id;
        current = onward.target;
    }

    if current == junction {
        return Ok(ChainWalk::ClosedLoop { contracted });
    }
    if contracted == 0 {
        return Ok(ChainWalk::Unchanged);
    }

    Ok(ChainWalk::Chain(ChainCandidate { end: current, distance, flags, first_skipped: seed.target, contracted }))
}

/// The incident edge of a through-node that the walk did not arrive on.
fn continuation([first, second]: [EdgeView; 2], arrival: EdgeIndex) -> Option<EdgeView> {
    match (first.id == arrival, second.id == arrival) {
        (true, false) => Some(second),
        (false, true) => Some(first),
        _ => None,
    }
}
