//! Routing shortcuts collapse chains of pass-through nodes into single edges.
//!
//! Road networks contain long stretches of nodes that only exist to carry geometry: every such
//! node has one way in and one way out. A path search has to settle each of them one by one even
//! though there is never a choice to make. This pass finds those chains and adds one edge per
//! chain, from the junction where the chain starts to the node where it ends:
//! 1. Classification: a through-node has exactly two incident edges, one leading only towards it
//!    and one leading only away from it. Every other node is a junction.
//! 2. Walking: starting from each outgoing edge of each junction, follow through-nodes while the
//!    onward edge carries the same flags as the first edge, summing distances and marking each
//!    node as contracted as it is passed.
//! 3. Resolution: if the junction already has an edge to the chain's end with the same flags, it
//!    is shortened when the chain is strictly shorter and left alone otherwise. If not, a shortcut
//!    edge is appended. Either way at most one edge per flag value connects the two nodes.
//!
//! This is a single linear pass: there are no hierarchy levels and no witness searches. A shortcut
//! records only the first node it skips; the rest of the chain is recovered by following the
//! contracted nodes (see [`crate::unpack`]).

/// Through-node detection
mod classifier;
/// The driver visiting every junction
mod prepare;
/// Insert-or-update of the edge standing for a chain
mod resolver;
/// Following a chain of through-nodes
mod walker;

#[cfg(test)]
mod tests;

pub use classifier::{
    is_through_node,
    through_edges,
};
pub use prepare::{
    prepare_shortcuts,
    ShortcutPreparation,
    ShortcutReport,
};
pub use resolver::{
    resolve,
    Resolution,
};
pub use walker::{
    walk_chain,
    ChainCandidate,
    ChainWalk,
};
