//! The road graph and the contract the preparation pass needs from it.
//!
//! Edges are stored once, oriented from a base node to an adjacent node, with flags relative to
//! the base node. Every query hands out [`EdgeView`]s: snapshots of a stored edge as seen from one
//! of its endpoints, with flags reversed when viewed from the adjacent node. Mutation always goes
//! through the stable [`EdgeIndex`] carried by a view, never through the view itself.

use ordered_float::OrderedFloat;
use petgraph::graph::{
    DiGraph,
    EdgeIndex,
    NodeIndex,
};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{
    Deserialize,
    Serialize,
};

use crate::errors::{
    GraphError,
    GraphResult,
};
use crate::flags::EdgeFlags;

/// Per-node contraction state.
///
/// Ranks are produced and consumed by other preprocessing stages; the shortcut pass only ever
/// moves a node to `Contracted`, and never back.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Not contracted; the rank is opaque to the shortcut pass.
    Rank(u32),
    /// Removed by contraction. Never walked through or contracted again.
    Contracted,
}

impl Priority {
    /// Whether the node has already been contracted.
    #[must_use]
    pub const fn is_contracted(self) -> bool {
        matches!(self, Self::Contracted)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Rank(0)
    }
}

/// Node payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoadNode {
    /// Contraction state of the node.
    pub priority: Priority,
}

/// Edge payload, oriented from the stored base node to the stored adjacent node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoadEdge {
    /// Length of the edge.
    pub distance: OrderedFloat<f64>,
    /// Traversal attributes relative to the base node.
    pub flags: EdgeFlags,
    /// For shortcuts, the first node of the contracted chain behind the edge.
    pub skipped_node: Option<NodeIndex>,
}

impl RoadEdge {
    /// Whether the edge stands for a contracted chain rather than a single road segment.
    #[must_use]
    pub const fn is_shortcut(&self) -> bool {
        self.skipped_node.is_some()
    }
}

/// A stored edge as seen from one of its endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeView {
    /// Handle of the stored edge; identical from both endpoints.
    pub id: EdgeIndex,
    /// The viewing node.
    pub source: NodeIndex,
    /// The other endpoint.
    pub target: NodeIndex,
    /// Length of the edge.
    pub distance: OrderedFloat<f64>,
    /// Traversal attributes relative to `source`.
    pub flags: EdgeFlags,
    /// For shortcuts, the first node of the contracted chain behind the edge.
    pub skipped_node: Option<NodeIndex>,
}

impl EdgeView {
    /// View a stored edge from its base node.
    #[must_use]
    pub const fn stored(id: EdgeIndex, source: NodeIndex, target: NodeIndex, edge: &RoadEdge) -> Self {
        Self {
            id,
            source,
            target,
            distance: edge.distance,
            flags: edge.flags,
            skipped_node: edge.skipped_node,
        }
    }

    /// The same edge seen from its other endpoint.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
            flags: self.flags.reversed(),
            ..self
        }
    }

    /// Whether the edge stands for a contracted chain.
    #[must_use]
    pub const fn is_shortcut(&self) -> bool {
        self.skipped_node.is_some()
    }
}

/// What the shortcut preparation pass requires from a graph.
///
/// Node ids are dense in `0..node_count()`. Implementations must make every mutation visible to
/// subsequent queries immediately; the pass relies on reading its own writes mid-walk.
pub trait PriorityGraph {
    /// Number of nodes; ids are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Every edge touching `node`, in either stored direction, viewed from `node`.
    fn incident_edges(&self, node: NodeIndex) -> impl Iterator<Item = EdgeView> + '_;

    /// Incident edges that can be traversed away from `node`.
    fn outgoing_edges(&self, node: NodeIndex) -> impl Iterator<Item = EdgeView> + '_ {
        self.incident_edges(node).filter(|edge| edge.flags.is_forward())
    }

    /// The stored payload of an edge.
    fn edge_weight(&self, edge: EdgeIndex) -> &RoadEdge;

    /// Mutable access to the stored payload of an edge.
    fn edge_weight_mut(&mut self, edge: EdgeIndex) -> &mut RoadEdge;

    /// Contraction state of `node`.
    fn priority(&self, node: NodeIndex) -> Priority;

    /// Overwrite the contraction state of `node`.
    fn set_priority(&mut self, node: NodeIndex, priority: Priority);

    /// Append a shortcut edge standing for the chain that starts at `skipped_node`.
    fn create_shortcut(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        distance: OrderedFloat<f64>,
        flags: EdgeFlags,
        skipped_node: NodeIndex,
    ) -> EdgeIndex;
}

/// Find the first edge in `edges` that leads to `target` with exactly `flags`.
pub fn find_edge<I>(edges: I, target: NodeIndex, flags: EdgeFlags) -> Option<EdgeView>
where
    I: IntoIterator<Item = EdgeView>,
{
    edges.into_iter().find(|edge| edge.target == target && edge.flags == flags)
}

/// In-memory road graph backed by a petgraph adjacency list.
#[derive(Clone, Debug, Default)]
pub struct RoadGraph {
    /// Stored nodes and edges; never shrinks, so node indices stay dense.
    graph: DiGraph<RoadNode, RoadEdge>,
}

impl RoadGraph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph with `node_count` unconnected, uncontracted nodes.
    #[must_use]
    pub fn with_nodes(node_count: usize) -> Self {
        let mut graph = DiGraph::with_capacity(node_count, node_count * 2);
        for _ in 0..node_count {
            graph.add_node(RoadNode::default());
        }
        Self { graph }
    }

    /// Append a node and return its id.
    pub fn add_node(&mut self, priority: Priority) -> NodeIndex {
        self.graph.add_node(RoadNode { priority })
    }

    /// Append an original (non-shortcut) road segment.
    ///
    /// # Errors
    ///
    /// Fails on unknown endpoints, self loops and distances that are negative or not finite.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, distance: f64, flags: EdgeFlags) -> GraphResult<EdgeIndex> {
        self.insert_edge(from, to, RoadEdge { distance: OrderedFloat(distance), flags, skipped_node: None })
    }

    /// Append an edge with an arbitrary payload, validating it like [`RoadGraph::add_edge`].
    ///
    /// # Errors
    ///
    /// See [`RoadGraph::add_edge`]; a skipped node must also be a known node.
    pub fn insert_edge(&mut self, from: NodeIndex, to: NodeIndex, edge: RoadEdge) -> GraphResult<EdgeIndex> {
        self.check_node(from)?;
        self.check_node(to)?;
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        let distance = edge.distance.into_inner();
        if !distance.is_finite() || distance < 0.0 {
            return Err(GraphError::InvalidDistance { from, to, distance });
        }
        if let Some(skipped) = edge.skipped_node {
            self.check_node(skipped)?;
        }
        Ok(self.graph.add_edge(from, to, edge))
    }

    /// Number of stored edges, shortcuts included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All stored edges in insertion order, viewed from their base node.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView> + '_ {
        self.graph
            .edge_references()
            .map(|edge| EdgeView::stored(edge.id(), edge.source(), edge.target(), edge.weight()))
    }

    /// Endpoints of a stored edge, base node first.
    #[must_use]
    pub fn edge_endpoints(&self, edge: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(edge)
    }

    /// The underlying petgraph graph, for rendering and inspection.
    #[must_use]
    pub const fn as_petgraph(&self) -> &DiGraph<RoadNode, RoadEdge> {
        &self.graph
    }

    /// Reject ids outside `0..node_count`.
    fn check_node(&self, node: NodeIndex) -> GraphResult<()> {
        if node.index() < self.graph.node_count() {
            Ok(())
        } else {
            Err(GraphError::NodeOutOfRange { node: node.index(), node_count: self.graph.node_count() })
        }
    }
}

impl PriorityGraph for RoadGraph {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn incident_edges(&self, node: NodeIndex) -> impl Iterator<Item = EdgeView> + '_ {
        let outgoing = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| EdgeView::stored(edge.id(), edge.source(), edge.target(), edge.weight()));
        let incoming = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| EdgeView::stored(edge.id(), edge.source(), edge.target(), edge.weight()).reversed());
        outgoing.chain(incoming)
    }

    fn edge_weight(&self, edge: EdgeIndex) -> &RoadEdge {
        &self.graph[edge]
    }

    fn edge_weight_mut(&mut self, edge: EdgeIndex) -> &mut RoadEdge {
        &mut self.graph[edge]
    }

    fn priority(&self, node: NodeIndex) -> Priority {
        self.graph[node].priority
    }

    fn set_priority(&mut self, node: NodeIndex, priority: Priority) {
        self.graph[node].priority = priority;
    }

    fn create_shortcut(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        distance: OrderedFloat<f64>,
        flags: EdgeFlags,
        skipped_node: NodeIndex,
    ) -> EdgeIndex {
        self.graph.add_edge(from, to, RoadEdge { distance, flags, skipped_node: Some(skipped_node) })
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[fixture]
    fn triangle() -> RoadGraph {
        let mut graph = RoadGraph::with_nodes(3);
        graph.add_edge(0.into(), 1.into(), 2.0, EdgeFlags::FORWARD).unwrap();
        graph.add_edge(1.into(), 2.into(), 3.0, EdgeFlags::BOTH).unwrap();
        graph.add_edge(2.into(), 0.into(), 4.0, EdgeFlags::FORWARD).unwrap();
        graph
    }

    #[rstest]
    fn test_incident_edges_are_viewed_from_the_node(triangle: RoadGraph) {
        let mut views: Vec<_> = triangle.incident_edges(1.into()).collect();
        views.sort_by_key(|view| view.target);

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].source, NodeIndex::new(1));
        assert_eq!(views[0].target, NodeIndex::new(0));
        assert_eq!(views[0].flags, EdgeFlags::BACKWARD);
        assert_eq!(views[1].target, NodeIndex::new(2));
        assert_eq!(views[1].flags, EdgeFlags::BOTH);
    }

    #[rstest]
    fn test_outgoing_edges_follow_relative_direction(triangle: RoadGraph) {
        let mut targets: Vec<_> = triangle.outgoing_edges(2.into()).map(|view| view.target).collect();
        targets.sort();

        // 1 -> 2 is bidirectional, 2 -> 0 is forward from 2
        assert_eq!(targets, vec![NodeIndex::new(0), NodeIndex::new(1)]);
        assert_eq!(triangle.outgoing_edges(0.into()).count(), 1);
    }

    #[rstest]
    fn test_find_edge_matches_target_and_flags(triangle: RoadGraph) {
        let found = find_edge(triangle.outgoing_edges(1.into()), 2.into(), EdgeFlags::BOTH);
        assert_some!(found);
        assert_none!(find_edge(triangle.outgoing_edges(1.into()), 2.into(), EdgeFlags::FORWARD));
        assert_none!(find_edge(triangle.outgoing_edges(1.into()), 0.into(), EdgeFlags::FORWARD));
    }

    #[rstest]
    fn test_add_edge_rejects_unknown_node(mut triangle: RoadGraph) {
        let result = triangle.add_edge(0.into(), 7.into(), 1.0, EdgeFlags::FORWARD);
        assert!(matches!(result, Err(GraphError::NodeOutOfRange { node: 7, node_count: 3 })));
    }

    #[rstest]
    fn test_add_edge_rejects_self_loop(mut triangle: RoadGraph) {
        let result = triangle.add_edge(1.into(), 1.into(), 1.0, EdgeFlags::FORWARD);
        assert!(matches!(result, Err(GraphError::SelfLoop(node)) if node == NodeIndex::new(1)));
    }

    #[rstest]
    #[case::negative(-1.0)]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    fn test_add_edge_rejects_bad_distance(mut triangle: RoadGraph, #[case] distance: f64) {
        let result = triangle.add_edge(0.into(), 2.into(), distance, EdgeFlags::FORWARD);
        assert!(matches!(result, Err(GraphError::InvalidDistance { .. })));
    }

    #[rstest]
    fn test_shortcut_is_visible_immediately(mut triangle: RoadGraph) {
        let id = triangle.create_shortcut(0.into(), 2.into(), OrderedFloat(5.0), EdgeFlags::FORWARD, 1.into());

        let view = find_edge(triangle.outgoing_edges(0.into()), 2.into(), EdgeFlags::FORWARD).unwrap();
        assert_eq!(view.id, id);
        assert_eq!(view.skipped_node, Some(NodeIndex::new(1)));
        assert!(triangle.edge_weight(id).is_shortcut());
    }

    #[rstest]
    fn test_priority_round_trip(mut triangle: RoadGraph) {
        assert_eq!(triangle.priority(0.into()), Priority::Rank(0));
        triangle.set_priority(0.into(), Priority::Contracted);
        assert!(triangle.priority(0.into()).is_contracted());
    }
}
