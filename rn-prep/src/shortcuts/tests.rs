use assertables::*;
use ordered_float::OrderedFloat;
use rn_core::testutils::*;
use rn_core::{
    find_edge,
    EdgeFlags,
    EdgeIndex,
    EdgeView,
    GraphError,
    NodeIndex,
    Priority,
    PriorityGraph,
    RoadEdge,
    RoadGraph,
};
use rstest::*;
use tracing_test::traced_test;

use super::*;

/// Delegates to a [`RoadGraph`] but reports the edge `J1 -> A` twice as the incident edges of `A`.
struct DuplicatedIncidence {
    inner: RoadGraph,
}

impl PriorityGraph for DuplicatedIncidence {
    fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    fn incident_edges(&self, node: NodeIndex) -> impl Iterator<Item = EdgeView> + '_ {
        let mut edges: Vec<_> = self.inner.incident_edges(node).collect();
        if node == rn_core::testutils::node(A) {
            let arrival = edges.iter().copied().find(|edge| edge.target == rn_core::testutils::node(J1)).unwrap();
            edges = vec![arrival, EdgeView { flags: arrival.flags.reversed(), ..arrival }];
        }
        edges.into_iter()
    }

    fn edge_weight(&self, edge: EdgeIndex) -> &RoadEdge {
        self.inner.edge_weight(edge)
    }

    fn edge_weight_mut(&mut self, edge: EdgeIndex) -> &mut RoadEdge {
        self.inner.edge_weight_mut(edge)
    }

    fn priority(&self, node: NodeIndex) -> Priority {
        self.inner.priority(node)
    }

    fn set_priority(&mut self, node: NodeIndex, priority: Priority) {
        self.inner.set_priority(node, priority);
    }

    fn create_shortcut(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        distance: OrderedFloat<f64>,
        flags: EdgeFlags,
        skipped_node: NodeIndex,
    ) -> EdgeIndex {
        self.inner.create_shortcut(from, to, distance, flags, skipped_node)
    }
}

#[rstest]
fn test_report_for_single_chain(mut chain: RoadGraph) {
    let report = prepare_shortcuts(&mut chain).unwrap();

    assert_eq!(
        report,
        ShortcutReport { created: 1, updated: 0, kept: 0, closed_loops: 0, contracted_nodes: 3 }
    );
}

#[test]
#[traced_test]
fn test_pass_logs_shortcut_count() {
    let mut graph = chain_graph([1.0, 1.0, 1.0, 1.0]);

    prepare_shortcuts(&mut graph).unwrap();

    assert!(logs_contain("introduced 1 new shortcuts"));
}

#[rstest]
fn test_progress_visits_every_node(mut chain: RoadGraph) {
    let mut visited = Vec::new();

    ShortcutPreparation::new(&mut chain).run_with_progress(|count| visited.push(count)).unwrap();

    assert_eq!(visited, (1..=5).collect::<Vec<_>>());
}

#[rstest]
fn test_malformed_through_node_fails_fast(chain: RoadGraph) {
    let mut graph = DuplicatedIncidence { inner: chain };

    let result = prepare_shortcuts(&mut graph);

    assert!(matches!(result, Err(GraphError::MalformedThroughNode { node }) if node == rn_core::testutils::node(A)));
    assert!(!graph.priority(rn_core::testutils::node(A)).is_contracted());
}

#[rstest]
fn test_parallel_chains_between_two_junctions() {
    // J1 -> A -> J2 and J1 -> C -> J2 share flags, J1 -> B -> J2 carries another profile
    let mut graph = RoadGraph::with_nodes(5);
    let profiled = EdgeFlags::FORWARD.with_profile(3);
    graph.add_edge(node(J1), node(A), 1.0, EdgeFlags::FORWARD).unwrap();
    graph.add_edge(node(A), node(J2), 1.0, EdgeFlags::FORWARD).unwrap();
    graph.add_edge(node(J1), node(B), 2.0, profiled).unwrap();
    graph.add_edge(node(B), node(J2), 2.0, profiled).unwrap();
    graph.add_edge(node(J1), node(C), 4.0, EdgeFlags::FORWARD).unwrap();
    graph.add_edge(node(C), node(J2), 4.0, EdgeFlags::FORWARD).unwrap();

    let report = prepare_shortcuts(&mut graph).unwrap();

    // whichever of the A and C chains is seen second either shortens or keeps the first one
    assert_eq!(report.created, 2);
    assert_eq!(report.updated + report.kept, 1);
    assert_eq!(report.contracted_nodes, 3);
    let plain = find_edge(graph.outgoing_edges(node(J1)), node(J2), EdgeFlags::FORWARD).unwrap();
    let other = find_edge(graph.outgoing_edges(node(J1)), node(J2), profiled).unwrap();
    assert_eq!(plain.distance, OrderedFloat(2.0));
    assert_eq!(plain.skipped_node, Some(node(A)));
    assert_eq!(other.distance, OrderedFloat(4.0));
    assert_eq!(other.skipped_node, Some(node(B)));
}

#[rstest]
fn test_chains_meet_at_a_branch() {
    // 0 -> 1 -> 2 -> 3 -> 4 with a spur 2 -> 5 turning 2 into a junction
    let mut graph = RoadGraph::with_nodes(6);
    for (from, to) in [(0, 1), (1, 2), (2, 3), (3, 4), (2, 5)] {
        graph.add_edge(node(from), node(to), 1.0, EdgeFlags::FORWARD).unwrap();
    }

    let report = prepare_shortcuts(&mut graph).unwrap();

    assert_eq!(report.created, 2);
    assert_eq!(report.contracted_nodes, 2);
    let mut shortcuts: Vec<_> = graph
        .edges()
        .filter(EdgeView::is_shortcut)
        .map(|edge| (edge.source.index(), edge.target.index(), edge.skipped_node.map(NodeIndex::index)))
        .collect();
    shortcuts.sort_unstable();
    assert_eq!(shortcuts, vec![(0, 2, Some(1)), (2, 4, Some(3))]);
    assert!(!graph.priority(node(2)).is_contracted());
}

#[rstest]
fn test_parallel_seed_edges_are_not_rewritten() {
    let mut graph = RoadGraph::with_nodes(3);
    let long = graph.add_edge(node(0), node(1), 9.0, EdgeFlags::FORWARD).unwrap();
    let short = graph.add_edge(node(0), node(1), 3.0, EdgeFlags::FORWARD).unwrap();
    graph.add_edge(node(1), node(2), 1.0, EdgeFlags::FORWARD).unwrap();

    let report = prepare_shortcuts(&mut graph).unwrap();

    assert_eq!(report, ShortcutReport::default());
    assert_none!(graph.edge_weight(long).skipped_node);
    assert_none!(graph.edge_weight(short).skipped_node);
    assert_eq!(graph.edge_weight(long).distance, OrderedFloat(9.0));
}

#[rstest]
fn test_precontracted_node_is_never_walked(mut chain: RoadGraph) {
    chain.set_priority(node(A), Priority::Contracted);

    let report = prepare_shortcuts(&mut chain).unwrap();

    assert_eq!(report, ShortcutReport::default());
    assert_eq!(chain.priority(node(B)), Priority::Rank(0));
}

#[rstest]
fn test_flag_change_at_lower_id_is_visited_in_the_same_pass() {
    // 1 -> 2 -> 0 plain, then 0 -> 3 -> 4 with a profile; the chain from 1 stops at 0
    let mut graph = RoadGraph::with_nodes(5);
    let profiled = EdgeFlags::FORWARD.with_profile(1);
    graph.add_edge(node(1), node(2), 1.0, EdgeFlags::FORWARD).unwrap();
    graph.add_edge(node(2), node(0), 1.0, EdgeFlags::FORWARD).unwrap();
    graph.add_edge(node(0), node(3), 2.0, profiled).unwrap();
    graph.add_edge(node(3), node(4), 2.0, profiled).unwrap();

    let first = prepare_shortcuts(&mut graph).unwrap();
    let second = prepare_shortcuts(&mut graph).unwrap();

    assert_eq!(first, ShortcutReport { created: 2, updated: 0, kept: 0, closed_loops: 0, contracted_nodes: 2 });
    assert_eq!(second, ShortcutReport::default());
    let onward = find_edge(graph.outgoing_edges(node(0)), node(4), profiled).unwrap();
    assert_eq!(onward.distance, OrderedFloat(4.0));
    assert_eq!(onward.skipped_node, Some(node(3)));
    assert!(!graph.priority(node(0)).is_contracted());
}
