use rn_core::{
    EdgeView,
    GraphResult,
    NodeIndex,
    PriorityGraph,
};
use serde::Serialize;
use tracing::{
    debug,
    info,
    instrument,
    trace,
};

use super::classifier::is_through_node;
use super::resolver::{
    resolve,
    Resolution,
};
use super::walker::{
    walk_chain,
    ChainWalk,
};

/// Tally of one preparation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ShortcutReport {
    /// Shortcut edges appended to the graph.
    pub created: usize,
    /// Existing edges shortened in place to stand for a chain.
    pub updated: usize,
    /// Chains not shortcut because an edge at most as long already existed.
    pub kept: usize,
    /// Chains that led back to their own junction.
    pub closed_loops: usize,
    /// Through-nodes marked as contracted.
    pub contracted_nodes: usize,
}

/// One run of the shortcut preparation over a graph.
///
/// Junctions are visited in id order. Every outgoing edge of a junction that is not yet a shortcut
/// is walked through the chain of through-nodes behind it, and the chain is collapsed into a
/// single edge from the junction to the chain's end.
///
/// A chain can stop at a through-node where the flags change. The new shortcut gives that node a
/// third edge and turns it into a junction; if its id was already passed, it is visited right
/// away instead of being left for a later run. Running the pass again on its own output
/// changes nothing.
pub struct ShortcutPreparation<'g, G: PriorityGraph> {
    /// The graph being prepared; mutated in place.
    graph: &'g mut G,
    /// Running totals.
    report: ShortcutReport,
    /// Highest node id the driver loop has reached.
    cursor: usize,
    /// Already passed nodes that became junctions and still need to be visited.
    reopened: Vec<NodeIndex>,
}

impl<'g, G: PriorityGraph> ShortcutPreparation<'g, G> {
    /// Prepare `graph`, which must not be touched by anything else until the run ends.
    pub fn new(graph: &'g mut G) -> Self {
        Self { graph, report: ShortcutReport::default(), cursor: 0, reopened: vec![] }
    }

    /// Run the pass to completion.
    ///
    /// # Errors
    ///
    /// Aborts on the first malformed through-node; see [`walk_chain`].
    pub fn run(self) -> GraphResult<ShortcutReport> {
        self.run_with_progress(|_| {})
    }

    /// Run the pass to completion, calling `progress` with the number of nodes visited so far.
    ///
    /// # Errors
    ///
    /// Aborts on the first malformed through-node; see [`walk_chain`].
    #[instrument(skip_all)]
    pub fn run_with_progress<F>(mut self, mut progress: F) -> GraphResult<ShortcutReport>
    where
        F: FnMut(usize),
    {
        let node_count = self.graph.node_count();
        info!(nodes = node_count, "preparing routing shortcuts");

        for index in 0..node_count {
            self.cursor = index;
            let start = NodeIndex::new(index);
            // through-nodes are reached from the junctions bounding their chain
            if !is_through_node(&*self.graph, start) {
                self.prepare_junction(start)?;
            }
            while let Some(junction) = self.reopened.pop() {
                debug!(junction = junction.index(), "visiting node that became a junction");
                self.prepare_junction(junction)?;
            }
            progress(index + 1);
        }

        info!("introduced {} new shortcuts", self.report.created);
        debug!(report = ?self.report, "shortcut preparation finished");
        Ok(self.report)
    }

    /// Walk and resolve every outgoing edge of `junction`.
    fn prepare_junction(&mut self, junction: NodeIndex) -> GraphResult<()> {
        // Snapshot first: shortcuts appended while resolving must not become seeds.
        let seeds: Vec<EdgeView> = self.graph.outgoing_edges(junction).collect();

        for seed in seeds {
            match walk_chain(&mut *self.graph, junction, seed)? {
                ChainWalk::AlreadyShortcut | ChainWalk::Unchanged => {},
                ChainWalk::ClosedLoop { contracted } => {
                    debug!(junction = junction.index(), contracted, "chain closes on its junction");
                    self.report.closed_loops += 1;
                    self.report.contracted_nodes += contracted;
                },
                ChainWalk::Chain(candidate) => {
                    self.report.contracted_nodes += candidate.contracted;
                    let end = candidate.end;
                    let end_passed_as_through_node = end.index() <= self.cursor
                        && !self.graph.priority(end).is_contracted()
                        && is_through_node(&*self.graph, end);
                    match resolve(&mut *self.graph, junction, &candidate) {
                        Resolution::Inserted(edge) => {
                            debug!(
                                junction = junction.index(),
                                end = candidate.end.index(),
                                distance = candidate.distance.into_inner(),
                                edge = edge.index(),
                                "introduced shortcut"
                            );
                            self.report.created += 1;
                            if end_passed_as_through_node && !is_through_node(&*self.graph, end) {
                                self.reopened.push(end);
                            }
                        },
                        Resolution::Updated(edge) => {
                            debug!(
                                junction = junction.index(),
                                end = candidate.end.index(),
                                distance = candidate.distance.into_inner(),
                                edge = edge.index(),
                                "shortened existing edge"
                            );
                            self.report.updated += 1;
                        },
                        Resolution::Kept(edge) => {
                            trace!(edge = edge.index(), "existing edge is not longer than the chain");
                            self.report.kept += 1;
                        },
                    }
                },
            }
        }

        Ok(())
    }
}

/// Collapse every chain of through-nodes in `graph` into a shortcut.
///
/// # Errors
///
/// See [`ShortcutPreparation::run`].
pub fn prepare_shortcuts<G: PriorityGraph>(graph: &mut G) -> GraphResult<ShortcutReport> {
    ShortcutPreparation::new(graph).run()
}
