//! The lazy best-first traverser.
//!
//! A pull-based state machine: each call to [`Traverser::next_branch`]
//! performs exactly the pop/test/expand cycles needed to produce the next
//! goal-matching branch, then suspends. No work happens between pulls and
//! nothing is precomputed, so a caller consuming one result pays for one
//! result.
//!
//! Single-threaded by construction — the frontier imposes a total order on
//! which branch is processed next, so there is nothing to parallelize.
//! Errors from evaluators or the graph view surface on the pull that
//! triggered them and abort the session; a session is never resumed after
//! a failed pull.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::evaluators::{validate_cost, validate_estimate, CostEvaluator, EstimateEvaluator};
use crate::graph::GraphView;
use crate::model::{Direction, Node, NodeId};
use crate::{Error, Result};
use super::{
    BestFirstSelector, Branch, BranchArena, BranchId, NoUniqueness, PositionData,
    UniquenessPolicy,
};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalState {
    /// Constructed, nothing popped yet.
    Ready,
    /// Actively popping and pushing branches.
    Expanding,
    /// Frontier empty: every reachable branch was tried.
    Exhausted,
    /// Terminated early — by the consumer, or by a failed pull.
    Stopped,
}

/// Statistics for one search session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalMetadata {
    /// Branches popped and expanded.
    pub branches_expanded: u64,
    /// Relationships considered during expansion, admitted or not.
    pub relationships_traversed: u64,
    /// Weighted paths actually handed to the consumer.
    pub paths_returned: u64,
}

/// One best-first search session over a [`GraphView`].
///
/// Single-use: the frontier and the uniqueness state are consumed
/// destructively. Defaults are the classic A* setup — no uniqueness,
/// outgoing expansion, goal-matching branches still expanded so co-minimal
/// paths can surface.
pub struct Traverser<'a, G: GraphView> {
    graph: &'a G,
    cost: &'a dyn CostEvaluator,
    estimate: &'a dyn EstimateEvaluator,
    policy: Box<dyn UniquenessPolicy>,
    direction: Direction,
    expand_goal_branches: bool,
    goal: Node,
    root: BranchId,
    arena: BranchArena,
    frontier: BestFirstSelector,
    state: TraversalState,
    metadata: TraversalMetadata,
}

impl<'a, G: GraphView> Traverser<'a, G> {
    /// Build a session and push the root branch (g = 0, h = estimate of
    /// start). Fails if start or goal cannot be materialized, or if the
    /// estimate is misconfigured.
    pub fn new(
        graph: &'a G,
        cost: &'a dyn CostEvaluator,
        estimate: &'a dyn EstimateEvaluator,
        start: NodeId,
        goal: NodeId,
    ) -> Result<Self> {
        let start_node = graph
            .node(start)?
            .ok_or_else(|| Error::NotFound(format!("start node {start}")))?;
        let goal_node = graph
            .node(goal)?
            .ok_or_else(|| Error::NotFound(format!("goal node {goal}")))?;

        let h = validate_estimate(estimate.estimate(&start_node, &goal_node)?, &start_node)?;

        let mut arena = BranchArena::new();
        let root = arena.push(Branch {
            end_node: start,
            parent: None,
            incoming: None,
            depth: 0,
            priority: PositionData { g: 0.0, h },
        });

        let mut frontier = BestFirstSelector::new();
        frontier.push(root, h);

        let mut policy: Box<dyn UniquenessPolicy> = Box::new(NoUniqueness);
        policy.visit_root(&arena, root);

        debug!(start = %start, goal = %goal, root_h = h, "best-first traversal ready");

        Ok(Self {
            graph,
            cost,
            estimate,
            policy,
            direction: Direction::Outgoing,
            expand_goal_branches: true,
            goal: goal_node,
            root,
            arena,
            frontier,
            state: TraversalState::Ready,
            metadata: TraversalMetadata::default(),
        })
    }

    /// Replace the revisitation policy. Must be called before the first
    /// pull; the new policy is told about the root branch.
    pub fn with_policy(mut self, mut policy: Box<dyn UniquenessPolicy>) -> Self {
        policy.visit_root(&self.arena, self.root);
        self.policy = policy;
        self
    }

    /// Which relationships to follow out of each branch end.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Whether a branch that reaches the goal is expanded further.
    /// `true` (the default) lets multiple co-minimal paths surface;
    /// `false` treats goal matches as leaves.
    pub fn with_expand_goal_branches(mut self, expand: bool) -> Self {
        self.expand_goal_branches = expand;
        self
    }

    pub fn state(&self) -> TraversalState {
        self.state
    }

    pub fn metadata(&self) -> TraversalMetadata {
        self.metadata
    }

    pub fn arena(&self) -> &BranchArena {
        &self.arena
    }

    /// Explicit early termination: subsequent pulls return `None` and no
    /// further expansion is performed.
    pub fn stop(&mut self) {
        if self.state != TraversalState::Exhausted {
            debug!(meta = ?self.metadata, "traversal stopped");
            self.state = TraversalState::Stopped;
        }
    }

    pub(crate) fn note_path_returned(&mut self) {
        self.metadata.paths_returned += 1;
    }

    /// Pull the next goal-matching branch in best-first order.
    ///
    /// Performs pop/test/expand cycles until a branch ending at the goal is
    /// popped, the frontier empties (`None`), or an evaluator/graph error
    /// aborts the session.
    pub fn next_branch(&mut self) -> Option<Result<BranchId>> {
        loop {
            match self.state {
                TraversalState::Exhausted | TraversalState::Stopped => return None,
                TraversalState::Ready | TraversalState::Expanding => {}
            }

            let Some(id) = self.frontier.pop() else {
                debug!(meta = ?self.metadata, "frontier exhausted");
                self.state = TraversalState::Exhausted;
                return None;
            };
            self.state = TraversalState::Expanding;

            let is_goal = self.arena.get(id).end_node == self.goal.id;
            if self.expand_goal_branches || !is_goal {
                if let Err(e) = self.expand(id) {
                    self.state = TraversalState::Stopped;
                    return Some(Err(e));
                }
            }

            if is_goal {
                trace!(branch = %id, priority = %self.arena.get(id).priority, "goal match");
                return Some(Ok(id));
            }
        }
    }

    /// Push every admissible neighbor of `id` as a new branch:
    /// child.g = parent.g + edge cost, child.h recomputed fresh.
    fn expand(&mut self, id: BranchId) -> Result<()> {
        let (source, g, depth) = {
            let b = self.arena.get(id);
            (b.end_node, b.priority.g, b.depth)
        };

        let rels = self.graph.relationships(source, self.direction)?;
        self.metadata.branches_expanded += 1;

        for rel in rels {
            self.metadata.relationships_traversed += 1;

            let Some(next) = rel.other_node(source) else { continue };
            if !self.policy.admits(&self.arena, id, next, &rel) {
                continue;
            }

            let edge_cost =
                validate_cost(self.cost.cost(&rel, rel.direction_from(source))?, &rel)?;
            let next_node = self
                .graph
                .node(next)?
                .ok_or_else(|| Error::NotFound(format!("node {next}, endpoint of {}", rel.id)))?;
            let h = validate_estimate(self.estimate.estimate(&next_node, &self.goal)?, &next_node)?;

            let priority = PositionData { g: g + edge_cost, h };
            trace!(parent = %id, node = %next, priority = %priority, "branch pushed");

            let child = self.arena.push(Branch {
                end_node: next,
                parent: Some(id),
                incoming: Some(rel),
                depth: depth + 1,
                priority,
            });
            self.frontier.push(child, priority.f());
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::{ConstantCost, ZeroEstimate};
    use crate::graph::MemoryGraph;
    use crate::model::PropertyMap;
    use crate::traversal::Uniqueness;

    fn node(g: &MemoryGraph) -> NodeId {
        g.create_node(&[], PropertyMap::new())
    }

    fn edge(g: &MemoryGraph, src: NodeId, dst: NodeId) {
        g.create_relationship(src, dst, "T", PropertyMap::new()).unwrap();
    }

    #[test]
    fn test_missing_start_node_fails() {
        let g = MemoryGraph::new();
        let a = node(&g);
        let err = Traverser::new(&g, &ConstantCost(1.0), &ZeroEstimate, NodeId(99), a);
        assert!(matches!(err, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_start_equals_goal_yields_root() {
        let g = MemoryGraph::new();
        let a = node(&g);

        let mut t = Traverser::new(&g, &ConstantCost(1.0), &ZeroEstimate, a, a).unwrap();
        assert_eq!(t.state(), TraversalState::Ready);

        let id = t.next_branch().unwrap().unwrap();
        let root = t.arena().get(id);
        assert!(root.is_root());
        assert_eq!(root.priority.g, 0.0);

        assert!(t.next_branch().is_none());
        assert_eq!(t.state(), TraversalState::Exhausted);
    }

    #[test]
    fn test_branches_in_best_first_order() {
        // a -1-> b -1-> d, a -1-> c -1-> d : two goal matches, g 2.0 each,
        // then (no uniqueness) nothing else since d has no out-edges.
        let g = MemoryGraph::new();
        let (a, b, c, d) = (node(&g), node(&g), node(&g), node(&g));
        edge(&g, a, b);
        edge(&g, a, c);
        edge(&g, b, d);
        edge(&g, c, d);

        let mut t = Traverser::new(&g, &ConstantCost(1.0), &ZeroEstimate, a, d).unwrap();
        let first = t.next_branch().unwrap().unwrap();
        let g1 = t.arena().get(first).priority.g;
        let second = t.next_branch().unwrap().unwrap();
        let g2 = t.arena().get(second).priority.g;
        assert_eq!((g1, g2), (2.0, 2.0));
        assert!(t.next_branch().is_none());
    }

    #[test]
    fn test_goal_matches_in_non_decreasing_g() {
        // Two routes to e: two hops via b, three hops via c then d.
        let g = MemoryGraph::new();
        let (a, b, c, d, e) = (node(&g), node(&g), node(&g), node(&g), node(&g));
        edge(&g, a, b);
        edge(&g, b, e);
        edge(&g, a, c);
        edge(&g, c, d);
        edge(&g, d, e);

        let mut t = Traverser::new(&g, &ConstantCost(1.0), &ZeroEstimate, a, e).unwrap();
        let mut weights = Vec::new();
        while let Some(id) = t.next_branch() {
            weights.push(t.arena().get(id.unwrap()).priority.g);
        }
        assert_eq!(weights, vec![2.0, 3.0]);
    }

    #[test]
    fn test_stop_halts_expansion() {
        let g = MemoryGraph::new();
        let (a, b) = (node(&g), node(&g));
        edge(&g, a, b);

        let mut t = Traverser::new(&g, &ConstantCost(1.0), &ZeroEstimate, a, b).unwrap();
        t.next_branch().unwrap().unwrap();
        let expanded = t.metadata().branches_expanded;

        t.stop();
        assert!(t.next_branch().is_none());
        assert_eq!(t.state(), TraversalState::Stopped);
        assert_eq!(t.metadata().branches_expanded, expanded);
    }

    #[test]
    fn test_negative_cost_fails_fast() {
        let g = MemoryGraph::new();
        let (a, b) = (node(&g), node(&g));
        edge(&g, a, b);

        let cost = ConstantCost(-1.0);
        let mut t = Traverser::new(&g, &cost, &ZeroEstimate, a, b).unwrap();
        let err = t.next_branch().unwrap().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        // Session aborted; further pulls yield nothing.
        assert!(t.next_branch().is_none());
    }

    #[test]
    fn test_goal_branch_leaf_mode() {
        // a -> b -> c, goal b: with expansion off, c is never reached.
        let g = MemoryGraph::new();
        let (a, b, c) = (node(&g), node(&g), node(&g));
        edge(&g, a, b);
        edge(&g, b, c);

        let mut t = Traverser::new(&g, &ConstantCost(1.0), &ZeroEstimate, a, b)
            .unwrap()
            .with_expand_goal_branches(false);
        t.next_branch().unwrap().unwrap();
        assert!(t.next_branch().is_none());
        // Only the root was expanded.
        assert_eq!(t.metadata().branches_expanded, 1);
    }

    #[test]
    fn test_node_global_uniqueness_prunes_revisit() {
        // Diamond again, but node-global: d admitted once, so one match.
        let g = MemoryGraph::new();
        let (a, b, c, d) = (node(&g), node(&g), node(&g), node(&g));
        edge(&g, a, b);
        edge(&g, a, c);
        edge(&g, b, d);
        edge(&g, c, d);

        let mut t = Traverser::new(&g, &ConstantCost(1.0), &ZeroEstimate, a, d)
            .unwrap()
            .with_policy(Uniqueness::NodeGlobal.policy());
        assert!(t.next_branch().unwrap().is_ok());
        assert!(t.next_branch().is_none());
    }

    #[test]
    fn test_incoming_direction() {
        let g = MemoryGraph::new();
        let (a, b) = (node(&g), node(&g));
        edge(&g, b, a); // edge points b -> a; we search a ~> b upstream

        let mut t = Traverser::new(&g, &ConstantCost(1.0), &ZeroEstimate, a, b)
            .unwrap()
            .with_direction(Direction::Incoming);
        let id = t.next_branch().unwrap().unwrap();
        assert_eq!(t.arena().get(id).end_node, b);
    }
}
