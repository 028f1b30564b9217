//! A* path finder facade.
//!
//! [`AStar`] wires the three injectable strategies (cost, estimate,
//! uniqueness) to the best-first traverser and exposes the two public
//! operations: [`AStar::find_all_paths`] and [`AStar::find_single_path`].
//!
//! Every call to `find_all_paths` starts an independent session and hands
//! back a [`WeightedPaths`] stream that owns it — the facade keeps no
//! per-search state, so one facade can serve any number of overlapping
//! searches. Session statistics live on the stream
//! ([`WeightedPaths::metadata`]), not on the facade.

use serde::{Deserialize, Serialize};

use crate::evaluators::{CostEvaluator, EstimateEvaluator};
use crate::graph::GraphView;
use crate::model::{Direction, Node, NodeId, Path};
use crate::traversal::{BranchId, TraversalMetadata, Traverser, Uniqueness};
use crate::{Error, Result};

// ============================================================================
// WeightedPath
// ============================================================================

/// A concrete start-to-goal path with its total cost.
///
/// The weight equals the sum of cost-evaluator results over the path's
/// relationships, and equals the terminal branch's accumulated g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPath {
    pub path: Path,
    pub weight: f64,
}

impl WeightedPath {
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn start(&self) -> &Node {
        self.path.start()
    }

    pub fn end(&self) -> &Node {
        self.path.end()
    }
}

// ============================================================================
// AStar facade
// ============================================================================

/// Best-first weighted path finder.
///
/// The heuristic is taken on faith: if it overestimates the true remaining
/// cost the search still terminates and returns paths, but the first path
/// is no longer guaranteed minimal. See the evaluators module.
pub struct AStar<'g, G: GraphView> {
    graph: &'g G,
    cost: Box<dyn CostEvaluator>,
    estimate: Box<dyn EstimateEvaluator>,
    uniqueness: Uniqueness,
    direction: Direction,
    expand_goal_branches: bool,
}

impl<'g, G: GraphView> AStar<'g, G> {
    /// A* with the given cost and estimate, no uniqueness constraint, and
    /// outgoing expansion — the classic configuration.
    pub fn new(
        graph: &'g G,
        cost: impl CostEvaluator + 'static,
        estimate: impl EstimateEvaluator + 'static,
    ) -> Self {
        Self {
            graph,
            cost: Box::new(cost),
            estimate: Box::new(estimate),
            uniqueness: Uniqueness::None,
            direction: Direction::Outgoing,
            expand_goal_branches: true,
        }
    }

    /// Revisitation policy applied to every search from this facade.
    pub fn uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    /// Which relationships to follow out of each branch end.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Whether branches reaching the goal keep expanding (default `true`,
    /// so multiple co-minimal paths can surface).
    pub fn expand_goal_branches(mut self, expand: bool) -> Self {
        self.expand_goal_branches = expand;
        self
    }

    /// Lazily produce every minimal-weight path from `start` to `end`.
    ///
    /// The stream yields paths in non-decreasing weight and ends as soon as
    /// a strictly heavier path than the first one appears; unreachable
    /// goals yield an empty stream, not an error. Each call runs an
    /// independent single-use session.
    pub fn find_all_paths(&self, start: NodeId, end: NodeId) -> Result<WeightedPaths<'_, G>> {
        let traverser = Traverser::new(
            self.graph,
            self.cost.as_ref(),
            self.estimate.as_ref(),
            start,
            end,
        )?
        .with_policy(self.uniqueness.policy())
        .with_direction(self.direction)
        .with_expand_goal_branches(self.expand_goal_branches);

        Ok(WeightedPaths {
            graph: self.graph,
            traverser,
            found_weight: None,
            done: false,
        })
    }

    /// The first (minimal-weight, given an admissible estimate) path, or
    /// `None` when the goal is unreachable. Stops pulling — and therefore
    /// expanding — after one result.
    pub fn find_single_path(&self, start: NodeId, end: NodeId) -> Result<Option<WeightedPath>> {
        self.find_all_paths(start, end)?.next().transpose()
    }
}

// ============================================================================
// WeightedPaths — the weight-bounded result stream
// ============================================================================

/// Lazy stream of [`WeightedPath`] values for one search session.
///
/// Wraps the traverser's goal-matching branches, reconstructs each path by
/// walking its ancestry chain, and applies the weight bound: once a match
/// weighs strictly more than the first one, the session is over. That bound
/// is also what makes [`Uniqueness::None`] searches terminate on cyclic
/// graphs with positive costs.
pub struct WeightedPaths<'s, G: GraphView> {
    graph: &'s G,
    traverser: Traverser<'s, G>,
    found_weight: Option<f64>,
    done: bool,
}

impl<'s, G: GraphView> WeightedPaths<'s, G> {
    /// Statistics for this session so far.
    pub fn metadata(&self) -> TraversalMetadata {
        self.traverser.metadata()
    }

    /// Rebuild the concrete path for a terminal branch: walk the ancestry
    /// chain end-to-start, reverse, materialize the nodes.
    fn build_path(&self, id: BranchId) -> Result<WeightedPath> {
        let arena = self.traverser.arena();

        let mut node_ids = Vec::new();
        let mut relationships = Vec::new();
        for branch in arena.ancestry(id) {
            node_ids.push(branch.end_node);
            if let Some(rel) = &branch.incoming {
                relationships.push(rel.clone());
            }
        }
        node_ids.reverse();
        relationships.reverse();

        let mut nodes = Vec::with_capacity(node_ids.len());
        for nid in node_ids {
            let node = self
                .graph
                .node(nid)?
                .ok_or_else(|| Error::NotFound(format!("node {nid} while rebuilding path")))?;
            nodes.push(node);
        }

        Ok(WeightedPath {
            path: Path { nodes, relationships },
            weight: arena.get(id).priority.g,
        })
    }
}

impl<'s, G: GraphView> Iterator for WeightedPaths<'s, G> {
    type Item = Result<WeightedPath>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let id = match self.traverser.next_branch() {
            None => {
                self.done = true;
                return None;
            }
            Some(Err(e)) => {
                self.done = true;
                return Some(Err(e));
            }
            Some(Ok(id)) => id,
        };

        let weight = self.traverser.arena().get(id).priority.g;
        match self.found_weight {
            Some(found) if weight > found => {
                // Past the minimum: everything from here on is heavier.
                self.traverser.stop();
                self.done = true;
                return None;
            }
            Some(_) => {}
            None => self.found_weight = Some(weight),
        }

        match self.build_path(id) {
            Ok(path) => {
                self.traverser.note_path_returned();
                Some(Ok(path))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::{ConstantCost, PropertyCost, ZeroEstimate};
    use crate::graph::MemoryGraph;
    use crate::model::PropertyMap;

    fn node(g: &MemoryGraph) -> NodeId {
        g.create_node(&[], PropertyMap::new())
    }

    fn edge(g: &MemoryGraph, src: NodeId, dst: NodeId, length: i64) {
        let mut props = PropertyMap::new();
        props.insert("length".into(), length.into());
        g.create_relationship(src, dst, "ROAD", props).unwrap();
    }

    #[test]
    fn test_single_path_weight_and_shape() {
        let g = MemoryGraph::new();
        let (a, b, c) = (node(&g), node(&g), node(&g));
        edge(&g, a, b, 2);
        edge(&g, b, c, 3);

        let finder = AStar::new(&g, PropertyCost::new("length"), ZeroEstimate);
        let path = finder.find_single_path(a, c).unwrap().unwrap();

        assert_eq!(path.weight, 5.0);
        assert_eq!(path.len(), 2);
        assert_eq!(path.start().id, a);
        assert_eq!(path.end().id, c);
        // Weight equals the sum of per-relationship costs.
        let sum: f64 = path
            .path
            .relationships
            .iter()
            .map(|r| r.properties["length"].as_float().unwrap())
            .sum();
        assert_eq!(path.weight, sum);
    }

    #[test]
    fn test_unreachable_goal_is_empty_not_error() {
        let g = MemoryGraph::new();
        let (a, b) = (node(&g), node(&g));

        let finder = AStar::new(&g, ConstantCost(1.0), ZeroEstimate);
        assert!(finder.find_single_path(a, b).unwrap().is_none());

        let mut all = finder.find_all_paths(a, b).unwrap();
        assert!(all.next().is_none());
    }

    #[test]
    fn test_weight_bound_cuts_heavier_paths() {
        // Two routes a->d: weight 2 (via b) and weight 5 (via c).
        let g = MemoryGraph::new();
        let (a, b, c, d) = (node(&g), node(&g), node(&g), node(&g));
        edge(&g, a, b, 1);
        edge(&g, b, d, 1);
        edge(&g, a, c, 4);
        edge(&g, c, d, 1);

        let finder = AStar::new(&g, PropertyCost::new("length"), ZeroEstimate);
        let paths: Vec<WeightedPath> = finder
            .find_all_paths(a, d)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].weight, 2.0);
    }

    #[test]
    fn test_facade_serves_overlapping_sessions() {
        let g = MemoryGraph::new();
        let (a, b) = (node(&g), node(&g));
        edge(&g, a, b, 1);

        let finder = AStar::new(&g, PropertyCost::new("length"), ZeroEstimate);
        let mut first = finder.find_all_paths(a, b).unwrap();
        let mut second = finder.find_all_paths(a, b).unwrap();

        // Both in-flight streams produce independently.
        assert_eq!(first.next().unwrap().unwrap().weight, 1.0);
        assert_eq!(second.next().unwrap().unwrap().weight, 1.0);
    }

    #[test]
    fn test_metadata_counts() {
        let g = MemoryGraph::new();
        let (a, b, c) = (node(&g), node(&g), node(&g));
        edge(&g, a, b, 1);
        edge(&g, b, c, 1);

        let finder = AStar::new(&g, PropertyCost::new("length"), ZeroEstimate);
        let mut paths = finder.find_all_paths(a, c).unwrap();
        assert_eq!(paths.metadata(), TraversalMetadata::default());

        paths.next().unwrap().unwrap();
        let meta = paths.metadata();
        assert_eq!(meta.paths_returned, 1);
        assert_eq!(meta.relationships_traversed, 2);
        assert!(meta.branches_expanded >= 2);
    }

    #[test]
    fn test_start_equals_goal() {
        let g = MemoryGraph::new();
        let a = node(&g);

        let finder = AStar::new(&g, ConstantCost(1.0), ZeroEstimate);
        let path = finder.find_single_path(a, a).unwrap().unwrap();
        assert_eq!(path.weight, 0.0);
        assert_eq!(path.len(), 0);
        assert_eq!(path.start().id, a);
    }
}
