//! Revisitation policies.
//!
//! A [`UniquenessPolicy`] decides whether a candidate node/relationship may
//! extend a branch, given that branch's ancestry. Scope differs per policy:
//! the `*Path` variants constrain only one branch's own ancestry chain
//! (different branches may legally revisit each other's nodes), while the
//! `*Global` variants constrain the whole session.
//!
//! With [`NoUniqueness`] cycles are admitted. Termination then relies on
//! the weight bound applied by the result stream: with strictly positive
//! edge costs every cycle raises g, so looping branches are eventually
//! dominated and the stream cuts off. A zero-cost cycle combined with a
//! misbehaving heuristic can loop indefinitely — an open risk the engine
//! does not guard against.

use hashbrown::HashSet;

use crate::model::{NodeId, RelId, Relationship};
use super::{BranchArena, BranchId};

/// Decides whether a branch may be extended to a candidate node via a
/// candidate relationship. Stateful policies mutate on admission, so a
/// policy instance belongs to exactly one search session.
pub trait UniquenessPolicy {
    /// `source` is the branch being expanded; the candidate child branch
    /// does not exist yet.
    fn admits(
        &mut self,
        arena: &BranchArena,
        source: BranchId,
        node: NodeId,
        rel: &Relationship,
    ) -> bool;

    /// Called once with the root branch before any expansion, so
    /// session-scoped policies can count the start node as visited.
    fn visit_root(&mut self, arena: &BranchArena, root: BranchId) {
        let _ = (arena, root);
    }
}

// ============================================================================
// Provided policies
// ============================================================================

/// Always admits. Nodes and relationships may repeat arbitrarily.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUniqueness;

impl UniquenessPolicy for NoUniqueness {
    fn admits(&mut self, _: &BranchArena, _: BranchId, _: NodeId, _: &Relationship) -> bool {
        true
    }
}

/// Admits a node only if it appears nowhere in the source branch's
/// ancestry chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodePathUniqueness;

impl UniquenessPolicy for NodePathUniqueness {
    fn admits(
        &mut self,
        arena: &BranchArena,
        source: BranchId,
        node: NodeId,
        _rel: &Relationship,
    ) -> bool {
        arena.ancestry(source).all(|b| b.end_node != node)
    }
}

/// Admits a relationship only if it appears nowhere in the source branch's
/// ancestry chain. Nodes may repeat.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipPathUniqueness;

impl UniquenessPolicy for RelationshipPathUniqueness {
    fn admits(
        &mut self,
        arena: &BranchArena,
        source: BranchId,
        _node: NodeId,
        rel: &Relationship,
    ) -> bool {
        arena
            .ancestry(source)
            .all(|b| b.incoming.as_ref().map(|r| r.id) != Some(rel.id))
    }
}

/// Admits a node only on its first visit anywhere in the session.
#[derive(Debug, Clone, Default)]
pub struct NodeGlobalUniqueness {
    seen: HashSet<NodeId>,
}

impl UniquenessPolicy for NodeGlobalUniqueness {
    fn admits(&mut self, _: &BranchArena, _: BranchId, node: NodeId, _: &Relationship) -> bool {
        self.seen.insert(node)
    }

    fn visit_root(&mut self, arena: &BranchArena, root: BranchId) {
        self.seen.insert(arena.get(root).end_node);
    }
}

/// Admits a relationship only on its first traversal anywhere in the
/// session.
#[derive(Debug, Clone, Default)]
pub struct RelationshipGlobalUniqueness {
    seen: HashSet<RelId>,
}

impl UniquenessPolicy for RelationshipGlobalUniqueness {
    fn admits(&mut self, _: &BranchArena, _: BranchId, _: NodeId, rel: &Relationship) -> bool {
        self.seen.insert(rel.id)
    }
}

// ============================================================================
// Configuration enum
// ============================================================================

/// Named constructors for the provided policies. Custom policies implement
/// [`UniquenessPolicy`] and inject via `Traverser::with_policy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Uniqueness {
    /// The classic choice for weighted search: revisits allowed, the
    /// weight bound handles termination.
    #[default]
    None,
    NodeGlobal,
    RelationshipGlobal,
    NodePath,
    RelationshipPath,
}

impl Uniqueness {
    /// Build a fresh policy instance for one search session.
    pub fn policy(&self) -> Box<dyn UniquenessPolicy> {
        match self {
            Uniqueness::None => Box::new(NoUniqueness),
            Uniqueness::NodeGlobal => Box::new(NodeGlobalUniqueness::default()),
            Uniqueness::RelationshipGlobal => Box::new(RelationshipGlobalUniqueness::default()),
            Uniqueness::NodePath => Box::new(NodePathUniqueness),
            Uniqueness::RelationshipPath => Box::new(RelationshipPathUniqueness),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::{Branch, PositionData};

    fn rel(id: u64, src: u64, dst: u64) -> Relationship {
        Relationship::new(RelId(id), NodeId(src), NodeId(dst), "T")
    }

    /// root(n1) -[r10]-> n2, plus a sibling branch root -[r12]-> n4.
    fn arena() -> (BranchArena, BranchId, BranchId) {
        let mut arena = BranchArena::new();
        let root = arena.push(Branch {
            end_node: NodeId(1),
            parent: None,
            incoming: None,
            depth: 0,
            priority: PositionData { g: 0.0, h: 0.0 },
        });
        let b = arena.push(Branch {
            end_node: NodeId(2),
            parent: Some(root),
            incoming: Some(rel(10, 1, 2)),
            depth: 1,
            priority: PositionData { g: 1.0, h: 0.0 },
        });
        let sibling = arena.push(Branch {
            end_node: NodeId(4),
            parent: Some(root),
            incoming: Some(rel(12, 1, 4)),
            depth: 1,
            priority: PositionData { g: 1.0, h: 0.0 },
        });
        (arena, b, sibling)
    }

    #[test]
    fn test_none_admits_cycles() {
        let (arena, b, _) = arena();
        let mut p = NoUniqueness;
        // Back to the root node over the same relationship: still admitted.
        assert!(p.admits(&arena, b, NodeId(1), &rel(10, 1, 2)));
    }

    #[test]
    fn test_node_path_rejects_ancestor_node() {
        let (arena, b, _) = arena();
        let mut p = NodePathUniqueness;
        assert!(!p.admits(&arena, b, NodeId(1), &rel(11, 2, 1)));
        assert!(!p.admits(&arena, b, NodeId(2), &rel(13, 2, 2)));
        assert!(p.admits(&arena, b, NodeId(3), &rel(11, 2, 3)));
    }

    #[test]
    fn test_node_path_scope_is_one_branch() {
        let (arena, b, sibling) = arena();
        let mut p = NodePathUniqueness;
        // n2 is on branch b's path but not on the sibling's.
        assert!(!p.admits(&arena, b, NodeId(2), &rel(14, 2, 2)));
        assert!(p.admits(&arena, sibling, NodeId(2), &rel(15, 4, 2)));
    }

    #[test]
    fn test_relationship_path_allows_node_revisit() {
        let (arena, b, _) = arena();
        let mut p = RelationshipPathUniqueness;
        // Returning to n1 over a *different* relationship is fine...
        assert!(p.admits(&arena, b, NodeId(1), &rel(11, 2, 1)));
        // ...but re-crossing r10 is not.
        assert!(!p.admits(&arena, b, NodeId(1), &rel(10, 1, 2)));
    }

    #[test]
    fn test_node_global_counts_root_and_session() {
        let (arena, b, sibling) = arena();
        let mut p = NodeGlobalUniqueness::default();
        p.visit_root(&arena, BranchId(0));

        // Root node already visited.
        assert!(!p.admits(&arena, b, NodeId(1), &rel(11, 2, 1)));
        // First visit to n5 admitted, second rejected even from another branch.
        assert!(p.admits(&arena, b, NodeId(5), &rel(16, 2, 5)));
        assert!(!p.admits(&arena, sibling, NodeId(5), &rel(17, 4, 5)));
    }

    #[test]
    fn test_relationship_global_session_scope() {
        let (arena, b, sibling) = arena();
        let mut p = RelationshipGlobalUniqueness::default();
        assert!(p.admits(&arena, b, NodeId(3), &rel(11, 2, 3)));
        assert!(!p.admits(&arena, sibling, NodeId(3), &rel(11, 2, 3)));
    }
}
