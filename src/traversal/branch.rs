//! Branch arena — partial path candidates and their priorities.

use serde::{Deserialize, Serialize};

use crate::model::{NodeId, Relationship};

/// Priority of one branch: accumulated cost plus fresh heuristic estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionData {
    /// Way length so far — the sum of edge costs from the start node.
    pub g: f64,
    /// Heuristic estimate of remaining cost to the goal, recomputed at
    /// every extension rather than inherited. Fixing h = 0 turns the
    /// search into plain Dijkstra.
    pub h: f64,
}

impl PositionData {
    pub fn f(&self) -> f64 {
        self.g + self.h
    }
}

impl std::fmt::Display for PositionData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g:{} h:{}", self.g, self.h)
    }
}

/// Handle into a [`BranchArena`]. Only the arena that issued it can
/// resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchId(pub(crate) u32);

impl std::fmt::Display for BranchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One partial path from the search's start node to `end_node`.
///
/// Immutable once pushed. The parent handle plus the incoming relationship
/// are sufficient to reconstruct the whole path without storing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub end_node: NodeId,
    /// `None` for the root branch only.
    pub parent: Option<BranchId>,
    /// The relationship that extended the parent into this branch.
    /// `None` for the root branch only.
    pub incoming: Option<Relationship>,
    /// Path length in relationships. Root is 0.
    pub depth: u32,
    pub priority: PositionData,
}

impl Branch {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Append-only store of branches, indexed by [`BranchId`].
///
/// Parent back-references become integer handles here, sidestepping the
/// shared-ownership problem a linked parent pointer would pose.
#[derive(Debug, Default)]
pub struct BranchArena {
    branches: Vec<Branch>,
}

impl BranchArena {
    pub fn new() -> Self {
        Self { branches: Vec::new() }
    }

    pub fn push(&mut self, branch: Branch) -> BranchId {
        let id = BranchId(self.branches.len() as u32);
        self.branches.push(branch);
        id
    }

    /// Resolve a handle. Handles are only minted by `push`, so a handle
    /// from this arena always resolves.
    pub fn get(&self, id: BranchId) -> &Branch {
        &self.branches[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Walk from `id` up to the root, yielding each branch on the way.
    pub fn ancestry(&self, id: BranchId) -> Ancestry<'_> {
        Ancestry { arena: self, next: Some(id) }
    }
}

/// Iterator over a branch's ancestry chain, leaf to root.
pub struct Ancestry<'a> {
    arena: &'a BranchArena,
    next: Option<BranchId>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a Branch;

    fn next(&mut self) -> Option<Self::Item> {
        let branch = self.arena.get(self.next?);
        self.next = branch.parent;
        Some(branch)
    }
}
