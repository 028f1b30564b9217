//! # Best-First Traversal Engine
//!
//! The priority-driven expansion core. A [`Traverser`] pops the most
//! promising [`Branch`] from a [`BestFirstSelector`], tests it against the
//! goal, expands its admissible neighbors per the configured
//! [`UniquenessPolicy`], and pushes the children back — one pull at a time.
//!
//! Branches live in a [`BranchArena`] and reference their parents by
//! integer handle, so a full path is reconstructed in O(depth) without
//! duplicating node or relationship sequences.
//!
//! One traverser is one search session: the frontier and visited sets are
//! consumed destructively by iteration, so a session is single-use.

pub mod branch;
pub mod selector;
pub mod uniqueness;
pub mod traverser;

pub use branch::{Branch, BranchArena, BranchId, PositionData};
pub use selector::BestFirstSelector;
pub use uniqueness::{
    NoUniqueness, NodeGlobalUniqueness, NodePathUniqueness,
    RelationshipGlobalUniqueness, RelationshipPathUniqueness,
    Uniqueness, UniquenessPolicy,
};
pub use traverser::{TraversalMetadata, TraversalState, Traverser};
