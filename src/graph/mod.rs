//! # Graph View
//!
//! The read seam between the traversal engine and whatever supplies the
//! graph. The engine only ever needs two operations: materialize a node and
//! list the relationships touching it. Storage layout, caching, and
//! transactions are the implementor's concern, not this crate's.
//!
//! Access is synchronous: the best-first engine is a single-threaded,
//! pull-driven state machine, and a pull performs graph reads inline.

pub mod memory;

pub use memory::MemoryGraph;

use crate::model::{Direction, Node, NodeId, Relationship};
use crate::Result;

/// Read-only access to an already-materialized graph.
///
/// Failures propagate to the pull that triggered them; the engine performs
/// no retries.
pub trait GraphView {
    /// Fetch a node by id. `Ok(None)` when the id is unknown.
    fn node(&self, id: NodeId) -> Result<Option<Node>>;

    /// Relationships touching `node`, filtered by direction relative to it:
    /// `Outgoing` returns those with `src == node`, `Incoming` those with
    /// `dst == node`, `Both` returns all.
    fn relationships(&self, node: NodeId, direction: Direction) -> Result<Vec<Relationship>>;
}
