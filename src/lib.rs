//! # graphalgo — Best-First Weighted Path Finding
//!
//! A lazy A* engine over property graphs: given a read-only [`GraphView`],
//! a [`CostEvaluator`] and an [`EstimateEvaluator`], it produces paths from
//! a start to a goal node in non-decreasing total weight — and does no more
//! work than the paths you actually consume.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `GraphView` is the contract between the engine and
//!    whatever supplies the graph; the three strategies are single-method
//!    capability traits injected at construction
//! 2. **Clean DTOs**: `Node`, `Relationship`, `Path` cross all boundaries
//! 3. **Lazy pull**: each pull performs exactly one pop/test/expand cycle's
//!    worth of work; nothing is precomputed
//! 4. **Sessions own their state**: every `find_all_paths` call returns an
//!    independent stream carrying its own metadata
//!
//! ## Quick Start
//!
//! ```rust
//! use graphalgo::{AStar, MemoryGraph, PropertyCost, PropertyMap, ZeroEstimate};
//!
//! # fn main() -> graphalgo::Result<()> {
//! let graph = MemoryGraph::new();
//! let a = graph.create_node(&["City"], PropertyMap::new());
//! let b = graph.create_node(&["City"], PropertyMap::new());
//! let mut props = PropertyMap::new();
//! props.insert("length".into(), 7.0.into());
//! graph.create_relationship(a, b, "ROAD", props)?;
//!
//! let finder = AStar::new(&graph, PropertyCost::new("length"), ZeroEstimate);
//! let path = finder.find_single_path(a, b)?.expect("b is reachable");
//! assert_eq!(path.weight, 7.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Caveats
//!
//! The engine never checks heuristic admissibility: an estimate that
//! overestimates the true remaining cost still terminates, but the first
//! path returned is then not guaranteed minimal. Costs and estimates must
//! be finite and non-negative; the engine fails fast on anything else.

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod graph;
pub mod evaluators;
pub mod traversal;
pub mod astar;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Node, Relationship, Path, Value, PropertyMap,
    NodeId, RelId, Direction,
};

// ============================================================================
// Re-exports: Graph view
// ============================================================================

pub use graph::{GraphView, MemoryGraph};

// ============================================================================
// Re-exports: Strategies
// ============================================================================

pub use evaluators::{
    CostEvaluator, EstimateEvaluator,
    ConstantCost, PropertyCost, ZeroEstimate, EuclideanEstimate,
};

pub use traversal::{
    Uniqueness, UniquenessPolicy,
    TraversalMetadata, TraversalState, Traverser,
};

// ============================================================================
// Re-exports: Path finder
// ============================================================================

pub use astar::{AStar, WeightedPath, WeightedPaths};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A strategy is misconfigured: negative or non-finite cost/estimate,
    /// or a cost property that is missing or non-numeric.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The graph view failed to serve a read.
    #[error("Graph access error: {0}")]
    Graph(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
