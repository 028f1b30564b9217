//! In-memory graph.
//!
//! This is the reference implementation of [`GraphView`]. It uses simple
//! HashMaps protected by RwLock.
//!
//! ## Limitations
//!
//! - **No deletion**: the path finder only reads; this graph only grows.
//! - **Single-writer only**: per-collection locks mean multi-step mutations
//!   are NOT atomic. Safe for single-threaded or read-heavy use only.
//!
//! Use this graph for:
//! - Testing cost/estimate evaluators and uniqueness policies
//! - Embedding graphalgo in applications that don't need persistence
//! - Validating correctness before wiring a real storage backend

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::model::*;
use crate::{Error, Result};
use super::GraphView;

/// In-memory property graph.
pub struct MemoryGraph {
    nodes: RwLock<HashMap<NodeId, Node>>,
    relationships: RwLock<HashMap<RelId, Relationship>>,
    /// node_id → relationship ids touching it, in insertion order
    adjacency: RwLock<HashMap<NodeId, SmallVec<[RelId; 4]>>>,
    next_node_id: AtomicU64,
    next_rel_id: AtomicU64,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            relationships: RwLock::new(HashMap::new()),
            adjacency: RwLock::new(HashMap::new()),
            next_node_id: AtomicU64::new(1),
            next_rel_id: AtomicU64::new(1),
        }
    }

    pub fn create_node(&self, labels: &[&str], props: PropertyMap) -> NodeId {
        let id = NodeId(self.next_node_id.fetch_add(1, Ordering::Relaxed));
        let node = Node {
            id,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties: props,
        };
        self.nodes.write().insert(id, node);
        self.adjacency.write().insert(id, SmallVec::new());
        id
    }

    pub fn create_relationship(
        &self,
        src: NodeId,
        dst: NodeId,
        rel_type: &str,
        props: PropertyMap,
    ) -> Result<RelId> {
        {
            let nodes = self.nodes.read();
            if !nodes.contains_key(&src) {
                return Err(Error::NotFound(format!("Source node {src}")));
            }
            if !nodes.contains_key(&dst) {
                return Err(Error::NotFound(format!("Target node {dst}")));
            }
        }

        let id = RelId(self.next_rel_id.fetch_add(1, Ordering::Relaxed));
        let rel = Relationship {
            id,
            src,
            dst,
            rel_type: rel_type.to_string(),
            properties: props,
        };

        self.relationships.write().insert(id, rel);

        let mut adj = self.adjacency.write();
        adj.entry(src).or_default().push(id);
        if src != dst {
            adj.entry(dst).or_default().push(id);
        }

        Ok(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.read().len()
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphView for MemoryGraph {
    fn node(&self, id: NodeId) -> Result<Option<Node>> {
        Ok(self.nodes.read().get(&id).cloned())
    }

    fn relationships(&self, node: NodeId, direction: Direction) -> Result<Vec<Relationship>> {
        let adj = self.adjacency.read();
        let rels = self.relationships.read();

        let rel_ids = adj.get(&node).cloned().unwrap_or_default();
        let mut result = Vec::new();

        for rid in rel_ids {
            if let Some(rel) = rels.get(&rid) {
                let matches_dir = match direction {
                    Direction::Outgoing => rel.src == node,
                    Direction::Incoming => rel.dst == node,
                    Direction::Both => true,
                };
                if matches_dir {
                    result.push(rel.clone());
                }
            }
        }

        Ok(result)
    }
}

// ============================================================================
// Tests
// ============================================================================
