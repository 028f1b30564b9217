//! Cost and estimate evaluators — the two pluggable numeric strategies.
//!
//! A [`CostEvaluator`] prices one relationship crossing; an
//! [`EstimateEvaluator`] guesses the remaining cost from a node to the goal.
//! Both are single-method capability traits, injected at session
//! construction. Plain closures work directly:
//!
//! ```
//! use graphalgo::{CostEvaluator, Direction, Relationship};
//!
//! let hop_cost = |_rel: &Relationship, _dir: Direction| 1.0;
//! # fn assert_eval(_: impl CostEvaluator) {}
//! # assert_eval(hop_cost);
//! ```
//!
//! The engine validates every returned value: a negative or non-finite cost
//! or estimate is a configuration error and fails the pull that observed it.
//! Admissibility of the estimate is NOT checked — an overestimating
//! heuristic still terminates, but the first path found is no longer
//! guaranteed minimal.

use crate::model::{Direction, Node, Relationship};
use crate::{Error, Result};

// ============================================================================
// Traits
// ============================================================================

/// Prices a single relationship crossing in a given direction.
///
/// Costs must be finite and non-negative; negative costs break best-first
/// ordering and are rejected by the engine at evaluation time.
/// No side effects expected.
pub trait CostEvaluator {
    fn cost(&self, rel: &Relationship, direction: Direction) -> Result<f64>;
}

impl<F> CostEvaluator for F
where
    F: Fn(&Relationship, Direction) -> f64,
{
    fn cost(&self, rel: &Relationship, direction: Direction) -> Result<f64> {
        Ok(self(rel, direction))
    }
}

/// Estimates the remaining cost from `node` to `goal`.
///
/// A well-formed estimate is finite, non-negative, and zero at the goal
/// itself. The engine enforces the first two; the third is the caller's
/// responsibility (see module docs on admissibility).
pub trait EstimateEvaluator {
    fn estimate(&self, node: &Node, goal: &Node) -> Result<f64>;
}

impl<F> EstimateEvaluator for F
where
    F: Fn(&Node, &Node) -> f64,
{
    fn estimate(&self, node: &Node, goal: &Node) -> Result<f64> {
        Ok(self(node, goal))
    }
}

// ============================================================================
// Common cost evaluators
// ============================================================================

/// Every relationship costs the same fixed amount.
#[derive(Debug, Clone, Copy)]
pub struct ConstantCost(pub f64);

impl CostEvaluator for ConstantCost {
    fn cost(&self, _rel: &Relationship, _direction: Direction) -> Result<f64> {
        Ok(self.0)
    }
}

/// Reads the cost from a numeric relationship property.
///
/// A missing or non-numeric property is a configuration error unless a
/// default was supplied with [`PropertyCost::with_default`].
#[derive(Debug, Clone)]
pub struct PropertyCost {
    key: String,
    default: Option<f64>,
}

impl PropertyCost {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), default: None }
    }

    pub fn with_default(key: impl Into<String>, default: f64) -> Self {
        Self { key: key.into(), default: Some(default) }
    }
}

impl CostEvaluator for PropertyCost {
    fn cost(&self, rel: &Relationship, _direction: Direction) -> Result<f64> {
        match rel.properties.get(&self.key) {
            Some(value) => value.as_float().ok_or_else(|| {
                Error::Configuration(format!(
                    "cost property '{}' on relationship {} is {}, not numeric",
                    self.key,
                    rel.id,
                    value.type_name(),
                ))
            }),
            None => self.default.ok_or_else(|| {
                Error::Configuration(format!(
                    "relationship {} has no cost property '{}'",
                    rel.id, self.key,
                ))
            }),
        }
    }
}

// ============================================================================
// Common estimate evaluators
// ============================================================================

/// h = 0 everywhere. Degrades A* to uniform-cost search (Dijkstra).
#[derive(Debug, Clone, Copy)]
pub struct ZeroEstimate;

impl EstimateEvaluator for ZeroEstimate {
    fn estimate(&self, _node: &Node, _goal: &Node) -> Result<f64> {
        Ok(0.0)
    }
}

/// Straight-line distance between node coordinates stored as properties.
///
/// Admissible whenever edge costs are at least the geometric distance
/// between their endpoints.
#[derive(Debug, Clone)]
pub struct EuclideanEstimate {
    x_key: String,
    y_key: String,
}

impl EuclideanEstimate {
    pub fn new(x_key: impl Into<String>, y_key: impl Into<String>) -> Self {
        Self { x_key: x_key.into(), y_key: y_key.into() }
    }

    fn coordinate(&self, node: &Node, key: &str) -> Result<f64> {
        node.get(key)
            .and_then(|v| v.as_float())
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "node {} has no numeric coordinate property '{key}'",
                    node.id,
                ))
            })
    }
}

impl EstimateEvaluator for EuclideanEstimate {
    fn estimate(&self, node: &Node, goal: &Node) -> Result<f64> {
        let dx = self.coordinate(node, &self.x_key)? - self.coordinate(goal, &self.x_key)?;
        let dy = self.coordinate(node, &self.y_key)? - self.coordinate(goal, &self.y_key)?;
        Ok((dx * dx + dy * dy).sqrt())
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Reject negative or non-finite costs before they corrupt the ordering.
pub(crate) fn validate_cost(value: f64, rel: &Relationship) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Configuration(format!(
            "cost evaluator returned {value} for relationship {}; costs must be finite and >= 0",
            rel.id,
        )));
    }
    Ok(value)
}

/// Reject negative or non-finite estimates.
pub(crate) fn validate_estimate(value: f64, node: &Node) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Configuration(format!(
            "estimate evaluator returned {value} for node {}; estimates must be finite and >= 0",
            node.id,
        )));
    }
    Ok(value)
}

// ============================================================================
// Tests
// ============================================================================
