//! # Property Graph Model
//!
//! Clean DTOs for the property graph the path finder walks.
//! These types cross every boundary: graph view ↔ traversal ↔ caller.
//!
//! Design rule: this module is pure data — no I/O, no state, no locks.

pub mod node;
pub mod relationship;
pub mod path;
pub mod value;
pub mod property_map;

pub use node::{Node, NodeId};
pub use relationship::{Relationship, RelId, Direction};
pub use path::Path;
pub use value::Value;
pub use property_map::PropertyMap;
