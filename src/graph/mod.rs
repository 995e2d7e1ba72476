//! Property-graph value model for the import
//!
//! Nodes carry the source primary key as their uniqueness key; relationships
//! are typed, directed key pairs. Nothing here touches the target store —
//! these are the values the schema mapper produces and the writer consumes.

pub mod node;
pub mod property;
pub mod relationship;
pub mod types;

pub use node::GraphNode;
pub use property::{PropertyMap, PropertyValue};
pub use relationship::GraphRelationship;
pub use types::{DbId, Label, RelType};
