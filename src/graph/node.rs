//! Node representation of an imported domain object

use super::property::{PropertyMap, PropertyValue};
use super::types::{DbId, Label};
use serde::{Deserialize, Serialize};

/// A node destined for the target store.
///
/// The key is the source primary key and doubles as the uniqueness
/// constraint in the store: writing the same key twice must never produce a
/// second node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Source identifier, unique across the whole import
    pub key: DbId,

    /// Node label derived from the domain class
    pub label: Label,

    /// Scalar attributes copied from the source record
    pub properties: PropertyMap,
}

impl GraphNode {
    /// Create a new node with no properties
    pub fn new(key: DbId, label: impl Into<Label>) -> Self {
        GraphNode {
            key,
            label: label.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Create a new node with properties
    pub fn new_with_properties(
        key: DbId,
        label: impl Into<Label>,
        properties: PropertyMap,
    ) -> Self {
        GraphNode {
            key,
            label: label.into(),
            properties,
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl PartialEq for GraphNode {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for GraphNode {}

impl std::hash::Hash for GraphNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}
