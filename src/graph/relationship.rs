//! Relationship representation between two imported nodes

use super::property::{PropertyMap, PropertyValue};
use super::types::{DbId, RelType};
use serde::{Deserialize, Serialize};

/// A directed, typed edge between two nodes, addressed by their source keys.
///
/// Relationships are recorded as key pairs rather than live references:
/// cyclic structures in the source (a pathway containing a reaction that
/// precedes an event of the same pathway) never require cyclic in-memory
/// pointers. Both endpoints must be written to the store before the
/// relationship is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphRelationship {
    /// Relationship type
    pub rel_type: RelType,

    /// Key of the node the relationship starts from
    pub from: DbId,

    /// Key of the node the relationship points to
    pub to: DbId,

    /// Edge attributes (ordering, stoichiometry, interaction score)
    pub properties: PropertyMap,
}

impl GraphRelationship {
    /// Create a new relationship with no properties
    pub fn new(from: DbId, to: DbId, rel_type: impl Into<RelType>) -> Self {
        GraphRelationship {
            rel_type: rel_type.into(),
            from,
            to,
            properties: PropertyMap::new(),
        }
    }

    /// Create a new relationship with properties
    pub fn new_with_properties(
        from: DbId,
        to: DbId,
        rel_type: impl Into<RelType>,
        properties: PropertyMap,
    ) -> Self {
        GraphRelationship {
            rel_type: rel_type.into(),
            from,
            to,
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

    /// The identity of a relationship: same endpoints and type means the
    /// same relationship, regardless of properties.
    pub fn key(&self) -> (DbId, RelType, DbId) {
        (self.from, self.rel_type.clone(), self.to)
    }
}

impl PartialEq for GraphRelationship {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.rel_type == other.rel_type
    }
}

impl Eq for GraphRelationship {}

impl std::hash::Hash for GraphRelationship {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.rel_type.hash(state);
        self.to.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_relationship() {
        let rel = GraphRelationship::new(DbId::new(1), DbId::new(2), "HAS_EVENT");
        assert_eq!(rel.from, DbId::new(1));
        assert_eq!(rel.to, DbId::new(2));
        assert_eq!(rel.rel_type.as_str(), "HAS_EVENT");
    }

    #[test]
    fn test_relationship_properties() {
        let mut rel = GraphRelationship::new(DbId::new(1), DbId::new(2), "INPUT");
        rel.set_property("stoichiometry", 2i64);
        rel.set_property("order", 0i64);

        assert_eq!(
            rel.get_property("stoichiometry").and_then(|v| v.as_integer()),
            Some(2)
        );
    }

    #[test]
    fn test_identity_ignores_properties() {
        let a = GraphRelationship::new(DbId::new(1), DbId::new(2), "OUTPUT");
        let mut b = GraphRelationship::new(DbId::new(1), DbId::new(2), "OUTPUT");
        b.set_property("order", 3i64);
        let c = GraphRelationship::new(DbId::new(2), DbId::new(1), "OUTPUT");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_same_endpoints_different_type() {
        let input = GraphRelationship::new(DbId::new(5), DbId::new(6), "INPUT");
        let output = GraphRelationship::new(DbId::new(5), DbId::new(6), "OUTPUT");
        assert_ne!(input, output);
    }
}
