//! Core identifier types for the imported graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a domain object in the relational source.
///
/// The source primary key is carried verbatim into the target store as the
/// node uniqueness key, so the same source record always maps to the same
/// graph node no matter how many reference paths lead to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct DbId(pub i64);

impl DbId {
    pub fn new(id: i64) -> Self {
        DbId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for DbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DbId({})", self.0)
    }
}

impl From<i64> for DbId {
    fn from(id: i64) -> Self {
        DbId(id)
    }
}

/// Node label (e.g., "Pathway", "Reaction")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Label(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

/// Relationship type (e.g., "HAS_EVENT", "INPUT")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RelType(String);

impl RelType {
    pub fn new(rel_type: impl Into<String>) -> Self {
        RelType(rel_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RelType {
    fn from(s: String) -> Self {
        RelType(s)
    }
}

impl From<&str> for RelType {
    fn from(s: &str) -> Self {
        RelType(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_id() {
        let id = DbId::new(48887);
        assert_eq!(id.as_i64(), 48887);
        assert_eq!(format!("{}", id), "DbId(48887)");

        let id2: DbId = 100.into();
        assert_eq!(id2.as_i64(), 100);
    }

    #[test]
    fn test_label() {
        let label = Label::new("Pathway");
        assert_eq!(label.as_str(), "Pathway");
        assert_eq!(format!("{}", label), "Pathway");

        let label2: Label = "Reaction".into();
        assert_eq!(label2.as_str(), "Reaction");
    }

    #[test]
    fn test_rel_type() {
        let rel_type = RelType::new("HAS_EVENT");
        assert_eq!(rel_type.as_str(), "HAS_EVENT");
        assert_eq!(format!("{}", rel_type), "HAS_EVENT");
    }

    #[test]
    fn test_id_ordering() {
        let id1 = DbId::new(1);
        let id2 = DbId::new(2);
        assert!(id1 < id2);
    }
}
