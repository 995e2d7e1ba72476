//! Raw source rows and the domain objects built from them

use crate::graph::DbId;
use crate::schema::{self, DomainClass, PropertyField};
use std::fmt;

/// One row of the `objects` table, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRow {
    pub db_id: i64,
    pub class: String,
    pub display_name: Option<String>,
    pub stable_id: Option<String>,
    pub species: Option<String>,
    pub identifier: Option<String>,
    pub database_name: Option<String>,
}

/// One row of the `object_refs` table: a foreign key from `db_id`'s record,
/// through a named field, at a given rank, to `target_id`'s record.
#[derive(Debug, Clone, PartialEq)]
pub struct RefRow {
    pub db_id: i64,
    pub field: String,
    pub rank: i32,
    pub target_id: i64,
}

/// A resolved reference of a domain object. The field name comes from the
/// schema table, so downstream mapping never re-validates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectRef {
    pub field: &'static str,
    pub rank: i32,
    pub target: DbId,
}

/// A validated domain object, immutable once built.
#[derive(Debug, Clone)]
pub struct DomainObject {
    pub db_id: DbId,
    pub class: DomainClass,
    pub display_name: String,
    pub stable_id: Option<String>,
    pub species: Option<String>,
    pub identifier: Option<String>,
    pub database_name: Option<String>,
    pub refs: Vec<ObjectRef>,
}

/// Why a source row could not become a domain object. These are recovered
/// locally: the record is logged, counted and dropped, never imported.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRecord {
    pub db_id: i64,
    pub reason: String,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}: {}", self.db_id, self.reason)
    }
}

impl DomainObject {
    /// Validate a raw row into a domain object with no references attached.
    ///
    /// A record is malformed when its class is not in the schema, its display
    /// name is missing, or a class whose node carries a stable id has none.
    pub fn from_row(row: ObjectRow) -> Result<Self, MalformedRecord> {
        let class = DomainClass::from_tag(&row.class).ok_or_else(|| MalformedRecord {
            db_id: row.db_id,
            reason: format!("unknown class '{}'", row.class),
        })?;

        let display_name = match row.display_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(MalformedRecord {
                    db_id: row.db_id,
                    reason: "missing display name".to_string(),
                })
            }
        };

        let spec = schema::class_spec(class);
        let wants_stable_id = spec.properties.contains(&PropertyField::StableId);
        let stable_id = row.stable_id.filter(|s| !s.trim().is_empty());
        if wants_stable_id && stable_id.is_none() {
            return Err(MalformedRecord {
                db_id: row.db_id,
                reason: "missing stable id".to_string(),
            });
        }

        Ok(DomainObject {
            db_id: DbId::new(row.db_id),
            class,
            display_name,
            stable_id,
            species: row.species.filter(|s| !s.is_empty()),
            identifier: row.identifier.filter(|s| !s.is_empty()),
            database_name: row.database_name.filter(|s| !s.is_empty()),
            refs: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(db_id: i64, class: &str) -> ObjectRow {
        ObjectRow {
            db_id,
            class: class.to_string(),
            display_name: Some("Glycolysis".to_string()),
            stable_id: Some("R-HSA-70171".to_string()),
            species: Some("Homo sapiens".to_string()),
            identifier: None,
            database_name: None,
        }
    }

    #[test]
    fn test_valid_row() {
        let obj = DomainObject::from_row(row(70171, "Pathway")).unwrap();
        assert_eq!(obj.db_id, DbId::new(70171));
        assert_eq!(obj.class, DomainClass::Pathway);
        assert_eq!(obj.display_name, "Glycolysis");
        assert_eq!(obj.stable_id.as_deref(), Some("R-HSA-70171"));
    }

    #[test]
    fn test_unknown_class_is_malformed() {
        let err = DomainObject::from_row(row(1, "Polymer")).unwrap_err();
        assert!(err.reason.contains("unknown class"));
    }

    #[test]
    fn test_missing_display_name_is_malformed() {
        let mut r = row(2, "Reaction");
        r.display_name = Some("   ".to_string());
        let err = DomainObject::from_row(r).unwrap_err();
        assert!(err.reason.contains("display name"));
    }

    #[test]
    fn test_missing_stable_id_is_malformed_for_events() {
        let mut r = row(3, "Reaction");
        r.stable_id = None;
        assert!(DomainObject::from_row(r).is_err());
    }

    #[test]
    fn test_reference_entity_needs_no_stable_id() {
        let mut r = row(4, "ReferenceEntity");
        r.stable_id = None;
        r.identifier = Some("P12345".to_string());
        let obj = DomainObject::from_row(r).unwrap();
        assert_eq!(obj.identifier.as_deref(), Some("P12345"));
    }
}
