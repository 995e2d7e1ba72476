//! Shared fixtures: an in-memory pathway source for driving the pipeline
//! without a live database.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use reactograph::source::{ObjectRow, PathwaySource, RefRow, SourceError};

/// In-memory source. Rows must be supplied in primary-key order, like the
/// real cursors. `fail_objects_after` injects a connectivity failure after
/// that many object rows.
pub struct FixtureSource {
    pub objects: Vec<ObjectRow>,
    pub refs: Vec<RefRow>,
    pub fail_objects_after: Option<usize>,
}

impl FixtureSource {
    pub fn new(objects: Vec<ObjectRow>, refs: Vec<RefRow>) -> Self {
        Self {
            objects,
            refs,
            fail_objects_after: None,
        }
    }
}

#[async_trait]
impl PathwaySource for FixtureSource {
    async fn object_count(&self) -> Result<u64, SourceError> {
        Ok(self.objects.len() as u64)
    }

    async fn distinct_classes(&self) -> Result<Vec<String>, SourceError> {
        let mut classes: Vec<String> = self.objects.iter().map(|o| o.class.clone()).collect();
        classes.sort();
        classes.dedup();
        Ok(classes)
    }

    fn object_rows(&self) -> BoxStream<'_, Result<ObjectRow, SourceError>> {
        let mut rows: Vec<Result<ObjectRow, SourceError>> = match self.fail_objects_after {
            Some(n) => self.objects.iter().take(n).cloned().map(Ok).collect(),
            None => self.objects.iter().cloned().map(Ok).collect(),
        };
        if self.fail_objects_after.is_some() {
            rows.push(Err(SourceError::Connection(
                "connection reset by peer".to_string(),
            )));
        }
        futures::stream::iter(rows).boxed()
    }

    fn ref_rows(&self) -> BoxStream<'_, Result<RefRow, SourceError>> {
        let rows: Vec<Result<RefRow, SourceError>> =
            self.refs.iter().cloned().map(Ok).collect();
        futures::stream::iter(rows).boxed()
    }
}

pub fn object(db_id: i64, class: &str, name: &str) -> ObjectRow {
    ObjectRow {
        db_id,
        class: class.to_string(),
        display_name: Some(name.to_string()),
        stable_id: Some(format!("R-HSA-{}", db_id)),
        species: Some("Homo sapiens".to_string()),
        identifier: None,
        database_name: None,
    }
}

pub fn reference_entity(db_id: i64, name: &str, identifier: &str) -> ObjectRow {
    ObjectRow {
        db_id,
        class: "ReferenceEntity".to_string(),
        display_name: Some(name.to_string()),
        stable_id: None,
        species: None,
        identifier: Some(identifier.to_string()),
        database_name: Some("UniProt".to_string()),
    }
}

pub fn reference(db_id: i64, field: &str, rank: i32, target: i64) -> RefRow {
    RefRow {
        db_id,
        field: field.to_string(),
        rank,
        target_id: target,
    }
}

/// Three pathways sharing one reaction; the reaction consumes a protein and
/// produces a small molecule, both backed by reference entities.
pub fn pathway_fixture() -> FixtureSource {
    FixtureSource::new(
        vec![
            object(1, "Pathway", "Glycolysis"),
            object(2, "Pathway", "Gluconeogenesis"),
            object(3, "Pathway", "Glucose metabolism"),
            object(10, "Reaction", "Glucose phosphorylation"),
            object(20, "EntityWithAccessionedSequence", "HK1"),
            object(21, "SimpleEntity", "G6P"),
            reference_entity(30, "HK1", "P19367"),
            reference_entity(31, "G6P", "CHEBI-4170"),
        ],
        vec![
            reference(1, "hasEvent", 0, 10),
            reference(2, "hasEvent", 0, 10),
            reference(3, "hasEvent", 0, 10),
            reference(10, "input", 0, 20),
            reference(10, "output", 0, 21),
            reference(10, "catalyst", 0, 20),
            reference(20, "referenceEntity", 0, 30),
            reference(21, "referenceEntity", 0, 31),
        ],
    )
}
