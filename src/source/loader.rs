//! Entity loader: streams validated domain objects out of the source
//!
//! The loader is the producer stage of the pipeline. It merge-joins the two
//! primary-key-ordered cursors (objects and references) in a single pass,
//! validates each record against the schema, deduplicates primary keys, and
//! pushes finished [`DomainObject`]s into the bounded channel. Malformed
//! records are logged, counted and dropped; source failures are fatal.

use super::record::{DomainObject, ObjectRef, RefRow};
use super::{PathwaySource, SourceResult};
use crate::graph::DbId;
use crate::import::AbortFlag;
use crate::schema;
use futures::StreamExt;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// What the producer saw, reported back to the coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Objects sent downstream
    pub loaded: u64,
    /// Records dropped: duplicates, malformed rows, stray or unmapped
    /// reference rows
    pub skipped: u64,
}

/// Streams domain objects from a [`PathwaySource`].
pub struct EntityLoader<S> {
    source: Arc<S>,
}

impl<S: PathwaySource> EntityLoader<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Load every object, in primary-key order, into `tx`.
    ///
    /// Returns when the source is exhausted, the abort flag is raised, or
    /// the consumer goes away. The same source record is never yielded
    /// twice, and an object's references are attached before it is sent, so
    /// a consumer always sees complete objects.
    pub async fn load_all(
        &self,
        tx: mpsc::Sender<DomainObject>,
        abort: AbortFlag,
    ) -> SourceResult<LoadStats> {
        let mut objects = self.source.object_rows();
        let mut refs = self.source.ref_rows();

        let mut stats = LoadStats::default();
        let mut seen: FxHashSet<i64> = FxHashSet::default();
        let mut carry: Option<RefRow> = None;
        let mut exhausted = false;

        loop {
            if abort.is_set() {
                info!("abort requested; loader stopping");
                break;
            }

            let row = match objects.next().await {
                Some(row) => row?,
                None => {
                    exhausted = true;
                    break;
                }
            };
            let db_id = row.db_id;

            // Pull this object's reference rows off the second cursor.
            let mut own_refs: Vec<RefRow> = Vec::new();
            loop {
                let r = match carry.take() {
                    Some(r) => r,
                    None => match refs.next().await {
                        Some(r) => r?,
                        None => break,
                    },
                };
                if r.db_id > db_id {
                    carry = Some(r);
                    break;
                }
                if r.db_id < db_id {
                    warn!(db_id = r.db_id, field = %r.field, "reference row without an object; skipping");
                    stats.skipped += 1;
                    continue;
                }
                own_refs.push(r);
            }

            if !seen.insert(db_id) {
                warn!(db_id, "duplicate primary key; skipping");
                stats.skipped += 1;
                continue;
            }

            let mut obj = match DomainObject::from_row(row) {
                Ok(obj) => obj,
                Err(malformed) => {
                    warn!(%malformed, "skipping malformed record");
                    stats.skipped += 1;
                    continue;
                }
            };

            let spec = schema::class_spec(obj.class);
            for r in own_refs {
                match schema::reference_spec(spec, &r.field) {
                    Some(rspec) => obj.refs.push(ObjectRef {
                        field: rspec.field,
                        rank: r.rank,
                        target: DbId::new(r.target_id),
                    }),
                    None => {
                        warn!(db_id, field = %r.field, "reference field not in schema; skipping");
                        stats.skipped += 1;
                    }
                }
            }

            stats.loaded += 1;
            if tx.send(obj).await.is_err() {
                debug!("consumer closed; loader stopping");
                break;
            }
        }

        // Anything left on the reference cursor points past the last object.
        if exhausted && !abort.is_set() {
            if let Some(r) = carry.take() {
                warn!(db_id = r.db_id, field = %r.field, "reference row without an object; skipping");
                stats.skipped += 1;
            }
            while let Some(r) = refs.next().await {
                let r = r?;
                warn!(db_id = r.db_id, field = %r.field, "reference row without an object; skipping");
                stats.skipped += 1;
            }
        }

        info!(loaded = stats.loaded, skipped = stats.skipped, "entity load finished");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::record::ObjectRow;
    use crate::source::{SourceError, SourceResult};
    use async_trait::async_trait;
    use futures::stream::BoxStream;

    struct TestSource {
        objects: Vec<SourceResult<ObjectRow>>,
        refs: Vec<SourceResult<RefRow>>,
    }

    impl TestSource {
        fn new(objects: Vec<ObjectRow>, refs: Vec<RefRow>) -> Self {
            Self {
                objects: objects.into_iter().map(Ok).collect(),
                refs: refs.into_iter().map(Ok).collect(),
            }
        }
    }

    #[async_trait]
    impl PathwaySource for TestSource {
        async fn object_count(&self) -> SourceResult<u64> {
            Ok(self.objects.len() as u64)
        }

        async fn distinct_classes(&self) -> SourceResult<Vec<String>> {
            Ok(vec![])
        }

        fn object_rows(&self) -> BoxStream<'_, SourceResult<ObjectRow>> {
            let rows: Vec<_> = self
                .objects
                .iter()
                .map(|r| match r {
                    Ok(row) => Ok(row.clone()),
                    Err(_) => Err(SourceError::Connection("gone".to_string())),
                })
                .collect();
            futures::stream::iter(rows).boxed()
        }

        fn ref_rows(&self) -> BoxStream<'_, SourceResult<RefRow>> {
            let rows: Vec<_> = self
                .refs
                .iter()
                .map(|r| match r {
                    Ok(row) => Ok(row.clone()),
                    Err(_) => Err(SourceError::Connection("gone".to_string())),
                })
                .collect();
            futures::stream::iter(rows).boxed()
        }
    }

    fn object(db_id: i64, class: &str) -> ObjectRow {
        ObjectRow {
            db_id,
            class: class.to_string(),
            display_name: Some(format!("object {}", db_id)),
            stable_id: Some(format!("R-HSA-{}", db_id)),
            species: None,
            identifier: None,
            database_name: None,
        }
    }

    fn reference(db_id: i64, field: &str, rank: i32, target: i64) -> RefRow {
        RefRow {
            db_id,
            field: field.to_string(),
            rank,
            target_id: target,
        }
    }

    async fn run_loader(source: TestSource) -> (Vec<DomainObject>, SourceResult<LoadStats>) {
        let (tx, mut rx) = mpsc::channel(64);
        let loader = EntityLoader::new(Arc::new(source));
        let result = loader.load_all(tx, AbortFlag::new()).await;
        let mut received = Vec::new();
        while let Ok(obj) = rx.try_recv() {
            received.push(obj);
        }
        (received, result)
    }

    #[tokio::test]
    async fn test_objects_with_attached_refs() {
        let source = TestSource::new(
            vec![object(1, "Pathway"), object(2, "Reaction")],
            vec![
                reference(1, "hasEvent", 0, 2),
                reference(2, "input", 0, 3),
                reference(2, "output", 0, 4),
            ],
        );
        let (objs, result) = run_loader(source).await;
        let stats = result.unwrap();

        assert_eq!(stats, LoadStats { loaded: 2, skipped: 0 });
        assert_eq!(objs.len(), 2);
        assert_eq!(objs[0].refs.len(), 1);
        assert_eq!(objs[0].refs[0].target, DbId::new(2));
        assert_eq!(objs[1].refs.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_primary_key_skipped() {
        let source = TestSource::new(vec![object(1, "Pathway"), object(1, "Pathway")], vec![]);
        let (objs, result) = run_loader(source).await;
        let stats = result.unwrap();

        assert_eq!(objs.len(), 1);
        assert_eq!(stats, LoadStats { loaded: 1, skipped: 1 });
    }

    #[tokio::test]
    async fn test_malformed_record_skipped() {
        let mut bad = object(2, "Reaction");
        bad.display_name = None;
        let source = TestSource::new(
            vec![object(1, "Pathway"), bad, object(3, "Complex")],
            // The malformed record's references disappear with it.
            vec![reference(2, "input", 0, 3)],
        );
        let (objs, result) = run_loader(source).await;
        let stats = result.unwrap();

        assert_eq!(objs.len(), 2);
        assert_eq!(stats.loaded, 2);
        assert_eq!(stats.skipped, 1);
    }

    #[tokio::test]
    async fn test_stray_reference_counted() {
        let source = TestSource::new(
            vec![object(5, "Pathway")],
            vec![reference(3, "hasEvent", 0, 5), reference(9, "hasEvent", 0, 5)],
        );
        let (objs, result) = run_loader(source).await;
        let stats = result.unwrap();

        assert_eq!(objs.len(), 1);
        assert_eq!(stats.skipped, 2);
    }

    #[tokio::test]
    async fn test_unmapped_reference_field_counted() {
        let source = TestSource::new(
            vec![object(1, "Pathway")],
            vec![
                reference(1, "hasEvent", 0, 2),
                reference(1, "regulatedBy", 0, 3),
            ],
        );
        let (objs, result) = run_loader(source).await;
        let stats = result.unwrap();

        assert_eq!(objs[0].refs.len(), 1);
        assert_eq!(stats.skipped, 1);
    }

    #[tokio::test]
    async fn test_source_error_is_fatal() {
        let mut source = TestSource::new(vec![object(1, "Pathway")], vec![]);
        source.objects.push(Err(SourceError::Connection("gone".to_string())));
        let (_, result) = run_loader(source).await;
        assert!(matches!(result, Err(SourceError::Connection(_))));
    }

    #[tokio::test]
    async fn test_abort_stops_producer() {
        let source = TestSource::new(vec![object(1, "Pathway"), object(2, "Reaction")], vec![]);
        let (tx, mut rx) = mpsc::channel(64);
        let loader = EntityLoader::new(Arc::new(source));
        let abort = AbortFlag::new();
        abort.trigger();
        let stats = loader.load_all(tx, abort).await.unwrap();
        assert_eq!(stats.loaded, 0);
        assert!(rx.try_recv().is_err());
    }
}
