//! RocksDB-backed target store

use super::{BatchOp, StoreError, StoreResult, TargetStore};
use crate::graph::{DbId, GraphNode, GraphRelationship, Label, PropertyMap, RelType};
use rocksdb::{ColumnFamilyDescriptor, Options, WriteBatch, DB};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Serialized node for storage
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredNode {
    key: i64,
    label: String,
    properties: Vec<u8>, // Serialized PropertyMap
    created_at: i64,
}

/// Serialized relationship for storage
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRelationship {
    from: i64,
    to: i64,
    rel_type: String,
    properties: Vec<u8>, // Serialized PropertyMap
    created_at: i64,
}

/// Embedded on-disk graph store.
///
/// Nodes and relationships live in separate column families, keyed by the
/// source identifier (relationships by `from:TYPE:to`), so a keyed put is
/// naturally idempotent. Every batch goes through a single [`WriteBatch`],
/// which RocksDB applies atomically: a failed flush leaves the store exactly
/// at the previous flush point.
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Open or create the store at the given directory.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        info!("Opening graph store at: {}", path.display());

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        // Bulk-load oriented write buffers
        opts.set_write_buffer_size(64 * 1024 * 1024); // 64 MB
        opts.set_max_write_buffer_number(3);
        opts.set_min_write_buffer_number_to_merge(1);

        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new("default", Options::default()),
            ColumnFamilyDescriptor::new("nodes", Self::cf_options()),
            ColumnFamilyDescriptor::new("relationships", Self::cf_options()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        info!("Graph store opened");

        Ok(Self { db })
    }

    fn cf_options() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf(&self, name: &str) -> StoreResult<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::ColumnFamily(name.to_string()))
    }

    fn node_key(key: DbId) -> Vec<u8> {
        format!("{:016x}", key.as_i64() as u64).into_bytes()
    }

    fn rel_key(from: DbId, rel_type: &str, to: DbId) -> Vec<u8> {
        format!(
            "{:016x}:{}:{:016x}",
            from.as_i64() as u64,
            rel_type,
            to.as_i64() as u64
        )
        .into_bytes()
    }

    fn encode_node(node: &GraphNode) -> StoreResult<Vec<u8>> {
        let properties = bincode::serialize(&node.properties)?;
        let stored = StoredNode {
            key: node.key.as_i64(),
            label: node.label.as_str().to_string(),
            properties,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        Ok(bincode::serialize(&stored)?)
    }

    fn encode_relationship(rel: &GraphRelationship) -> StoreResult<Vec<u8>> {
        let properties = bincode::serialize(&rel.properties)?;
        let stored = StoredRelationship {
            from: rel.from.as_i64(),
            to: rel.to.as_i64(),
            rel_type: rel.rel_type.as_str().to_string(),
            properties,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        Ok(bincode::serialize(&stored)?)
    }

    /// Fetch a node back out, mainly for verification.
    pub fn get_node(&self, key: DbId) -> StoreResult<Option<GraphNode>> {
        let cf = self.cf("nodes")?;
        match self.db.get_cf(cf, Self::node_key(key))? {
            Some(value) => {
                let stored: StoredNode = bincode::deserialize(&value)?;
                let properties: PropertyMap = bincode::deserialize(&stored.properties)?;
                Ok(Some(GraphNode {
                    key: DbId::new(stored.key),
                    label: Label::new(stored.label),
                    properties,
                }))
            }
            None => Ok(None),
        }
    }

    /// Fetch a relationship back out, mainly for verification.
    pub fn get_relationship(
        &self,
        from: DbId,
        rel_type: &str,
        to: DbId,
    ) -> StoreResult<Option<GraphRelationship>> {
        let cf = self.cf("relationships")?;
        match self.db.get_cf(cf, Self::rel_key(from, rel_type, to))? {
            Some(value) => {
                let stored: StoredRelationship = bincode::deserialize(&value)?;
                let properties: PropertyMap = bincode::deserialize(&stored.properties)?;
                Ok(Some(GraphRelationship {
                    rel_type: RelType::new(stored.rel_type),
                    from: DbId::new(stored.from),
                    to: DbId::new(stored.to),
                    properties,
                }))
            }
            None => Ok(None),
        }
    }

    /// All relationships in the store, for verification and summaries.
    pub fn scan_relationships(&self) -> StoreResult<Vec<GraphRelationship>> {
        let cf = self.cf("relationships")?;
        let mut rels = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let stored: StoredRelationship = bincode::deserialize(&value)?;
            let properties: PropertyMap = bincode::deserialize(&stored.properties)?;
            rels.push(GraphRelationship {
                rel_type: RelType::new(stored.rel_type),
                from: DbId::new(stored.from),
                to: DbId::new(stored.to),
                properties,
            });
        }
        Ok(rels)
    }

    fn count_cf(&self, name: &str) -> StoreResult<u64> {
        let cf = self.cf(name)?;
        let mut count = 0u64;
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }
}

impl TargetStore for RocksStore {
    fn apply_batch(&mut self, ops: &[BatchOp]) -> StoreResult<()> {
        if ops.is_empty() {
            return Ok(());
        }

        let nodes_cf = self.cf("nodes")?;
        let rels_cf = self.cf("relationships")?;

        let mut batch = WriteBatch::default();
        for op in ops {
            match op {
                BatchOp::Node(node) => {
                    batch.put_cf(nodes_cf, Self::node_key(node.key), Self::encode_node(node)?);
                }
                BatchOp::Relationship(rel) => {
                    batch.put_cf(
                        rels_cf,
                        Self::rel_key(rel.from, rel.rel_type.as_str(), rel.to),
                        Self::encode_relationship(rel)?,
                    );
                }
            }
        }

        self.db.write(batch)?;
        debug!("Applied batch of {} operations", ops.len());

        Ok(())
    }

    fn flush(&mut self) -> StoreResult<()> {
        self.db.flush()?;
        debug!("Flushed store to disk");
        Ok(())
    }

    fn has_node(&self, key: DbId) -> StoreResult<bool> {
        let cf = self.cf("nodes")?;
        Ok(self.db.get_cf(cf, Self::node_key(key))?.is_some())
    }

    fn node_count(&self) -> StoreResult<u64> {
        self.count_cf("nodes")
    }

    fn relationship_count(&self) -> StoreResult<u64> {
        self.count_cf("relationships")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn node(key: i64, label: &str, name: &str) -> GraphNode {
        let mut n = GraphNode::new(DbId::new(key), label);
        n.set_property("displayName", name);
        n
    }

    #[test]
    fn test_store_open() {
        let temp_dir = TempDir::new().unwrap();
        let store = RocksStore::open(temp_dir.path()).unwrap();
        drop(store);
    }

    #[test]
    fn test_put_get_node() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = RocksStore::open(temp_dir.path()).unwrap();

        store
            .apply_batch(&[BatchOp::Node(node(1, "Pathway", "Glycolysis"))])
            .unwrap();

        let retrieved = store.get_node(DbId::new(1)).unwrap().unwrap();
        assert_eq!(retrieved.key, DbId::new(1));
        assert_eq!(retrieved.label.as_str(), "Pathway");
        assert_eq!(
            retrieved.get_property("displayName").and_then(|v| v.as_string()),
            Some("Glycolysis")
        );
    }

    #[test]
    fn test_keyed_put_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = RocksStore::open(temp_dir.path()).unwrap();

        store
            .apply_batch(&[
                BatchOp::Node(node(1, "Reaction", "first")),
                BatchOp::Node(node(1, "Reaction", "second")),
            ])
            .unwrap();

        assert_eq!(store.node_count().unwrap(), 1);
    }

    #[test]
    fn test_relationship_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = RocksStore::open(temp_dir.path()).unwrap();

        let mut rel = GraphRelationship::new(DbId::new(1), DbId::new(2), "HAS_EVENT");
        rel.set_property("order", 0i64);

        store
            .apply_batch(&[
                BatchOp::Node(node(1, "Pathway", "p")),
                BatchOp::Node(node(2, "Reaction", "r")),
                BatchOp::Relationship(rel),
            ])
            .unwrap();

        assert_eq!(store.relationship_count().unwrap(), 1);
        let fetched = store
            .get_relationship(DbId::new(1), "HAS_EVENT", DbId::new(2))
            .unwrap()
            .unwrap();
        assert_eq!(fetched.get_property("order").and_then(|v| v.as_integer()), Some(0));
    }

    #[test]
    fn test_reopen_preserves_data() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut store = RocksStore::open(temp_dir.path()).unwrap();
            let ops: Vec<BatchOp> = (1..=5)
                .map(|i| BatchOp::Node(node(i, "SimpleEntity", "e")))
                .collect();
            store.apply_batch(&ops).unwrap();
            store.flush().unwrap();
        }

        {
            let store = RocksStore::open(temp_dir.path()).unwrap();
            assert_eq!(store.node_count().unwrap(), 5);
            assert!(store.has_node(DbId::new(3)).unwrap());
            assert!(!store.has_node(DbId::new(9)).unwrap());
        }
    }
}
