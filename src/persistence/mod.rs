//! Target graph store boundary
//!
//! The import core only ever talks to [`TargetStore`]: batched, idempotent
//! writes keyed on the source identifier. [`RocksStore`] is the shipped
//! on-disk implementation.

pub mod rocks;

pub use rocks::RocksStore;

use crate::graph::{DbId, GraphNode, GraphRelationship};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// RocksDB error
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Column family error
    #[error("Column family error: {0}")]
    ColumnFamily(String),

    /// Injected or environmental write failure surfaced by a store
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One pending write operation.
#[derive(Debug, Clone)]
pub enum BatchOp {
    Node(GraphNode),
    Relationship(GraphRelationship),
}

/// Write interface of the embedded target store.
///
/// A batch is applied atomically: on error, nothing from the failing batch
/// may be assumed committed and the store stays at its previous flush point.
/// Keyed puts make re-applying the same node or relationship a no-op rather
/// than a duplicate.
pub trait TargetStore {
    /// Apply a batch of operations as a single transaction.
    fn apply_batch(&mut self, ops: &[BatchOp]) -> StoreResult<()>;

    /// Force everything applied so far onto disk.
    fn flush(&mut self) -> StoreResult<()>;

    fn has_node(&self, key: DbId) -> StoreResult<bool>;

    fn node_count(&self) -> StoreResult<u64>;

    fn relationship_count(&self) -> StoreResult<u64>;
}
