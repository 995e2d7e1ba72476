//! Batching graph writer
//!
//! The writer owns the target store for the whole run. It enforces the two
//! write invariants — one node per key, endpoints before edges — and trades
//! memory for throughput by buffering a bounded number of operations and
//! applying them as one atomic batch.

use crate::error::{ImportError, ImportResult};
use crate::graph::{DbId, GraphNode, GraphRelationship, RelType};
use crate::persistence::{BatchOp, TargetStore};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Default number of buffered operations before a flush.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Idempotent, batching writer over a [`TargetStore`].
///
/// A node key is registered the moment its write is accepted, so a
/// relationship may name endpoints that are still in the pending buffer:
/// the buffer preserves acceptance order, which puts every node ahead of the
/// relationships that reference it within the same batch.
pub struct GraphWriter<T: TargetStore> {
    store: T,
    batch_size: usize,
    pending: Vec<BatchOp>,
    written_nodes: FxHashSet<DbId>,
    written_relationships: FxHashSet<(DbId, RelType, DbId)>,
    flushes: u64,
}

impl<T: TargetStore> GraphWriter<T> {
    pub fn new(store: T, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
            pending: Vec::new(),
            written_nodes: FxHashSet::default(),
            written_relationships: FxHashSet::default(),
            flushes: 0,
        }
    }

    /// Write a node. Returns `false` when the key was already written this
    /// run; the store is not touched again for it.
    pub fn write_node(&mut self, node: GraphNode) -> ImportResult<bool> {
        if !self.written_nodes.insert(node.key) {
            debug!(key = %node.key, "node already written; skipping duplicate");
            return Ok(false);
        }
        self.pending.push(BatchOp::Node(node));
        self.flush_if_full()?;
        Ok(true)
    }

    /// Write a relationship. Both endpoints must already be accepted node
    /// writes; a missing endpoint is a referential-integrity error. Returns
    /// `false` for a duplicate (same endpoints and type).
    pub fn write_relationship(&mut self, rel: GraphRelationship) -> ImportResult<bool> {
        for endpoint in [rel.from, rel.to] {
            if !self.written_nodes.contains(&endpoint) {
                return Err(ImportError::ReferentialIntegrity {
                    rel_type: rel.rel_type.as_str().to_string(),
                    from: rel.from,
                    to: rel.to,
                    missing: endpoint,
                });
            }
        }
        if !self.written_relationships.insert(rel.key()) {
            debug!(
                rel_type = rel.rel_type.as_str(),
                from = %rel.from,
                to = %rel.to,
                "relationship already written; skipping duplicate"
            );
            return Ok(false);
        }
        self.pending.push(BatchOp::Relationship(rel));
        self.flush_if_full()?;
        Ok(true)
    }

    fn flush_if_full(&mut self) -> ImportResult<()> {
        if self.pending.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Apply the pending buffer as one batch. On error the buffer is kept
    /// as-is and the store stays at its last successful flush point.
    pub fn flush(&mut self) -> ImportResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.store.apply_batch(&self.pending)?;
        debug!(ops = self.pending.len(), "flushed batch");
        self.pending.clear();
        self.flushes += 1;
        Ok(())
    }

    /// Flush the remaining buffer and force the store onto disk.
    pub fn finish(&mut self) -> ImportResult<()> {
        self.flush()?;
        self.store.flush()?;
        Ok(())
    }

    /// Number of batches applied so far.
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    /// Pending operations not yet applied.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn store(&self) -> &T {
        &self.store
    }
}
