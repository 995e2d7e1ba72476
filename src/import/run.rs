//! Run-scoped state: counters and the cross-reference table

use crate::graph::{DbId, GraphRelationship};
use rustc_hash::FxHashMap;
use std::fmt;

/// Counters surfaced in the end-of-run summary, on success and on failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub nodes_written: u64,
    pub relationships_written: u64,
    /// Malformed or duplicate source records and reference rows dropped
    pub records_skipped: u64,
    pub interactions_merged: u64,
    /// Interaction records with an identifier the graph does not contain
    pub interactions_skipped: u64,
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} relationships, {} records skipped, {} interactions merged, {} interactions skipped",
            self.nodes_written,
            self.relationships_written,
            self.records_skipped,
            self.interactions_merged,
            self.interactions_skipped
        )
    }
}

/// Everything one execution owns: counters, the identifier lookup built
/// during core import, and the relationship records held back until all
/// nodes are flushed. Created when the run starts, dropped when it ends,
/// success or failure.
#[derive(Debug, Default)]
pub struct ImportRun {
    pub counters: Counters,
    /// Cross-reference identifier -> imported node key. Write-once during
    /// core import, read-only during the merge phase.
    pub xrefs: FxHashMap<String, DbId>,
    /// Relationships collected while streaming nodes, written in the second
    /// core phase once every endpoint is in the store.
    pub pending_relationships: Vec<GraphRelationship>,
}

impl ImportRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_xref(&mut self, identifier: &str, db_id: DbId) {
        self.xrefs.insert(identifier.to_string(), db_id);
    }

    pub fn resolve(&self, identifier: &str) -> Option<DbId> {
        self.xrefs.get(identifier).copied()
    }
}
