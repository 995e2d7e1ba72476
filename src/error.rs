//! Import error taxonomy
//!
//! Only fatal conditions become errors. Recoverable conditions (malformed
//! records, unresolved interaction identifiers) update run counters inside
//! the component that detects them and never escape it.

use crate::graph::DbId;
use crate::persistence::StoreError;
use crate::source::SourceError;
use thiserror::Error;

/// Fatal import errors, surfaced once by the coordinator.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Unmapped domain class, invalid interaction file path, and friends.
    /// Detected before any write happens.
    #[error("configuration error: {0}")]
    Config(String),

    /// The relational source failed; partial target content already flushed
    /// stays valid.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// The target store failed a write or flush; the store is left at its
    /// last successful flush point.
    #[error("target store error: {0}")]
    Store(#[from] StoreError),

    /// A relationship named a node that was never written. Fatal during the
    /// core import; the merge phase downgrades it to a skipped record.
    #[error("referential integrity violated: {rel_type} {from} -> {to} (missing {missing})")]
    ReferentialIntegrity {
        rel_type: String,
        from: DbId,
        to: DbId,
        missing: DbId,
    },

    #[error("interaction download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("interaction file error: {0}")]
    InteractionFile(#[from] std::io::Error),

    #[error("import aborted")]
    Aborted,

    #[error("pipeline task failed: {0}")]
    Pipeline(String),
}

pub type ImportResult<T> = Result<T, ImportError>;

impl ImportError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
