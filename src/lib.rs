//! Reactograph
//!
//! A one-shot batch importer that reads a Reactome-style relational pathway
//! database and writes it into an embedded on-disk property graph,
//! optionally merging IntAct-style protein-protein interaction data.
//!
//! # Architecture
//!
//! - `schema` — the static mapping from domain classes to node labels,
//!   properties and relationship types
//! - `source` — the relational read side: MySQL cursors and the streaming
//!   entity loader
//! - `graph` — the node/relationship value model keyed by source
//!   identifiers
//! - `writer` + `persistence` — idempotent batched writes into the
//!   RocksDB-backed target store
//! - `interactions` — the optional merge phase
//! - `import` — the coordinator tying the stages together through a
//!   bounded channel, with progress reporting and the abort path
//!
//! # Example
//!
//! ```no_run
//! use reactograph::import::{ImportCoordinator, ImportOptions};
//! use reactograph::persistence::RocksStore;
//! use reactograph::source::{MySqlSource, SourceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = MySqlSource::connect(&SourceConfig::default()).await?;
//!     let store = RocksStore::open("./target/graph.db")?;
//!     let coordinator = ImportCoordinator::new(source, store, ImportOptions::default());
//!     let summary = coordinator.import_all().await?;
//!     println!("{}", summary.counters);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod graph;
pub mod import;
pub mod interactions;
pub mod persistence;
pub mod schema;
pub mod source;
pub mod writer;

// Re-export main types for convenience
pub use error::{ImportError, ImportResult};
pub use graph::{DbId, GraphNode, GraphRelationship, Label, PropertyMap, PropertyValue, RelType};
pub use import::{
    AbortFlag, Counters, ImportCoordinator, ImportOptions, ImportRun, ImportSummary, Phase,
    ProgressMode, ProgressReporter,
};
pub use persistence::{BatchOp, RocksStore, StoreError, StoreResult, TargetStore};
pub use schema::{map_object, ClassSpec, DomainClass, ReferenceSpec, SCHEMA};
pub use source::{
    DomainObject, EntityLoader, LoadStats, MySqlSource, PathwaySource, SourceConfig, SourceError,
};
pub use writer::{GraphWriter, DEFAULT_BATCH_SIZE};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
