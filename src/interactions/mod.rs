//! Protein-protein interaction merge phase
//!
//! Optional, strictly after the core import: parses an IntAct-style
//! tab-separated file, resolves each side through the cross-reference table
//! built while importing reference entities, and writes `INTERACTS_WITH`
//! relationships between the resolved nodes. The interaction dataset covers
//! a far larger universe than the pathway graph, so unresolved records are
//! expected: they are counted and skipped, never an error.

pub mod download;
pub mod merger;
pub mod parser;

pub use download::download_interactions;
pub use merger::{merge_file, MergeStats};
pub use parser::{parse_line, LineOutcome};

/// Relationship type written by the merge phase.
pub const INTERACTS_WITH: &str = "INTERACTS_WITH";

/// One parsed interaction: two cross-reference identifiers plus the
/// confidence score and evidence code the dataset supplies.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRecord {
    pub id_a: String,
    pub id_b: String,
    pub score: Option<f64>,
    pub evidence: Option<String>,
}
