//! Merging parsed interactions into the imported graph

use super::parser::{parse_line, LineOutcome};
use super::{InteractionRecord, INTERACTS_WITH};
use crate::error::{ImportError, ImportResult};
use crate::graph::{DbId, GraphRelationship};
use crate::import::progress::ProgressReporter;
use crate::persistence::TargetStore;
use crate::writer::GraphWriter;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome counters of the merge phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Relationships actually written
    pub merged: u64,
    /// Records with at least one identifier missing from the imported graph
    pub skipped_unresolved: u64,
    /// Lines that should have been records but were not parseable
    pub malformed: u64,
}

/// Merge an interaction file into the graph.
///
/// Each record resolves both identifiers through the cross-reference table;
/// a fully resolved pair becomes one `INTERACTS_WITH` relationship. The
/// pair is ordered by identifier first, so an A/B swap in the file cannot
/// produce a second edge. Unresolved and malformed records are counted and
/// skipped.
pub fn merge_file<T: TargetStore>(
    path: &Path,
    xrefs: &FxHashMap<String, DbId>,
    writer: &mut GraphWriter<T>,
    progress: &mut ProgressReporter,
) -> ImportResult<MergeStats> {
    info!(file = %path.display(), "Merging interaction data");

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut stats = MergeStats::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            LineOutcome::Ignored => continue,
            LineOutcome::Malformed(reason) => {
                warn!(line = line_no + 1, reason, "skipping malformed interaction line");
                stats.malformed += 1;
            }
            LineOutcome::Record(record) => merge_record(record, xrefs, writer, &mut stats)?,
        }
        progress.advance(1);
    }

    info!(
        merged = stats.merged,
        unresolved = stats.skipped_unresolved,
        malformed = stats.malformed,
        "interaction merge finished"
    );

    Ok(stats)
}

fn merge_record<T: TargetStore>(
    record: InteractionRecord,
    xrefs: &FxHashMap<String, DbId>,
    writer: &mut GraphWriter<T>,
    stats: &mut MergeStats,
) -> ImportResult<()> {
    let (first, second) = if record.id_a <= record.id_b {
        (&record.id_a, &record.id_b)
    } else {
        (&record.id_b, &record.id_a)
    };

    let (from, to) = match (xrefs.get(first), xrefs.get(second)) {
        (Some(&from), Some(&to)) => (from, to),
        _ => {
            debug!(id_a = %record.id_a, id_b = %record.id_b, "interactor not in graph; skipping");
            stats.skipped_unresolved += 1;
            return Ok(());
        }
    };

    let mut rel = GraphRelationship::new(from, to, INTERACTS_WITH);
    if let Some(score) = record.score {
        rel.set_property("score", score);
    }
    if let Some(evidence) = &record.evidence {
        rel.set_property("evidence", evidence.clone());
    }

    // Cross-dataset coverage mismatches are expected here, unlike in the
    // core phase: a dangling endpoint demotes to a skipped record.
    match writer.write_relationship(rel) {
        Ok(true) => stats.merged += 1,
        Ok(false) => {}
        Err(ImportError::ReferentialIntegrity { .. }) => stats.skipped_unresolved += 1,
        Err(e) => return Err(e),
    }

    Ok(())
}
