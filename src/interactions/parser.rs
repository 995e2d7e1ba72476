//! Line parser for the tab-separated interaction file
//!
//! Expected columns: identifier A, identifier B, confidence score, evidence
//! code. Identifiers may carry a database prefix ("uniprotkb:P12345");
//! only the accession after the last colon is matched against the
//! cross-reference table. Header and comment lines start with '#'.

use super::InteractionRecord;

/// Result of parsing one line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Blank line, header or comment: not a record at all.
    Ignored,
    /// A line that should have been a record but was not parseable. The
    /// reason is logged by the caller; the line is counted and skipped.
    Malformed(String),
    Record(InteractionRecord),
}

/// Parse one line of the interaction file.
pub fn parse_line(line: &str) -> LineOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return LineOutcome::Ignored;
    }

    let mut columns = trimmed.split('\t');
    let raw_a = columns.next().unwrap_or_default().trim();
    let raw_b = match columns.next() {
        Some(c) => c.trim(),
        None => return LineOutcome::Malformed("fewer than two columns".to_string()),
    };

    let id_a = clean_identifier(raw_a);
    let id_b = clean_identifier(raw_b);
    if id_a.is_empty() || id_b.is_empty() {
        return LineOutcome::Malformed("empty interactor identifier".to_string());
    }

    let score = columns
        .next()
        .map(clean_identifier)
        .filter(|s| !s.is_empty() && *s != "-")
        .and_then(|s| s.parse::<f64>().ok());

    let evidence = columns
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "-")
        .map(str::to_string);

    LineOutcome::Record(InteractionRecord {
        id_a: id_a.to_string(),
        id_b: id_b.to_string(),
        score,
        evidence,
    })
}

/// Strip a database prefix: "uniprotkb:P12345" -> "P12345".
fn clean_identifier(raw: &str) -> &str {
    raw.trim().rsplit(':').next().unwrap_or(raw)
}
