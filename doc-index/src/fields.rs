//! Heuristic discovery of the field that carries prose content.
//!
//! The index schema is not known in advance, so the pipeline samples a few
//! documents and resolves the content field once: first by conventional
//! field names, then by the longest-string heuristic. Resolution is a pure
//! function of the samples and never fails; absence is a valid outcome that
//! downstream retrieval turns into empty results.

use serde_json::Value;
use tracing::debug;

use crate::record::IndexDocument;

/// Conventional content-field names, tried in order.
///
/// The trailing entries cover enrichment-style indexes that project entity
/// fields into the document.
pub const CANDIDATE_FIELDS: [&str; 11] = [
    "content",
    "merged_content",
    "text",
    "body",
    "document",
    "extracted_content",
    "description",
    "content_text",
    "people",
    "organizations",
    "locations",
];

/// Minimum trimmed length for a candidate-name match.
const CANDIDATE_MIN_LEN: usize = 50;

/// Minimum trimmed length for the longest-string fallback.
const FALLBACK_MIN_LEN: usize = 20;

/// Resolves the content field from sample documents.
///
/// Per sample, in order: first a candidate-name pass (a listed name whose
/// value is a string with trimmed length above [`CANDIDATE_MIN_LEN`]), then
/// a fallback pass picking the longest string field above
/// [`FALLBACK_MIN_LEN`]. Returns `None` when no sample yields a field.
pub fn resolve_content_field(samples: &[IndexDocument]) -> Option<String> {
    for doc in samples {
        if let Some(name) = candidate_match(doc) {
            debug!(field = %name, "content field matched by candidate name");
            return Some(name);
        }
    }
    for doc in samples {
        if let Some(name) = longest_text_field(doc) {
            debug!(field = %name, "content field picked by longest-string heuristic");
            return Some(name);
        }
    }
    debug!("no usable content field in {} sample(s)", samples.len());
    None
}

fn candidate_match(doc: &IndexDocument) -> Option<String> {
    for name in CANDIDATE_FIELDS {
        if let Some(Value::String(s)) = doc.get(name) {
            if s.trim().len() > CANDIDATE_MIN_LEN {
                return Some(name.to_string());
            }
        }
    }
    None
}

fn longest_text_field(doc: &IndexDocument) -> Option<String> {
    let mut best: Option<(&String, usize)> = None;
    for (name, value) in doc {
        let Value::String(s) = value else { continue };
        if s.trim().len() <= FALLBACK_MIN_LEN {
            continue;
        }
        // Strictly greater keeps the first field on ties.
        if best.is_none_or(|(_, len)| s.len() > len) {
            best = Some((name, s.len()));
        }
    }
    best.map(|(name, _)| name.clone())
}
