//! Value types and the search seam used across the crate.

use std::{future::Future, pin::Pin};

use crate::errors::IndexError;

/// One document as returned by the index: an opaque field-name → value map.
///
/// No schema is guaranteed; service metadata keys (e.g. `@search.score`)
/// may be present alongside content fields.
pub type IndexDocument = serde_json::Map<String, serde_json::Value>;

/// Literal search text the index treats as "match every document".
pub const MATCH_ALL: &str = "*";

/// Parameters of one keyword search.
#[derive(Clone, Copy, Debug)]
pub struct SearchRequest<'a> {
    /// Query text; [`MATCH_ALL`] samples the index unfiltered.
    pub text: &'a str,
    /// Maximum number of documents to return.
    pub top: u32,
    /// Optional comma-joined field list to restrict returned fields.
    pub select: Option<&'a str>,
    /// Ask the service for the total match count as well.
    pub include_count: bool,
}

/// One page of search results.
#[derive(Clone, Debug, Default)]
pub struct SearchPage {
    /// Matched documents in relevance order.
    pub documents: Vec<IndexDocument>,
    /// Total match count, when requested and reported.
    pub total: Option<u64>,
}

/// Provider interface for keyword search.
///
/// Implement this trait to plug in a different index backend, or an
/// in-process stub in tests. Async is required because the real provider
/// performs HTTP requests.
pub trait DocumentSearch: Send + Sync {
    /// Async search returning one result page.
    fn search<'a>(
        &'a self,
        request: SearchRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<SearchPage, IndexError>> + Send + 'a>>;
}
