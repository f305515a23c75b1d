//! Retrieval: content-field resolution cache and keyword search with a
//! match-all fallback.
//!
//! The retriever never surfaces backend errors; a failed call degrades to an
//! empty result and a warning, so the pipeline above only ever distinguishes
//! "documents" from "no documents".

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::fields;
use crate::record::{DocumentSearch, IndexDocument, MATCH_ALL, SearchRequest};

/// How many documents to sample when resolving the content field.
const SAMPLE_TOP: u32 = 3;

/// Keyword retrieval over one index with a cached content field.
///
/// The content field resolves lazily on first use and is then fixed for the
/// instance lifetime, including the negative outcome: an index without a
/// usable content field short-circuits every search to empty results.
/// Resolution is idempotent, so concurrent first calls are harmless.
pub struct Retriever {
    backend: Arc<dyn DocumentSearch>,
    content_field: OnceCell<Option<String>>,
}

impl Retriever {
    /// Creates a retriever over the given search backend.
    pub fn new(backend: Arc<dyn DocumentSearch>) -> Self {
        Self {
            backend,
            content_field: OnceCell::new(),
        }
    }

    /// Returns the resolved content field, resolving it on first call.
    pub async fn content_field(&self) -> Option<&str> {
        self.content_field
            .get_or_init(|| self.resolve())
            .await
            .as_deref()
    }

    async fn resolve(&self) -> Option<String> {
        let request = SearchRequest {
            text: MATCH_ALL,
            top: SAMPLE_TOP,
            select: None,
            include_count: false,
        };
        match self.backend.search(request).await {
            Ok(page) => {
                let resolved = fields::resolve_content_field(&page.documents);
                match &resolved {
                    Some(name) => info!(field = %name, "content field resolved"),
                    None => warn!(
                        samples = page.documents.len(),
                        "no usable content field; retrieval will return empty results"
                    ),
                }
                resolved
            }
            Err(err) => {
                warn!(error = %err, "sample fetch failed; content field unresolved");
                None
            }
        }
    }

    /// Retrieves up to `top_k` context documents for `query`.
    ///
    /// A successful keyword search that yields nothing usable triggers
    /// exactly one unfiltered match-all search. Backend errors yield an
    /// empty vector.
    pub async fn search(&self, query: &str, top_k: u32) -> Vec<String> {
        let Some(field) = self.content_field().await else {
            return Vec::new();
        };

        let keyword = SearchRequest {
            text: query,
            top: top_k,
            select: Some(field),
            include_count: false,
        };
        let documents = match self.backend.search(keyword).await {
            Ok(page) => extract(&page.documents, field),
            Err(err) => {
                warn!(error = %err, query, "keyword search failed");
                return Vec::new();
            }
        };
        if !documents.is_empty() {
            debug!(query, hits = documents.len(), "keyword search succeeded");
            return documents;
        }

        debug!(query, "keyword search yielded nothing usable; sampling match-all");
        let fallback = SearchRequest {
            text: MATCH_ALL,
            top: top_k,
            select: Some(field),
            include_count: false,
        };
        match self.backend.search(fallback).await {
            Ok(page) => {
                let documents = extract(&page.documents, field);
                info!(hits = documents.len(), "match-all fallback served");
                documents
            }
            Err(err) => {
                warn!(error = %err, "match-all fallback failed");
                Vec::new()
            }
        }
    }
}

/// Pulls the content field out of each document, keeping trimmed-non-empty
/// values in relevance order.
fn extract(documents: &[IndexDocument], field: &str) -> Vec<String> {
    documents
        .iter()
        .filter_map(|doc| doc.get(field).and_then(value_text))
        .filter(|text| !text.trim().is_empty())
        .collect()
}

/// Text of a scalar value; arrays and objects are not usable as context.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IndexError;
    use crate::record::SearchPage;
    use serde_json::json;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    /// Replays a fixed sequence of results and records every request.
    struct ScriptedSearch {
        script: Mutex<Vec<Result<SearchPage, IndexError>>>,
        requests: Mutex<Vec<(String, Option<String>, u32)>>,
    }

    impl ScriptedSearch {
        fn new(script: Vec<Result<SearchPage, IndexError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<(String, Option<String>, u32)> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl DocumentSearch for ScriptedSearch {
        fn search<'a>(
            &'a self,
            request: SearchRequest<'a>,
        ) -> Pin<Box<dyn Future<Output = Result<SearchPage, IndexError>> + Send + 'a>> {
            self.requests.lock().unwrap().push((
                request.text.to_string(),
                request.select.map(str::to_string),
                request.top,
            ));
            let next = {
                let mut script = self.script.lock().unwrap();
                if script.is_empty() {
                    Ok(SearchPage::default())
                } else {
                    script.remove(0)
                }
            };
            Box::pin(async move { next })
        }
    }

    fn page(docs: Vec<serde_json::Value>) -> SearchPage {
        SearchPage {
            documents: docs
                .into_iter()
                .map(|d| d.as_object().unwrap().clone())
                .collect(),
            total: None,
        }
    }

    fn content_doc(text: &str) -> serde_json::Value {
        json!({ "content": text })
    }

    #[tokio::test]
    async fn absent_content_field_short_circuits_search() {
        let backend = ScriptedSearch::new(vec![Ok(page(vec![json!({"id": 1})]))]);
        let retriever = Retriever::new(backend.clone());

        assert!(retriever.search("button", 3).await.is_empty());
        // Only the resolution sample went out; no keyword search happened.
        assert_eq!(backend.requests().len(), 1);
        assert_eq!(backend.requests()[0].0, MATCH_ALL);
    }

    #[tokio::test]
    async fn keyword_hits_are_extracted_in_order() {
        let long = "Button component docs ".repeat(4);
        let backend = ScriptedSearch::new(vec![
            Ok(page(vec![content_doc(&long)])),
            Ok(page(vec![
                content_doc("first"),
                json!({"content": "   "}),
                content_doc("second"),
            ])),
        ]);
        let retriever = Retriever::new(backend.clone());

        let docs = retriever.search("button", 3).await;
        assert_eq!(docs, vec!["first".to_string(), "second".to_string()]);
        // Keyword request selected only the resolved field.
        let requests = backend.requests();
        assert_eq!(requests[1], ("button".into(), Some("content".into()), 3));
    }

    #[tokio::test]
    async fn empty_keyword_search_falls_back_to_match_all_once() {
        let long = "Pagination component docs ".repeat(4);
        let backend = ScriptedSearch::new(vec![
            Ok(page(vec![content_doc(&long)])),
            Ok(SearchPage::default()),
            Ok(page(vec![content_doc("sampled instead")])),
        ]);
        let retriever = Retriever::new(backend.clone());

        let docs = retriever.search("zzz no such tokens", 3).await;
        assert_eq!(docs, vec!["sampled instead".to_string()]);

        let requests = backend.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].0, MATCH_ALL);
        assert_eq!(requests[2].1, Some("content".into()));
    }

    #[tokio::test]
    async fn keyword_error_returns_empty_without_fallback() {
        let long = "Table component docs ".repeat(4);
        let backend = ScriptedSearch::new(vec![
            Ok(page(vec![content_doc(&long)])),
            Err(IndexError::Decode("boom".into())),
        ]);
        let retriever = Retriever::new(backend.clone());

        assert!(retriever.search("table", 3).await.is_empty());
        assert_eq!(backend.requests().len(), 2);
    }

    #[tokio::test]
    async fn content_field_resolves_only_once() {
        let long = "Checkbox component docs ".repeat(4);
        let backend = ScriptedSearch::new(vec![
            Ok(page(vec![content_doc(&long)])),
            Ok(page(vec![content_doc("a")])),
            Ok(page(vec![content_doc("b")])),
        ]);
        let retriever = Retriever::new(backend.clone());

        retriever.search("one", 3).await;
        retriever.search("two", 3).await;

        let samples = backend
            .requests()
            .iter()
            .filter(|(text, select, _)| text == MATCH_ALL && select.is_none())
            .count();
        assert_eq!(samples, 1);
    }

    #[tokio::test]
    async fn failed_sample_pins_absent_for_the_instance() {
        let backend = ScriptedSearch::new(vec![
            Err(IndexError::Decode("offline".into())),
            Ok(page(vec![content_doc("never reached")])),
        ]);
        let retriever = Retriever::new(backend.clone());

        assert!(retriever.search("button", 3).await.is_empty());
        assert!(retriever.search("button", 3).await.is_empty());
        // One failed sample; no further backend traffic.
        assert_eq!(backend.requests().len(), 1);
    }
}
