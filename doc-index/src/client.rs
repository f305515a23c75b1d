//! Thin REST adapter for the hosted search index.
//!
//! This facade concentrates all wire-format knowledge behind a minimal API,
//! keeping the rest of the application decoupled from the service's JSON
//! shapes. One endpoint is used:
//! `POST {endpoint}/indexes/{index}/docs/search?api-version={v}`

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::IndexConfig;
use crate::errors::IndexError;
use crate::record::{DocumentSearch, IndexDocument, MATCH_ALL, SearchPage, SearchRequest};

/// REST client for one search index.
pub struct SearchIndexClient {
    client: reqwest::Client,
    url_search: String,
    index_name: String,
}

impl SearchIndexClient {
    /// Creates a new client from the given configuration.
    ///
    /// Validates the config, then builds an HTTP client with the `api-key`
    /// default header and a request timeout.
    ///
    /// # Errors
    /// Returns `IndexError::Config` on invalid parameters and
    /// `IndexError::Http` if the HTTP client cannot be built.
    pub fn new(cfg: IndexConfig) -> Result<Self, IndexError> {
        cfg.validate()?;

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "api-key",
            header::HeaderValue::from_str(&cfg.api_key)
                .map_err(|e| IndexError::Config(format!("invalid api_key header: {e}")))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_search = format!(
            "{}/indexes/{}/docs/search?api-version={}",
            cfg.endpoint.trim_end_matches('/'),
            cfg.index_name,
            cfg.api_version
        );

        info!(
            index = %cfg.index_name,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "SearchIndexClient initialized"
        );

        Ok(Self {
            client,
            url_search,
            index_name: cfg.index_name,
        })
    }

    /// Executes one keyword search and returns the result page.
    ///
    /// # Errors
    /// Returns `IndexError::Http` for transport failures, `HttpStatus` for
    /// non-2xx responses, and `Decode` if the payload cannot be parsed.
    pub async fn search_page(&self, request: SearchRequest<'_>) -> Result<SearchPage, IndexError> {
        let started = Instant::now();
        let body = SearchBody {
            search: request.text,
            top: request.top,
            select: request.select,
            count: request.include_count,
        };

        debug!(
            index = %self.index_name,
            search = %request.text,
            top = request.top,
            select = request.select.unwrap_or("*"),
            "POST {}", self.url_search
        );

        let resp = self.client.post(&self.url_search).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_search.clone();
            let snippet = snippet_of(&resp.text().await.unwrap_or_default());

            error!(
                %status,
                %url,
                %snippet,
                index = %self.index_name,
                latency_ms = started.elapsed().as_millis(),
                "search returned non-success status"
            );

            return Err(IndexError::HttpStatus {
                status,
                url,
                snippet,
            });
        }

        let out: SearchResponseBody = resp.json().await.map_err(|e| {
            error!(
                error = %e,
                index = %self.index_name,
                "failed to decode search response"
            );
            IndexError::Decode(format!("serde error: {e}; expected `value` array"))
        })?;

        debug!(
            index = %self.index_name,
            hits = out.value.len(),
            total = ?out.count,
            latency_ms = started.elapsed().as_millis(),
            "search completed"
        );

        Ok(SearchPage {
            documents: out.value,
            total: out.count,
        })
    }

    /// Count-only match-all probe; the connectivity check of the index.
    ///
    /// # Errors
    /// Same failure modes as [`SearchIndexClient::search_page`].
    pub async fn total_count(&self) -> Result<u64, IndexError> {
        let page = self
            .search_page(SearchRequest {
                text: MATCH_ALL,
                top: 0,
                select: None,
                include_count: true,
            })
            .await?;
        Ok(page.total.unwrap_or(page.documents.len() as u64))
    }
}

impl DocumentSearch for SearchIndexClient {
    fn search<'a>(
        &'a self,
        request: SearchRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<SearchPage, IndexError>> + Send + 'a>> {
        Box::pin(self.search_page(request))
    }
}

fn snippet_of(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    let mut end = trimmed.len().min(MAX);
    while end > 0 && !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

/* ===========================================================================
Wire payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    search: &'a str,
    top: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    select: Option<&'a str>,
    count: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    #[serde(rename = "@odata.count")]
    count: Option<u64>,
    #[serde(default)]
    value: Vec<IndexDocument>,
}
