//! Search-index access for the documentation QA pipeline.
//!
//! This crate provides a clean API to:
//! - Query a hosted keyword index over REST ([`SearchIndexClient`])
//! - Discover which document field carries prose content
//!   ([`resolve_content_field`])
//! - Retrieve usable context documents for a query, with a match-all
//!   fallback when literal phrasing misses ([`Retriever`])
//!
//! The design is flat and splits responsibilities into focused modules.

mod client;
mod config;
mod errors;
mod fields;
mod record;
mod retrieve;

pub use client::SearchIndexClient;
pub use config::IndexConfig;
pub use errors::IndexError;
pub use fields::{CANDIDATE_FIELDS, resolve_content_field};
pub use record::{DocumentSearch, IndexDocument, MATCH_ALL, SearchPage, SearchRequest};
pub use retrieve::Retriever;
