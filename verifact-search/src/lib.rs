//! Web search collaborators for the fact-check engine.
//!
//! [`SearchProvider`] is the seam the engine depends on. [`serper::SerperClient`]
//! talks to Serper.dev; [`stub`] holds fixed providers for tests and offline runs.
pub mod serper;
pub mod stub;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use verifact_common::VerifactError;
use verifact_http::HttpError;

pub use serper::SerperClient;
pub use stub::{FailingSearchProvider, StaticSearchProvider};

/// One search hit, normalised across providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    /// Empty for synthetic entries (knowledge graph, answer box, system notices).
    pub url: String,
    pub snippet: String,
    pub position: u32,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        position: u32,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            position,
            source: source.into(),
            relevance_score: None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("search backend unavailable: {0}")]
    Unavailable(String),
}

impl From<SearchError> for VerifactError {
    fn from(e: SearchError) -> Self {
        VerifactError::Provider(e.to_string())
    }
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short identifier used in logs and health output.
    fn name(&self) -> &str;

    /// Run one query, returning at most `limit` results ordered by position.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError>;
}
