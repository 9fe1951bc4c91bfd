use crate::{SearchError, SearchProvider, SearchResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Returns the same result list for every query.
#[derive(Debug, Clone, Default)]
pub struct StaticSearchProvider {
    results: Vec<SearchResult>,
    queries: Arc<AtomicUsize>,
}

impl StaticSearchProvider {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of queries served so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for StaticSearchProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.iter().take(limit).cloned().collect())
    }
}

/// Fails every query.
#[derive(Debug, Clone)]
pub struct FailingSearchProvider {
    message: String,
}

impl FailingSearchProvider {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl SearchProvider for FailingSearchProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        Err(SearchError::Unavailable(self.message.clone()))
    }
}
