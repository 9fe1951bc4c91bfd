use super::ClaimChecker;
use crate::queries::generate_queries;
use crate::relevance::{analyze, dedup_by_url, score};
use crate::report::{ClaimResult, Status, GENERIC_CORRECTION};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use verifact_common::Result;
use verifact_search::{SearchProvider, SearchResult};

pub const WEB_SEARCH_SOURCE: &str = "Web Search";
const WEB_SEARCH_ERROR_SOURCE: &str = "Error in Web Search";
const TECHNICAL_ISSUE: &str =
    "We could not verify this claim due to a technical issue with our search service.";

/// Runs the expanded queries for a claim and keeps the most relevant hits.
#[derive(Clone)]
pub struct SearchEvidence {
    provider: Arc<dyn SearchProvider>,
    results_per_query: usize,
    results_per_claim: usize,
    request_timeout: Duration,
}

impl SearchEvidence {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            provider,
            results_per_query: 5,
            results_per_claim: 5,
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_limits(mut self, results_per_query: usize, results_per_claim: usize) -> Self {
        self.results_per_query = results_per_query;
        self.results_per_claim = results_per_claim;
        self
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    async fn run_query(&self, query: &str) -> Option<Vec<SearchResult>> {
        let outcome = timeout(
            self.request_timeout,
            self.provider.search(query, self.results_per_query),
        )
        .await;
        match outcome {
            Ok(Ok(results)) => Some(results),
            Ok(Err(e)) => {
                tracing::warn!(query, provider = self.provider.name(), error = %e, "search.query_failed");
                None
            }
            Err(_) => {
                tracing::warn!(query, provider = self.provider.name(), timeout = ?self.request_timeout, "search.query_timeout");
                None
            }
        }
    }

    /// Scored, deduplicated, relevance-sorted results for `claim`.
    ///
    /// A failed query contributes nothing. `None` only when every query failed.
    pub async fn gather(&self, claim: &str) -> Option<Vec<SearchResult>> {
        let mut collected = Vec::new();
        let mut any_succeeded = false;

        for query in generate_queries(claim) {
            let Some(results) = self.run_query(&query).await else {
                continue;
            };
            any_succeeded = true;
            tracing::debug!(query = %query, count = results.len(), "search.query");
            collected.extend(results.into_iter().map(|mut r| {
                r.relevance_score = Some(score(claim, &r));
                r
            }));
        }

        if !any_succeeded {
            return None;
        }

        let mut results = dedup_by_url(collected);
        results.sort_by(|a, b| {
            let a = a.relevance_score.unwrap_or(0.0);
            let b = b.relevance_score.unwrap_or(0.0);
            b.partial_cmp(&a).unwrap_or(Ordering::Equal)
        });
        results.truncate(self.results_per_claim);
        Some(results)
    }
}

/// Judges claims by counting agreeing and contradicting search snippets.
pub struct WebSearchChecker {
    evidence: SearchEvidence,
}

impl WebSearchChecker {
    pub fn new(evidence: SearchEvidence) -> Self {
        Self { evidence }
    }
}

/// Non-empty URLs of the retained results.
pub(crate) fn source_links(results: &[SearchResult]) -> Vec<String> {
    results
        .iter()
        .filter(|r| !r.url.is_empty())
        .map(|r| r.url.clone())
        .collect()
}

#[async_trait]
impl ClaimChecker for WebSearchChecker {
    fn name(&self) -> &str {
        "web_search"
    }

    async fn check(&self, claim: &str) -> Result<Option<ClaimResult>> {
        let Some(results) = self.evidence.gather(claim).await else {
            return Ok(Some(ClaimResult::unverifiable(
                claim,
                TECHNICAL_ISSUE,
                WEB_SEARCH_ERROR_SOURCE,
                30,
            )));
        };

        let analysis = analyze(claim, &results);
        let mut result = ClaimResult::new(
            claim,
            analysis.status,
            analysis.explanation,
            WEB_SEARCH_SOURCE,
            analysis.confidence,
        );
        if analysis.status == Status::Inaccurate {
            result.correction = Some(GENERIC_CORRECTION.to_string());
        }
        result.source_links = Some(source_links(&results));
        result.search_results = Some(results);
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifact_search::{FailingSearchProvider, StaticSearchProvider};

    fn hit(title: &str, url: &str, snippet: &str) -> SearchResult {
        SearchResult::new(title, url, snippet, 1, "Google Search")
    }

    #[tokio::test]
    async fn every_query_failing_is_a_technical_issue() {
        let evidence = SearchEvidence::new(Arc::new(FailingSearchProvider::new("down")));
        let result = WebSearchChecker::new(evidence)
            .check("Honey never spoils")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.status, Status::Unverifiable);
        assert_eq!(result.confidence, Some(30));
        assert_eq!(result.source, "Error in Web Search");
        assert!(result.source_links.is_none());
    }

    #[tokio::test]
    async fn results_are_deduplicated_across_queries() {
        let provider = Arc::new(StaticSearchProvider::new(vec![
            hit("Honey never spoils", "https://a", "It is confirmed: honey never spoils"),
            hit("Honey", "", "honey never spoils, verified by archaeologists"),
        ]));
        let evidence = SearchEvidence::new(provider.clone());
        let results = evidence.gather("Honey never spoils").await.unwrap();

        assert_eq!(provider.queries(), 2);
        // One URL entry survives dedup; both URL-less copies are kept.
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.relevance_score.is_some()));
        let scores: Vec<f64> = results.iter().filter_map(|r| r.relevance_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn supported_claim_is_accurate_with_links() {
        let provider = Arc::new(StaticSearchProvider::new(vec![hit(
            "Honey never spoils",
            "https://a",
            "It is confirmed: honey never spoils",
        )]));
        let checker = WebSearchChecker::new(SearchEvidence::new(provider));
        let result = checker.check("Honey never spoils").await.unwrap().unwrap();

        assert_eq!(result.status, Status::Accurate);
        assert_eq!(result.source, WEB_SEARCH_SOURCE);
        assert_eq!(result.source_links, Some(vec!["https://a".to_string()]));
        assert!(result.correction.is_none());
        assert_eq!(result.search_results.map(|r| r.len()), Some(1));
    }

    #[tokio::test]
    async fn contradicted_claim_gets_generic_correction() {
        let provider = Arc::new(StaticSearchProvider::new(vec![hit(
            "Great Wall myth",
            "https://b",
            "It is false that the great wall is visible from space; the claim is a myth",
        )]));
        let checker = WebSearchChecker::new(SearchEvidence::new(provider));
        let result = checker
            .check("The great wall is visible from space")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.status, Status::Inaccurate);
        assert_eq!(result.correction.as_deref(), Some(GENERIC_CORRECTION));
    }
}
