//! Serper.dev Google Search client.
//!
//! Documentation: https://serper.dev/api-reference

use crate::{SearchError, SearchProvider, SearchResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use verifact_http::{Auth, HttpClient, RequestOpts};

pub const SERPER_BASE_URL: &str = "https://google.serper.dev/";

const MISSING_KEY_SNIPPET: &str =
    "The Serper API key is missing. Please add SERPER_API_KEY to your environment variables.";

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    gl: &'a str,
    hl: &'a str,
    num: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
    knowledge_graph: Option<SerperKnowledgeGraph>,
    answer_box: Option<SerperAnswerBox>,
}

#[derive(Debug, Deserialize)]
struct SerperOrganic {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    position: u32,
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerperKnowledgeGraph {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct SerperAnswerBox {
    title: Option<String>,
    #[serde(default)]
    answer: String,
}

/// Serper.dev client.
///
/// Built without a key it still answers, with a single "API Key Missing"
/// notice, so a misconfigured deployment surfaces the problem in the report.
pub struct SerperClient {
    client: HttpClient,
    api_key: Option<String>,
    country: String,
    language: String,
}

impl SerperClient {
    pub fn new(api_key: Option<String>) -> Result<Self, SearchError> {
        Self::with_base_url(api_key, SERPER_BASE_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: &str) -> Result<Self, SearchError> {
        Ok(Self {
            client: HttpClient::new(base_url)?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            country: "us".to_string(),
            language: "en".to_string(),
        })
    }

    /// Override the `gl`/`hl` locale parameters.
    pub fn with_locale(mut self, country: impl Into<String>, language: impl Into<String>) -> Self {
        self.country = country.into();
        self.language = language.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn missing_key_result() -> SearchResult {
        SearchResult {
            relevance_score: Some(1.0),
            ..SearchResult::new("API Key Missing", "", MISSING_KEY_SNIPPET, 1, "VeriFact System")
        }
    }
}

/// Flatten a Serper payload into position-ordered results.
///
/// Knowledge-graph and answer-box entries sit at position 0 so they lead.
fn process_results(data: SerperResponse, limit: usize) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = data
        .organic
        .into_iter()
        .take(limit)
        .map(|r| {
            SearchResult::new(
                r.title,
                r.link,
                r.snippet,
                r.position,
                r.source.unwrap_or_else(|| "Google Search".to_string()),
            )
        })
        .collect();

    if let Some(kg) = data.knowledge_graph {
        results.push(SearchResult::new(kg.title, "", kg.description, 0, "Knowledge Graph"));
    }
    if let Some(ab) = data.answer_box {
        results.push(SearchResult::new(
            ab.title.unwrap_or_else(|| "Featured Snippet".to_string()),
            "",
            ab.answer,
            0,
            "Featured Snippet",
        ));
    }

    // Stable sort keeps organic order among equal positions.
    results.sort_by_key(|r| r.position);
    results.truncate(limit);
    results
}

#[async_trait]
impl SearchProvider for SerperClient {
    fn name(&self) -> &str {
        "serper"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!(query, "serper.api_key_missing");
            return Ok(vec![Self::missing_key_result()]);
        };

        let body = SerperRequest {
            q: query,
            gl: &self.country,
            hl: &self.language,
            num: limit,
        };
        let opts = RequestOpts {
            auth: Some(Auth::header("x-api-key", api_key)?),
            ..Default::default()
        };

        let data: SerperResponse = self.client.post_json_opts("search", &body, opts).await?;
        let results = process_results(data, limit);
        tracing::debug!(query, count = results.len(), "serper.search");
        Ok(results)
    }
}
