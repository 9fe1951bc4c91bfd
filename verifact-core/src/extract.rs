//! Turning free text into checkable claims.

use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use verifact_llm::LlmClient;

/// Sentences shorter than this are too thin to check.
pub const MIN_CLAIM_CHARS: usize = 10;

fn sentence_end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("static regex"))
}

fn factual_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:is|are|was|were|will be|has|have|had|can|could|would|should|must|date|year|percent|study|research|according to|found that)\b",
        )
        .expect("static regex")
    })
}

/// Split on runs of sentence-ending punctuation, trimmed, empties dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_end_re()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether a sentence reads like a factual assertion rather than opinion.
pub fn looks_factual(sentence: &str) -> bool {
    factual_re().is_match(sentence)
}

#[async_trait]
pub trait ClaimExtractor: Send + Sync {
    fn name(&self) -> &str;

    /// At most `limit` claims, in order of appearance.
    async fn extract(&self, text: &str, limit: usize) -> Vec<String>;
}

/// Keyword filter over sentences.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn extract_sync(text: &str, limit: usize) -> Vec<String> {
        split_sentences(text)
            .into_iter()
            .filter(|s| s.chars().count() >= MIN_CLAIM_CHARS && looks_factual(s))
            .take(limit)
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl ClaimExtractor for HeuristicExtractor {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn extract(&self, text: &str, limit: usize) -> Vec<String> {
        Self::extract_sync(text, limit)
    }
}

/// Asks the model for a claim list; any failure falls back to the heuristic.
pub struct LlmExtractor {
    llm: Arc<dyn LlmClient + Send + Sync>,
}

impl LlmExtractor {
    pub fn new(llm: Arc<dyn LlmClient + Send + Sync>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ClaimExtractor for LlmExtractor {
    fn name(&self) -> &str {
        "llm"
    }

    async fn extract(&self, text: &str, limit: usize) -> Vec<String> {
        match self.llm.extract_claims(text, limit).await {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(model = self.llm.model_name(), error = %e, "extract.llm_failed");
                HeuristicExtractor::extract_sync(text, limit)
            }
        }
    }
}
