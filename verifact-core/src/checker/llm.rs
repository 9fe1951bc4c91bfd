use super::web::{source_links, SearchEvidence};
use super::ClaimChecker;
use crate::report::{ClaimResult, Status};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use verifact_common::{Result, VerifactError};
use verifact_llm::{LlmClient, LlmVerdict};
use verifact_search::SearchResult;

const LLM_SOURCE: &str = "LLM Analysis";
const LLM_ERROR_SOURCE: &str = "LLM Analysis (error)";
const LLM_FAILURE: &str =
    "We could not verify this claim due to a technical issue with the language model service.";
/// Used when the model omits a confidence.
const DEFAULT_LLM_CONFIDENCE: u8 = 70;

/// Asks a language model for a verdict, grounded on search evidence when a
/// search provider is available.
pub struct LlmChecker {
    llm: Arc<dyn LlmClient + Send + Sync>,
    evidence: Option<SearchEvidence>,
    request_timeout: Duration,
}

impl LlmChecker {
    pub fn new(llm: Arc<dyn LlmClient + Send + Sync>) -> Self {
        Self {
            llm,
            evidence: None,
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_evidence(mut self, evidence: SearchEvidence) -> Self {
        self.evidence = Some(evidence);
        self
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    async fn evidence_for(&self, claim: &str) -> Vec<SearchResult> {
        match &self.evidence {
            Some(evidence) => evidence.gather(claim).await.unwrap_or_default(),
            None => Vec::new(),
        }
    }

    async fn ask(&self, claim: &str, evidence: &[String]) -> Result<LlmVerdict> {
        timeout(self.request_timeout, self.llm.check_claim(claim, evidence))
            .await
            .map_err(|_| VerifactError::Timeout)?
    }
}

fn evidence_line(result: &SearchResult) -> String {
    if result.url.is_empty() {
        format!("{}: {}", result.title, result.snippet)
    } else {
        format!("{}: {} ({})", result.title, result.snippet, result.url)
    }
}

fn to_claim_result(claim: &str, verdict: LlmVerdict) -> ClaimResult {
    let confidence = verdict
        .confidence
        .map(|c| c.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(DEFAULT_LLM_CONFIDENCE);
    let source = verdict
        .source
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
        .unwrap_or_else(|| LLM_SOURCE.to_string());
    let status = Status::from_label(&verdict.status);

    let mut result = ClaimResult::new(claim, status, verdict.explanation, source, confidence);
    if status == Status::Inaccurate {
        result.correction = verdict.correction;
    }
    result
}

#[async_trait]
impl ClaimChecker for LlmChecker {
    fn name(&self) -> &str {
        "llm"
    }

    async fn check(&self, claim: &str) -> Result<Option<ClaimResult>> {
        let results = self.evidence_for(claim).await;
        let lines: Vec<String> = results.iter().map(evidence_line).collect();

        match self.ask(claim, &lines).await {
            Ok(verdict) => {
                let mut result = to_claim_result(claim, verdict);
                if !results.is_empty() {
                    result.source_links = Some(source_links(&results));
                    result.search_results = Some(results);
                }
                Ok(Some(result))
            }
            Err(e) => {
                tracing::warn!(model = self.llm.model_name(), claim, error = %e, "llm.check_failed");
                Ok(Some(ClaimResult::unverifiable(
                    claim,
                    LLM_FAILURE,
                    LLM_ERROR_SOURCE,
                    30,
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifact_llm::mock::ScriptedLlmClient;
    use verifact_search::StaticSearchProvider;

    #[tokio::test]
    async fn verdict_json_becomes_a_result() {
        let llm = Arc::new(ScriptedLlmClient::new(
            r#"```json
{"status":"inaccurate","explanation":"The wall is too narrow to see.","source":"https://nasa.gov","correction":"It is not visible to the naked eye.","confidence":88}
```"#,
        ));
        let result = LlmChecker::new(llm)
            .check("The Great Wall is visible from space")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.status, Status::Inaccurate);
        assert_eq!(result.source, "https://nasa.gov");
        assert_eq!(result.confidence, Some(88));
        assert_eq!(result.correction.as_deref(), Some("It is not visible to the naked eye."));
        assert!(result.search_results.is_none());
    }

    #[tokio::test]
    async fn evidence_is_attached() {
        let llm = Arc::new(ScriptedLlmClient::new(
            r#"{"status":"ACCURATE","explanation":"ok","source":null,"correction":null,"confidence":0.9}"#,
        ));
        let provider = Arc::new(StaticSearchProvider::new(vec![SearchResult::new(
            "Honey",
            "https://honey",
            "honey never spoils",
            1,
            "Google Search",
        )]));
        let checker = LlmChecker::new(llm.clone()).with_evidence(SearchEvidence::new(provider));
        let result = checker.check("Honey never spoils").await.unwrap().unwrap();

        assert_eq!(result.status, Status::Accurate);
        assert_eq!(result.source, LLM_SOURCE);
        assert_eq!(result.confidence, Some(90));
        assert!(result.correction.is_none());
        assert_eq!(result.source_links, Some(vec!["https://honey".to_string()]));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn model_failure_is_unverifiable() {
        let llm = Arc::new(ScriptedLlmClient::failing("quota exceeded"));
        let result = LlmChecker::new(llm).check("Honey never spoils").await.unwrap().unwrap();
        assert_eq!(result.status, Status::Unverifiable);
        assert_eq!(result.confidence, Some(30));
        assert_eq!(result.source, LLM_ERROR_SOURCE);
    }

    #[tokio::test]
    async fn prose_without_json_is_unverifiable() {
        let llm = Arc::new(ScriptedLlmClient::new("I think it's probably true."));
        let result = LlmChecker::new(llm).check("Honey never spoils").await.unwrap().unwrap();
        assert_eq!(result.source, LLM_ERROR_SOURCE);
    }
}
