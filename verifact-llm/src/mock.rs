//! Deterministic in-process model for tests and offline runs.

use crate::traits::{LlmClient, LlmError, LlmResponse};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use verifact_common::Result;

/// Scripted LLM client.
///
/// Replies are chosen by the first registered needle found in the prompt,
/// falling back to a default reply.
///
/// ```
/// use verifact_llm::mock::ScriptedLlmClient;
/// use verifact_llm::LlmClient;
///
/// # tokio_test_block(async {
/// let llm = ScriptedLlmClient::new("[]")
///     .with_reply("Pluto", r#"{"status":"INACCURATE","explanation":"dwarf planet"}"#);
/// let out = llm.generate("Is Pluto a planet?", None, None, None).await.unwrap();
/// assert!(out.text.contains("INACCURATE"));
/// assert_eq!(llm.calls(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedLlmClient {
    default_reply: String,
    replies: Arc<Mutex<Vec<(String, String)>>>,
    fail_with: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedLlmClient {
    pub fn new(default_reply: impl Into<String>) -> Self {
        Self {
            default_reply: default_reply.into(),
            replies: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A client whose every call fails with an API error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::new("")
        }
    }

    pub fn with_reply(self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((needle.into(), reply.into()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn generate(
        &self,
        prompt: &str,
        _system_prompt: Option<&str>,
        _max_tokens: Option<u32>,
        _temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(LlmError::Api(message.clone()).into());
        }

        let text = self
            .replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.clone());

        Ok(LlmResponse {
            text,
            model: Some("scripted".to_string()),
            tokens_used: None,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.fail_with.is_none())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn extract_claims_parses_fenced_array() {
        let llm = ScriptedLlmClient::new(
            "Here you go:\n```json\n[\"The Earth orbits the Sun\", \"  \", \"Water boils at 100C\", \"Extra\"]\n```",
        );
        let claims = llm.extract_claims("whatever", 2).await.unwrap();
        assert_eq!(
            claims,
            vec!["The Earth orbits the Sun".to_string(), "Water boils at 100C".to_string()]
        );
    }

    #[tokio::test]
    async fn check_claim_normalises_verdict() {
        let llm = ScriptedLlmClient::new(
            r#"{"status":"false","explanation":"Pluto is a dwarf planet.","source":null,"correction":"Pluto is a dwarf planet.","confidence":0.9}"#,
        );
        let verdict = llm.check_claim("Pluto is a planet", &[]).await.unwrap();
        assert_eq!(verdict.status, "INACCURATE");
        assert_eq!(verdict.confidence, Some(90.0));
        assert_eq!(verdict.correction.as_deref(), Some("Pluto is a dwarf planet."));
    }

    #[tokio::test]
    async fn prose_verdict_is_an_error() {
        let llm = ScriptedLlmClient::new("I think it's probably true.");
        assert!(llm.check_claim("x", &[]).await.is_err());
    }

    #[tokio::test]
    async fn failing_client_errors_and_counts() {
        let llm = ScriptedLlmClient::failing("boom");
        assert!(llm.generate("p", None, None, None).await.is_err());
        assert!(!llm.health_check().await.unwrap());
        assert_eq!(llm.calls(), 1);
    }
}
