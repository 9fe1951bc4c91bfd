use crate::parse::{extract_json_block, LlmVerdict};
use crate::prompts;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use verifact_common::{Result, VerifactError};
use verifact_http::HttpError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("API error: {0}")]
    Api(String),

    #[error("Empty response from {0}")]
    EmptyResponse(&'static str),

    #[error("Content blocked: {0}")]
    Blocked(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Unparseable model output: {0}")]
    Unparseable(String),
}

impl From<LlmError> for VerifactError {
    fn from(e: LlmError) -> Self {
        VerifactError::Provider(e.to_string())
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response to the given prompt with optional system prompt
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse>;

    /// Check if the LLM service is available
    async fn health_check(&self) -> Result<bool>;

    fn model_name(&self) -> &str;

    /// Pull the verifiable factual claims out of free text.
    ///
    /// The model is asked for a bare JSON array of strings; fenced output is
    /// tolerated. At most `limit` claims are returned, trimmed and non-empty.
    async fn extract_claims(&self, text: &str, limit: usize) -> Result<Vec<String>> {
        let response = self
            .generate(
                &prompts::extract_claims_prompt(text),
                Some(prompts::EXTRACT_CLAIMS_SYSTEM_PROMPT),
                Some(1024),
                Some(0.2),
            )
            .await?;
        tracing::debug!(model = self.model_name(), raw = %response.text, "llm.extract_claims");

        let json = extract_json_block(&response.text)
            .ok_or_else(|| LlmError::Unparseable("no JSON array in claim list".into()))?;
        let claims: Vec<String> = serde_json::from_str(&json)?;

        Ok(claims
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .take(limit)
            .collect())
    }

    /// Judge one claim against numbered evidence snippets.
    async fn check_claim(&self, claim: &str, evidence: &[String]) -> Result<LlmVerdict> {
        let response = self
            .generate(
                &prompts::check_claim_prompt(claim, evidence),
                Some(prompts::CHECK_CLAIM_SYSTEM_PROMPT),
                Some(512),
                Some(0.2),
            )
            .await?;
        tracing::debug!(model = self.model_name(), raw = %response.text, "llm.check_claim");

        let json = extract_json_block(&response.text)
            .ok_or_else(|| LlmError::Unparseable("no JSON object in verdict".into()))?;
        let verdict: LlmVerdict = serde_json::from_str(&json)?;
        Ok(verdict.normalized())
    }
}
