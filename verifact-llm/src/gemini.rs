use crate::traits::{LlmClient, LlmError, LlmResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use verifact_common::Result;
use verifact_http::{Auth, HttpClient, HttpError, RequestOpts};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    total_token_count: Option<u32>,
}

/// Google Gemini API client.
///
/// Requires a valid API key and internet access.
pub struct GeminiClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        Self::with_base_url(api_key, model, GEMINI_BASE_URL)
    }

    pub fn with_base_url(api_key: String, model: String, base_url: &str) -> Result<Self> {
        let client = HttpClient::new(base_url)
            .map_err(LlmError::from)?
            .with_timeout(Duration::from_secs(60));
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let path = format!("models/{}:generateContent", self.model);

        let generation_config = (max_tokens.is_some() || temperature.is_some()).then_some(
            GeminiGenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            },
        );
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config,
            system_instruction: system_prompt.map(|text| GeminiContent {
                parts: vec![GeminiPart { text }],
            }),
        };

        let opts = RequestOpts {
            auth: Some(Auth::Query {
                name: "key",
                value: self.api_key.as_str().into(),
            }),
            ..Default::default()
        };

        let resp: GeminiResponse = self
            .client
            .post_json_opts(&path, &request, opts)
            .await
            .map_err(|e| match e {
                HttpError::Api { status, .. } if status.as_u16() == 401 || status.as_u16() == 403 => {
                    LlmError::Api("Gemini rejected the API key".to_string())
                }
                other => LlmError::Http(other),
            })?;

        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse("gemini"))?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(LlmError::Blocked("Gemini safety filters".to_string()).into());
        }

        let text = candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or(LlmError::EmptyResponse("gemini"))?;

        Ok(LlmResponse {
            text,
            model: Some(self.model.clone()),
            tokens_used: resp.usage_metadata.and_then(|u| u.total_token_count),
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self
            .generate("Respond with just 'OK'", None, Some(5), Some(0.1))
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(error = %e, "gemini.health_check_failed");
                Ok(false)
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
