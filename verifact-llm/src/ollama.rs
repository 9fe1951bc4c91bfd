use crate::traits::{LlmClient, LlmError, LlmResponse};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use verifact_common::{Result, VerifactError};
use verifact_http::{HttpClient, RequestOpts};

const OLLAMA_CONNECTION_ERROR: &str = "No running Ollama server detected. Start it with: `ollama serve` (after installing). Install instructions: https://github.com/ollama/ollama";

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    eval_count: Option<u32>,
}

/// Ollama client for local model inference.
///
/// Expects a running Ollama server (see https://github.com/ollama/ollama).
pub struct OllamaClient {
    client: HttpClient,
    model: String,
}

impl OllamaClient {
    /// Create a new client and verify the server answers.
    pub async fn new(base_url: String, model: String) -> Result<Self> {
        let client = HttpClient::new(&base_url)
            .map_err(LlmError::from)?
            .with_timeout(Duration::from_secs(120))
            .with_retries(0);

        let ollama_client = Self { client, model };
        let models = ollama_client.fetch_available_models().await?;
        if !models.iter().any(|m| m == &ollama_client.model) {
            tracing::warn!(
                model = %ollama_client.model,
                available = ?models,
                "ollama.model_not_pulled"
            );
        }
        Ok(ollama_client)
    }

    async fn fetch_available_models(&self) -> Result<Vec<String>> {
        let tags: TagsResponse = self
            .client
            .get_json(
                "api/tags",
                RequestOpts {
                    timeout: Some(Duration::from_secs(10)),
                    ..Default::default()
                },
            )
            .await
            .map_err(|_| VerifactError::Provider(OLLAMA_CONNECTION_ERROR.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let mut options = serde_json::Map::new();
        if let Some(temp) = temperature {
            options.insert("temperature".to_string(), json!(temp));
        }
        if let Some(max_tok) = max_tokens {
            options.insert("num_predict".to_string(), json!(max_tok));
        }

        let mut payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": JsonValue::Object(options),
        });
        if let Some(system) = system_prompt {
            payload["system"] = json!(system);
        }

        let resp: GenerateResponse = self
            .client
            .post_json("api/generate", None, &payload)
            .await
            .map_err(LlmError::from)?;

        if resp.response.trim().is_empty() {
            return Err(LlmError::EmptyResponse("ollama").into());
        }

        Ok(LlmResponse {
            text: resp.response,
            model: Some(self.model.clone()),
            tokens_used: resp.eval_count,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.fetch_available_models().await.is_ok())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
