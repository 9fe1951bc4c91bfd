//! Provider-agnostic LLM integration for VeriFact.
//!
//! This crate exposes a common [`traits::LlmClient`] interface and concrete
//! provider implementations for Ollama, OpenAI, and Gemini, plus a scripted
//! client for tests. Claim extraction and per-claim verdicts are default
//! methods on the trait, so every provider gets them for free.
//!
//! # Examples
//! ```no_run
//! use verifact_common::{LlmConfig, Result};
//! use verifact_llm::ensure_llm_ready;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let cfg = LlmConfig::None; // or provider variant under appropriate features
//! let client = ensure_llm_ready(&cfg).await?;
//! assert!(!client.model_name().is_empty());
//! # Ok(())
//! # }
//! ```
pub mod gemini;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod parse;
pub mod prompts;
pub mod traits;

pub use parse::LlmVerdict;
pub use traits::{LlmClient, LlmError, LlmResponse};

use std::sync::Arc;
use verifact_common::{LlmConfig, VerifactError};

pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Build the client selected by `config`.
///
/// Ollama is probed before returning; hosted providers are not contacted.
pub async fn ensure_llm_ready(
    config: &LlmConfig,
) -> verifact_common::Result<Arc<dyn LlmClient + Send + Sync + 'static>> {
    match config {
        #[cfg(feature = "ollama")]
        LlmConfig::Ollama { base_url, model } => {
            let client = ollama::OllamaClient::new(base_url.clone(), model.clone()).await?;
            Ok(Arc::new(client))
        }
        #[cfg(feature = "gemini")]
        LlmConfig::Gemini { api_key, model } => {
            let client = gemini::GeminiClient::new(api_key.clone(), model.clone())?;
            Ok(Arc::new(client))
        }
        #[cfg(feature = "openai")]
        LlmConfig::OpenAi {
            api_key,
            model,
            base_url,
        } => {
            let client = match base_url.as_deref().filter(|b| !b.trim().is_empty()) {
                Some(base) => openai::OpenAiClient::with_base_url(api_key.clone(), model.clone(), base)?,
                None => openai::OpenAiClient::new(api_key.clone(), model.clone())?,
            };
            Ok(Arc::new(client))
        }
        LlmConfig::None => Err(VerifactError::Config("No LLM configured".to_string())),
        #[allow(unreachable_patterns)]
        _ => Err(VerifactError::Config("LLM provider not enabled".to_string())),
    }
}
