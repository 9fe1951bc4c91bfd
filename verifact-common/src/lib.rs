//! Common types and utilities shared across VeriFact crates.
//!
//! This crate defines the provider configuration, observability helpers, and the
//! shared error type used throughout the workspace. It stays dependency-light so
//! that every crate can depend on it.
//!
//! # Overview
//!
//! - [`LlmConfig`]: Provider-agnostic LLM configuration
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`VerifactError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use verifact_common::{LlmConfig, VerifactError};
//!
//! let cfg = LlmConfig::default();
//! assert!(!cfg.is_configured());
//!
//! let err = VerifactError::Config("missing key".into());
//! assert_eq!(err.to_string(), "Configuration error: missing key");
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Configuration for an LLM provider used by the fact-check engine.
///
/// Feature flags control which variants are compiled in.
/// See the `verifact-llm` crate for concrete client implementations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum LlmConfig {
    #[cfg(feature = "ollama")]
    Ollama { base_url: String, model: String },
    #[cfg(feature = "gemini")]
    Gemini { api_key: String, model: String },
    #[cfg(feature = "openai")]
    OpenAi {
        api_key: String,
        model: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    #[default]
    None,
}

impl LlmConfig {
    /// True when a provider is selected and its credentials are non-empty.
    pub fn is_configured(&self) -> bool {
        match self {
            #[cfg(feature = "ollama")]
            LlmConfig::Ollama { base_url, .. } => !base_url.trim().is_empty(),
            #[cfg(feature = "gemini")]
            LlmConfig::Gemini { api_key, .. } => !api_key.trim().is_empty(),
            #[cfg(feature = "openai")]
            LlmConfig::OpenAi { api_key, .. } => !api_key.trim().is_empty(),
            LlmConfig::None => false,
        }
    }
}

/// Error types used across the VeriFact system.
#[derive(thiserror::Error, Debug)]
pub enum VerifactError {
    /// An external provider (LLM, search) failed to complete a request.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied input the engine cannot work with.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A provider answered but the payload could not be understood.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Operation exceeded the configured timeout.
    #[error("Timeout occurred")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Convenient alias for results that use [`VerifactError`].
pub type Result<T> = std::result::Result<T, VerifactError>;
