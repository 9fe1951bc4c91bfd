//! Loader for VeriFact configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added; `VERIFACT__`-prefixed
//! environment variables are applied last and win over every file.
//! `VERIFACT__ENGINE__MAX_CLAIMS=3` maps to `engine.max_claims`. After merging,
//! every string value goes through recursive `${VAR}` expansion. Placeholders
//! whose variable is unset are left untouched and count as "not configured".
//!
//! Every section is optional:
//!
//! ```yaml
//! server:  { bind: "127.0.0.1:3000", require_session: false,
//!            tokens: { ada: "${ADA_TOKEN}" }, report_history: 1000 }
//! engine:  { checker: web_search, extractor: heuristic, max_claims: 5,
//!            concurrency: 3, request_timeout_secs: 10, results_per_claim: 5 }
//! search:  { provider: serper, api_key: "${SERPER_API_KEY}", results_per_query: 5,
//!            country: us, language: en }
//! llm:     { provider: openai, model: gpt-4o-mini, auth_token: "${OPENAI_API_KEY}" }
//! logging: { app_name: verifact, format: text, default_filter: info, emit_stderr: true }
//! ```
use config::{Config, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use verifact_common::observability::{LogConfig, LogFormat};

pub use config::ConfigError;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerifactConfig {
    pub server: ServerSettings,
    pub engine: EngineSettings,
    pub search: SearchSettings,
    pub llm: Option<LlmSettings>,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    /// Reject callers without a session.
    pub require_session: bool,
    /// User id to bearer token. Empty means every caller is anonymous.
    pub tokens: HashMap<String, String>,
    /// How many finished reports the in-memory store keeps.
    pub report_history: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            require_session: false,
            tokens: HashMap::new(),
            report_history: 1000,
        }
    }
}

impl ServerSettings {
    /// `(token, user)` pairs whose token was actually supplied.
    pub fn session_tokens(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .tokens
            .iter()
            .filter_map(|(user, token)| resolved(token).map(|t| (t, user.clone())))
            .collect();
        pairs.sort();
        pairs
    }
}

/// Which backend judges claims the knowledge base could not decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckerKind {
    #[default]
    WebSearch,
    Llm,
    KnowledgeBase,
    Mock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    #[default]
    Heuristic,
    Llm,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub checker: CheckerKind,
    pub extractor: ExtractorKind,
    pub max_claims: usize,
    pub concurrency: usize,
    pub request_timeout_secs: u64,
    pub results_per_claim: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            checker: CheckerKind::default(),
            extractor: ExtractorKind::default(),
            max_claims: 5,
            concurrency: 3,
            request_timeout_secs: 10,
            results_per_claim: 5,
        }
    }
}

impl EngineSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProviderKind {
    #[default]
    Serper,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub provider: SearchProviderKind,
    pub api_key: Option<String>,
    /// Override for the provider endpoint, mostly for tests.
    pub endpoint: Option<String>,
    pub results_per_query: usize,
    pub country: String,
    pub language: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: SearchProviderKind::default(),
            api_key: None,
            endpoint: None,
            results_per_query: 5,
            country: "us".to_string(),
            language: "en".to_string(),
        }
    }
}

impl SearchSettings {
    /// The API key, if one was actually supplied.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key.as_deref().and_then(resolved)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmSettings {
    Openai {
        #[serde(default = "default_openai_model")]
        model: String,
        #[serde(default)]
        auth_token: String,
        #[serde(default)]
        endpoint: Option<String>,
    },
    Gemini {
        #[serde(default = "default_gemini_model")]
        model: String,
        #[serde(default)]
        auth_token: String,
    },
    Ollama {
        #[serde(default = "default_ollama_model")]
        model: String,
        #[serde(default = "default_ollama_endpoint")]
        endpoint: String,
    },
}

fn default_openai_model() -> String {
    "gpt-4o-mini".into()
}
fn default_gemini_model() -> String {
    "gemini-1.5-flash".into()
}
fn default_ollama_model() -> String {
    "llama3.2:3b".into()
}
fn default_ollama_endpoint() -> String {
    "http://localhost:11434".into()
}

impl LlmSettings {
    /// Convert into the provider enum consumed by `verifact-llm`.
    ///
    /// Unresolved `${VAR}` credentials become empty strings so that
    /// [`verifact_common::LlmConfig::is_configured`] reports them as missing.
    pub fn to_llm_config(&self) -> verifact_common::LlmConfig {
        use verifact_common::LlmConfig;
        match self {
            LlmSettings::Openai {
                model,
                auth_token,
                endpoint,
            } => LlmConfig::OpenAi {
                api_key: resolved(auth_token).unwrap_or_default(),
                model: model.clone(),
                base_url: endpoint.as_deref().and_then(resolved),
            },
            LlmSettings::Gemini { model, auth_token } => LlmConfig::Gemini {
                api_key: resolved(auth_token).unwrap_or_default(),
                model: model.clone(),
            },
            LlmSettings::Ollama { model, endpoint } => LlmConfig::Ollama {
                base_url: resolved(endpoint).unwrap_or_default(),
                model: model.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub app_name: String,
    pub format: String,
    pub default_filter: String,
    pub emit_stderr: bool,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            app_name: "verifact".to_string(),
            format: "text".to_string(),
            default_filter: "info".to_string(),
            emit_stderr: true,
            dir: None,
        }
    }
}

impl LoggingSettings {
    pub fn to_log_config(&self) -> Result<LogConfig, ConfigError> {
        let format: LogFormat = self.format.parse().map_err(ConfigError::Message)?;
        Ok(LogConfig {
            app_name: self.app_name.clone(),
            log_dir: self.dir.clone(),
            emit_stderr: self.emit_stderr,
            format,
            default_filter: self.default_filter.clone(),
        })
    }
}

impl VerifactConfig {
    /// The configured LLM, or `LlmConfig::None` when the section is absent.
    pub fn llm_config(&self) -> verifact_common::LlmConfig {
        self.llm
            .as_ref()
            .map(LlmSettings::to_llm_config)
            .unwrap_or_default()
    }
}

/// Trimmed value, or `None` when blank or still an unexpanded placeholder.
fn resolved(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains("${") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct VerifactConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for VerifactConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl VerifactConfigLoader {
    /// Start empty; `VERIFACT__` env overrides are layered on at [`Self::load`].
    ///
    /// ```
    /// use verifact_config::{CheckerKind, VerifactConfigLoader};
    ///
    /// let config = VerifactConfigLoader::new()
    ///     .with_yaml_str("engine:\n  checker: mock\n  max_claims: 3")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.engine.checker, CheckerKind::Mock);
    /// assert_eq!(config.engine.max_claims, 3);
    /// assert_eq!(config.engine.concurrency, 3);
    /// assert_eq!(config.server.bind, "127.0.0.1:3000");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, for deployments driven purely by env.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use verifact_config::VerifactConfigLoader;
    ///
    /// unsafe { std::env::set_var("DOC_SERPER_KEY", "injected-from-env"); }
    ///
    /// let config = VerifactConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// search:
    ///   api_key: "${DOC_SERPER_KEY}"
    /// llm:
    ///   provider: openai
    ///   auth_token: "${DOC_UNSET_OPENAI_KEY}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.search.resolved_api_key().as_deref(), Some("injected-from-env"));
    /// assert!(!config.llm_config().is_configured());
    ///
    /// unsafe { std::env::remove_var("DOC_SERPER_KEY"); }
    /// ```
    pub fn load(self) -> Result<VerifactConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("VERIFACT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: VerifactConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;
        Ok(typed)
    }
}

impl VerifactConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.max_claims == 0 {
            return Err(ConfigError::Message(
                "engine.max_claims must be at least 1".to_string(),
            ));
        }
        if self.engine.concurrency == 0 {
            return Err(ConfigError::Message(
                "engine.concurrency must be at least 1".to_string(),
            ));
        }
        if self.server.require_session && self.server.session_tokens().is_empty() {
            return Err(ConfigError::Message(
                "server.require_session needs at least one entry in server.tokens".to_string(),
            ));
        }
        self.logging.format.parse::<LogFormat>().map_err(ConfigError::Message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("VF_FOO", Some("bar"), || {
            let mut v = json!("prefix-${VF_FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("VF_CITY", Some("Lagos")), ("VF_CC", Some("NG"))], || {
            let mut v = json!(["hello-$VF_CITY", { "loc": "${VF_CITY}-${VF_CC}" }, 42, true, null]);
            expand_env_in_value(&mut v);
            assert_eq!(v, json!(["hello-Lagos", { "loc": "Lagos-NG" }, 42, true, null]));
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("VF_BAZ", Some("qux")),
                ("VF_BAR", Some("mid-${VF_BAZ}")),
                ("VF_TOP", Some("start-${VF_BAR}-end")),
            ],
            || {
                let mut v = json!("X=${VF_TOP}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("VF_A", Some("${VF_B}")), ("VF_B", Some("${VF_A}"))], || {
            let mut v = json!("x=${VF_A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${VF_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${VF_DOES_NOT_EXIST}"));
    }

    #[test]
    fn placeholders_do_not_count_as_credentials() {
        assert_eq!(resolved("${SERPER_API_KEY}"), None);
        assert_eq!(resolved("   "), None);
        assert_eq!(resolved(" abc "), Some("abc".to_string()));
    }

    #[test]
    fn llm_settings_map_to_provider_config() {
        let settings = LlmSettings::Openai {
            model: "gpt-4o-mini".into(),
            auth_token: "sk-1".into(),
            endpoint: Some("${UNSET_GATEWAY}".into()),
        };
        match settings.to_llm_config() {
            verifact_common::LlmConfig::OpenAi {
                api_key, base_url, ..
            } => {
                assert_eq!(api_key, "sk-1");
                assert_eq!(base_url, None);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn session_tokens_skip_unresolved_placeholders() {
        let server = ServerSettings {
            tokens: HashMap::from([
                ("ada".to_string(), " t-ada ".to_string()),
                ("bob".to_string(), "${VF_UNSET_BOB_TOKEN}".to_string()),
            ]),
            ..ServerSettings::default()
        };
        assert_eq!(
            server.session_tokens(),
            vec![("t-ada".to_string(), "ada".to_string())]
        );
    }

    #[test]
    fn bad_log_format_is_rejected() {
        let logging = LoggingSettings {
            format: "xml".into(),
            ..LoggingSettings::default()
        };
        assert!(logging.to_log_config().is_err());
    }
}
