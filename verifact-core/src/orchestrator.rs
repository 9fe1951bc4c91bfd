//! Text in, report out.

use crate::checker::{
    ClaimChecker, KnowledgeBaseChecker, LlmChecker, MockChecker, SearchEvidence, WebSearchChecker,
};
use crate::extract::{split_sentences, ClaimExtractor, HeuristicExtractor, LlmExtractor};
use crate::report::{ClaimResult, FactCheckReport, OPINION_EXPLANATION};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use verifact_common::{Result, VerifactError};
use verifact_config::{CheckerKind, ExtractorKind, SearchProviderKind, VerifactConfig};
use verifact_llm::{ensure_llm_ready, LlmClient};
use verifact_search::{SearchProvider, SerperClient};

const OPINION_SOURCE: &str = "VeriFact Analysis";
const CHECKER_FAILURE: &str = "We could not verify this claim due to an internal error.";
const NO_VERDICT: &str = "We could not find information to verify this claim.";

/// The fact-check pipeline: extract claims, judge each, assemble the report.
///
/// Claims are checked concurrently up to `concurrency` at a time and come
/// back in source order. The curated knowledge base always answers first.
pub struct FactChecker {
    extractor: Arc<dyn ClaimExtractor>,
    backend: Arc<dyn ClaimChecker>,
    max_claims: usize,
    concurrency: usize,
    /// Backend credentials are missing; every request gets the demo report.
    demo: bool,
}

impl FactChecker {
    pub fn new(backend: Arc<dyn ClaimChecker>) -> Self {
        Self {
            extractor: Arc::new(HeuristicExtractor),
            backend,
            max_claims: 5,
            concurrency: 3,
            demo: false,
        }
    }

    /// A checker that answers every request with [`FactCheckReport::demo`].
    pub fn demo() -> Self {
        Self {
            demo: true,
            ..Self::new(Arc::new(MockChecker))
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn ClaimExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_max_claims(mut self, max_claims: usize) -> Self {
        self.max_claims = max_claims.max(1);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    /// Name of the configured backend, `demo` when serving canned output.
    pub fn checker_name(&self) -> &str {
        if self.demo {
            "demo"
        } else {
            self.backend.name()
        }
    }

    /// Wire up collaborators from configuration.
    ///
    /// The LLM is only contacted when the checker or the extractor needs it.
    /// An LLM backend that is unconfigured or unreachable yields a demo
    /// checker rather than an error; an unusable LLM extractor falls back to
    /// the heuristic one. A missing search key is not an error either; the
    /// search client reports it inside the results.
    pub async fn from_config(cfg: &VerifactConfig) -> Result<Self> {
        let engine = &cfg.engine;
        let wants_llm =
            engine.checker == CheckerKind::Llm || engine.extractor == ExtractorKind::Llm;
        let llm = if wants_llm { connect_llm(cfg).await } else { None };

        let backend: Arc<dyn ClaimChecker> = match engine.checker {
            CheckerKind::KnowledgeBase => Arc::new(KnowledgeBaseChecker),
            CheckerKind::Mock => Arc::new(MockChecker),
            CheckerKind::WebSearch => {
                Arc::new(WebSearchChecker::new(search_evidence(cfg, build_search(cfg)?)))
            }
            CheckerKind::Llm => {
                let Some(llm) = llm.clone() else {
                    tracing::warn!("engine.llm_unavailable_serving_demo");
                    return Ok(Self::demo());
                };
                let mut checker = LlmChecker::new(llm).with_timeout(engine.request_timeout());
                // Evidence only helps when it is real.
                if cfg.search.resolved_api_key().is_some() {
                    checker = checker.with_evidence(search_evidence(cfg, build_search(cfg)?));
                }
                Arc::new(checker)
            }
        };

        let extractor: Arc<dyn ClaimExtractor> = match (engine.extractor, llm) {
            (ExtractorKind::Llm, Some(llm)) => Arc::new(LlmExtractor::new(llm)),
            (ExtractorKind::Llm, None) => {
                tracing::warn!("engine.extractor=llm without an LLM; using heuristic extraction");
                Arc::new(HeuristicExtractor)
            }
            (ExtractorKind::Heuristic, _) => Arc::new(HeuristicExtractor),
        };

        tracing::info!(
            checker = backend.name(),
            extractor = extractor.name(),
            max_claims = engine.max_claims,
            concurrency = engine.concurrency,
            "engine.ready"
        );
        Ok(Self::new(backend)
            .with_extractor(extractor)
            .with_max_claims(engine.max_claims)
            .with_concurrency(engine.concurrency))
    }

    /// Fact-check `text`.
    ///
    /// Fails only on blank input. Collaborator failures are folded into the
    /// affected claim's result.
    pub async fn check_text(&self, text: &str) -> Result<FactCheckReport> {
        if text.trim().is_empty() {
            return Err(VerifactError::InvalidInput("Text is required".to_string()));
        }
        if self.demo {
            return Ok(FactCheckReport::demo());
        }

        let claims = self.extractor.extract(text, self.max_claims).await;
        tracing::info!(
            claims = claims.len(),
            extractor = self.extractor.name(),
            "fact_check.claims_extracted"
        );

        if claims.is_empty() {
            let results = split_sentences(text)
                .first()
                .map(|first| {
                    vec![ClaimResult::unverifiable(
                        *first,
                        OPINION_EXPLANATION,
                        OPINION_SOURCE,
                        30,
                    )]
                })
                .unwrap_or_default();
            return Ok(FactCheckReport::assemble(text, results));
        }

        let results: Vec<ClaimResult> = stream::iter(claims)
            .map(|claim| self.check_claim(claim))
            .buffered(self.concurrency)
            .collect()
            .await;

        let report = FactCheckReport::assemble(text, results);
        tracing::info!(truth_score = ?report.truth_score, "fact_check.done");
        Ok(report)
    }

    async fn check_claim(&self, claim: String) -> ClaimResult {
        if let Some(result) = KnowledgeBaseChecker::verify(&claim) {
            tracing::debug!(claim = %claim, status = result.status.as_str(), "fact_check.knowledge_base_hit");
            return result;
        }

        match self.backend.check(&claim).await {
            Ok(Some(result)) => result,
            Ok(None) => ClaimResult::unverifiable(claim, NO_VERDICT, self.backend.name(), 30),
            Err(e) => {
                tracing::warn!(claim = %claim, checker = self.backend.name(), error = %e, "fact_check.checker_failed");
                ClaimResult::unverifiable(claim, CHECKER_FAILURE, self.backend.name(), 30)
            }
        }
    }
}

/// The configured LLM client, or `None` when it is missing or unreachable.
async fn connect_llm(cfg: &VerifactConfig) -> Option<Arc<dyn LlmClient + Send + Sync>> {
    let llm_config = cfg.llm_config();
    if !llm_config.is_configured() {
        tracing::warn!("engine.llm_not_configured");
        return None;
    }
    match ensure_llm_ready(&llm_config).await {
        Ok(llm) => Some(llm),
        Err(e) => {
            tracing::warn!(error = %e, "engine.llm_connect_failed");
            None
        }
    }
}

fn build_search(cfg: &VerifactConfig) -> Result<Arc<dyn SearchProvider>> {
    match cfg.search.provider {
        SearchProviderKind::Serper => {
            let key = cfg.search.resolved_api_key();
            let client = match cfg.search.endpoint.as_deref().map(str::trim) {
                Some(base) if !base.is_empty() => SerperClient::with_base_url(key, base)?,
                _ => SerperClient::new(key)?,
            };
            Ok(Arc::new(client.with_locale(
                cfg.search.country.clone(),
                cfg.search.language.clone(),
            )))
        }
    }
}

fn search_evidence(cfg: &VerifactConfig, provider: Arc<dyn SearchProvider>) -> SearchEvidence {
    SearchEvidence::new(provider)
        .with_limits(cfg.search.results_per_query, cfg.engine.results_per_claim)
        .with_timeout(cfg.engine.request_timeout())
}
