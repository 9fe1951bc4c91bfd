//! Interchangeable strategies for judging a single claim.
//!
//! The orchestrator always consults [`KnowledgeBaseChecker`] first and then
//! the configured backend. Backends absorb collaborator failures themselves
//! and report them as unverifiable results; an `Err` from `check` is the
//! exception and is handled per claim by the caller.

mod knowledge;
mod llm;
mod mock;
mod web;

pub use knowledge::{KnowledgeBaseChecker, KNOWLEDGE_BASE_SOURCE};
pub use llm::LlmChecker;
pub use mock::MockChecker;
pub use web::{SearchEvidence, WebSearchChecker};

use crate::report::ClaimResult;
use async_trait::async_trait;
use verifact_common::Result;

#[async_trait]
pub trait ClaimChecker: Send + Sync {
    /// Short identifier for logs and the health endpoint.
    fn name(&self) -> &str;

    /// `Ok(None)` when this checker has nothing to say about the claim.
    async fn check(&self, claim: &str) -> Result<Option<ClaimResult>>;
}
