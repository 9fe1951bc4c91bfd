use super::ClaimChecker;
use crate::knowledge;
use crate::report::{ClaimResult, Status, GENERIC_CORRECTION};
use async_trait::async_trait;
use verifact_common::Result;

pub const KNOWLEDGE_BASE_SOURCE: &str = "VeriFact Knowledge Base";

/// Answers from the curated table, silent on everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnowledgeBaseChecker;

impl KnowledgeBaseChecker {
    pub fn verify(claim: &str) -> Option<ClaimResult> {
        let verdict = knowledge::verify(claim)?;
        let status = if verdict.is_accurate {
            Status::Accurate
        } else {
            Status::Inaccurate
        };
        let mut result = ClaimResult::new(
            claim,
            status,
            verdict.explanation,
            KNOWLEDGE_BASE_SOURCE,
            verdict.confidence,
        );
        if !verdict.is_accurate {
            result.correction = Some(
                verdict
                    .correction
                    .unwrap_or_else(|| GENERIC_CORRECTION.to_string()),
            );
        }
        Some(result)
    }
}

#[async_trait]
impl ClaimChecker for KnowledgeBaseChecker {
    fn name(&self) -> &str {
        "knowledge_base"
    }

    async fn check(&self, claim: &str) -> Result<Option<ClaimResult>> {
        Ok(Self::verify(claim))
    }
}
