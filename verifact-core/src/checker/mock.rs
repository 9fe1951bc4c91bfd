use super::ClaimChecker;
use crate::report::{ClaimResult, Status};
use async_trait::async_trait;
use verifact_common::Result;

const MOCK_SOURCE: &str = "Mock Data";

/// Deterministic stand-in for a real backend.
///
/// This is a stub for demos and tests. The keyword table below is not a
/// judgement of anything; unknown claims are always unverifiable.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockChecker;

struct Canned {
    needle: &'static str,
    status: Status,
    explanation: &'static str,
    confidence: u8,
    correction: Option<&'static str>,
}

const CANNED: &[Canned] = &[
    Canned {
        needle: "earth is round",
        status: Status::Accurate,
        explanation: "This is a well-established scientific fact.",
        confidence: 75,
        correction: None,
    },
    Canned {
        needle: "earth is flat",
        status: Status::Inaccurate,
        explanation: "This contradicts established scientific knowledge.",
        confidence: 65,
        correction: Some("The Earth is an oblate spheroid."),
    },
];

#[async_trait]
impl ClaimChecker for MockChecker {
    fn name(&self) -> &str {
        "mock"
    }

    async fn check(&self, claim: &str) -> Result<Option<ClaimResult>> {
        let lower = claim.to_lowercase();
        let result = match CANNED.iter().find(|c| lower.contains(c.needle)) {
            Some(c) => {
                let mut result =
                    ClaimResult::new(claim, c.status, c.explanation, MOCK_SOURCE, c.confidence);
                result.correction = c.correction.map(str::to_string);
                result
            }
            None => ClaimResult::unverifiable(
                claim,
                "The mock checker has no data about this claim.",
                MOCK_SOURCE,
                50,
            ),
        };
        Ok(Some(result))
    }
}
