//! Report types and their assembly: summary text, suggestions, truth score.

use serde::{Deserialize, Serialize};
use verifact_search::SearchResult;

pub const GENERIC_CORRECTION: &str = "Based on our search results, this claim appears to need correction. Please check the provided sources for accurate information.";
pub const OPINION_EXPLANATION: &str =
    "This statement is either an opinion or lacks sufficient context for fact-checking.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Accurate,
    Inaccurate,
    Unverifiable,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Accurate => "ACCURATE",
            Status::Inaccurate => "INACCURATE",
            Status::Unverifiable => "UNVERIFIABLE",
        }
    }

    /// Parse a normalised model status; anything unknown is unverifiable.
    pub fn from_label(label: &str) -> Self {
        match label {
            "ACCURATE" => Status::Accurate,
            "INACCURATE" => Status::Inaccurate,
            _ => Status::Unverifiable,
        }
    }
}

/// Verdict for one claim as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResult {
    pub claim: String,
    pub status: Status,
    pub explanation: String,
    pub source: String,
    /// Serialised as `null` when absent.
    #[serde(default)]
    pub correction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_links: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_results: Option<Vec<SearchResult>>,
}

impl ClaimResult {
    pub fn new(
        claim: impl Into<String>,
        status: Status,
        explanation: impl Into<String>,
        source: impl Into<String>,
        confidence: u8,
    ) -> Self {
        Self {
            claim: claim.into(),
            status,
            explanation: explanation.into(),
            source: source.into(),
            correction: None,
            confidence: Some(confidence.min(100)),
            source_links: None,
            search_results: None,
        }
    }

    pub fn unverifiable(
        claim: impl Into<String>,
        explanation: impl Into<String>,
        source: impl Into<String>,
        confidence: u8,
    ) -> Self {
        Self::new(claim, Status::Unverifiable, explanation, source, confidence)
    }

    pub fn with_correction(mut self, correction: impl Into<String>) -> Self {
        self.correction = Some(correction.into());
        self
    }

    fn has_source_links(&self) -> bool {
        self.source_links.as_ref().is_some_and(|l| !l.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckReport {
    pub summary: String,
    pub fact_check_results: Vec<ClaimResult>,
    pub suggestions: Vec<String>,
    pub truth_score: Option<u8>,
}

/// `round(100 * accurate / total)`, or `None` with no claims.
pub fn truth_score(results: &[ClaimResult]) -> Option<u8> {
    if results.is_empty() {
        return None;
    }
    let accurate = count(results, Status::Accurate);
    Some((100.0 * accurate as f64 / results.len() as f64).round() as u8)
}

fn count(results: &[ClaimResult], status: Status) -> usize {
    results.iter().filter(|r| r.status == status).count()
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

pub fn summarize(results: &[ClaimResult], truth_score: Option<u8>) -> String {
    let Some(score) = truth_score.filter(|_| !results.is_empty()) else {
        return "We couldn't identify specific factual claims in your text to verify.".to_string();
    };

    let total = results.len();
    let accurate = count(results, Status::Accurate);
    let inaccurate = count(results, Status::Inaccurate);
    let unverifiable = count(results, Status::Unverifiable);

    let mut summary = format!(
        "We analyzed your text and found {total} claim{} to fact-check. ",
        plural(total)
    );
    if accurate > 0 {
        let verb = if accurate == 1 { "appears" } else { "appear" };
        summary.push_str(&format!("{accurate} {verb} to be accurate. "));
    }
    if inaccurate > 0 {
        let verb = if inaccurate == 1 { "contains" } else { "contain" };
        summary.push_str(&format!("{inaccurate} {verb} potential inaccuracies. "));
    }
    if unverifiable > 0 {
        let verb = if unverifiable == 1 { "is" } else { "are" };
        summary.push_str(&format!("{unverifiable} {verb} difficult to verify. "));
    }

    summary.push_str(match score {
        80.. => "Overall, your text appears to be factually accurate based on our search results.",
        50..=79 => "Your text contains a mix of accurate and potentially inaccurate information according to our search.",
        _ => "Your text contains several statements that may need verification or correction based on our search results.",
    });
    summary
}

pub fn suggestions(results: &[ClaimResult], text: &str) -> Vec<String> {
    let mut out = Vec::new();

    let inaccurate = count(results, Status::Inaccurate);
    if inaccurate > 0 {
        out.push(format!(
            "Consider revising the {inaccurate} inaccurate statement{} identified in your text.",
            plural(inaccurate)
        ));
    }

    let cites_sources = ["according to", "cited", "source"]
        .iter()
        .any(|marker| text.contains(marker));
    if text.chars().count() > 100 && !cites_sources {
        out.push("Adding sources to your claims would strengthen your text's credibility.".to_string());
    }

    if results.len() > 1 && results.iter().any(|r| r.claim.chars().count() < 50) {
        out.push("Some of your statements could benefit from more specific details.".to_string());
    }

    if results.iter().any(ClaimResult::has_source_links) {
        out.push(
            "Review the provided source links for more detailed information about these claims."
                .to_string(),
        );
    }

    if out.is_empty() {
        out.push(
            "Consider adding more context or specific details to strengthen your arguments."
                .to_string(),
        );
    }
    out
}

impl FactCheckReport {
    /// Build the report for `text` from per-claim results, in order.
    pub fn assemble(text: &str, results: Vec<ClaimResult>) -> Self {
        let truth_score = truth_score(&results);
        Self {
            summary: summarize(&results, truth_score),
            suggestions: suggestions(&results, text),
            fact_check_results: results,
            truth_score,
        }
    }

    /// Fixed payload served when the configured backend has no credentials.
    pub fn demo() -> Self {
        let demo_claim = |claim: &str, status, explanation: &str, correction: Option<&str>| {
            ClaimResult {
                claim: claim.to_string(),
                status,
                explanation: explanation.to_string(),
                source: "Demo Source".to_string(),
                correction: correction.map(str::to_string),
                confidence: None,
                source_links: None,
                search_results: None,
            }
        };
        Self {
            summary: "This is a demo result because API keys are missing. In a real deployment, you would see actual fact-checking results here.".to_string(),
            fact_check_results: vec![
                demo_claim(
                    "The Earth is round.",
                    Status::Accurate,
                    "This is widely accepted scientific fact.",
                    None,
                ),
                demo_claim(
                    "The Earth is flat.",
                    Status::Inaccurate,
                    "This contradicts established scientific knowledge.",
                    Some("The Earth is an oblate spheroid."),
                ),
            ],
            suggestions: vec![
                "This is a demo suggestion. Add real API keys to get actual suggestions.".to_string(),
                "Configure your environment with valid search and LLM API keys.".to_string(),
            ],
            truth_score: Some(50),
        }
    }

    /// Minimal well-formed payload for when checking itself broke down.
    pub fn error_fallback() -> Self {
        Self {
            summary: "An error occurred during fact-checking.".to_string(),
            fact_check_results: Vec::new(),
            suggestions: vec!["Please try again with a different text.".to_string()],
            truth_score: None,
        }
    }
}
