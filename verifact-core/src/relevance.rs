//! Search relevance scoring and the support/contradict tally.
//!
//! Bag-of-words and substring heuristics only. The pattern lists are small
//! and English-only; negation scope ("not confirmed") is not understood.

use crate::report::Status;
use std::collections::HashSet;
use verifact_search::SearchResult;

const SUPPORT_PATTERNS: &[&str] = &[
    "is true",
    "is correct",
    "is accurate",
    "is right",
    "is valid",
    "confirmed",
    "verified",
    "proven",
    "evidence supports",
    "research shows",
    "studies confirm",
    "experts agree",
    "according to",
    "data shows",
];

const CONTRADICT_PATTERNS: &[&str] = &[
    "is false",
    "is incorrect",
    "is inaccurate",
    "is wrong",
    "is invalid",
    "debunked",
    "disproven",
    "myth",
    "no evidence",
    "research contradicts",
    "studies refute",
    "experts disagree",
    "fact check: false",
    "misleading",
];

/// Average relevance below this means the results are off-topic.
pub const MIN_AVERAGE_RELEVANCE: f64 = 0.2;
/// Ceiling for confidence derived from search agreement.
pub const MAX_SEARCH_CONFIDENCE: u8 = 95;

/// Outcome of [`analyze`], before it is dressed up as a claim result.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub status: Status,
    pub explanation: String,
    pub confidence: u8,
}

impl Analysis {
    fn new(status: Status, explanation: impl Into<String>, confidence: u8) -> Self {
        Self {
            status,
            explanation: explanation.into(),
            confidence,
        }
    }
}

/// Claim sub-phrases worth looking for verbatim: punctuation-separated pieces
/// longer than five characters with more than one word, plus the whole claim.
fn phrases(claim_lower: &str) -> Vec<&str> {
    let mut out: Vec<&str> = claim_lower
        .split([',', '.', ';', ':', '!', '?'])
        .map(str::trim)
        .filter(|p| p.len() > 5 && p.split_whitespace().count() > 1)
        .collect();
    if !claim_lower.is_empty() {
        out.push(claim_lower);
    }
    out
}

/// Relevance of one result to `claim`, in `[0, 1]`.
pub fn score(claim: &str, result: &SearchResult) -> f64 {
    let claim_lower = claim.to_lowercase();
    let snippet = result.snippet.to_lowercase();
    let title = result.title.to_lowercase();

    let mut seen = HashSet::new();
    let words: Vec<&str> = claim_lower
        .split_whitespace()
        .filter(|w| w.chars().count() > 3 && seen.insert(*w))
        .collect();

    let mut total = 0.0;
    for word in &words {
        if snippet.contains(word) {
            total += 0.1;
        }
        if title.contains(word) {
            total += 0.05;
        }
    }

    let claim_len = claim_lower.chars().count() as f64;
    for phrase in phrases(&claim_lower) {
        if snippet.contains(phrase) {
            total += 0.2 * (phrase.chars().count() as f64 / claim_len);
        }
    }

    total.clamp(0.0, 1.0)
}

/// Keep the first result per non-empty URL; results without a URL are never
/// collapsed into each other.
pub fn dedup_by_url(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|r| r.url.is_empty() || seen.insert(r.url.clone()))
        .collect()
}

fn supports(claim_lower: &str, snippet: &str) -> usize {
    let mut count = usize::from(SUPPORT_PATTERNS.iter().any(|p| snippet.contains(p)));
    let restates = snippet.contains(claim_lower)
        && !snippet.contains(&format!("not {claim_lower}"))
        && !snippet.contains(&format!("isn't {claim_lower}"))
        && !snippet.contains("false")
        && !snippet.contains("incorrect");
    if restates {
        count += 1;
    }
    count
}

fn contradicts(claim_lower: &str, snippet: &str) -> usize {
    let mut count = usize::from(CONTRADICT_PATTERNS.iter().any(|p| snippet.contains(p)));
    let negated = ["not", "isn't", "no"]
        .iter()
        .any(|neg| snippet.contains(&format!("{neg} {claim_lower}")));
    if negated && !snippet.contains(&format!("not not {claim_lower}")) {
        count += 1;
    }
    count
}

/// Turn scored results into a verdict by counting agreeing snippets.
pub fn analyze(claim: &str, results: &[SearchResult]) -> Analysis {
    if results.is_empty() {
        return Analysis::new(
            Status::Unverifiable,
            "We could not find relevant information to verify this claim.",
            30,
        );
    }

    let average = results
        .iter()
        .map(|r| r.relevance_score.unwrap_or(0.0))
        .sum::<f64>()
        / results.len() as f64;
    if average < MIN_AVERAGE_RELEVANCE {
        return Analysis::new(
            Status::Unverifiable,
            "We found some information but it was not directly relevant to your claim.",
            40,
        );
    }

    let claim_lower = claim.to_lowercase();
    let (support, contradict) = results.iter().fold((0, 0), |(s, c), r| {
        let snippet = r.snippet.to_lowercase();
        (
            s + supports(&claim_lower, &snippet),
            c + contradicts(&claim_lower, &snippet),
        )
    });
    tracing::debug!(support, contradict, average, "relevance.tally");

    if support == contradict {
        return Analysis::new(
            Status::Unverifiable,
            "We found mixed information about this claim, with some sources supporting and others contradicting it.",
            50,
        );
    }

    let ratio = support.max(contradict) as f64 / (support + contradict) as f64;
    let confidence = ((100.0 * ratio).round() as u8).min(MAX_SEARCH_CONFIDENCE);
    if support > contradict {
        Analysis::new(
            Status::Accurate,
            format!("This claim appears to be accurate based on {support} supporting sources found in our search results."),
            confidence,
        )
    } else {
        Analysis::new(
            Status::Inaccurate,
            format!("This claim appears to be inaccurate based on {contradict} contradicting sources found in our search results."),
            confidence,
        )
    }
}
