use regex::Regex;
use std::sync::OnceLock;

/// Claims longer than this also get a subject + predicate query.
const LONG_CLAIM_CHARS: usize = 50;

fn copula_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+(?:is|are|was|were)\s+").expect("static regex"))
}

/// Search queries for one claim, most literal first.
///
/// Always the cleaned claim and a `fact check` variant; long claims add a
/// shorter query built from the text around the first copula.
pub fn generate_queries(claim: &str) -> Vec<String> {
    let clean: String = claim.trim().chars().filter(|c| !matches!(c, '\'' | '"')).collect();
    let mut queries = vec![clean.clone()];

    if clean.chars().count() > LONG_CLAIM_CHARS {
        let mut parts = copula_re().split(&clean);
        if let (Some(subject), Some(predicate)) = (parts.next(), parts.next()) {
            let predicate = predicate.split('.').next().unwrap_or_default();
            queries.push(format!("{subject} {predicate}"));
        }
    }

    queries.push(format!("fact check {clean}"));
    queries
}
