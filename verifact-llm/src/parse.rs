//! Tolerant parsing of model output.
//!
//! Models wrap JSON in markdown fences, prepend chatter, or drift on casing.
//! Everything here degrades to `None` rather than failing loudly; callers
//! decide what a missing value means.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Verdict for a single claim as reported by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmVerdict {
    /// `ACCURATE`, `INACCURATE` or `UNVERIFIABLE` after normalisation.
    pub status: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub correction: Option<String>,
    /// 0-100 once normalised.
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl LlmVerdict {
    /// Upper-case the status, collapse anything unknown to `UNVERIFIABLE`,
    /// drop empty/"null" corrections and clamp confidence into 0..=100.
    pub fn normalized(mut self) -> Self {
        let status = self.status.trim().to_ascii_uppercase();
        self.status = match status.as_str() {
            "ACCURATE" | "INACCURATE" | "UNVERIFIABLE" => status,
            "TRUE" | "CORRECT" => "ACCURATE".to_string(),
            "FALSE" | "INCORRECT" => "INACCURATE".to_string(),
            _ => "UNVERIFIABLE".to_string(),
        };
        self.correction = self
            .correction
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("null"));
        self.confidence = self.confidence.map(|c| {
            // Some models answer on a 0-1 scale; whole numbers are already percentages.
            let scaled = if c > 0.0 && c < 1.0 { c * 100.0 } else { c };
            scaled.clamp(0.0, 100.0)
        });
        self
    }
}

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*([\[{].*?[\]}])\s*```").expect("static regex")
    })
}

/// Locate a JSON object or array inside model output.
///
/// Prefers a fenced ```json block, then the widest `{...}` or `[...]` span,
/// whichever opens first.
pub fn extract_json_block(text: &str) -> Option<String> {
    if let Some(caps) = fence_re().captures(text) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }

    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| text[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_fenced_object() {
        let text = "Sure!\n```json\n{\"status\":\"ACCURATE\"}\n```\nanything else?";
        assert_eq!(
            extract_json_block(text).as_deref(),
            Some("{\"status\":\"ACCURATE\"}")
        );
    }

    #[test]
    fn finds_bare_array() {
        let text = "Claims: [\"The Earth orbits the Sun\", \"Water boils at 100C\"] done";
        let block = extract_json_block(text).unwrap();
        let claims: Vec<String> = serde_json::from_str(&block).unwrap();
        assert_eq!(claims.len(), 2);
    }

    #[test]
    fn no_json_is_none() {
        assert!(extract_json_block("I cannot help with that").is_none());
        assert!(extract_json_block("} backwards {").is_none());
    }

    #[test]
    fn verdict_normalisation() {
        let v = LlmVerdict {
            status: " false ".into(),
            explanation: "x".into(),
            source: None,
            correction: Some("null".into()),
            confidence: Some(0.87),
        }
        .normalized();
        assert_eq!(v.status, "INACCURATE");
        assert_eq!(v.correction, None);
        assert_eq!(v.confidence, Some(87.0));

        let odd = LlmVerdict {
            status: "maybe".into(),
            explanation: String::new(),
            source: None,
            correction: Some("Fix it".into()),
            confidence: Some(250.0),
        }
        .normalized();
        assert_eq!(odd.status, "UNVERIFIABLE");
        assert_eq!(odd.correction.as_deref(), Some("Fix it"));
        assert_eq!(odd.confidence, Some(100.0));
    }

    #[test]
    fn whole_number_confidence_is_a_percentage() {
        let verdict = |confidence| {
            LlmVerdict {
                status: "ACCURATE".into(),
                explanation: String::new(),
                source: None,
                correction: None,
                confidence: Some(confidence),
            }
            .normalized()
            .confidence
        };
        assert_eq!(verdict(1.0), Some(1.0));
        assert_eq!(verdict(0.0), Some(0.0));
        assert_eq!(verdict(0.5), Some(50.0));
        assert_eq!(verdict(85.0), Some(85.0));
    }
}
