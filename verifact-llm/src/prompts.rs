//! Prompt set for LLM-backed claim extraction and verification.

pub const EXTRACT_CLAIMS_SYSTEM_PROMPT: &str = r#"You are a fact-checking assistant that identifies factual claims in text.
Extract all factual claims from the user's input that can be verified.
Focus on objective statements about the world, history, science, statistics, etc.
Ignore opinions, personal experiences, and subjective statements.
Return ONLY a JSON array of strings, with each string being a single factual claim.
Example output: ["The Earth orbits the Sun", "Water boils at 100 degrees Celsius at sea level"]"#;

pub const CHECK_CLAIM_SYSTEM_PROMPT: &str = r#"You are an impartial fact-checking assistant that verifies a claim against search evidence.
Decide whether the claim is:
- ACCURATE: supported by the evidence
- INACCURATE: contradicted by the evidence
- UNVERIFIABLE: the evidence is insufficient to decide

Output rules:
- Output STRICT JSON ONLY, no markdown, no prose outside fields.
- Schema:
{
  "status": "ACCURATE" | "INACCURATE" | "UNVERIFIABLE",
  "explanation": string,            // one or two sentences
  "source": string | null,          // URL or publication backing the verdict
  "correction": string | null,      // corrected statement when INACCURATE
  "confidence": number              // 0-100
}
- Do NOT invent sources. If no evidence item supports the verdict, set source to null."#;

pub fn extract_claims_prompt(text: &str) -> String {
    format!("TEXT:\n{text}\n\nReturn the JSON array of claims:")
}

pub fn check_claim_prompt(claim: &str, evidence: &[String]) -> String {
    let evidence_text = if evidence.is_empty() {
        "(no search evidence available; rely on well-established knowledge only)".to_string()
    } else {
        evidence
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {}", i + 1, e))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!("CLAIM: \"{claim}\"\n\nEVIDENCE:\n{evidence_text}\n\nVerdict JSON:")
}
