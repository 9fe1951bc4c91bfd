mod common;
use verifact_common::Result;
use verifact_llm::openai::OpenAiClient;
use verifact_llm::LlmClient;

const MODEL: &str = "gpt-4o-mini";

#[tokio::test]
#[cfg_attr(not(feature = "e2e"), ignore)]
async fn openai_check_claim_smoketest() -> Result<()> {
    common::init_test_tracing();
    let Ok(key) = std::env::var("OPENAI_API_KEY") else {
        tracing::debug!("Skipping: OPENAI_API_KEY not set");
        return Ok(());
    };
    let client = OpenAiClient::new(key, MODEL.to_string())?;

    let verdict = client
        .check_claim("Pluto is classified as a planet", &[])
        .await?;
    tracing::debug!(?verdict, "openai verdict");

    assert!(["ACCURATE", "INACCURATE", "UNVERIFIABLE"].contains(&verdict.status.as_str()));
    Ok(())
}
