use serde_json::json;
use verifact_config::{VerifactConfig, VerifactConfigLoader};
use verifact_core::{FactChecker, Status};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HONEY: &str = "Honey is edible for thousands of years";

fn config(yaml: &str) -> VerifactConfig {
    VerifactConfigLoader::new()
        .with_yaml_str(yaml)
        .load()
        .expect("test config")
}

fn serper_config(server: &MockServer, timeout_secs: u64) -> VerifactConfig {
    config(&format!(
        r#"
engine:
  checker: web_search
  request_timeout_secs: {timeout_secs}
search:
  provider: serper
  api_key: serper-test
  endpoint: "{}"
"#,
        server.uri()
    ))
}

#[tokio::test]
async fn web_search_pipeline_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("x-api-key", "serper-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [{
                "title": "Honey is edible for thousands of years",
                "link": "https://honey.example/facts",
                "snippet": "Archaeologists confirmed honey is edible for thousands of years",
                "position": 1
            }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let checker = FactChecker::from_config(&serper_config(&server, 5)).await.unwrap();
    assert_eq!(checker.checker_name(), "web_search");

    let report = checker
        .check_text(&format!("{HONEY}. Pluto is a planet."))
        .await
        .unwrap();

    assert_eq!(report.fact_check_results.len(), 2);
    let honey = &report.fact_check_results[0];
    assert_eq!(honey.claim, HONEY);
    assert_eq!(honey.status, Status::Accurate);
    assert_eq!(honey.source, "Web Search");
    assert_eq!(honey.confidence, Some(95));
    assert_eq!(
        honey.source_links,
        Some(vec!["https://honey.example/facts".to_string()])
    );

    // Knowledge base answers without touching the search backend.
    let pluto = &report.fact_check_results[1];
    assert_eq!(pluto.source, "VeriFact Knowledge Base");
    assert_eq!(pluto.status, Status::Inaccurate);

    assert_eq!(report.truth_score, Some(50));
    assert!(report.summary.starts_with("We analyzed your text and found 2 claims"));
}

#[tokio::test]
async fn missing_search_key_surfaces_as_a_result() {
    let checker = FactChecker::from_config(&config("engine:\n  checker: web_search\n"))
        .await
        .unwrap();
    let report = checker.check_text(&format!("{HONEY}.")).await.unwrap();

    let result = &report.fact_check_results[0];
    assert_eq!(result.status, Status::Unverifiable);
    let hits = result.search_results.as_ref().unwrap();
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|r| r.title == "API Key Missing"));
    assert_eq!(result.source_links, Some(vec![]));
}

#[tokio::test]
async fn failing_backend_marks_only_that_claim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let checker = FactChecker::from_config(&serper_config(&server, 5)).await.unwrap();
    let report = checker
        .check_text(&format!("{HONEY}. Mars is a planet."))
        .await
        .unwrap();

    let honey = &report.fact_check_results[0];
    assert_eq!(honey.status, Status::Unverifiable);
    assert_eq!(honey.confidence, Some(30));
    assert_eq!(honey.source, "Error in Web Search");
    assert_eq!(report.fact_check_results[1].status, Status::Accurate);
}

#[tokio::test]
async fn slow_search_times_out_per_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"organic": []}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let checker = FactChecker::from_config(&serper_config(&server, 1)).await.unwrap();
    let report = checker.check_text(&format!("{HONEY}.")).await.unwrap();
    assert_eq!(report.fact_check_results[0].source, "Error in Web Search");
}

#[tokio::test]
async fn llm_backend_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4o-mini",
            "output": [{"content": [{
                "type": "output_text",
                "text": "{\"status\":\"ACCURATE\",\"explanation\":\"Sealed honey does not spoil.\",\"source\":null,\"correction\":null,\"confidence\":85}"
            }]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config(&format!(
        r#"
engine:
  checker: llm
llm:
  provider: openai
  auth_token: sk-test
  endpoint: "{}"
"#,
        server.uri()
    ));
    let checker = FactChecker::from_config(&cfg).await.unwrap();
    assert_eq!(checker.checker_name(), "llm");

    let report = checker.check_text(&format!("{HONEY}.")).await.unwrap();
    let result = &report.fact_check_results[0];
    assert_eq!(result.status, Status::Accurate);
    assert_eq!(result.source, "LLM Analysis");
    assert_eq!(result.confidence, Some(85));
    assert_eq!(report.truth_score, Some(100));
}

#[tokio::test]
async fn llm_backend_without_credentials_serves_demo() {
    let cfg = config(
        r#"
engine:
  checker: llm
llm:
  provider: openai
  auth_token: "${VERIFACT_TEST_SURELY_UNSET_KEY}"
"#,
    );
    let checker = FactChecker::from_config(&cfg).await.unwrap();
    assert!(checker.is_demo());

    let report = checker.check_text("The Earth is flat.").await.unwrap();
    assert_eq!(report.truth_score, Some(50));
    assert_eq!(report.fact_check_results.len(), 2);
    assert_eq!(report.fact_check_results[0].source, "Demo Source");
}

/// An Ollama endpoint whose model listing always fails.
async fn unreachable_ollama(expected_probes: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(503))
        .expect(expected_probes)
        .mount(&server)
        .await;
    server
}

fn ollama_config(server: &MockServer, checker: &str, extractor: &str) -> VerifactConfig {
    config(&format!(
        r#"
engine:
  checker: {checker}
  extractor: {extractor}
search:
  api_key: serper-test
llm:
  provider: ollama
  endpoint: "{}"
"#,
        server.uri()
    ))
}

#[tokio::test]
async fn unused_llm_is_never_contacted() {
    let ollama = unreachable_ollama(0).await;
    let checker = FactChecker::from_config(&ollama_config(&ollama, "web_search", "heuristic"))
        .await
        .unwrap();
    assert!(!checker.is_demo());
    assert_eq!(checker.checker_name(), "web_search");
}

#[tokio::test]
async fn unreachable_llm_backend_serves_demo() {
    let ollama = unreachable_ollama(1).await;
    let checker = FactChecker::from_config(&ollama_config(&ollama, "llm", "heuristic"))
        .await
        .unwrap();
    assert!(checker.is_demo());
    assert_eq!(checker.checker_name(), "demo");
}

#[tokio::test]
async fn unreachable_llm_extractor_falls_back_to_heuristic() {
    let ollama = unreachable_ollama(1).await;
    let checker = FactChecker::from_config(&ollama_config(&ollama, "knowledge_base", "llm"))
        .await
        .unwrap();
    assert_eq!(checker.checker_name(), "knowledge_base");

    let report = checker.check_text("Pluto is a planet.").await.unwrap();
    assert_eq!(report.fact_check_results.len(), 1);
    assert_eq!(report.fact_check_results[0].status, Status::Inaccurate);
}

#[tokio::test]
async fn knowledge_base_scenarios() {
    let checker = FactChecker::from_config(&config("engine:\n  checker: knowledge_base\n"))
        .await
        .unwrap();

    let report = checker
        .check_text("USA is a continent. Pluto is a planet. China is the most populated country.")
        .await
        .unwrap();
    let results = &report.fact_check_results;
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.status == Status::Inaccurate));
    assert!(results.iter().all(|r| r.confidence.unwrap_or(0) >= 90));

    assert_eq!(results[0].confidence, Some(99));
    assert!(results[0].explanation.contains("United States of America"));
    assert_eq!(results[1].confidence, Some(98));
    assert!(results[1].explanation.contains("2006"));
    assert_eq!(results[2].confidence, Some(98));
    assert!(results[2].explanation.contains("India"));

    assert_eq!(report.truth_score, Some(0));
    assert!(report.suggestions[0].contains("3 inaccurate statements"));
}

#[tokio::test]
async fn knowledge_base_misses_are_unverifiable() {
    let checker = FactChecker::from_config(&config("engine:\n  checker: knowledge_base\n"))
        .await
        .unwrap();
    let report = checker.check_text(&format!("{HONEY}.")).await.unwrap();
    assert_eq!(report.fact_check_results[0].status, Status::Unverifiable);
}

#[tokio::test]
async fn serialised_report_uses_wire_names() {
    let checker = FactChecker::from_config(&config("engine:\n  checker: mock\n"))
        .await
        .unwrap();
    let report = checker.check_text("The Earth is round.").await.unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["truthScore"], json!(100));
    assert_eq!(value["factCheckResults"][0]["status"], json!("ACCURATE"));
    assert_eq!(value["factCheckResults"][0]["correction"], json!(null));
    assert!(value["suggestions"].as_array().is_some_and(|s| !s.is_empty()));
}
