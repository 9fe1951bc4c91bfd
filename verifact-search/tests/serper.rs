use serde_json::json;
use verifact_search::{SearchError, SearchProvider, SerperClient};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn sends_key_header_and_locale() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("x-api-key", "serper-test"))
        .and(body_partial_json(json!({
            "q": "pluto dwarf planet",
            "gl": "us",
            "hl": "en",
            "num": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [
                {"title": "Pluto - NASA", "link": "https://science.nasa.gov/pluto", "snippet": "Pluto is a dwarf planet.", "position": 1},
                {"title": "IAU 2006", "link": "https://iau.org/2006", "snippet": "Reclassified in 2006.", "position": 2, "source": "IAU"}
            ],
            "knowledgeGraph": {"title": "Pluto", "type": "Dwarf planet", "description": "Pluto is a dwarf planet in the Kuiper belt."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SerperClient::with_base_url(Some("serper-test".into()), &server.uri()).unwrap();
    let results = client.search("pluto dwarf planet", 5).await.unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].source, "Knowledge Graph");
    assert_eq!(results[1].url, "https://science.nasa.gov/pluto");
    assert_eq!(results[1].source, "Google Search");
    assert_eq!(results[2].source, "IAU");
}

#[tokio::test]
async fn locale_override_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({"gl": "gb", "hl": "en-GB"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organic": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SerperClient::with_base_url(Some("k".into()), &server.uri())
        .unwrap()
        .with_locale("gb", "en-GB");
    assert!(client.search("q", 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_key_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "Unauthorized."})),
        )
        .mount(&server)
        .await;

    let client = SerperClient::with_base_url(Some("bad".into()), &server.uri()).unwrap();
    let err = client.search("q", 5).await.unwrap_err();
    assert!(matches!(err, SearchError::Http(_)));
}
