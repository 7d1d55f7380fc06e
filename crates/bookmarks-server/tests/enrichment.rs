use bookmarks_server::config::EnrichmentConfig;
use bookmarks_server::enrichment::{
    EnrichmentError, HttpMetadataProvider, MetadataProvider, NO_DESCRIPTION,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> HttpMetadataProvider {
    let config = EnrichmentConfig {
        whois_url: format!("{}/analiz/api.php", server.uri()),
        timeout_ms: 2000,
        ..Default::default()
    };
    HttpMetadataProvider::new(&config).expect("client")
}

#[tokio::test]
async fn whois_returns_upstream_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analiz/api.php"))
        .and(query_param("url", "example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "domain": "example.com",
            "registrar": "EXAMPLE-REG"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let whois = provider(&server).whois("example.com").await.unwrap();
    assert_eq!(whois["registrar"], "EXAMPLE-REG");
}

#[tokio::test]
async fn whois_rejects_non_json_and_error_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("url", "broken.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("url", "down.com"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = provider(&server);
    assert!(matches!(
        provider.whois("broken.com").await,
        Err(EnrichmentError::InvalidJson(_))
    ));
    assert!(matches!(
        provider.whois("down.com").await,
        Err(EnrichmentError::Status { status: 503, .. })
    ));
}

#[tokio::test]
async fn open_graph_scrapes_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<!doctype html><html><head>
                <meta property="og:title" content="Article">
                <meta property="og:image" content="https://cdn.test/cover.jpg">
            </head><body></body></html>"#,
        ))
        .mount(&server)
        .await;

    let og = provider(&server)
        .open_graph(&format!("{}/article", server.uri()))
        .await
        .unwrap();
    assert_eq!(og.title, "Article");
    assert_eq!(og.image, "https://cdn.test/cover.jpg");
    assert_eq!(og.description, NO_DESCRIPTION);
}
