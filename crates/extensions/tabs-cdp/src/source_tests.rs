use super::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_list(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/json/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "A1",
                "type": "page",
                "title": "Tokio tutorial",
                "url": "https://tokio.rs/tokio/tutorial",
                "faviconUrl": "https://tokio.rs/favicon.ico"
            },
            {
                "id": "W1",
                "type": "service_worker",
                "title": "",
                "url": "https://tokio.rs/sw.js"
            },
            {
                "id": "B2",
                "type": "page",
                "title": "New Tab",
                "url": "chrome://newtab/"
            }
        ])))
        .mount(server)
        .await;
}

#[test]
fn test_endpoint_trailing_slash() {
    let source = CdpTabSource::new("http://127.0.0.1:9222/");
    assert_eq!(source.endpoint(), "http://127.0.0.1:9222");
}

#[tokio::test]
async fn test_list_tabs_keeps_pages_only() {
    let server = MockServer::start().await;
    mount_list(&server).await;

    let source = CdpTabSource::new(&server.uri());
    let tabs = source.list_tabs().await.unwrap();
    assert_eq!(tabs.len(), 2);
    assert_eq!(tabs[0].id.as_str(), "A1");
    assert_eq!(tabs[0].favicon_url.as_deref(), Some("https://tokio.rs/favicon.ico"));
    assert!(tabs[0].is_web_page());
    assert!(!tabs[1].is_web_page());
}

#[tokio::test]
async fn test_list_tabs_browser_unavailable() {
    let source = CdpTabSource::new("http://127.0.0.1:1");
    let err = source.list_tabs().await.unwrap_err();
    assert!(matches!(err, TabSourceError::BrowserUnavailable(_)));
}

#[tokio::test]
async fn test_activate_tab() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/activate/A1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Target activated"))
        .expect(1)
        .mount(&server)
        .await;

    let source = CdpTabSource::new(&server.uri());
    let tab = TabInfo {
        id: TabId::new("A1"),
        window_id: None,
        url: "https://tokio.rs".to_string(),
        title: "Tokio".to_string(),
        favicon_url: None,
    };
    source.activate(&tab).await.unwrap();
}

#[tokio::test]
async fn test_close_reports_missing_tab() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/close/A1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Target is closing"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/json/close/GONE"))
        .respond_with(ResponseTemplate::new(404).set_body_string("No such target id: GONE"))
        .mount(&server)
        .await;

    let source = CdpTabSource::new(&server.uri());
    source.close(&[TabId::new("A1")]).await.unwrap();

    let err = source.close(&[TabId::new("GONE"), TabId::new("A1")]).await.unwrap_err();
    assert!(matches!(err, TabSourceError::TabNotFound(ref id) if id == "GONE"));
}

#[tokio::test]
async fn test_extract_unknown_tab_is_unreachable() {
    let server = MockServer::start().await;
    mount_list(&server).await;

    let source = CdpTabSource::new(&server.uri()).with_content_limit(500);
    let tab = TabInfo {
        id: TabId::new("missing"),
        window_id: None,
        url: "https://example.com".to_string(),
        title: "Example".to_string(),
        favicon_url: None,
    };
    let err = source.extract(&tab).await.unwrap_err();
    assert!(matches!(err, ExtractionError::Unreachable(ref id) if id == "missing"));
}

#[tokio::test]
async fn test_extract_without_debugger_url() {
    let server = MockServer::start().await;
    mount_list(&server).await;

    let source = CdpTabSource::new(&server.uri()).with_call_timeout(Duration::from_secs(1));
    let tab = TabInfo {
        id: TabId::new("A1"),
        window_id: None,
        url: "https://tokio.rs/tokio/tutorial".to_string(),
        title: "Tokio tutorial".to_string(),
        favicon_url: None,
    };
    let err = source.extract(&tab).await.unwrap_err();
    assert!(matches!(err, ExtractionError::Unreachable(ref m) if m.contains("already being debugged")));
}
