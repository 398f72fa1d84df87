use super::*;
use serde_json::json;

#[test]
fn test_cdp_request_serialize() {
    let req = CdpRequest {
        id: 1,
        method: "Runtime.evaluate".to_string(),
        params: Some(json!({"expression": "1 + 1"})),
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains("Runtime.evaluate"));
    assert!(json.contains("\"id\":1"));
}

#[test]
fn test_cdp_response_deserialize() {
    let resp: CdpResponse = serde_json::from_str(r#"{"id": 3, "result": {"result": {}}}"#).unwrap();
    assert_eq!(resp.id, Some(3));
    assert!(resp.result.is_some());

    let event: CdpResponse =
        serde_json::from_str(r#"{"method": "Runtime.consoleAPICalled", "params": {}}"#).unwrap();
    assert!(event.id.is_none());
    assert_eq!(event.method.as_deref(), Some("Runtime.consoleAPICalled"));
}

#[test]
fn test_page_info_to_tab() {
    let info: PageInfo = serde_json::from_str(
        r#"{
            "id": "page123",
            "type": "page",
            "title": "Rust Book",
            "url": "https://doc.rust-lang.org/book/",
            "faviconUrl": "https://doc.rust-lang.org/favicon.ico",
            "webSocketDebuggerUrl": "ws://localhost:9222/devtools/page/page123"
        }"#,
    )
    .unwrap();
    assert!(info.is_tab());

    let tab = info.to_tab_info();
    assert_eq!(tab.id.as_str(), "page123");
    assert_eq!(tab.favicon_url.as_deref(), Some("https://doc.rust-lang.org/favicon.ico"));
    assert!(tab.is_web_page());
}

#[test]
fn test_service_worker_is_not_a_tab() {
    let info: PageInfo =
        serde_json::from_str(r#"{"id": "sw1", "type": "service_worker", "url": "https://x.dev/sw.js"}"#).unwrap();
    assert!(!info.is_tab());
    assert!(info.title.is_empty());
}

#[test]
fn test_parse_evaluation_content_is_truncated() {
    let result = json!({
        "result": {"type": "object", "value": {"title": "T", "content": "abcdef", "url": "https://x.dev"}}
    });
    let outcome = parse_evaluation(&result, 3).unwrap();
    assert_eq!(
        outcome,
        ExtractionOutcome::Content(ExtractedContent {
            title: "T".to_string(),
            content: "abc".to_string(),
            url: "https://x.dev".to_string(),
        })
    );
}

#[test]
fn test_parse_evaluation_page_error() {
    let result = json!({"result": {"type": "object", "value": {"error": "no article"}}});
    let outcome = parse_evaluation(&result, 1000).unwrap();
    assert_eq!(outcome, ExtractionOutcome::Error { error: "no article".to_string() });

    let result = json!({
        "result": {"type": "object"},
        "exceptionDetails": {"text": "Uncaught", "exception": {"description": "TypeError: x is null"}}
    });
    let outcome = parse_evaluation(&result, 1000).unwrap();
    assert_eq!(outcome, ExtractionOutcome::Error { error: "TypeError: x is null".to_string() });
}

#[test]
fn test_parse_evaluation_invalid_reply() {
    let result = json!({"result": {"type": "undefined"}});
    assert!(matches!(parse_evaluation(&result, 1000), Err(CdpError::Serialization(_))));
}
