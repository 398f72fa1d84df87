use super::*;
use flowtab_protocols::{TabId, TopicGroup};

fn tabs(n: usize) -> Vec<ExtractedTabData> {
    (0..n)
        .map(|i| ExtractedTabData {
            tab_id: TabId::new(format!("T{i}")),
            window_id: Some(1),
            favicon_url: None,
            title: format!("Page {i}"),
            url: format!("https://example.com/{i}"),
            content: format!("content {i}"),
            short_content: format!("content {i}"),
        })
        .collect()
}

#[test]
fn test_parse_plain_json() {
    let parsed = parse_grouping_response(r#"{"groups":[{"title":"A","ids":[0]}]}"#).unwrap();
    assert_eq!(parsed.groups, vec![TopicGroup::new("A", vec![0])]);
}

#[test]
fn test_parse_fenced_json() {
    let raw = "Sure! ```json\n{\"groups\":[{\"title\":\"A\",\"ids\":[0,1]}]}\n```";
    let parsed = parse_grouping_response(raw).unwrap();
    assert_eq!(parsed.groups, vec![TopicGroup::new("A", vec![0, 1])]);
}

#[test]
fn test_parse_untyped_fence() {
    let raw = "Here:\n```\n{\"groups\":[{\"title\":\"B\",\"ids\":[2]}]}\n```\nDone.";
    let parsed = parse_grouping_response(raw).unwrap();
    assert_eq!(parsed.groups[0].title, "B");
}

#[test]
fn test_parse_brace_span() {
    let raw = "The grouping is {\"groups\":[{\"title\":\"C\",\"ids\":[1]}]} as requested.";
    let parsed = parse_grouping_response(raw).unwrap();
    assert_eq!(parsed.groups[0].ids, vec![1]);
}

#[test]
fn test_parse_failure_is_none() {
    assert!(parse_grouping_response("I could not group these pages.").is_none());
    assert!(parse_grouping_response("} backwards {").is_none());
    assert!(parse_grouping_response("{\"topics\": []}").is_none());
    assert!(parse_grouping_response("").is_none());
}

#[test]
fn test_extract_diagram_blocks() {
    let raw = "intro\n```mermaid\ngraph TD\nA-->B\n```\ntext\n```mermaid flowchart LR\nC-->D```\n```js\nx\n```";
    let blocks = extract_diagram_blocks(raw);
    assert_eq!(blocks, vec!["graph TD\nA-->B".to_string(), "flowchart LR\nC-->D".to_string()]);
}

#[test]
fn test_extract_diagram_blocks_empty() {
    assert!(extract_diagram_blocks("no diagrams here").is_empty());
}

#[test]
fn test_resolve_topics_drops_invalid_indices() {
    let response = GroupingResponse {
        groups: vec![TopicGroup::new("A", vec![0, 2]), TopicGroup::new("B", vec![1, 7])],
    };
    let topics = resolve_topics(&response, &tabs(3));
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0].tabs.len(), 2);
    assert_eq!(topics[1].tabs.len(), 1);
    assert_eq!(topics[1].tabs[0].title, "Page 1");
}
