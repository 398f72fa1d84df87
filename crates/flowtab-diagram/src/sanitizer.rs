//! Heuristic cleanup of Mermaid source produced by an LLM.
//!
//! The rewrite steps run in a fixed order; later steps assume the
//! normalization done by earlier ones.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Declaration prepended when the source does not start with a known type.
pub const DEFAULT_DECLARATION: &str = "graph TD";

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid sanitizer pattern")
}

static BR_TAG: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)<br\s*/?>"));
static HTML_ENTITY: LazyLock<Regex> = LazyLock::new(|| re(r"(?i)&[a-z]+;"));
static LONG_DASH: LazyLock<Regex> = LazyLock::new(|| re(r"-{3,}"));
static RULE_LINE: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^[ \t]*--+[ \t]*$"));
static EMPTY_SUBGRAPH: LazyLock<Regex> = LazyLock::new(|| re(r"subgraph[ \t]+[^\n]*\n\s*end\b"));
static UNSAFE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| re(r#"\[([^\]"\n]+[<>:;]+[^\]\n]*)\]"#));
static CLASS_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| re(r":::[A-Za-z0-9_-]+"));
static FUSED_DIRECTION: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\b((?:graph|flowchart)[ \t]*(?:TD|TB|BT|LR|RL))(\S)"));
static FUSED_SUBGRAPH: LazyLock<Regex> = LazyLock::new(|| re(r"(\S)[ \t]*(subgraph[ \t]+)"));
static FUSED_END: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)(\S)[ \t]*\bend[ \t]*$"));
static CONNECTOR_LEFT: LazyLock<Regex> = LazyLock::new(|| re(r"(\w)(-->|---)"));
static CONNECTOR_RIGHT: LazyLock<Regex> = LazyLock::new(|| re(r"(-->|---)([\w\[])"));
static ASCII_THEN_WIDE: LazyLock<Regex> =
    LazyLock::new(|| re(r"[A-Za-z0-9_]+_[\w&&[^\x00-\x7F]]+"));
static WIDE_THEN_ASCII: LazyLock<Regex> =
    LazyLock::new(|| re(r"[\w&&[^\x00-\x7F]]+_[A-Za-z0-9_]+"));
static EDGE_LABEL: LazyLock<Regex> = LazyLock::new(|| re(r"-->[ \t]*\|([^|\n]*)\|"));
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| re(r"\n(?:[ \t]*\n){2,}"));
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    re(r"(?i)^(graph|flowchart|mindmap|sequenceDiagram|classDiagram|stateDiagram|erDiagram|pie|gantt|journey|gitGraph|timeline)\b")
});
static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| re(r"\([^)]*\)"));

/// Diagram type named by the leading declaration keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    Flowchart,
    Mindmap,
    Sequence,
    Class,
    State,
    EntityRelationship,
    Pie,
    Gantt,
    Journey,
    GitGraph,
    Timeline,
    /// No recognized declaration; rendered as the default flowchart.
    Default,
}

/// Diagram source cut out of an AI reply, with its inferred kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramSource {
    pub text: String,
    pub kind: DiagramKind,
}

impl DiagramSource {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = detect_kind(&text);
        Self { text, kind }
    }
}

/// Infer the diagram kind from the start of `text`.
pub fn detect_kind(text: &str) -> DiagramKind {
    let Some(caps) = DECLARATION.captures(text.trim_start()) else {
        return DiagramKind::Default;
    };
    match caps[1].to_ascii_lowercase().as_str() {
        "graph" | "flowchart" => DiagramKind::Flowchart,
        "mindmap" => DiagramKind::Mindmap,
        "sequencediagram" => DiagramKind::Sequence,
        "classdiagram" => DiagramKind::Class,
        "statediagram" => DiagramKind::State,
        "erdiagram" => DiagramKind::EntityRelationship,
        "pie" => DiagramKind::Pie,
        "gantt" => DiagramKind::Gantt,
        "journey" => DiagramKind::Journey,
        "gitgraph" => DiagramKind::GitGraph,
        "timeline" => DiagramKind::Timeline,
        _ => DiagramKind::Default,
    }
}

/// Rewrite `text` so it has a better chance of parsing.
///
/// The result always starts with a recognized declaration and is never
/// empty. No syntactic guarantee is made beyond that.
pub fn sanitize(text: &str) -> String {
    let mut cleaned = normalize_punctuation(text);
    cleaned = strip_markup(&cleaned);
    cleaned = EMPTY_SUBGRAPH.replace_all(&cleaned, "").into_owned();
    cleaned = UNSAFE_LABEL.replace_all(&cleaned, "[\"$1\"]").into_owned();
    cleaned = CLASS_ANNOTATION.replace_all(&cleaned, "").into_owned();
    cleaned = split_fused_keywords(&cleaned);
    cleaned = space_connectors(cleaned);
    cleaned = quote_unquoted(&ASCII_THEN_WIDE, &cleaned);
    cleaned = quote_unquoted(&WIDE_THEN_ASCII, &cleaned);
    cleaned = quote_edge_labels(&cleaned);
    cleaned = BLANK_RUN.replace_all(&cleaned, "\n\n").into_owned();

    let body = cleaned.trim();
    if detect_kind(body) == DiagramKind::Default {
        format!("{DEFAULT_DECLARATION}\n{body}").trim().to_string()
    } else {
        body.to_string()
    }
}

/// Lossy cleanup used between render retries: drops every parenthetical
/// and every quote character. Applied on top of [`sanitize`] output only.
pub fn deep_clean(text: &str) -> String {
    let without_parens = PARENTHETICAL.replace_all(text, "");
    without_parens.replace(['"', '\''], "")
}

fn normalize_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '（' => '(',
            '）' => ')',
            '【' => '[',
            '】' => ']',
            '：' => ':',
            '；' => ';',
            '，' => ',',
            '。' => '.',
            '“' | '”' => '"',
            '‘' | '’' => '\'',
            other => other,
        })
        .collect()
}

fn strip_markup(text: &str) -> String {
    let text = BR_TAG.replace_all(text, " ");
    let text = HTML_ENTITY.replace_all(&text, " ");
    let text = text.replace('—', "--");
    let text = LONG_DASH.replace_all(&text, "--");
    RULE_LINE.replace_all(&text, "").into_owned()
}

fn split_fused_keywords(text: &str) -> String {
    let text = FUSED_DIRECTION.replace_all(text, "$1\n    $2");
    let text = FUSED_SUBGRAPH.replace_all(&text, "$1\n    $2");
    FUSED_END.replace_all(&text, "$1\nend").into_owned()
}

fn space_connectors(mut text: String) -> String {
    loop {
        let spaced = CONNECTOR_LEFT.replace_all(&text, "$1 $2");
        let spaced = CONNECTOR_RIGHT.replace_all(&spaced, "$1 $2").into_owned();
        if spaced == text {
            return text;
        }
        text = spaced;
    }
}

/// Wrap every match of `pattern` in double quotes unless it already sits
/// inside a quoted string.
fn quote_unquoted(pattern: &Regex, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut open_quotes = 0usize;
    for m in pattern.find_iter(text) {
        let between = &text[last..m.start()];
        open_quotes += between.matches('"').count();
        out.push_str(between);
        if open_quotes % 2 == 1 {
            out.push_str(m.as_str());
        } else {
            out.push('"');
            out.push_str(m.as_str());
            out.push('"');
        }
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

fn quote_edge_labels(text: &str) -> String {
    EDGE_LABEL
        .replace_all(text, |caps: &Captures<'_>| {
            let label = &caps[1];
            let trimmed = label.trim();
            let already_quoted = trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"');
            if label.is_ascii() || already_quoted {
                caps[0].to_string()
            } else {
                format!("--> |\"{label}\"|")
            }
        })
        .into_owned()
}

#[cfg(test)]
#[path = "sanitizer_tests.rs"]
mod tests;
