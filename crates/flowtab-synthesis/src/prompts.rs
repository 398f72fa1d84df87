//! Prompt templates sent to the AI collaborator.

use flowtab_protocols::ExtractedTabData;

use crate::composer::ITEM_MARKER;

const CLUSTERING_INSTRUCTIONS: &str = r#"You are an information architect. Group the following web pages by their **core topic and sub-field**.

Guidelines:
1. **Semantic grouping**: judge by the summary, not only the title. Pages about the same technology, product or event belong together even when their titles differ.
2. **Fine-grained topics**: with many pages, separate specific sub-topics (for example "AI infrastructure" versus "AI use cases").
3. **Singletons**: a page unrelated to all others forms its own topic.
4. **Naming**: topic titles are concise and professional ("Frontend performance", "Global macroeconomics", "Vue 3 in practice").

Output requirements:
- Output strict JSON only
- Shape: { "groups": [ { "title": "Topic name", "ids": [index numbers] } ] }

Pages:
"#;

/// Prompt asking the AI to cluster `tabs` into topic groups.
///
/// Each page is listed with its index, which the reply refers back to.
pub fn clustering_prompt(tabs: &[ExtractedTabData]) -> String {
    let pages = tabs
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let summary = if tab.short_content.trim().is_empty() {
                "none"
            } else {
                tab.short_content.as_str()
            };
            format!("[{i}] Title: {}\n    Key summary: {summary}", tab.title)
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("{CLUSTERING_INSTRUCTIONS}{pages}")
}

/// Prompt asking for per-page insights with flow diagrams, a relationship
/// diagram and a cross-page analysis.
pub fn synthesis_prompt(tabs: &[ExtractedTabData]) -> String {
    let content = tabs
        .iter()
        .map(|tab| format!("---\n[{}]\n{}", tab.title, tab.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are a knowledge integration expert. Integrate the following web pages in depth and draw visual maps.

Output structure:

## 1. Page insights
Break every page down in detail; a one-line summary is not acceptable. Use this format:

{ITEM_MARKER} [Page title]

**🎯 Core idea**:
(The central message of the page)

**🔍 In depth**:
(The core logic, arguments or content of the page, including details that set it apart from the other pages.)

**💡 Key points**:
- [Point 1]: explanation
- [Point 2]: explanation
- [Point 3]: explanation

**🗺️ Content flow**:
(A Mermaid diagram of the page's internal logic)
```mermaid
flowchart TD
    ...logic nodes...
```

---

## 2. Knowledge graph
Use ```mermaid to draw one relationship diagram showing the **logical links, causality or knowledge structure** across all pages.

## 3. Cross-page analysis
- **Consensus and tone**: what the pages share and their overall leaning.
- **Differences and conflicts**: differing emphasis, conflicting data or opposing views between sources.
- **Core insight**: one forward-looking conclusion drawn from all inputs.

Rules:
1. Every page must have its own content flow diagram
2. Every Mermaid diagram must be wrapped in ```mermaid and ```

**Mermaid syntax requirements (mandatory)**:
- Node IDs use only ASCII letters and digits (A, B1, nodeA); no non-ASCII characters or underscores
- Labels go in square brackets, e.g. A[User needs] --> B[System design]
- One statement per line; never put several statements on one line
- subgraph stands on its own line: subgraph Title
- Arrows: A --> B or A --> |label| B
- No : ; < > or other special characters inside node IDs
- Put a line break after the diagram type declaration

Correct example:
```mermaid
flowchart TD
    A[Start] --> B[Process]
    B --> C[Result]
    subgraph Sub flow
        D[Step 1] --> E[Step 2]
    end
```


Content:
{content}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtab_protocols::TabId;

    fn tab(title: &str, short: &str) -> ExtractedTabData {
        ExtractedTabData {
            tab_id: TabId::new(title),
            window_id: None,
            favicon_url: None,
            title: title.to_string(),
            url: "https://example.com".to_string(),
            content: format!("{title} body"),
            short_content: short.to_string(),
        }
    }

    #[test]
    fn test_clustering_prompt_lists_indices() {
        let prompt = clustering_prompt(&[tab("Rust", "ownership"), tab("Go", "")]);
        assert!(prompt.contains("[0] Title: Rust\n    Key summary: ownership"));
        assert!(prompt.contains("[1] Title: Go\n    Key summary: none"));
        assert!(prompt.contains("\"groups\""));
    }

    #[test]
    fn test_synthesis_prompt_layout() {
        let prompt = synthesis_prompt(&[tab("Rust", "x"), tab("Go", "y")]);
        assert!(prompt.contains("### 📄 [Page title]"));
        assert!(prompt.contains("## 3. Cross-page analysis"));
        assert!(prompt.contains("---\n[Rust]\nRust body\n\n---\n[Go]\nGo body"));
    }
}
