//! Page-side extraction script.

/// Evaluated in the page; yields `{title, content, url}` or `{error}`.
///
/// Picks the densest readable container (`article`, `main`, `[role=main]`,
/// then `body`) from a clone of the document with boilerplate removed.
pub const READABLE_TEXT_SCRIPT: &str = r#"(() => {
  try {
    const doc = document.cloneNode(true);
    doc.querySelectorAll('script, style, noscript, svg, nav, header, footer, aside, form, iframe, [aria-hidden="true"]')
      .forEach((el) => el.remove());
    const candidates = ['article', 'main', '[role="main"]', 'body']
      .map((sel) => doc.querySelector(sel))
      .filter(Boolean);
    if (candidates.length === 0) {
      return { error: 'No readable content' };
    }
    const best = candidates.reduce((a, b) => ((b.textContent || '').length > (a.textContent || '').length * 2 ? b : a));
    const text = (best.textContent || '').replace(/\s+/g, ' ').trim();
    const heading = doc.querySelector('h1');
    return {
      title: document.title || (heading ? heading.textContent.trim() : ''),
      content: text,
      url: window.location.href,
    };
  } catch (err) {
    return { error: String(err && err.message ? err.message : err) };
  }
})()"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_is_an_expression() {
        assert!(READABLE_TEXT_SCRIPT.starts_with("(() =>"));
        assert!(READABLE_TEXT_SCRIPT.ends_with("})()"));
        assert!(READABLE_TEXT_SCRIPT.contains("window.location.href"));
    }
}
