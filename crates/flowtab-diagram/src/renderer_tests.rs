use super::*;
use async_trait::async_trait;
use flowtab_protocols::{ContainerContent, RenderError};
use parking_lot::Mutex;

/// Engine that fails a fixed number of times before succeeding.
struct FlakyEngine {
    failures: u32,
    seen: Mutex<Vec<String>>,
}

impl FlakyEngine {
    fn new(failures: u32) -> Self {
        Self {
            failures,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl RenderEngine for FlakyEngine {
    async fn run(&self, container: &mut DiagramContainer) -> Result<(), RenderError> {
        assert!(container.is_tagged());
        let source = container.source().ok_or(RenderError::EmptyContainer)?.to_string();
        let call = {
            let mut seen = self.seen.lock();
            seen.push(source);
            seen.len() as u32
        };
        if call <= self.failures {
            Err(RenderError::Syntax(format!("Parse error on attempt {call}")))
        } else {
            container.set_rendered("<svg/>");
            Ok(())
        }
    }
}

#[derive(Default)]
struct CountingFallback {
    presented: Mutex<Vec<String>>,
}

impl FallbackPresenter for CountingFallback {
    fn present(&self, container: &mut DiagramContainer, text: &str) {
        self.presented.lock().push(text.to_string());
        MarkupFallback.present(container, text);
    }
}

fn renderer(engine: Arc<FlakyEngine>, fallback: Arc<CountingFallback>) -> SafeRenderer {
    SafeRenderer::new(engine)
        .with_fallback(fallback)
        .with_options(RenderOptions::immediate())
}

#[tokio::test]
async fn test_first_attempt_success() {
    let engine = Arc::new(FlakyEngine::new(0));
    let fallback = Arc::new(CountingFallback::default());
    let renderer = renderer(engine.clone(), fallback.clone());
    let mut container = DiagramContainer::new("page-flow-1");

    assert!(renderer.render(&mut container, "A-->B").await);
    assert_eq!(engine.calls(), vec!["graph TD\nA --> B".to_string()]);
    assert!(container.is_rendered());
    assert!(fallback.presented.lock().is_empty());
}

#[tokio::test]
async fn test_recovers_on_third_attempt_with_cleaned_text() {
    let engine = Arc::new(FlakyEngine::new(2));
    let fallback = Arc::new(CountingFallback::default());
    let renderer = renderer(engine.clone(), fallback.clone());
    let mut container = DiagramContainer::new("page-flow-1");

    let ok = renderer
        .render(&mut container, "graph TD\nA[\"Start (now)\"] --> B")
        .await;

    assert!(ok);
    let calls = engine.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], "graph TD\nA[\"Start (now)\"] --> B");
    assert_eq!(calls[1], "graph TD\nA[Start ] --> B");
    assert_ne!(calls[0], calls[2]);
    assert!(fallback.presented.lock().is_empty());
}

#[tokio::test]
async fn test_exhaustion_presents_sanitized_text_once() {
    let engine = Arc::new(FlakyEngine::new(u32::MAX));
    let fallback = Arc::new(CountingFallback::default());
    let renderer = renderer(engine.clone(), fallback.clone());
    let mut container = DiagramContainer::new("page-flow-2");

    let ok = renderer
        .render(&mut container, "graph TD\nA[\"x (y)\"] --> B")
        .await;

    assert!(!ok);
    assert_eq!(engine.calls().len(), 3);
    let presented = fallback.presented.lock().clone();
    assert_eq!(presented, vec!["graph TD\nA[\"x (y)\"] --> B".to_string()]);
    assert!(container.is_fallback());
    assert!(!container.is_tagged());
}

#[tokio::test]
async fn test_detailed_report_lists_attempts() {
    let engine = Arc::new(FlakyEngine::new(1));
    let renderer = renderer(engine, Arc::new(CountingFallback::default()));
    let mut container = DiagramContainer::new("c");

    let report = renderer.render_detailed(&mut container, "A-->B", 3).await;

    assert!(report.success);
    assert_eq!(report.attempts.len(), 2);
    assert_eq!(report.attempts[0].number, 1);
    assert!(matches!(report.attempts[0].outcome, AttemptOutcome::Failed(ref e) if e.contains("attempt 1")));
    assert_eq!(report.attempts[1].outcome, AttemptOutcome::Rendered);
}

#[tokio::test]
async fn test_zero_budget_still_attempts_once() {
    let engine = Arc::new(FlakyEngine::new(u32::MAX));
    let fallback = Arc::new(CountingFallback::default());
    let renderer = renderer(engine.clone(), fallback.clone());
    let mut container = DiagramContainer::new("c");

    assert!(!renderer.render_with_retries(&mut container, "A", 0).await);
    assert_eq!(engine.calls().len(), 1);
    assert_eq!(fallback.presented.lock().len(), 1);
}

#[tokio::test]
async fn test_manual_retry_uses_captured_text_and_manual_budget() {
    let engine = Arc::new(FlakyEngine::new(4));
    let fallback = Arc::new(CountingFallback::default());
    let renderer = renderer(engine.clone(), fallback.clone());
    let mut container = DiagramContainer::new("relation-chart");

    assert!(!renderer.render(&mut container, "A-->B").await);
    assert_eq!(engine.calls().len(), 3);

    // Attempt 4 fails, attempt 5 succeeds.
    assert!(renderer.retry(&mut container).await);
    let calls = engine.calls();
    assert_eq!(calls.len(), 5);
    assert_eq!(calls[3], "graph TD\nA --> B");
    assert!(container.is_rendered());
}

#[tokio::test]
async fn test_manual_retry_without_capture_is_noop() {
    let engine = Arc::new(FlakyEngine::new(0));
    let renderer = renderer(engine.clone(), Arc::new(CountingFallback::default()));
    let mut container = DiagramContainer::new("c");

    assert!(!renderer.retry(&mut container).await);
    assert!(engine.calls().is_empty());
    assert_eq!(container.content(), &ContainerContent::Empty);
}

#[test]
fn test_default_options() {
    let options = RenderOptions::default();
    assert_eq!(options.max_retries, 3);
    assert_eq!(options.manual_retries, 2);
    assert_eq!(options.settle_delay, Duration::from_millis(50));
    assert_eq!(options.retry_delay, Duration::from_millis(100));
}
