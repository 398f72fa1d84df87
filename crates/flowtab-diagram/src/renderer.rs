//! Retrying diagram renderer.

use std::sync::Arc;
use std::time::Duration;

use flowtab_protocols::{DiagramContainer, RenderEngine};
use tracing::{debug, info, warn};

use crate::fallback::{FallbackPresenter, MarkupFallback};
use crate::sanitizer::{deep_clean, sanitize};

/// Timing and budget knobs for [`SafeRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub max_retries: u32,
    pub manual_retries: u32,
    pub settle_delay: Duration,
    pub retry_delay: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            manual_retries: 2,
            settle_delay: Duration::from_millis(50),
            retry_delay: Duration::from_millis(100),
        }
    }
}

impl RenderOptions {
    /// Default budgets without any waiting between steps.
    pub fn immediate() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            retry_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Rendered,
    Failed(String),
}

/// One pass of the text through the render engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderAttempt {
    pub number: u32,
    pub text: String,
    pub outcome: AttemptOutcome,
}

/// Everything that happened while rendering one diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub success: bool,
    pub attempts: Vec<RenderAttempt>,
}

/// Renders diagram text into a container, degrading the text between
/// attempts and falling back to a static view when every attempt fails.
///
/// Engine errors never escape; callers only learn whether the rendering
/// succeeded.
#[derive(Clone)]
pub struct SafeRenderer {
    engine: Arc<dyn RenderEngine>,
    fallback: Arc<dyn FallbackPresenter>,
    options: RenderOptions,
}

impl SafeRenderer {
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self {
            engine,
            fallback: Arc::new(MarkupFallback),
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackPresenter>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render with the configured attempt budget.
    pub async fn render(&self, container: &mut DiagramContainer, text: &str) -> bool {
        self.render_with_retries(container, text, self.options.max_retries)
            .await
    }

    pub async fn render_with_retries(
        &self,
        container: &mut DiagramContainer,
        text: &str,
        max_retries: u32,
    ) -> bool {
        self.render_detailed(container, text, max_retries)
            .await
            .success
    }

    /// Like [`render_with_retries`](Self::render_with_retries) but returns
    /// every attempt made.
    pub async fn render_detailed(
        &self,
        container: &mut DiagramContainer,
        text: &str,
        max_retries: u32,
    ) -> RenderReport {
        let sanitized = sanitize(text);
        self.run_attempts(container, sanitized, max_retries).await
    }

    /// Manual re-render of a container that is showing the fallback view.
    ///
    /// Returns `false` without touching the container when nothing was
    /// captured for it.
    pub async fn retry(&self, container: &mut DiagramContainer) -> bool {
        let Some(source) = container.retry_source().map(str::to_string) else {
            debug!(container = container.id(), "No captured diagram source to re-render");
            return false;
        };
        container.set_notice("Re-rendering...");
        self.run_attempts(container, source, self.options.manual_retries)
            .await
            .success
    }

    async fn run_attempts(
        &self,
        container: &mut DiagramContainer,
        sanitized: String,
        max_retries: u32,
    ) -> RenderReport {
        let budget = max_retries.max(1);
        let mut report = RenderReport::default();
        let mut variant = sanitized.clone();

        for number in 1..=budget {
            container.write_source(variant.clone());
            container.tag();

            tokio::task::yield_now().await;
            if !self.options.settle_delay.is_zero() {
                tokio::time::sleep(self.options.settle_delay).await;
            }

            match self.engine.run(container).await {
                Ok(()) => {
                    info!(container = container.id(), attempt = number, "Diagram rendered");
                    report.attempts.push(RenderAttempt {
                        number,
                        text: variant,
                        outcome: AttemptOutcome::Rendered,
                    });
                    report.success = true;
                    return report;
                }
                Err(e) => {
                    warn!(
                        container = container.id(),
                        attempt = number,
                        budget,
                        error = %e,
                        "Diagram render attempt failed"
                    );
                    let next = if number < budget {
                        Some(deep_clean(&variant))
                    } else {
                        None
                    };
                    report.attempts.push(RenderAttempt {
                        number,
                        text: variant,
                        outcome: AttemptOutcome::Failed(e.to_string()),
                    });
                    match next {
                        Some(cleaned) => {
                            variant = cleaned;
                            if !self.options.retry_delay.is_zero() {
                                tokio::time::sleep(self.options.retry_delay).await;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        self.fallback.present(container, &sanitized);
        report
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
