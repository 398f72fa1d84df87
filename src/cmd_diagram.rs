//! Diagram subcommand handlers for FlowTab.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use flowtab_config::Config;
use flowtab_diagram::{sanitize, AttemptOutcome, MermaidInkEngine, RenderOptions, SafeRenderer};
use flowtab_protocols::{ContainerContent, DiagramContainer};

/// Renderer backed by the configured engine and retry settings.
pub(crate) fn build_renderer(config: &Config) -> SafeRenderer {
    let engine = Arc::new(MermaidInkEngine::with_url(config.render.engine_url.clone()));
    SafeRenderer::new(engine).with_options(RenderOptions {
        max_retries: config.render.max_retries,
        manual_retries: config.render.manual_retries,
        settle_delay: config.render.settle_delay(),
        retry_delay: config.render.retry_delay(),
    })
}

/// Print the sanitized text of a Mermaid file.
pub(crate) fn sanitize_file(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(file)?;
    println!("{}", sanitize(&text));
    Ok(())
}

/// Sanitize and render a Mermaid file, printing each attempt.
pub(crate) async fn render_file(
    config: &Config,
    file: &Path,
    svg_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(file)?;
    let renderer = build_renderer(config);
    let mut container = DiagramContainer::new("cli-render");

    let report = renderer
        .render_detailed(&mut container, &text, config.render.max_retries)
        .await;

    for attempt in &report.attempts {
        match &attempt.outcome {
            AttemptOutcome::Rendered => eprintln!("attempt {}: rendered", attempt.number),
            AttemptOutcome::Failed(reason) => eprintln!("attempt {}: failed: {}", attempt.number, reason),
        }
    }

    match container.content() {
        ContainerContent::Rendered(svg) => {
            match svg_path {
                Some(path) => {
                    std::fs::write(path, svg)?;
                    info!("SVG written to {}", path.display());
                }
                None => println!("{svg}"),
            }
            Ok(())
        }
        _ => {
            warn!(attempts = report.attempts.len(), "Diagram could not be rendered");
            println!("{}", unrendered_text(&container));
            Err("Diagram rendering failed".into())
        }
    }
}

/// Text shown for a diagram that never rendered: the sanitized source kept
/// for manual retry, not the last deep-cleaned attempt.
fn unrendered_text(container: &DiagramContainer) -> &str {
    container.retry_source().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrendered_text_is_retry_source() {
        let sanitized = sanitize("graph TD\nA[\"Start\"] --> B");
        let mut container = DiagramContainer::new("cli-render");
        container.set_fallback("<div class=\"fallback\"></div>", sanitized.clone());
        assert_eq!(unrendered_text(&container), sanitized);
    }

    #[test]
    fn test_unrendered_text_without_fallback() {
        let container = DiagramContainer::new("cli-render");
        assert_eq!(unrendered_text(&container), "");
    }
}
