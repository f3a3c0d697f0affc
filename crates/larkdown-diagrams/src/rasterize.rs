//! Phase two: swap placeholders for rasterized diagrams.

use rayon::prelude::*;

use crate::generation::RenderGeneration;
use crate::kroki::{DiagramError, DiagramErrorKind, DiagramRasterizer};
use crate::placeholder::{Placeholder, error_html, find_placeholders, rendered_html};
use crate::surface::PreviewSurface;

/// Result of one rasterization pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterizeOutcome {
    /// Every diagram rendered and the result was applied.
    pub success: bool,
    pub message: String,
    pub rendered: usize,
    pub failed: usize,
    /// The pass was dropped because a newer render replaced its target.
    pub stale: bool,
}

impl RasterizeOutcome {
    fn stale() -> Self {
        Self {
            success: false,
            message: DiagramErrorKind::Stale.to_string(),
            rendered: 0,
            failed: 0,
            stale: true,
        }
    }

    fn finished(rendered: usize, failed: usize) -> Self {
        let message = if failed == 0 {
            format!("rendered {rendered} diagrams")
        } else {
            format!("{failed} of {} diagrams failed", rendered + failed)
        };
        Self {
            success: failed == 0,
            message,
            rendered,
            failed,
            stale: false,
        }
    }
}

/// Rasterize every placeholder in `html` in parallel.
///
/// A failed diagram becomes an inline error block; the others still render.
/// Placeholders with an empty source are left as they are.
pub fn rasterize_html<R>(html: &str, dark_mode: bool, rasterizer: &R) -> (String, RasterizeOutcome)
where
    R: DiagramRasterizer + ?Sized,
{
    let placeholders: Vec<Placeholder> = find_placeholders(html)
        .into_iter()
        .filter(|p| !p.source.is_empty())
        .collect();

    if placeholders.is_empty() {
        return (html.to_owned(), RasterizeOutcome::finished(0, 0));
    }

    let results: Vec<Result<String, DiagramError>> = placeholders
        .par_iter()
        .enumerate()
        .map(|(index, p)| {
            rasterizer
                .rasterize(&p.source, dark_mode)
                .map_err(|kind| DiagramError { index, kind })
        })
        .collect();

    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    let mut rendered = 0;
    let mut failed = 0;

    for (placeholder, result) in placeholders.iter().zip(results) {
        out.push_str(&html[last..placeholder.span.start]);
        match result {
            Ok(svg) => {
                out.push_str(&rendered_html(&placeholder.id, &placeholder.source, &svg));
                rendered += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, id = %placeholder.id, "Diagram rasterization failed");
                out.push_str(&error_html(
                    &placeholder.id,
                    &placeholder.source,
                    &e.kind.to_string(),
                ));
                failed += 1;
            }
        }
        last = placeholder.span.end;
    }
    out.push_str(&html[last..]);

    tracing::debug!(rendered, failed, "Diagrams rasterized");
    (out, RasterizeOutcome::finished(rendered, failed))
}

/// Rasterize the diagrams shown on `surface` for `generation`.
///
/// Does nothing if the surface is unmounted or shows another generation,
/// before or after the (slow) rasterization. Never panics into the caller.
pub fn render_diagrams_in_surface<R>(
    surface: &PreviewSurface,
    generation: RenderGeneration,
    dark_mode: bool,
    rasterizer: &R,
) -> RasterizeOutcome
where
    R: DiagramRasterizer + ?Sized,
{
    let Some(html) = surface.snapshot(generation) else {
        tracing::debug!(generation = generation.get(), "Surface moved on before rasterization");
        return RasterizeOutcome::stale();
    };

    let (html, outcome) = rasterize_html(&html, dark_mode, rasterizer);

    if surface.replace_if_current(generation, html) {
        outcome
    } else {
        tracing::debug!(generation = generation.get(), "Dropped stale diagram pass");
        RasterizeOutcome::stale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationCounter;
    use crate::placeholder::placeholder_html;
    use pretty_assertions::assert_eq;

    struct Stub;

    impl DiagramRasterizer for Stub {
        fn rasterize(&self, source: &str, dark_mode: bool) -> Result<String, DiagramErrorKind> {
            if source.contains("broken") {
                return Err(DiagramErrorKind::Http("HTTP 400: syntax error".to_owned()));
            }
            Ok(format!("<svg data-dark=\"{dark_mode}\">{source}</svg>"))
        }
    }

    /// Swaps the surface content mid-pass, like a record switch would.
    struct Superseding<'a> {
        surface: &'a PreviewSurface,
        counter: &'a GenerationCounter,
    }

    impl DiagramRasterizer for Superseding<'_> {
        fn rasterize(&self, _source: &str, _dark_mode: bool) -> Result<String, DiagramErrorKind> {
            let next = self.counter.advance();
            self.surface.mount(next, "<p>other record</p>".to_owned());
            Ok("<svg></svg>".to_owned())
        }
    }

    fn doc() -> String {
        format!(
            "<p>a</p>{}<p>b</p>{}",
            placeholder_html("d1", "graph TD"),
            placeholder_html("d2", "broken")
        )
    }

    #[test]
    fn test_partial_failure() {
        let (html, outcome) = rasterize_html(&doc(), true, &Stub);

        assert!(html.starts_with("<p>a</p><div class=\"mermaid-diagram mermaid-rendered\""));
        assert!(html.contains("<svg data-dark=\"true\">graph TD</svg>"));
        assert!(html.contains("class=\"mermaid-error\""));
        assert!(html.contains("HTTP error: HTTP 400: syntax error"));
        assert_eq!(outcome.rendered, 1);
        assert_eq!(outcome.failed, 1);
        assert!(!outcome.success);
        assert_eq!(outcome.message, "1 of 2 diagrams failed");
    }

    #[test]
    fn test_no_placeholders() {
        let (html, outcome) = rasterize_html("<p>x</p>", false, &Stub);
        assert_eq!(html, "<p>x</p>");
        assert!(outcome.success);
        assert_eq!(outcome.rendered, 0);
    }

    #[test]
    fn test_empty_source_skipped() {
        let html = placeholder_html("d1", "");
        let (out, outcome) = rasterize_html(&html, false, &Stub);
        assert_eq!(out, html);
        assert_eq!(outcome.rendered, 0);
    }

    #[test]
    fn test_surface_updated_for_current_generation() {
        let counter = GenerationCounter::new();
        let surface = PreviewSurface::new();
        let generation = counter.advance();
        surface.mount(generation, placeholder_html("d1", "graph TD"));

        let outcome = render_diagrams_in_surface(&surface, generation, false, &Stub);

        assert!(outcome.success);
        assert!(surface.html().unwrap().contains("mermaid-rendered"));
    }

    #[test]
    fn test_unmounted_surface_is_noop() {
        let counter = GenerationCounter::new();
        let surface = PreviewSurface::new();
        let generation = counter.advance();

        let outcome = render_diagrams_in_surface(&surface, generation, false, &Stub);
        assert!(outcome.stale);
        assert!(!surface.is_mounted());
    }

    #[test]
    fn test_superseded_pass_not_applied() {
        let counter = GenerationCounter::new();
        let surface = PreviewSurface::new();
        let generation = counter.advance();
        surface.mount(generation, placeholder_html("d1", "graph TD"));

        let rasterizer = Superseding {
            surface: &surface,
            counter: &counter,
        };
        let outcome = render_diagrams_in_surface(&surface, generation, false, &rasterizer);

        assert!(outcome.stale);
        assert_eq!(surface.html().as_deref(), Some("<p>other record</p>"));
    }
}
