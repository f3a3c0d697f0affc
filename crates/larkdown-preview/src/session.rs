//! One preview panel: render, mount, rasterize, repeat.
//!
//! Each call to [`PreviewSession::render`] advances the session's generation
//! before parsing. Mounting and rasterization both check that generation, so
//! a render or diagram pass started for an older record or theme never writes
//! over the newer document.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use larkdown_diagrams::{
    DiagramRasterizer, GenerationCounter, PreviewSurface, RasterizeOutcome, RenderGeneration,
    render_diagrams_in_surface,
};
use larkdown_style::RenderOptions;

use crate::parser::MarkdownParser;
use crate::theme::{Subscription, ThemeMode, ThemeSource};

/// Inputs of the last render, kept so a theme change can redo it.
#[derive(Clone, Debug)]
struct Document {
    markdown: String,
    template_id: String,
    options: RenderOptions,
}

pub struct PreviewSession<'r, R> {
    parser: MarkdownParser<'r>,
    rasterizer: R,
    generations: GenerationCounter,
    surface: Arc<PreviewSurface>,
    document: Mutex<Option<Document>>,
}

impl<'r, R: DiagramRasterizer> PreviewSession<'r, R> {
    pub fn new(parser: MarkdownParser<'r>, rasterizer: R) -> Self {
        Self {
            parser,
            rasterizer,
            generations: GenerationCounter::new(),
            surface: Arc::new(PreviewSurface::new()),
            document: Mutex::new(None),
        }
    }

    /// Surface the session mounts into.
    pub fn surface(&self) -> &Arc<PreviewSurface> {
        &self.surface
    }

    pub fn parser(&self) -> &MarkdownParser<'r> {
        &self.parser
    }

    /// Render a document and mount it, superseding any earlier render.
    ///
    /// If another render starts before this one finishes, the newer one wins
    /// and this generation is never shown.
    pub fn render(
        &self,
        markdown: &str,
        template_id: &str,
        options: &RenderOptions,
    ) -> RenderGeneration {
        let generation = self.generations.advance();
        self.finish_render(generation, markdown, template_id, options);
        generation
    }

    /// Parse and mount for `generation`. Returns `false` if it was superseded.
    fn finish_render(
        &self,
        generation: RenderGeneration,
        markdown: &str,
        template_id: &str,
        options: &RenderOptions,
    ) -> bool {
        let html = self.parser.parse(markdown, template_id, options);
        if !self.surface.mount_if_current(&self.generations, generation, html) {
            tracing::debug!(generation = generation.get(), "Superseded render dropped");
            return false;
        }

        let mut document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        if self.generations.is_current(generation) {
            *document = Some(Document {
                markdown: markdown.to_owned(),
                template_id: template_id.to_owned(),
                options: options.clone(),
            });
        }

        tracing::debug!(generation = generation.get(), template = template_id, "Preview mounted");
        true
    }

    /// Rasterize the diagrams of `generation`, if it is still shown.
    pub fn rasterize(&self, generation: RenderGeneration) -> RasterizeOutcome {
        let dark_mode = self
            .document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|doc| doc.options.dark_mode);
        render_diagrams_in_surface(&self.surface, generation, dark_mode, &self.rasterizer)
    }

    /// Render a record's markdown, then its diagrams.
    pub fn show_record(
        &self,
        markdown: &str,
        template_id: &str,
        options: &RenderOptions,
    ) -> RasterizeOutcome {
        let generation = self.render(markdown, template_id, options);
        self.rasterize(generation)
    }

    /// Re-render the current document for a new theme.
    ///
    /// Returns `None` when nothing has been rendered yet.
    pub fn apply_theme(&self, mode: ThemeMode) -> Option<RasterizeOutcome> {
        let mut document = self
            .document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()?;
        document.options.dark_mode = mode.is_dark();
        Some(self.show_record(&document.markdown, &document.template_id, &document.options))
    }

    /// Unmount the preview. In-flight passes become stale.
    pub fn close(&self) {
        self.generations.advance();
        self.surface.unmount();
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<R: DiagramRasterizer + 'static> PreviewSession<'static, R> {
    /// Re-render whenever `source` changes theme.
    ///
    /// The subscription holds only a weak reference to the session.
    pub fn watch_theme(self: &Arc<Self>, source: &dyn ThemeSource) -> Subscription {
        let session: Weak<Self> = Arc::downgrade(self);
        source.subscribe(Arc::new(move |mode| {
            if let Some(session) = session.upgrade()
                && let Some(outcome) = session.apply_theme(mode)
            {
                tracing::debug!(
                    mode = %mode,
                    message = %outcome.message,
                    "Preview re-rendered for theme"
                );
            }
        }))
    }
}
