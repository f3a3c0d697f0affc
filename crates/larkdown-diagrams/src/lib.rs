//! Mermaid diagrams for larkdown, in two phases.
//!
//! 1. While markdown is rendered, [`DiagramProcessor`] replaces every
//!    ```` ```mermaid ```` fence with a placeholder carrying a unique id and the
//!    URL-encoded source. Nothing is fetched.
//! 2. Later, [`render_diagrams_in_surface`] finds the placeholders shown on a
//!    [`PreviewSurface`], rasterizes them in parallel with a
//!    [`DiagramRasterizer`] (normally [`KrokiRasterizer`]) and writes the
//!    result back, unless a newer [`RenderGeneration`] took over meanwhile.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use larkdown_diagrams::{GenerationCounter, KrokiRasterizer, PreviewSurface, render_diagrams_in_surface};
//!
//! let counter = GenerationCounter::new();
//! let surface = PreviewSurface::new();
//! let generation = counter.advance();
//! surface.mount(generation, String::from("<p>rendered html</p>"));
//!
//! let kroki = KrokiRasterizer::new("https://kroki.io", Duration::from_secs(30));
//! let outcome = render_diagrams_in_surface(&surface, generation, false, &kroki);
//! println!("{}", outcome.message);
//! ```

mod generation;
mod kroki;
mod placeholder;
mod processor;
mod rasterize;
mod surface;

pub use generation::{GenerationCounter, RenderGeneration};
pub use kroki::{DiagramError, DiagramErrorKind, DiagramRasterizer, KrokiRasterizer, create_agent};
pub use placeholder::{
    Placeholder, decode_source, encode_source, error_html, find_placeholders, next_diagram_id,
    placeholder_html, rendered_html,
};
pub use processor::{DIAGRAM_LANGUAGE, DiagramProcessor};
pub use rasterize::{RasterizeOutcome, rasterize_html, render_diagrams_in_surface};
pub use surface::PreviewSurface;
