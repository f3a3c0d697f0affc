//! The live preview container diagrams are rendered into.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::generation::{GenerationCounter, RenderGeneration};

#[derive(Debug)]
struct Mounted {
    generation: RenderGeneration,
    html: String,
}

/// Shared handle on the HTML currently shown to the user.
///
/// A surface is either unmounted or shows the output of one render
/// generation. Deferred work reads a snapshot, and writes back only while the
/// surface still shows the generation it started from.
#[derive(Debug, Default)]
pub struct PreviewSurface {
    state: Mutex<Option<Mounted>>,
}

impl PreviewSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Mounted>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show `html` as the output of `generation`, replacing what was there.
    pub fn mount(&self, generation: RenderGeneration, html: String) {
        *self.lock() = Some(Mounted { generation, html });
    }

    /// Mount `html` only while `generation` is the latest one `counter` issued.
    ///
    /// The check and the write happen under the surface lock, so a render that
    /// finishes after a newer one started can never replace it.
    pub fn mount_if_current(
        &self,
        counter: &GenerationCounter,
        generation: RenderGeneration,
        html: String,
    ) -> bool {
        let mut state = self.lock();
        if !counter.is_current(generation) {
            return false;
        }
        *state = Some(Mounted { generation, html });
        true
    }

    pub fn unmount(&self) {
        *self.lock() = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().is_some()
    }

    pub fn generation(&self) -> Option<RenderGeneration> {
        self.lock().as_ref().map(|m| m.generation)
    }

    /// Current HTML, if mounted.
    pub fn html(&self) -> Option<String> {
        self.lock().as_ref().map(|m| m.html.clone())
    }

    /// HTML of `generation`, or `None` if the surface moved on or is gone.
    pub fn snapshot(&self, generation: RenderGeneration) -> Option<String> {
        self.lock()
            .as_ref()
            .filter(|m| m.generation == generation)
            .map(|m| m.html.clone())
    }

    /// Replace the HTML if the surface still shows `generation`.
    ///
    /// Returns `false` and leaves the surface untouched otherwise.
    pub fn replace_if_current(&self, generation: RenderGeneration, html: String) -> bool {
        match self.lock().as_mut() {
            Some(mounted) if mounted.generation == generation => {
                mounted.html = html;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use static_assertions::assert_impl_all;

    assert_impl_all!(PreviewSurface: Send, Sync);

    #[test]
    fn test_replace_only_current_generation() {
        let counter = GenerationCounter::new();
        let surface = PreviewSurface::new();

        let old = counter.advance();
        surface.mount(old, "old".to_owned());
        let new = counter.advance();
        surface.mount(new, "new".to_owned());

        assert!(!surface.replace_if_current(old, "stale".to_owned()));
        assert_eq!(surface.html().as_deref(), Some("new"));
        assert_eq!(surface.snapshot(old), None);

        assert!(surface.replace_if_current(new, "fresh".to_owned()));
        assert_eq!(surface.html().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_mount_if_current_rejects_superseded_render() {
        let counter = GenerationCounter::new();
        let surface = PreviewSurface::new();

        let slow = counter.advance();
        let fast = counter.advance();
        assert!(surface.mount_if_current(&counter, fast, "fast".to_owned()));
        assert!(!surface.mount_if_current(&counter, slow, "slow".to_owned()));

        assert_eq!(surface.generation(), Some(fast));
        assert_eq!(surface.html().as_deref(), Some("fast"));
    }

    #[test]
    fn test_mount_if_current_after_close() {
        let counter = GenerationCounter::new();
        let surface = PreviewSurface::new();

        let pending = counter.advance();
        counter.advance();
        surface.unmount();

        assert!(!surface.mount_if_current(&counter, pending, "late".to_owned()));
        assert!(!surface.is_mounted());
    }

    #[test]
    fn test_unmounted_surface_ignores_writes() {
        let counter = GenerationCounter::new();
        let surface = PreviewSurface::new();
        let generation = counter.advance();

        surface.mount(generation, "x".to_owned());
        surface.unmount();

        assert!(!surface.is_mounted());
        assert!(!surface.replace_if_current(generation, "y".to_owned()));
        assert_eq!(surface.html(), None);
    }
}
