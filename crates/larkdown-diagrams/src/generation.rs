//! Render generation tokens.
//!
//! Each render request takes the next generation from a shared counter. Work
//! that finishes later compares its token against the surface's current one
//! and drops its result if a newer render has started.

use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one render request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderGeneration(u64);

impl RenderGeneration {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic source of [`RenderGeneration`] tokens.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    next: AtomicU64,
}

impl GenerationCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every earlier one.
    pub fn advance(&self) -> RenderGeneration {
        RenderGeneration(self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Most recently issued generation, if any.
    pub fn current(&self) -> Option<RenderGeneration> {
        match self.next.load(Ordering::SeqCst) {
            0 => None,
            n => Some(RenderGeneration(n)),
        }
    }

    pub fn is_current(&self, generation: RenderGeneration) -> bool {
        self.current() == Some(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(GenerationCounter: Send, Sync);

    #[test]
    fn test_generations_increase() {
        let counter = GenerationCounter::new();
        assert_eq!(counter.current(), None);

        let first = counter.advance();
        let second = counter.advance();
        assert!(second > first);
        assert!(counter.is_current(second));
        assert!(!counter.is_current(first));
    }
}
