//! Host theme tracking.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Light or dark host theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown theme mode: {0}")]
pub struct UnknownThemeMode(String);

impl FromStr for ThemeMode {
    type Err = UnknownThemeMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(UnknownThemeMode(s.to_owned())),
        }
    }
}

/// Callback invoked with the new mode on every theme change.
pub type ThemeListener = Arc<dyn Fn(ThemeMode) + Send + Sync>;

/// A source of the host's current theme.
pub trait ThemeSource: Send + Sync {
    fn theme(&self) -> ThemeMode;

    /// Register `listener`. It stays registered until the returned
    /// [`Subscription`] is dropped.
    fn subscribe(&self, listener: ThemeListener) -> Subscription;
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

struct BroadcasterState {
    mode: ThemeMode,
    next_id: u64,
    listeners: Vec<(u64, ThemeListener)>,
}

/// In-memory [`ThemeSource`] that broadcasts changes to its listeners.
#[derive(Clone)]
pub struct ThemeBroadcaster {
    state: Arc<Mutex<BroadcasterState>>,
}

impl ThemeBroadcaster {
    #[must_use]
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            state: Arc::new(Mutex::new(BroadcasterState {
                mode,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Switch the theme, notifying listeners if it changed.
    ///
    /// Listeners run on the calling thread, outside the internal lock, so a
    /// listener may subscribe or unsubscribe.
    pub fn set_theme(&self, mode: ThemeMode) {
        let listeners: Vec<ThemeListener> = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.mode == mode {
                return;
            }
            state.mode = mode;
            state.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        tracing::debug!(mode = %mode, listeners = listeners.len(), "Theme changed");
        for listener in listeners {
            listener(mode);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }
}

impl Default for ThemeBroadcaster {
    fn default() -> Self {
        Self::new(ThemeMode::Light)
    }
}

impl ThemeSource for ThemeBroadcaster {
    fn theme(&self) -> ThemeMode {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).mode
    }

    fn subscribe(&self, listener: ThemeListener) -> Subscription {
        let id = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, listener));
            id
        };

        let state: Weak<Mutex<BroadcasterState>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .listeners
                    .retain(|(other, _)| *other != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use static_assertions::assert_impl_all;

    assert_impl_all!(ThemeBroadcaster: Send, Sync, Clone);
    assert_impl_all!(Subscription: Send);

    #[test]
    fn test_parse_mode() {
        assert_eq!("dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert_eq!(" Light ".parse::<ThemeMode>().unwrap(), ThemeMode::Light);
        assert_eq!("DARK".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert!("sepia".parse::<ThemeMode>().is_err());
        assert_eq!(ThemeMode::Dark.to_string(), "dark");
    }

    #[test]
    fn test_listeners_notified_on_change_only() {
        let broadcaster = ThemeBroadcaster::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let _subscription = broadcaster.subscribe(Arc::new(move |mode| {
            sink.lock().unwrap().push(mode);
        }));

        broadcaster.set_theme(ThemeMode::Dark);
        broadcaster.set_theme(ThemeMode::Dark);
        broadcaster.set_theme(ThemeMode::Light);

        assert_eq!(*seen.lock().unwrap(), [ThemeMode::Dark, ThemeMode::Light]);
        assert_eq!(broadcaster.theme(), ThemeMode::Light);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let broadcaster = ThemeBroadcaster::default();
        let subscription = broadcaster.subscribe(Arc::new(|_| {}));
        assert_eq!(broadcaster.listener_count(), 1);

        drop(subscription);
        assert_eq!(broadcaster.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_broadcaster() {
        let broadcaster = ThemeBroadcaster::default();
        let subscription = broadcaster.subscribe(Arc::new(|_| {}));
        drop(broadcaster);
        drop(subscription);
    }
}
