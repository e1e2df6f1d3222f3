// User feedback helpers
//
// Busy indicators that are cleared on every exit path, and error reporting
// through notifications.

use crate::models::Notification;
use crate::state::StateManager;
use std::fmt::Display;

/// Raises the loading indicator (and optionally the enhancing flag) for its
/// lifetime.
#[must_use]
pub struct LoadingGuard<'a> {
    state: &'a StateManager,
    loading: bool,
    enhancing: bool,
}

impl<'a> LoadingGuard<'a> {
    /// Loading indicator only.
    pub fn loading(state: &'a StateManager) -> Self {
        Self::raise(state, true, false)
    }

    /// Enhancing flag, plus the loading indicator when `show_loading`.
    pub fn enhancing(state: &'a StateManager, show_loading: bool) -> Self {
        Self::raise(state, show_loading, true)
    }

    fn raise(state: &'a StateManager, loading: bool, enhancing: bool) -> Self {
        state.update(|s| {
            if loading {
                s.is_loading = true;
            }
            if enhancing {
                s.is_enhancing = true;
            }
        });
        Self {
            state,
            loading,
            enhancing,
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let (loading, enhancing) = (self.loading, self.enhancing);
        self.state.update(|s| {
            if loading {
                s.is_loading = false;
            }
            if enhancing {
                s.is_enhancing = false;
            }
        });
    }
}

/// Show `error` as an error notification.
pub fn report_error(state: &StateManager, error: impl Display) {
    state.notify(Notification::error(error.to_string()));
}
