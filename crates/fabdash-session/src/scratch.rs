//! One-shot session-scoped markers
//!
//! The tab-lifetime analogue of the durable store: survives navigation
//! within one run of the app, gone on restart. The auth context writes
//! notice markers here; the page shell reads each one exactly once.

use std::collections::HashMap;
use std::sync::Mutex;

/// Marker set after a successful login, consumed by the next page.
pub const SHOW_LOGIN_NOTICE: &str = "fabdash.notice.login";

/// Marker set after logout (voluntary or forced).
pub const SHOW_LOGOUT_NOTICE: &str = "fabdash.notice.logout";

/// Human-readable reason accompanying a logout notice.
pub const LOGOUT_REASON: &str = "fabdash.notice.logout_reason";

/// In-memory marker store with read-and-clear semantics.
#[derive(Default)]
pub struct ScratchStore {
    state: Mutex<HashMap<String, String>>,
}

impl ScratchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a marker, replacing any previous value.
    pub fn set(&self, key: &str, value: impl Into<String>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.insert(key.to_owned(), value.into());
    }

    /// Take a marker: returns the value and removes it, so a second take
    /// observes nothing.
    pub fn take(&self, key: &str) -> Option<String> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_is_one_shot() {
        let scratch = ScratchStore::new();
        scratch.set(SHOW_LOGOUT_NOTICE, "true");

        assert_eq!(scratch.take(SHOW_LOGOUT_NOTICE).as_deref(), Some("true"));
        assert_eq!(scratch.take(SHOW_LOGOUT_NOTICE), None);
    }

    #[test]
    fn set_replaces_previous_value() {
        let scratch = ScratchStore::new();
        scratch.set(LOGOUT_REASON, "Logged out");
        scratch.set(LOGOUT_REASON, "Session expired");
        assert_eq!(
            scratch.take(LOGOUT_REASON).as_deref(),
            Some("Session expired")
        );
    }

    #[test]
    fn take_of_unset_key_is_none() {
        let scratch = ScratchStore::new();
        assert_eq!(scratch.take(SHOW_LOGIN_NOTICE), None);
    }
}
