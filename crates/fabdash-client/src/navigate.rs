//! Navigation seam for forced logout
//!
//! A logout is a hard redirect to the login surface, not a soft state
//! transition. The client core cannot perform the redirect itself; the
//! embedding UI shell supplies a `Navigator` and is expected to abandon any
//! in-flight request observers when it fires.

use tracing::warn;

/// Sink for forced navigation to the login surface.
pub trait Navigator: Send + Sync {
    /// Take the user to the login surface. `reason` matches the logout
    /// reason marker written to the scratch store.
    fn to_login(&self, reason: &str);
}

/// Navigator for headless embedders: records the demand in the log only.
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn to_login(&self, reason: &str) {
        warn!(reason = %reason, "navigation to login surface requested");
    }
}

/// Test navigator that records every redirect request.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingNavigator {
    pub(crate) calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl Navigator for RecordingNavigator {
    fn to_login(&self, reason: &str) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(reason.to_owned());
    }
}
