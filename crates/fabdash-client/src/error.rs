//! Error types for API client operations
//!
//! The coordinator branches on typed variants, never on message substrings.
//! The message carried inside each variant is the single error signal a
//! calling feature surfaces to its user.

/// What a 401 response said about the session.
///
/// Derived from the response body in one place (`classify`); everything
/// downstream matches on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// The server reported the session or token as expired
    SessionExpired,
    /// The server reported no authenticated session at all
    NotAuthenticated,
    /// A 401 with an unrecognized message
    Other,
}

impl AuthFailure {
    /// Whether this failure is the narrow trigger for the one-shot refresh.
    pub fn triggers_refresh(self) -> bool {
        matches!(self, Self::SessionExpired | Self::NotAuthenticated)
    }
}

/// Errors from API client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unauthorized: {message}")]
    Unauthorized { failure: AuthFailure, message: String },

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid request body: {0}")]
    Encode(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("session storage error: {0}")]
    Session(#[from] fabdash_session::Error),
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_failures_trigger_refresh() {
        assert!(AuthFailure::SessionExpired.triggers_refresh());
        assert!(AuthFailure::NotAuthenticated.triggers_refresh());
        assert!(!AuthFailure::Other.triggers_refresh());
    }

    #[test]
    fn display_carries_the_extracted_message() {
        let err = Error::Status {
            status: 502,
            message: "upstream unavailable".into(),
        };
        assert_eq!(err.to_string(), "server returned 502: upstream unavailable");

        let err = Error::Unauthorized {
            failure: AuthFailure::SessionExpired,
            message: "Session expired".into(),
        };
        assert_eq!(err.to_string(), "unauthorized: Session expired");
    }
}
