//! Reactive auth context
//!
//! Explicitly constructed, dependency-injected holder of the current
//! session — there is no module-level global. The UI layer subscribes to
//! the watch channel and calls `login`/`logout`; the request executor
//! reads the bearer token through the accessor. Nothing else touches the
//! session store, which keeps the single-source-of-truth invariant in one
//! place.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use fabdash_session::{
    LOGOUT_REASON, SHOW_LOGIN_NOTICE, SHOW_LOGOUT_NOTICE, ScratchStore, SessionRecord,
    SessionStore,
};

use crate::error::Result;
use crate::navigate::Navigator;

/// Snapshot of the auth state published to subscribers.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub user: Option<SessionRecord>,
    /// True until the one-time startup read of the session store completes
    pub loading: bool,
}

/// Tab-lifetime holder of the current session.
pub struct AuthContext {
    store: Arc<SessionStore>,
    scratch: Arc<ScratchStore>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<AuthState>,
}

impl AuthContext {
    /// Construct with `loading: true`; call [`initialize`](Self::initialize)
    /// to perform the startup read.
    pub fn new(
        store: Arc<SessionStore>,
        scratch: Arc<ScratchStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(AuthState {
            user: None,
            loading: true,
        });
        Self {
            store,
            scratch,
            navigator,
            state,
        }
    }

    /// Read the session store exactly once and publish the result.
    pub async fn initialize(&self) -> Result<()> {
        let user = self.store.load().await?;
        if let Some(record) = &user {
            info!(username = %record.username, "restored session from store");
        }
        self.state.send_replace(AuthState {
            user,
            loading: false,
        });
        Ok(())
    }

    /// Subscribe to auth state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Current snapshot without subscribing.
    pub fn current(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Bearer token currently present in the durable store, if any.
    ///
    /// Presence is the only thing callers may conclude from this — expiry
    /// is deliberately not checked here (see the executor's fail-open
    /// first-dispatch policy).
    pub async fn bearer_token(&self) -> Option<String> {
        match self.store.load().await {
            Ok(Some(record)) => Some(record.token().to_owned()),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "session store read failed, treating as signed out");
                None
            }
        }
    }

    /// Write-through login: persist the record, mark the login notice, and
    /// publish the new state (synchronously observable by subscribers).
    pub async fn login(&self, record: SessionRecord) -> Result<()> {
        self.store.save(&record).await?;
        self.scratch.set(SHOW_LOGIN_NOTICE, "true");
        info!(username = %record.username, "logged in");
        self.state.send_replace(AuthState {
            user: Some(record),
            loading: false,
        });
        Ok(())
    }

    /// Wholesale session replacement after a token refresh. No notice
    /// markers — subscribers just observe the new record.
    pub async fn session_refreshed(&self, record: SessionRecord) -> Result<()> {
        self.store.save(&record).await?;
        self.state.send_replace(AuthState {
            user: Some(record),
            loading: false,
        });
        Ok(())
    }

    /// Voluntary logout from the UI.
    pub async fn logout(&self) {
        self.sign_out("Logged out").await;
    }

    /// Logout forced by the request lifecycle (irrecoverable 401 or failed
    /// refresh).
    pub async fn force_logout(&self, reason: &str) {
        self.sign_out(reason).await;
    }

    /// Clear the durable session (including legacy keys), set the one-shot
    /// logout markers, publish the signed-out state, then hand control to
    /// the navigator. A store failure here is logged and swallowed — the
    /// redirect to login must happen regardless.
    async fn sign_out(&self, reason: &str) {
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "failed to clear session store during logout");
        }
        self.scratch.set(SHOW_LOGOUT_NOTICE, "true");
        self.scratch.set(LOGOUT_REASON, reason);
        self.state.send_replace(AuthState {
            user: None,
            loading: false,
        });
        metrics::counter!("client_logouts_total").increment(1);
        info!(reason = %reason, "signed out");
        self.navigator.to_login(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigate::RecordingNavigator;

    struct Harness {
        ctx: AuthContext,
        store: Arc<SessionStore>,
        scratch: Arc<ScratchStore>,
        navigator: Arc<RecordingNavigator>,
        _dir: tempfile::TempDir,
    }

    async fn harness() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            SessionStore::open(dir.path().join("session.json"))
                .await
                .unwrap(),
        );
        let scratch = Arc::new(ScratchStore::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let ctx = AuthContext::new(store.clone(), scratch.clone(), navigator.clone());
        Harness {
            ctx,
            store,
            scratch,
            navigator,
            _dir: dir,
        }
    }

    fn record() -> SessionRecord {
        SessionRecord::new(1, "admin", vec!["Admin".into()], "a.b.c")
    }

    #[tokio::test]
    async fn starts_loading_until_initialized() {
        let h = harness().await;
        assert!(h.ctx.current().loading);
        assert!(h.ctx.current().user.is_none());

        h.ctx.initialize().await.unwrap();
        assert!(!h.ctx.current().loading);
        assert!(h.ctx.current().user.is_none());
    }

    #[tokio::test]
    async fn initialize_restores_persisted_session() {
        let h = harness().await;
        h.store.save(&record()).await.unwrap();

        h.ctx.initialize().await.unwrap();
        let state = h.ctx.current();
        assert_eq!(state.user, Some(record()));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn login_is_synchronously_observable_and_persisted() {
        let h = harness().await;
        h.ctx.initialize().await.unwrap();
        let rx = h.ctx.subscribe();

        h.ctx.login(record()).await.unwrap();

        // Observable without awaiting a notification
        assert_eq!(rx.borrow().user, Some(record()));
        // Write-through to the durable store
        assert_eq!(h.store.load().await.unwrap(), Some(record()));
        // One-shot login notice for the next page
        assert_eq!(h.scratch.take(SHOW_LOGIN_NOTICE).as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn logout_clears_store_sets_markers_and_navigates() {
        let h = harness().await;
        h.ctx.initialize().await.unwrap();
        h.ctx.login(record()).await.unwrap();

        h.ctx.logout().await;

        assert!(h.ctx.current().user.is_none());
        assert!(h.store.load().await.unwrap().is_none());
        assert_eq!(h.scratch.take(SHOW_LOGOUT_NOTICE).as_deref(), Some("true"));
        assert_eq!(h.scratch.take(LOGOUT_REASON).as_deref(), Some("Logged out"));
        assert_eq!(
            h.navigator.calls.lock().unwrap().as_slice(),
            ["Logged out"]
        );
    }

    #[tokio::test]
    async fn next_initialization_after_logout_sees_no_user() {
        let h = harness().await;
        h.ctx.initialize().await.unwrap();
        h.ctx.login(record()).await.unwrap();
        h.ctx.logout().await;

        // Fresh context over the same store, as the next app start would do
        let ctx2 = AuthContext::new(
            h.store.clone(),
            h.scratch.clone(),
            h.navigator.clone(),
        );
        ctx2.initialize().await.unwrap();
        assert!(ctx2.current().user.is_none());
    }

    #[tokio::test]
    async fn force_logout_records_the_reason() {
        let h = harness().await;
        h.ctx.initialize().await.unwrap();
        h.ctx.login(record()).await.unwrap();

        h.ctx.force_logout("Session expired").await;

        assert_eq!(
            h.scratch.take(LOGOUT_REASON).as_deref(),
            Some("Session expired")
        );
        assert_eq!(
            h.navigator.calls.lock().unwrap().as_slice(),
            ["Session expired"]
        );
    }

    #[tokio::test]
    async fn session_refreshed_replaces_record_without_markers() {
        let h = harness().await;
        h.ctx.initialize().await.unwrap();
        h.ctx.login(record()).await.unwrap();
        h.scratch.take(SHOW_LOGIN_NOTICE);

        let refreshed = SessionRecord::new(1, "admin", vec!["Admin".into()], "n.e.w");
        h.ctx.session_refreshed(refreshed.clone()).await.unwrap();

        assert_eq!(h.ctx.current().user, Some(refreshed.clone()));
        assert_eq!(h.store.load().await.unwrap(), Some(refreshed));
        assert!(h.scratch.take(SHOW_LOGIN_NOTICE).is_none());
        assert!(h.scratch.take(SHOW_LOGOUT_NOTICE).is_none());
    }

    #[tokio::test]
    async fn bearer_token_reflects_store_contents() {
        let h = harness().await;
        assert!(h.ctx.bearer_token().await.is_none());

        h.ctx.login(record()).await.unwrap();
        assert_eq!(h.ctx.bearer_token().await.as_deref(), Some("a.b.c"));

        h.ctx.logout().await;
        assert!(h.ctx.bearer_token().await.is_none());
    }
}
