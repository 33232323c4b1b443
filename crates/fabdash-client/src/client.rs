//! Request execution and refresh coordination
//!
//! `ApiClient` turns a logical call (endpoint + [`RequestOptions`]) into
//! one HTTP dispatch, hands the response to the classifier, and runs the
//! session-recovery state machine around the result:
//!
//! ```text
//! INITIAL -> DISPATCHED -> { OK, UNAUTHORIZED, ERROR }
//! UNAUTHORIZED -> REFRESHING -> { RETRIED_OK, RETRIED_FAIL, REFRESH_FAILED }
//! ```
//!
//! Refresh is attempted at most once per logical call, and only when the
//! 401 was classified as a session failure. The retried dispatch is never
//! itself eligible for a refresh, so there is no retry chain.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use fabdash_session::{SessionRecord, token};

use crate::auth::AuthContext;
use crate::classify::{ApiBody, classify};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::request::{Payload, RequestOptions, build_headers};

/// HTTP client bound to one backend and one auth context.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<AuthContext>,
}

impl ApiClient {
    /// Build a client from configuration. The configured timeout applies
    /// to every dispatch, including the refresh call.
    pub fn new(config: &Config, auth: Arc<AuthContext>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Transport(format!("building http client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            auth,
        })
    }

    /// Execute one logical call with at-most-once refresh-and-retry.
    pub async fn call(&self, endpoint: &str, options: RequestOptions) -> Result<ApiBody> {
        match self.dispatch(endpoint, &options).await {
            Err(Error::Unauthorized { failure, message }) if failure.triggers_refresh() => {
                debug!(endpoint, "unauthorized, attempting one token refresh");
                match self.refresh_session().await {
                    Ok(()) => match self.dispatch(endpoint, &options).await {
                        // A second 401 is terminal: the refreshed token was
                        // rejected too, so the session is gone. The retry's
                        // own classification is the one surfaced.
                        Err(Error::Unauthorized {
                            failure: retry_failure,
                            message: retry_message,
                        }) => {
                            warn!(endpoint, "request unauthorized after refresh, signing out");
                            self.auth.force_logout(&retry_message).await;
                            Err(Error::Unauthorized {
                                failure: retry_failure,
                                message: retry_message,
                            })
                        }
                        other => other,
                    },
                    Err(refresh_error) => {
                        warn!(endpoint, error = %refresh_error, "token refresh failed, signing out");
                        self.auth.force_logout(&message).await;
                        // Cleanup done; the caller sees the original failure,
                        // not the refresh error.
                        Err(Error::Unauthorized { failure, message })
                    }
                }
            }
            Err(Error::Unauthorized { failure, message }) => {
                warn!(endpoint, "unauthorized with no refreshable session, signing out");
                self.auth.force_logout(&message).await;
                Err(Error::Unauthorized { failure, message })
            }
            other => other,
        }
    }

    /// One network dispatch: build URL and headers, attach the bearer
    /// token if one is present, send, classify.
    async fn dispatch(&self, endpoint: &str, options: &RequestOptions) -> Result<ApiBody> {
        let request_id = Uuid::new_v4();
        let url = self.endpoint_url(endpoint);

        let mut builder = self
            .http
            .request(options.method.clone(), &url)
            .headers(build_headers(options));

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }

        // Fail-open by design: the token is attached whenever one is
        // present, without an expiry pre-check. A client-side clock ahead
        // of the server would otherwise reject tokens the server still
        // accepts; the server's 401 is authoritative.
        if let Some(token) = self.auth.bearer_token().await {
            builder = builder.bearer_auth(token);
        }

        builder = match &options.body {
            Some(Payload::Json(value)) => builder.body(
                serde_json::to_string(value)
                    .map_err(|e| Error::Encode(format!("encoding JSON body: {e}")))?,
            ),
            Some(Payload::Text(text)) => builder.body(text.clone()),
            Some(Payload::Bytes(bytes)) => builder.body(bytes.clone()),
            None => builder,
        };

        debug!(%request_id, method = %options.method, endpoint, "dispatching api request");
        metrics::counter!("client_requests_total", "method" => options.method.to_string())
            .increment(1);

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Transport(format!("request to {url} failed: {e}")))?;

        classify(response).await
    }

    /// Exchange the current (possibly stale) bearer token for a fresh
    /// session via the refresh endpoint. Success wholesale-replaces the
    /// stored record.
    async fn refresh_session(&self) -> Result<()> {
        let Some(stale) = self.auth.bearer_token().await else {
            return Err(Error::RefreshFailed("no stored session to refresh".into()));
        };

        let response = self
            .http
            .post(format!("{}/auth/refresh", self.base_url))
            .bearer_auth(stale)
            .send()
            .await
            .map_err(|e| Error::RefreshFailed(format!("refresh request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            metrics::counter!("client_token_refreshes_total", "outcome" => "failure").increment(1);
            return Err(Error::RefreshFailed(format!(
                "refresh endpoint returned {status}: {body}"
            )));
        }

        let record: SessionRecord = response
            .json()
            .await
            .map_err(|e| Error::RefreshFailed(format!("invalid refresh response: {e}")))?;

        info!(username = %record.username, "token refresh succeeded");
        metrics::counter!("client_token_refreshes_total", "outcome" => "success").increment(1);
        self.auth.session_refreshed(record).await?;
        Ok(())
    }

    /// Proactive refresh for app start/resume: if the stored token is
    /// within the expiry buffer (or undecodable), refresh it now instead
    /// of waiting for a 401. Returns whether a refresh happened.
    pub async fn refresh_if_expiring(&self) -> Result<bool> {
        match self.auth.bearer_token().await {
            Some(stored) if token::is_expired(&stored) => {
                debug!("stored token within expiry buffer, refreshing proactively");
                self.refresh_session().await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}
