//! API client core for the fabdash admin dashboard
//!
//! Everything between a UI action and the REST backend lives here:
//!
//! - `ApiClient` — builds and dispatches requests, attaches the bearer
//!   token, and runs the one-shot refresh-and-retry coordination on 401
//! - `classify` — turns an HTTP response into a typed outcome (JSON body,
//!   raw text, or a typed error carrying the extracted server message)
//! - `AuthContext` — dependency-injected reactive holder of the current
//!   session, exposing login/logout to the UI layer
//! - `Navigator` — the seam through which a forced logout redirects the
//!   host shell to the login surface
//!
//! Session/auth flow per logical call:
//! 1. Dispatch once with the stored token attached if present (no expiry
//!    pre-check — the server's 401 is authoritative)
//! 2. On a 401 classified as a session failure, refresh the token exactly
//!    once and re-dispatch the original request exactly once
//! 3. On refresh failure or a second 401, clear the session, set the
//!    logout markers, and force navigation to login

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod navigate;
pub mod request;

pub use auth::{AuthContext, AuthState};
pub use classify::{ApiBody, classify};
pub use client::ApiClient;
pub use config::Config;
pub use error::{AuthFailure, Error, Result};
pub use navigate::{LoggingNavigator, Navigator};
pub use request::{Payload, RequestOptions};
