//! Session state for the fabdash admin client
//!
//! Owns everything the client persists about the signed-in user:
//!
//! - `SessionRecord` — the identity + bearer token bundle
//! - `SessionStore` — durable file-backed store holding the record under a
//!   single well-known key (plus cleanup of legacy keys)
//! - `ScratchStore` — process-lifetime one-shot markers consumed by the
//!   UI shell (login/logout notices)
//! - `token` — payload inspection for expiry detection (no signature check)
//!
//! The store is the single source of truth for the session. Other crates
//! reach it through accessor methods only; the key names never leave this
//! crate.

pub mod error;
pub mod record;
pub mod scratch;
pub mod store;
pub mod token;

pub use error::{Error, Result};
pub use record::SessionRecord;
pub use scratch::{LOGOUT_REASON, SHOW_LOGIN_NOTICE, SHOW_LOGOUT_NOTICE, ScratchStore};
pub use store::SessionStore;
pub use token::{EXPIRY_BUFFER_SECS, expires_at, is_expired, is_wellformed};
