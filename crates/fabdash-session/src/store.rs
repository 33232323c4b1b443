//! Durable session storage
//!
//! A single JSON object file plays the role the browser's local storage
//! played for the original dashboard: string keys to JSON values, surviving
//! restarts. The session record lives under one well-known key; the key
//! name and the list of legacy keys to sweep on clear are private to this
//! module so no other component can grow its own opinion about them.
//!
//! All writes use atomic temp-file + rename to prevent corruption on crash.
//! A tokio Mutex serializes writers; last writer wins, which is acceptable
//! because writes only happen on login, refresh, and logout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::SessionRecord;
use crate::token;

/// The one durable key holding the JSON-encoded [`SessionRecord`].
const SESSION_KEY: &str = "fabdash.session";

/// Token-shaped keys written by prior schema versions. Deleted whenever the
/// session is cleared; their contents are never consulted.
const LEGACY_KEYS: &[&str] = &["fabdash.token", "fabdash.authToken", "fabdash.refreshToken"];

/// File-backed store owning the persisted session.
pub struct SessionStore {
    path: PathBuf,
    state: Mutex<HashMap<String, Value>>,
}

impl SessionStore {
    /// Open the store at the given file path.
    ///
    /// A missing file is created empty. An unreadable or unparseable file
    /// is treated as empty and rewritten — stored-data corruption is always
    /// recovered locally, never surfaced to the UI.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let state = if path.exists() {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| Error::Io(format!("reading session file: {e}")))?;
            match serde_json::from_str::<HashMap<String, Value>>(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "session file corrupt, starting empty");
                    let empty = HashMap::new();
                    write_atomic(&path, &empty).await?;
                    empty
                }
            }
        } else {
            info!(path = %path.display(), "session file not found, starting with empty store");
            let empty = HashMap::new();
            write_atomic(&path, &empty).await?;
            empty
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// The current session, if a valid one is stored.
    ///
    /// A malformed value (wrong JSON shape, or a token that is not a
    /// three-part dot-delimited string) is purged from the file and
    /// reported as absent. Calling again after a purge is a plain miss.
    pub async fn load(&self) -> Result<Option<SessionRecord>> {
        let mut state = self.state.lock().await;

        let Some(value) = state.get(SESSION_KEY).cloned() else {
            return Ok(None);
        };

        match serde_json::from_value::<SessionRecord>(value) {
            Ok(record) if token::is_wellformed(record.token()) => Ok(Some(record)),
            Ok(_) => {
                warn!("stored session token is not a three-part token, purging");
                state.remove(SESSION_KEY);
                write_atomic(&self.path, &state).await?;
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "stored session is malformed, purging");
                state.remove(SESSION_KEY);
                write_atomic(&self.path, &state).await?;
                Ok(None)
            }
        }
    }

    /// Overwrite the stored session unconditionally (login and refresh).
    pub async fn save(&self, record: &SessionRecord) -> Result<()> {
        let mut state = self.state.lock().await;
        let value = serde_json::to_value(record)
            .map_err(|e| Error::Serialize(format!("encoding session record: {e}")))?;
        state.insert(SESSION_KEY.to_owned(), value);
        debug!(username = %record.username, "saved session");
        write_atomic(&self.path, &state).await
    }

    /// Remove the session key and any legacy auxiliary token keys.
    pub async fn clear(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        let mut removed = state.remove(SESSION_KEY).is_some();
        for key in LEGACY_KEYS {
            removed |= state.remove(*key).is_some();
        }
        if removed {
            debug!("cleared session");
            write_atomic(&self.path, &state).await?;
        }
        Ok(())
    }
}

/// Write the store contents to a file atomically.
///
/// Writes to a temporary file in the same directory, then renames it over
/// the target. Sets file permissions to 0600 since the file contains a
/// bearer token.
async fn write_atomic(path: &Path, data: &HashMap<String, Value>) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| Error::Serialize(format!("encoding session file: {e}")))?;

    let dir = path
        .parent()
        .ok_or_else(|| Error::Io("session path has no parent directory".into()))?;

    let tmp_path = dir.join(format!(".session.tmp.{}", std::process::id()));

    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| Error::Io(format!("writing temp session file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&tmp_path, perms)
            .await
            .map_err(|e| Error::Io(format!("setting session file permissions: {e}")))?;
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Error::Io(format!("renaming temp session file: {e}")))?;

    debug!(path = %path.display(), "persisted session file");
    Ok(())
}
