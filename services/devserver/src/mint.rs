//! Bearer token minting
//!
//! The devserver issues unsigned three-part tokens: enough for the client
//! to decode the payload and read `exp`, with validity enforced by the
//! in-memory issued-token set rather than a signature. A real backend
//! signs these; this stub deliberately does not.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Mint a token for the given subject, expiring `ttl` from now.
pub fn mint_token(subject: i64, username: &str, ttl: Duration) -> String {
    let exp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        + ttl.as_secs();
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let claims = serde_json::json!({
        "sub": subject.to_string(),
        "name": username,
        "exp": exp,
        "jti": Uuid::new_v4().to_string(),
    });
    // serde_json::Value never fails to serialize
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap_or_default());
    format!("{header}.{payload}.unsigned")
}
