//! Bearer token payload inspection
//!
//! Decodes the middle segment of a three-part token (base64url, JSON) to
//! read its `exp` claim. No signature verification happens client-side —
//! the server is the authority; this exists only so the client can refresh
//! proactively instead of discovering expiry via a 401.
//!
//! Every failure mode (wrong segment count, bad base64, bad JSON, missing
//! claim) is fail-closed: the token is reported expired.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::time::{SystemTime, UNIX_EPOCH};

/// Safety margin before hard expiry. A token within this window of its
/// `exp` is already treated as expired so the refresh happens before the
/// server starts rejecting it.
pub const EXPIRY_BUFFER_SECS: u64 = 300;

/// Whether a token is syntactically a signed token: exactly three
/// non-empty dot-delimited segments. Shape only, no decoding.
pub fn is_wellformed(token: &str) -> bool {
    let segments: Vec<&str> = token.split('.').collect();
    segments.len() == 3 && segments.iter().all(|s| !s.is_empty())
}

/// Expiry claim (epoch seconds) from the token payload, if decodable.
pub fn expires_at(token: &str) -> Option<u64> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(segments[1]).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_u64()
}

/// Whether the token is expired (or close enough to expiry that it should
/// be refreshed) as of `now_secs`.
pub fn is_expired_at(token: &str, now_secs: u64) -> bool {
    match expires_at(token) {
        Some(exp) => exp < now_secs + EXPIRY_BUFFER_SECS,
        None => true,
    }
}

/// [`is_expired_at`] against the wall clock.
pub fn is_expired(token: &str) -> bool {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    is_expired_at(token, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mint an unsigned token whose payload carries the given claims JSON.
    fn token_with_payload(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
        format!("{header}.{payload}.sig")
    }

    fn token_with_exp(exp: u64) -> String {
        token_with_payload(&serde_json::json!({ "sub": "1", "exp": exp }))
    }

    #[test]
    fn wellformed_requires_three_nonempty_segments() {
        assert!(is_wellformed("a.b.c"));
        assert!(!is_wellformed("a.b"));
        assert!(!is_wellformed("a.b.c.d"));
        assert!(!is_wellformed("a..c"));
        assert!(!is_wellformed(""));
    }

    #[test]
    fn expires_at_reads_exp_claim() {
        let token = token_with_exp(1_900_000_000);
        assert_eq!(expires_at(&token), Some(1_900_000_000));
    }

    #[test]
    fn expires_at_is_none_for_garbage() {
        assert_eq!(expires_at("not-a-token"), None);
        assert_eq!(expires_at("a.!!!not-base64!!!.c"), None);

        // Valid base64 but not JSON
        let bad_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"plain text"));
        assert_eq!(expires_at(&bad_json), None);

        // Valid JSON without an exp claim
        let no_exp = token_with_payload(&serde_json::json!({ "sub": "1" }));
        assert_eq!(expires_at(&no_exp), None);
    }

    #[test]
    fn expired_below_buffer_boundary() {
        let now = 1_000_000;
        // exp exactly at now + buffer is still valid; one second inside is not
        assert!(!is_expired_at(&token_with_exp(now + EXPIRY_BUFFER_SECS), now));
        assert!(is_expired_at(
            &token_with_exp(now + EXPIRY_BUFFER_SECS - 1),
            now
        ));
    }

    #[test]
    fn expired_for_past_exp() {
        assert!(is_expired_at(&token_with_exp(500), 1_000_000));
    }

    #[test]
    fn not_expired_for_distant_exp() {
        assert!(!is_expired_at(&token_with_exp(2_000_000), 1_000_000));
    }

    #[test]
    fn undecodable_input_is_expired() {
        assert!(is_expired("definitely not a token"));
        assert!(is_expired(""));
        assert!(is_expired("a.b.c"));
    }
}
