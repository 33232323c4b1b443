//! The persisted identity + token bundle

use common::Secret;
use serde::{Deserialize, Serialize};

/// A signed-in user's session as stored on disk and held by the auth
/// context.
///
/// Created on successful login or token refresh, overwritten wholesale on
/// refresh, deleted on logout or on an irrecoverable 401. The token is an
/// opaque bearer credential; the client never verifies its signature, only
/// its shape and (via the payload) its expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub username: String,
    /// Role names in the order the server granted them
    pub roles: Vec<String>,
    /// Bearer token, redacted in Debug output
    pub token: Secret<String>,
}

impl SessionRecord {
    pub fn new(
        id: i64,
        username: impl Into<String>,
        roles: Vec<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            roles,
            token: Secret::new(token.into()),
        }
    }

    /// The raw bearer token string.
    pub fn token(&self) -> &str {
        self.token.expose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let record = SessionRecord::new(7, "amina", vec!["Supervisor".into()], "aaa.bbb.ccc");
        let debug = format!("{record:?}");
        assert!(debug.contains("amina"));
        assert!(!debug.contains("aaa.bbb.ccc"), "token leaked: {debug}");
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn serde_roundtrip_preserves_all_fields() {
        let record = SessionRecord::new(
            1,
            "admin",
            vec!["Admin".into(), "HR".into()],
            "hdr.pay.sig",
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: SessionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.token(), "hdr.pay.sig");
    }

    #[test]
    fn deserializes_refresh_endpoint_field_order() {
        // The refresh endpoint responds {id, roles, token, username}
        let json = r#"{"id":3,"roles":["Accounting"],"token":"a.b.c","username":"lena"}"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(record.username, "lena");
        assert_eq!(record.roles, vec!["Accounting"]);
    }
}
