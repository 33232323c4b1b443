//! Response classification
//!
//! Interprets every response the executor receives. Success bodies come
//! back as parsed JSON or raw text depending on the content type; failures
//! come back as typed errors carrying one best-effort message extracted
//! from the body. 401 responses additionally carry an [`AuthFailure`] so
//! the refresh coordinator can branch on a type instead of matching
//! message substrings downstream.

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::error::{AuthFailure, Error, Result};

/// A successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    Json(Value),
    Text(String),
}

impl ApiBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiBody::Json(value) => Some(value),
            ApiBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ApiBody::Text(text) => Some(text),
            ApiBody::Json(_) => None,
        }
    }
}

impl AuthFailure {
    /// Classify a 401 by its extracted message. This is the only place in
    /// the client that looks at auth-failure message text.
    fn from_message(message: &str) -> Self {
        let lowered = message.to_ascii_lowercase();
        if lowered.contains("session expired") {
            AuthFailure::SessionExpired
        } else if lowered.contains("not authenticated") {
            AuthFailure::NotAuthenticated
        } else {
            AuthFailure::Other
        }
    }
}

/// Interpret a response.
///
/// - 2xx with a JSON content type: parsed JSON
/// - 2xx otherwise: raw text
/// - 401: `Error::Unauthorized` with a typed failure
/// - any other status: `Error::Status` with the extracted message
pub async fn classify(response: reqwest::Response) -> Result<ApiBody> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_owned();

    if status.is_success() {
        if is_json(&content_type) {
            let text = response
                .text()
                .await
                .map_err(|e| Error::Transport(format!("reading response body: {e}")))?;
            return serde_json::from_str(&text)
                .map(ApiBody::Json)
                .map_err(|e| Error::Decode(format!("response claimed JSON but was not: {e}")));
        }
        return response
            .text()
            .await
            .map(ApiBody::Text)
            .map_err(|e| Error::Transport(format!("reading response body: {e}")));
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_message(status, &body);

    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized {
            failure: AuthFailure::from_message(&message),
            message,
        });
    }

    Err(Error::Status {
        status: status.as_u16(),
        message,
    })
}

fn is_json(content_type: &str) -> bool {
    content_type.starts_with("application/json") || content_type.contains("+json")
}

/// Best-effort failure message: JSON `message` or `error` string field,
/// else the raw body, else the HTTP status line.
fn extract_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = map.get(key).and_then(Value::as_str) {
                return text.to_owned();
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_owned();
    }
    status
        .canonical_reason()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
