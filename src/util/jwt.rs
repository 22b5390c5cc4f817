//! Unverified JSON Web Token payload decoding.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend signs tokens with a secret the browser never sees, so the
//! client only reads the payload to learn who is logged in. Authorization is
//! still enforced server-side on every request.

#[cfg(test)]
#[path = "jwt_test.rs"]
mod jwt_test;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has no payload segment")]
    MissingPayload,
    #[error("token payload is not base64url: {0}")]
    Base64(String),
    #[error("token payload is not valid JSON: {0}")]
    Json(String),
    #[error("token payload is not a JSON object")]
    NotAnObject,
}

/// Decoded token payload.
///
/// Claims are kept untyped; the backend may add fields without breaking
/// older clients.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenClaims(Map<String, Value>);

impl TokenClaims {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The numeric or string user id, if the backend put one in the token.
    #[must_use]
    pub fn user_id(&self) -> Option<&Value> {
        self.get("user_id").filter(|v| !v.is_null())
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.get("role").and_then(Value::as_str)
    }

    /// Expiry in seconds since the Unix epoch.
    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        self.get("exp").and_then(Value::as_i64)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for TokenClaims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Decode the payload segment of `token`.
///
/// The payload is read as base64url; `+` and `/` from the standard
/// alphabet are accepted as well, and padding is ignored.
///
/// # Errors
///
/// Returns a [`TokenError`] when the token has no payload segment or the
/// segment is not base64url-encoded JSON object text.
pub fn decode(token: &str) -> Result<TokenClaims, TokenError> {
    let payload = token.split('.').nth(1).ok_or(TokenError::MissingPayload)?;
    let payload: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| TokenError::Base64(e.to_string()))?;
    match serde_json::from_slice::<Value>(&bytes).map_err(|e| TokenError::Json(e.to_string()))? {
        Value::Object(map) => Ok(TokenClaims(map)),
        _ => Err(TokenError::NotAnObject),
    }
}

/// Build an unsigned token carrying `claims`, for tests.
#[cfg(test)]
pub(crate) fn unsigned_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}
