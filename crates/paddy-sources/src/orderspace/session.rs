//! Bearer-token session owned by one [`super::OrderspaceClient`].
//!
//! Empty at construction, filled lazily by the first request, replaced when
//! expired. Lives exactly as long as its client; nothing is persisted.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// A token is treated as expired this long before the server says it is.
pub const REFRESH_MARGIN_SECS: i64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
}

#[derive(Default)]
pub struct TokenSession {
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for TokenSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSession")
            .field("token", &self.token.as_ref().map(|_| "<REDACTED>"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl TokenSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached token, if one is held and still usable at `now`.
    pub fn valid_token(&self, now: DateTime<Utc>) -> Option<&str> {
        match (&self.token, self.expires_at) {
            (Some(t), Some(exp)) if now < exp => Some(t.as_str()),
            _ => None,
        }
    }

    /// Store a freshly issued token. Expiry is pulled in by
    /// [`REFRESH_MARGIN_SECS`]; a lifetime shorter than the margin leaves the
    /// token already stale, so the next call refreshes again.
    pub fn store(&mut self, token: String, expires_in_secs: i64, issued_at: DateTime<Utc>) {
        self.expires_at = Some(issued_at + Duration::seconds(expires_in_secs - REFRESH_MARGIN_SECS));
        self.token = Some(token);
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.expires_at = None;
    }
}
