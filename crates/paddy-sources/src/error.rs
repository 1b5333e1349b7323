//! Errors surfaced by the source clients.
//!
//! Clients never swallow failures: every error reaches the caller. The
//! aggregator degrades them to "zero orders from that source"; the single
//! order pass-through reports them verbatim.

/// Failure of one call against an upstream order API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// Token acquisition failed (transport, non-2xx, or undecodable token body).
    /// No data request is attempted after this.
    #[error("auth error: {0}")]
    Auth(String),

    /// The upstream API answered a list/get call with a non-2xx status.
    #[error("{}", fmt_api(*status, message, *code))]
    Api {
        status: u16,
        message: String,
        /// Application error code from the structured error body, when present.
        code: Option<i64>,
    },

    /// Network or transport failure (connect, timeout, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body matched none of the expected shapes.
    #[error("decode error: {0}")]
    Decode(String),

    /// The identifier is not valid for this source; raised before any request.
    #[error("invalid order id: {0}")]
    InvalidId(String),
}

fn fmt_api(status: u16, message: &str, code: Option<i64>) -> String {
    match code {
        Some(c) => format!("api error status={status} code={c}: {message}"),
        None => format!("api error status={status}: {message}"),
    }
}

impl SourceError {
    /// `true` when the caller supplied something malformed, as opposed to an
    /// upstream or transport fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SourceError::InvalidId(_))
    }

    /// Upstream HTTP status, for API errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SourceError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Transport(format!("request timed out: {err}"))
        } else if err.is_decode() {
            SourceError::Decode(err.to_string())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_with_code() {
        let err = SourceError::Api {
            status: 422,
            message: "invalid status filter".to_string(),
            code: Some(1001),
        };
        assert_eq!(
            err.to_string(),
            "api error status=422 code=1001: invalid status filter"
        );
        assert_eq!(err.status_code(), Some(422));
    }

    #[test]
    fn api_error_display_without_code() {
        let err = SourceError::Api {
            status: 502,
            message: "<html>bad gateway</html>".to_string(),
            code: None,
        };
        assert_eq!(err.to_string(), "api error status=502: <html>bad gateway</html>");
    }

    #[test]
    fn only_invalid_id_is_a_client_error() {
        assert!(SourceError::InvalidId("abc".into()).is_client_error());
        assert!(!SourceError::Auth("denied".into()).is_client_error());
        assert!(!SourceError::Transport("refused".into()).is_client_error());
        assert!(!SourceError::Decode("bad json".into()).is_client_error());
        assert_eq!(SourceError::Auth("denied".into()).status_code(), None);
    }
}
