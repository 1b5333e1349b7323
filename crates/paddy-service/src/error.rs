use paddy_schemas::Origin;
use paddy_sources::SourceError;

/// Failure of a single-order lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The origin string named neither source. Raised before any network call.
    #[error("unknown origin '{0}'; expected one of: Orderspace | WooCommerce")]
    UnknownOrigin(String),

    /// The origin is valid but no source for it is configured.
    #[error("no source configured for origin {0}")]
    SourceUnavailable(Origin),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl LookupError {
    /// `true` when the request itself was malformed (bad origin or id).
    pub fn is_client_error(&self) -> bool {
        match self {
            LookupError::UnknownOrigin(_) => true,
            LookupError::SourceUnavailable(_) => false,
            LookupError::Source(e) => e.is_client_error(),
        }
    }

    /// Upstream HTTP status when the source answered with an error.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            LookupError::Source(e) => e.status_code(),
            _ => None,
        }
    }
}
