//! JSON bodies returned by paddy-daemon endpoints other than the order data
//! itself (orders and raw single orders are serialized as-is).

use serde::{Deserialize, Serialize};

/// `GET /healthz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Error body for `GET /orders/:origin/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// HTTP status the upstream answered with, when it answered at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}
