//! Canonical records shared by the source clients, the aggregator and the
//! HTTP surface.
//!
//! Nothing here talks to the network. Raw per-source wire shapes live in
//! `paddy-sources`; only the normalized [`Order`] crosses crate boundaries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for fields a source does not provide at all (as opposed to a
/// field the source provides but left blank).
pub const NOT_APPLICABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// Which upstream backend produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Token-auth (OAuth2 client credentials) order API.
    Orderspace,
    /// Key/secret-auth order API.
    WooCommerce,
}

impl Origin {
    pub const ALL: [Origin; 2] = [Origin::Orderspace, Origin::WooCommerce];

    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Orderspace => "Orderspace",
            Origin::WooCommerce => "WooCommerce",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known [`Origin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOrigin(pub String);

impl fmt::Display for UnknownOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown origin '{}'; expected one of: Orderspace | WooCommerce",
            self.0
        )
    }
}

impl std::error::Error for UnknownOrigin {}

impl FromStr for Origin {
    type Err = UnknownOrigin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Origin::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(t))
            .ok_or_else(|| UnknownOrigin(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// The unified, display-ready order record.
///
/// `id` is only unique within its `origin`; use [`Order::key`] when a global
/// identity is needed. `sort_key` orders the unified list and is never
/// serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: i64,
    pub customer: String,
    /// `"Mon D, YYYY"`, or the raw upstream string when it could not be parsed.
    pub order_date_display: String,
    /// Formatted delivery date or [`NOT_APPLICABLE`].
    pub deliver_on: String,
    pub total: String,
    pub status: String,
    pub origin: Origin,
    #[serde(skip)]
    pub sort_key: DateTime<Utc>,
}

impl Order {
    pub fn key(&self) -> (Origin, &str) {
        (self.origin, self.id.as_str())
    }
}

// ---------------------------------------------------------------------------
// Per-source outcome of one aggregate call
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SourceOutcome {
    Fetched { count: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    pub origin: Origin,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

impl SourceReport {
    pub fn fetched(origin: Origin, count: usize) -> Self {
        Self {
            origin,
            outcome: SourceOutcome::Fetched { count },
        }
    }

    pub fn failed(origin: Origin, reason: impl Into<String>) -> Self {
        Self {
            origin,
            outcome: SourceOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Failed { .. })
    }
}

/// Result of one aggregate fetch: the sorted orders plus how each source fared,
/// so "no orders" and "source down" stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedOrders {
    pub orders: Vec<Order>,
    pub sources: Vec<SourceReport>,
}

impl UnifiedOrders {
    pub fn is_partial(&self) -> bool {
        self.sources.iter().any(SourceReport::is_failed)
    }

    pub fn failed_origins(&self) -> Vec<Origin> {
        self.sources
            .iter()
            .filter(|r| r.is_failed())
            .map(|r| r.origin)
            .collect()
    }
}
