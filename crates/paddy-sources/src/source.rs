//! The seam the aggregator fans out over.
//!
//! An [`OrderSource`] is one upstream backend that can hand back recent orders
//! already normalized, and a single order in its native shape.

use async_trait::async_trait;
use paddy_schemas::{Order, Origin};
use serde::Serialize;

use crate::error::SourceError;
use crate::normalizer::{normalize_orderspace, normalize_woocommerce};
use crate::orderspace::{self, OrderspaceClient};
use crate::woocommerce::{self, WooCommerceClient};

/// A single order exactly as its source returned it. Serializes without any
/// wrapper so the HTTP layer can pass it through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawOrder {
    Orderspace(Box<orderspace::Order>),
    WooCommerce(Box<woocommerce::Order>),
}

impl RawOrder {
    pub fn origin(&self) -> Origin {
        match self {
            RawOrder::Orderspace(_) => Origin::Orderspace,
            RawOrder::WooCommerce(_) => Origin::WooCommerce,
        }
    }
}

#[async_trait]
pub trait OrderSource: Send + Sync {
    fn origin(&self) -> Origin;

    /// Up to `count` of the source's most recent orders, normalized.
    async fn fetch_recent_orders(&self, count: usize) -> Result<Vec<Order>, SourceError>;

    /// One order by its source-native id.
    async fn fetch_order(&self, id: &str) -> Result<RawOrder, SourceError>;
}

#[async_trait]
impl OrderSource for OrderspaceClient {
    fn origin(&self) -> Origin {
        Origin::Orderspace
    }

    async fn fetch_recent_orders(&self, count: usize) -> Result<Vec<Order>, SourceError> {
        let raw = self.get_recent_orders(count).await?;
        Ok(raw.iter().map(normalize_orderspace).collect())
    }

    async fn fetch_order(&self, id: &str) -> Result<RawOrder, SourceError> {
        let order = self.get_order(id).await?;
        Ok(RawOrder::Orderspace(Box::new(order)))
    }
}

#[async_trait]
impl OrderSource for WooCommerceClient {
    fn origin(&self) -> Origin {
        Origin::WooCommerce
    }

    async fn fetch_recent_orders(&self, count: usize) -> Result<Vec<Order>, SourceError> {
        let raw = self.get_recent_orders(count).await?;
        Ok(raw.iter().map(normalize_woocommerce).collect())
    }

    async fn fetch_order(&self, id: &str) -> Result<RawOrder, SourceError> {
        let order = self.get_order(id).await?;
        Ok(RawOrder::WooCommerce(Box::new(order)))
    }
}
