//! WooCommerce REST client (consumer key/secret basic auth, page-number
//! pagination). Stateless between calls: credentials ride on every request.

mod subscriptions;
mod types;

pub use subscriptions::{
    is_renewal, is_subscription_order, subscription_renewal_id, subscription_scheme,
};
pub use types::{
    Address, CouponLine, FeeLine, LineItem, LineItemTax, ListOptions, MetaData, Order,
    OrdersPage, PageInfo, Refund, ShippingLine, TaxLine,
};

use std::time::Duration;

use reqwest::header::{HeaderMap, ACCEPT};
use tracing::{debug, info};

use crate::error::SourceError;
use crate::http::{build_http_client, build_url, decode_order_list, read_success_body, DEFAULT_TIMEOUT};

pub const TOTAL_HEADER: &str = "x-wp-total";
pub const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

/// Construction parameters. Credentials are redacted in `Debug` output.
#[derive(Clone)]
pub struct WooCommerceConfig {
    /// REST root including the API version, e.g. `https://shop.example/wp-json/wc/v3`.
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub timeout: Duration,
}

impl WooCommerceConfig {
    pub fn new(
        base_url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for WooCommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCommerceConfig")
            .field("base_url", &self.base_url)
            .field("consumer_key", &"<REDACTED>")
            .field("consumer_secret", &"<REDACTED>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct WooCommerceClient {
    http: reqwest::Client,
    base_url: String,
    consumer_key: String,
    consumer_secret: String,
}

impl std::fmt::Debug for WooCommerceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCommerceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WooCommerceClient {
    pub fn new(cfg: WooCommerceConfig) -> Result<Self, SourceError> {
        Ok(Self {
            http: build_http_client(cfg.timeout)?,
            base_url: cfg.base_url,
            consumer_key: cfg.consumer_key,
            consumer_secret: cfg.consumer_secret,
        })
    }

    async fn get(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<(HeaderMap, Vec<u8>), SourceError> {
        let url = build_url(&self.base_url, endpoint, query)?;
        debug!(%url, "woocommerce GET");

        let resp = self
            .http
            .get(url)
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        read_success_body(resp).await
    }

    /// `GET orders` with filters and page.
    pub async fn list_orders(&self, opts: &ListOptions) -> Result<OrdersPage, SourceError> {
        let (headers, body) = self.get("orders", &opts.to_query()).await?;
        let orders: Vec<Order> = decode_order_list(&body)?;
        let page = page_info(opts, &headers, orders.len());
        Ok(OrdersPage { orders, page })
    }

    /// The most recent `count` orders, newest first.
    pub async fn get_recent_orders(&self, count: usize) -> Result<Vec<Order>, SourceError> {
        let per_page = u32::try_from(count).unwrap_or(u32::MAX);
        let opts = ListOptions {
            page: 1,
            per_page,
            orderby: Some("date".to_string()),
            order: Some("desc".to_string()),
            ..Default::default()
        };
        Ok(self.list_orders(&opts).await?.orders)
    }

    /// `GET orders/{id}`. Ids are positive integers; anything else is rejected
    /// before a request is made.
    pub async fn get_order(&self, id: &str) -> Result<Order, SourceError> {
        let order_id = parse_order_id(id)?;
        info!(order_id, "woocommerce get_order");

        let (_, body) = self.get(&format!("orders/{order_id}"), &[]).await?;
        serde_json::from_slice::<Order>(&body)
            .map_err(|e| SourceError::Decode(format!("failed to decode order: {e}")))
    }

    /// One page of `list_orders`, keeping only subscription-related orders.
    /// Page metadata still describes the unfiltered page.
    pub async fn list_subscription_orders(
        &self,
        opts: &ListOptions,
    ) -> Result<OrdersPage, SourceError> {
        let mut page = self.list_orders(opts).await?;
        page.orders.retain(is_subscription_order);
        Ok(page)
    }

    /// One page of `list_orders`, keeping only renewal orders.
    pub async fn list_subscription_renewals(
        &self,
        opts: &ListOptions,
    ) -> Result<OrdersPage, SourceError> {
        let mut page = self.list_orders(opts).await?;
        page.orders.retain(is_renewal);
        Ok(page)
    }
}

fn parse_order_id(id: &str) -> Result<u64, SourceError> {
    match id.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SourceError::InvalidId(id.to_string())),
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<T>().ok())
}

fn page_info(opts: &ListOptions, headers: &HeaderMap, returned: usize) -> PageInfo {
    let total = header_number::<u64>(headers, TOTAL_HEADER);
    let total_pages = header_number::<u32>(headers, TOTAL_PAGES_HEADER);
    let page = opts.page.max(1);

    let has_more = match total_pages {
        Some(pages) => page < pages,
        None => opts.per_page > 0 && returned == opts.per_page as usize,
    };

    PageInfo {
        page,
        per_page: opts.per_page,
        total,
        total_pages,
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn order_id_must_be_positive_integer() {
        assert_eq!(parse_order_id("42").unwrap(), 42);
        assert_eq!(parse_order_id(" 7 ").unwrap(), 7);
        for bad in ["", "0", "-3", "abc", "4.2"] {
            assert!(
                matches!(parse_order_id(bad), Err(SourceError::InvalidId(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn page_info_prefers_total_pages_header() {
        let mut headers = HeaderMap::new();
        headers.insert(TOTAL_HEADER, HeaderValue::from_static("25"));
        headers.insert(TOTAL_PAGES_HEADER, HeaderValue::from_static("3"));
        let opts = ListOptions {
            page: 3,
            per_page: 10,
            ..Default::default()
        };

        // Full page, but it is the last one according to the header.
        let info = page_info(&opts, &headers, 10);
        assert_eq!(info.total, Some(25));
        assert_eq!(info.total_pages, Some(3));
        assert!(!info.has_more);
    }

    #[test]
    fn page_info_falls_back_to_full_page_hint() {
        let opts = ListOptions {
            page: 1,
            per_page: 10,
            ..Default::default()
        };
        assert!(page_info(&opts, &HeaderMap::new(), 10).has_more);
        assert!(!page_info(&opts, &HeaderMap::new(), 4).has_more);
    }
}
