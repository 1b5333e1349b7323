//! Orderspace REST client (OAuth2 client-credentials bearer auth, cursor
//! pagination).
//!
//! The client owns its [`TokenSession`]. Every data request first makes sure a
//! usable token is held, acquiring one synchronously when it is absent or past
//! its refresh margin; if that fails the data request is never sent.

mod session;
mod types;

pub use session::{TokenSession, REFRESH_MARGIN_SECS};
pub use types::{
    Address, EmailAddresses, GroupingCategory, ListOptions, Order, OrderLine, OrdersPage,
    PageInfo,
};

use std::time::Duration;

use chrono::Utc;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::SourceError;
use crate::http::{build_http_client, build_url, decode_order_list, read_success_body, DEFAULT_TIMEOUT};
use session::TokenResponse;

pub const DEFAULT_TOKEN_URL: &str = "https://identity.orderspace.com/oauth/token";

/// Construction parameters. Credentials are redacted in `Debug` output.
#[derive(Clone)]
pub struct OrderspaceConfig {
    pub base_url: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub timeout: Duration,
}

impl OrderspaceConfig {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for OrderspaceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderspaceConfig")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("client_id", &"<REDACTED>")
            .field("client_secret", &"<REDACTED>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct OrderspaceClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    session: Mutex<TokenSession>,
}

impl std::fmt::Debug for OrderspaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderspaceClient")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl OrderspaceClient {
    pub fn new(cfg: OrderspaceConfig) -> Result<Self, SourceError> {
        Ok(Self {
            http: build_http_client(cfg.timeout)?,
            base_url: cfg.base_url,
            token_url: cfg.token_url,
            client_id: cfg.client_id,
            client_secret: cfg.client_secret,
            session: Mutex::new(TokenSession::new()),
        })
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    async fn acquire_token(&self) -> Result<TokenResponse, SourceError> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let resp = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| SourceError::Auth(format!("token request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| SourceError::Auth(format!("token response read failed: {e}")))?;

        if !status.is_success() {
            return Err(SourceError::Auth(format!(
                "token request failed with status {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&body).trim()
            )));
        }

        let token: TokenResponse = serde_json::from_slice(&body)
            .map_err(|e| SourceError::Auth(format!("token response decode failed: {e}")))?;
        debug!(
            token_type = %token.token_type,
            scope = %token.scope,
            expires_in = token.expires_in,
            "orderspace token issued"
        );
        Ok(token)
    }

    /// Current bearer token, refreshing first when absent or stale.
    ///
    /// The session lock is held across the refresh round trip so concurrent
    /// callers on one client trigger a single acquisition.
    async fn bearer_token(&self) -> Result<String, SourceError> {
        let mut session = self.session.lock().await;
        if let Some(token) = session.valid_token(Utc::now()) {
            return Ok(token.to_string());
        }

        info!(
            previous_expiry = ?session.expires_at(),
            "orderspace token absent or expired; acquiring"
        );
        let issued_at = Utc::now();
        let token = self.acquire_token().await?;
        session.store(token.access_token.clone(), token.expires_in, issued_at);
        debug!(expires_at = ?session.expires_at(), "orderspace token stored");
        Ok(token.access_token)
    }

    async fn get(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<Vec<u8>, SourceError> {
        let token = self.bearer_token().await?;
        let url = build_url(&self.base_url, endpoint, query)?;
        debug!(%url, "orderspace GET");

        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        match read_success_body(resp).await {
            Ok((_, body)) => Ok(body),
            Err(err) => {
                if err.status_code() == Some(401) {
                    warn!("orderspace rejected bearer token; dropping cached session");
                    self.session.lock().await.clear();
                }
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------------

    /// `GET orders` with filters and cursor.
    pub async fn list_orders(&self, opts: &ListOptions) -> Result<OrdersPage, SourceError> {
        let body = self.get("orders", &opts.to_query()).await?;
        let orders: Vec<Order> = decode_order_list(&body)?;

        let has_more = opts.limit > 0 && orders.len() == opts.limit;
        let next_cursor = if has_more {
            orders.last().map(|o| o.id.clone())
        } else {
            None
        };

        Ok(OrdersPage {
            page: PageInfo {
                limit: opts.limit,
                starting_after: opts.starting_after.clone(),
                has_more,
                next_cursor,
            },
            orders,
        })
    }

    /// The most recent `count` orders: the first page, no cursor and no
    /// filters. Orderspace lists orders newest-first by creation date, so
    /// only `limit` is sent.
    pub async fn get_recent_orders(&self, count: usize) -> Result<Vec<Order>, SourceError> {
        let opts = ListOptions {
            limit: count,
            ..Default::default()
        };
        Ok(self.list_orders(&opts).await?.orders)
    }

    pub async fn orders_by_status(
        &self,
        status: &str,
        limit: usize,
        starting_after: Option<String>,
    ) -> Result<OrdersPage, SourceError> {
        self.list_orders(&ListOptions {
            status: Some(status.to_string()),
            limit,
            starting_after,
            ..Default::default()
        })
        .await
    }

    pub async fn orders_by_customer(
        &self,
        customer_id: &str,
        limit: usize,
        starting_after: Option<String>,
    ) -> Result<OrdersPage, SourceError> {
        self.list_orders(&ListOptions {
            customer_id: Some(customer_id.to_string()),
            limit,
            starting_after,
            ..Default::default()
        })
        .await
    }

    /// Orders created within `[since, until]` (ISO 8601 bounds).
    pub async fn orders_created_between(
        &self,
        since: &str,
        until: &str,
        limit: usize,
        starting_after: Option<String>,
    ) -> Result<OrdersPage, SourceError> {
        self.list_orders(&ListOptions {
            created_since: Some(since.to_string()),
            created_until: Some(until.to_string()),
            limit,
            starting_after,
            ..Default::default()
        })
        .await
    }

    /// Follow `previous` to its next page with the same filters. Returns
    /// `None` when the previous page did not look full.
    pub async fn next_page(
        &self,
        previous: &OrdersPage,
        opts: &ListOptions,
    ) -> Result<Option<OrdersPage>, SourceError> {
        let Some(cursor) = previous.page.next_cursor.clone() else {
            return Ok(None);
        };
        let next = ListOptions {
            starting_after: Some(cursor),
            ..opts.clone()
        };
        self.list_orders(&next).await.map(Some)
    }

    /// `GET orders/{id}`. The API wraps the record as `{"order": {...}}`; a bare
    /// object is accepted too.
    pub async fn get_order(&self, id: &str) -> Result<Order, SourceError> {
        validate_order_id(id)?;
        info!(order_id = id, "orderspace get_order");

        let body = self.get(&format!("orders/{id}"), &[]).await?;
        decode_single_order(&body)
    }
}

fn validate_order_id(id: &str) -> Result<(), SourceError> {
    let t = id.trim();
    if t.is_empty() || t.contains(&['/', '?', '#'][..]) {
        return Err(SourceError::InvalidId(id.to_string()));
    }
    Ok(())
}

#[derive(Deserialize)]
struct WrappedOrder {
    order: Order,
}

fn decode_single_order(body: &[u8]) -> Result<Order, SourceError> {
    let order = match serde_json::from_slice::<WrappedOrder>(body) {
        Ok(w) => w.order,
        Err(_) => serde_json::from_slice::<Order>(body)
            .map_err(|e| SourceError::Decode(format!("failed to decode order: {e}")))?,
    };
    if order.id.is_empty() {
        return Err(SourceError::Decode("response contained no order".to_string()));
    }
    Ok(order)
}
