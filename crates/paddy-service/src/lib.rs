//! paddy-service
//!
//! The order aggregator. Fans out to every configured [`OrderSource`] in
//! parallel, waits for all of them, merges and sorts newest-first. Also
//! dispatches single-order lookups to the right source.
//!
//! This crate does **not** speak HTTP to callers (see `paddy-daemon`) and does
//! not know either upstream API (see `paddy-sources`).

mod error;

pub use error::LookupError;

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use paddy_schemas::{Order, Origin, SourceReport, UnifiedOrders, UnknownOrigin};
use paddy_sources::{
    OrderSource, OrderspaceClient, OrderspaceConfig, RawOrder, SourceError, WooCommerceClient,
    WooCommerceConfig,
};
use tracing::{error, info};

/// Orders requested from each source per aggregate call.
pub const DEFAULT_RECENT_COUNT: usize = 10;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub orderspace: OrderspaceConfig,
    pub woocommerce: WooCommerceConfig,
    pub recent_count: usize,
}

impl ServiceConfig {
    /// Apply one client timeout to both sources.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.orderspace.timeout = timeout;
        self.woocommerce.timeout = timeout;
        self
    }
}

pub struct OrderService {
    sources: Vec<Arc<dyn OrderSource>>,
    recent_count: usize,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let origins: Vec<Origin> = self.sources.iter().map(|s| s.origin()).collect();
        f.debug_struct("OrderService")
            .field("sources", &origins)
            .field("recent_count", &self.recent_count)
            .finish()
    }
}

impl OrderService {
    /// Build both real clients. Each client owns its own HTTP connection pool
    /// and, for Orderspace, its token session.
    pub fn new(cfg: ServiceConfig) -> Result<Self, SourceError> {
        let orderspace = OrderspaceClient::new(cfg.orderspace)?;
        let woocommerce = WooCommerceClient::new(cfg.woocommerce)?;
        Ok(Self::with_sources(
            vec![Arc::new(orderspace), Arc::new(woocommerce)],
            cfg.recent_count,
        ))
    }

    pub fn with_sources(sources: Vec<Arc<dyn OrderSource>>, recent_count: usize) -> Self {
        Self {
            sources,
            recent_count,
        }
    }

    pub fn recent_count(&self) -> usize {
        self.recent_count
    }

    pub fn origins(&self) -> Vec<Origin> {
        self.sources.iter().map(|s| s.origin()).collect()
    }

    // -----------------------------------------------------------------------
    // Aggregate
    // -----------------------------------------------------------------------

    /// Recent orders from every source, newest first.
    ///
    /// Each source runs on its own task; the call returns only after all of
    /// them finish. A source that errors or panics contributes zero orders and
    /// is reported as failed. This never fails as a whole.
    pub async fn fetch_unified(&self) -> UnifiedOrders {
        let count = self.recent_count;
        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                tokio::spawn(async move { source.fetch_recent_orders(count).await })
            })
            .collect();

        let results = join_all(handles).await;

        let mut orders: Vec<Order> = Vec::new();
        let mut reports: Vec<SourceReport> = Vec::with_capacity(self.sources.len());
        for (source, joined) in self.sources.iter().zip(results) {
            let origin = source.origin();
            match joined {
                Ok(Ok(batch)) => {
                    info!(origin = %origin, count = batch.len(), "source fetched");
                    reports.push(SourceReport::fetched(origin, batch.len()));
                    orders.extend(batch);
                }
                Ok(Err(err)) => {
                    error!(origin = %origin, error = %err, "source fetch failed; contributing zero orders");
                    reports.push(SourceReport::failed(origin, err.to_string()));
                }
                Err(join_err) => {
                    error!(origin = %origin, error = %join_err, "source task did not complete");
                    reports.push(SourceReport::failed(
                        origin,
                        format!("fetch task did not complete: {join_err}"),
                    ));
                }
            }
        }

        sort_newest_first(&mut orders);
        UnifiedOrders {
            orders,
            sources: reports,
        }
    }

    // -----------------------------------------------------------------------
    // Single order
    // -----------------------------------------------------------------------

    /// One order, unmodified, from the source named by `origin`.
    pub async fn lookup_order(&self, origin: &str, id: &str) -> Result<RawOrder, LookupError> {
        let origin: Origin = origin
            .parse()
            .map_err(|UnknownOrigin(name)| LookupError::UnknownOrigin(name))?;

        let source = self
            .sources
            .iter()
            .find(|s| s.origin() == origin)
            .ok_or(LookupError::SourceUnavailable(origin))?;

        let raw = source.fetch_order(id).await?;
        info!(origin = %raw.origin(), order_id = id, "order fetched");
        Ok(raw)
    }
}

/// Sort key descending; equal keys fall back to `(origin, id)` ascending.
fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.sort_key
            .cmp(&a.sort_key)
            .then_with(|| a.key().cmp(&b.key()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use paddy_schemas::{SourceOutcome, NOT_APPLICABLE};
    use paddy_sources::orderspace;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------

    enum Behaviour {
        Orders(Vec<Order>),
        Fail(SourceError),
        Panic,
    }

    struct FakeSource {
        origin: Origin,
        behaviour: Behaviour,
        recent_calls: AtomicUsize,
        lookup_calls: AtomicUsize,
        requested: AtomicUsize,
    }

    impl FakeSource {
        fn new(origin: Origin, behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                origin,
                behaviour,
                recent_calls: AtomicUsize::new(0),
                lookup_calls: AtomicUsize::new(0),
                requested: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl OrderSource for FakeSource {
        fn origin(&self) -> Origin {
            self.origin
        }

        async fn fetch_recent_orders(&self, count: usize) -> Result<Vec<Order>, SourceError> {
            self.recent_calls.fetch_add(1, Ordering::SeqCst);
            self.requested.store(count, Ordering::SeqCst);
            match &self.behaviour {
                Behaviour::Orders(o) => Ok(o.clone()),
                Behaviour::Fail(e) => Err(e.clone()),
                Behaviour::Panic => panic!("source exploded"),
            }
        }

        async fn fetch_order(&self, id: &str) -> Result<RawOrder, SourceError> {
            self.lookup_calls.fetch_add(1, Ordering::SeqCst);
            Ok(RawOrder::Orderspace(Box::new(orderspace::Order {
                id: id.to_string(),
                ..Default::default()
            })))
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn order(origin: Origin, id: &str, sort_key: DateTime<Utc>) -> Order {
        Order {
            id: id.to_string(),
            order_number: 0,
            customer: String::new(),
            order_date_display: String::new(),
            deliver_on: NOT_APPLICABLE.to_string(),
            total: String::new(),
            status: String::new(),
            origin,
            sort_key,
        }
    }

    fn service(sources: Vec<Arc<FakeSource>>) -> OrderService {
        let dyn_sources: Vec<Arc<dyn OrderSource>> = sources
            .into_iter()
            .map(|s| s as Arc<dyn OrderSource>)
            .collect();
        OrderService::with_sources(dyn_sources, 10)
    }

    // -----------------------------------------------------------------------
    // fetch_unified
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn merges_and_sorts_newest_first() {
        let a = FakeSource::new(
            Origin::Orderspace,
            Behaviour::Orders(vec![
                order(Origin::Orderspace, "a3", at(3)),
                order(Origin::Orderspace, "a1", at(1)),
            ]),
        );
        let b = FakeSource::new(
            Origin::WooCommerce,
            Behaviour::Orders(vec![order(Origin::WooCommerce, "b2", at(2))]),
        );

        let unified = service(vec![a.clone(), b.clone()]).fetch_unified().await;

        let ids: Vec<_> = unified.orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["a3", "b2", "a1"]);
        assert!(!unified.is_partial());
        assert_eq!(a.requested.load(Ordering::SeqCst), 10);
        assert_eq!(b.requested.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn keeps_every_order_with_non_increasing_keys() {
        let a_orders: Vec<_> = (1..=7)
            .map(|d| order(Origin::Orderspace, &format!("a{d}"), at(d)))
            .collect();
        let b_orders: Vec<_> = (4..=12)
            .map(|d| order(Origin::WooCommerce, &format!("b{d}"), at(d)))
            .collect();
        let a = FakeSource::new(Origin::Orderspace, Behaviour::Orders(a_orders));
        let b = FakeSource::new(Origin::WooCommerce, Behaviour::Orders(b_orders));

        let unified = service(vec![a, b]).fetch_unified().await;

        assert_eq!(unified.orders.len(), 16);
        assert!(unified
            .orders
            .windows(2)
            .all(|w| w[0].sort_key >= w[1].sort_key));
    }

    #[tokio::test]
    async fn equal_keys_break_ties_by_origin_then_id() {
        let a = FakeSource::new(
            Origin::Orderspace,
            Behaviour::Orders(vec![
                order(Origin::Orderspace, "z", at(5)),
                order(Origin::Orderspace, "m", at(5)),
            ]),
        );
        let b = FakeSource::new(
            Origin::WooCommerce,
            Behaviour::Orders(vec![order(Origin::WooCommerce, "a", at(5))]),
        );

        let unified = service(vec![b, a]).fetch_unified().await;
        let keys: Vec<_> = unified.orders.iter().map(|o| o.key()).collect();
        assert_eq!(
            keys,
            [
                (Origin::Orderspace, "m"),
                (Origin::Orderspace, "z"),
                (Origin::WooCommerce, "a"),
            ]
        );
    }

    #[tokio::test]
    async fn failing_source_contributes_nothing_and_is_reported() {
        let a = FakeSource::new(
            Origin::Orderspace,
            Behaviour::Fail(SourceError::Auth("token request failed with status 401".into())),
        );
        let b = FakeSource::new(
            Origin::WooCommerce,
            Behaviour::Orders(vec![
                order(Origin::WooCommerce, "b2", at(2)),
                order(Origin::WooCommerce, "b1", at(1)),
            ]),
        );

        let unified = service(vec![a, b]).fetch_unified().await;

        assert_eq!(unified.orders.len(), 2);
        assert!(unified.orders.iter().all(|o| o.origin == Origin::WooCommerce));
        assert!(unified.is_partial());
        assert_eq!(unified.failed_origins(), vec![Origin::Orderspace]);
        assert_eq!(
            unified.sources[1].outcome,
            SourceOutcome::Fetched { count: 2 }
        );
    }

    #[tokio::test]
    async fn panicking_source_is_reported_as_failed() {
        let a = FakeSource::new(Origin::Orderspace, Behaviour::Panic);
        let b = FakeSource::new(
            Origin::WooCommerce,
            Behaviour::Orders(vec![order(Origin::WooCommerce, "b1", at(1))]),
        );

        let unified = service(vec![a, b]).fetch_unified().await;

        assert_eq!(unified.orders.len(), 1);
        assert!(unified.sources[0].is_failed());
    }

    #[tokio::test]
    async fn both_sources_empty_is_valid() {
        let a = FakeSource::new(Origin::Orderspace, Behaviour::Orders(vec![]));
        let b = FakeSource::new(Origin::WooCommerce, Behaviour::Orders(vec![]));

        let unified = service(vec![a, b]).fetch_unified().await;
        assert!(unified.orders.is_empty());
        assert!(!unified.is_partial());
        assert_eq!(
            unified.sources[0].outcome,
            SourceOutcome::Fetched { count: 0 }
        );
    }

    // -----------------------------------------------------------------------
    // lookup_order
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn unknown_origin_fails_before_any_call() {
        let a = FakeSource::new(Origin::Orderspace, Behaviour::Orders(vec![]));
        let b = FakeSource::new(Origin::WooCommerce, Behaviour::Orders(vec![]));
        let svc = service(vec![a.clone(), b.clone()]);

        let err = svc.lookup_order("Amazon", "1").await.unwrap_err();
        assert_eq!(err, LookupError::UnknownOrigin("Amazon".into()));
        assert!(err.is_client_error());
        assert_eq!(a.lookup_calls.load(Ordering::SeqCst), 0);
        assert_eq!(b.lookup_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn lookup_dispatches_by_origin_case_insensitively() {
        let a = FakeSource::new(Origin::Orderspace, Behaviour::Orders(vec![]));
        let b = FakeSource::new(Origin::WooCommerce, Behaviour::Orders(vec![]));
        let svc = service(vec![a.clone(), b.clone()]);

        let raw = svc.lookup_order("orderspace", "or_1").await.unwrap();
        assert_eq!(raw.origin(), Origin::Orderspace);
        assert_eq!(a.lookup_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b.lookup_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_source_is_unavailable() {
        let a = FakeSource::new(Origin::Orderspace, Behaviour::Orders(vec![]));
        let svc = service(vec![a]);

        let err = svc.lookup_order("WooCommerce", "12").await.unwrap_err();
        assert_eq!(err, LookupError::SourceUnavailable(Origin::WooCommerce));
        assert!(!err.is_client_error());
    }
}
