//! Shared runtime state for paddy-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The state is read-only
//! after boot; each source client keeps its own private token cache.

use std::sync::Arc;

use paddy_service::OrderService;
use serde::Serialize;

/// Static build metadata included in health responses and the home page.
#[derive(Clone, Debug, Serialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            service: "paddy-daemon",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub build: BuildInfo,
    pub orders: Arc<OrderService>,
}

impl AppState {
    pub fn new(orders: OrderService) -> Self {
        Self::with_service(Arc::new(orders))
    }

    pub fn with_service(orders: Arc<OrderService>) -> Self {
        Self {
            build: BuildInfo::default(),
            orders,
        }
    }
}
