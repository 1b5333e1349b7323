//! Axum router and all HTTP handlers for paddy-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers (see [`crate::middleware`]) so tests can use the bare
//! router.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderMap, HeaderName, HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use paddy_schemas::UnifiedOrders;
use tracing::{error, info, warn};

use crate::{
    api_types::{ErrorResponse, HealthResponse},
    render,
    state::AppState,
};

pub const PARTIAL_RESULTS_HEADER: HeaderName = HeaderName::from_static("x-partial-results");
pub const FAILED_SOURCES_HEADER: HeaderName = HeaderName::from_static("x-failed-sources");

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .route("/orders", get(list_orders))
        .route("/orders/:origin/:id", get(get_order))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub(crate) async fn home(State(st): State<Arc<AppState>>) -> Html<String> {
    Html(render::home_page(&st.build))
}

// ---------------------------------------------------------------------------
// GET /healthz
// ---------------------------------------------------------------------------

pub(crate) async fn healthz(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /orders
// ---------------------------------------------------------------------------

/// JSON when the client sends or asks for `application/json`; HTML otherwise.
fn wants_json(headers: &HeaderMap) -> bool {
    [CONTENT_TYPE, ACCEPT].iter().any(|name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false)
    })
}

fn partial_result_headers(unified: &UnifiedOrders) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if !unified.is_partial() {
        return headers;
    }
    headers.insert(PARTIAL_RESULTS_HEADER, HeaderValue::from_static("true"));
    let failed: Vec<&str> = unified
        .failed_origins()
        .iter()
        .map(|o| o.as_str())
        .collect();
    if let Ok(v) = HeaderValue::from_str(&failed.join(",")) {
        headers.insert(FAILED_SOURCES_HEADER, v);
    }
    headers
}

/// Always 200: a source that fails contributes nothing and is flagged in the
/// response headers.
pub(crate) async fn list_orders(State(st): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let unified = st.orders.fetch_unified().await;
    let extra = partial_result_headers(&unified);
    info!(
        count = unified.orders.len(),
        partial = unified.is_partial(),
        "orders served"
    );

    if wants_json(&headers) {
        (StatusCode::OK, extra, Json(unified.orders)).into_response()
    } else {
        (StatusCode::OK, extra, Html(render::orders_page(&unified))).into_response()
    }
}

// ---------------------------------------------------------------------------
// GET /orders/:origin/:id
// ---------------------------------------------------------------------------

/// The upstream record untouched. 400 for a bad origin or id, 500 when the
/// upstream call fails.
pub(crate) async fn get_order(
    State(st): State<Arc<AppState>>,
    Path((origin, id)): Path<(String, String)>,
) -> Response {
    match st.orders.lookup_order(&origin, &id).await {
        Ok(raw) => (StatusCode::OK, Json(raw)).into_response(),
        Err(err) if err.is_client_error() => {
            warn!(origin = %origin, order_id = %id, error = %err, "order lookup rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: err.to_string(),
                    upstream_status: None,
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!(origin = %origin, order_id = %id, error = %err, "order lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                    upstream_status: err.upstream_status(),
                }),
            )
                .into_response()
        }
    }
}
