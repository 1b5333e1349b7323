//! paddy-daemon entry point.
//!
//! This file is intentionally thin: it loads env and config, sets up
//! tracing, builds the order service, wires middleware, and starts the HTTP
//! server. Route handlers live in `routes.rs`; shared state in `state.rs`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use paddy_config::{
    load_layered_yaml, report_unused_keys, secrets::resolve_secrets, AppConfig, UnusedKeyPolicy,
};
use paddy_daemon::{middleware, routes, state};
use paddy_service::{OrderService, ServiceConfig};
use paddy_sources::{OrderspaceConfig, WooCommerceConfig};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "paddy-daemon", version, about = "Unified order view over Orderspace and WooCommerce")]
struct Args {
    /// YAML layer applied over the built-in defaults; repeat to stack layers.
    #[arg(long = "config", value_name = "PATH")]
    config: Vec<PathBuf>,

    /// Listen address, overriding `server.host` / `server.port`.
    #[arg(long, value_name = "HOST:PORT")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the files do not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    init_tracing();
    let args = Args::parse();

    let loaded = load_layered_yaml(&args.config).context("config load failed")?;
    info!(
        config_hash = %loaded.config_hash,
        layers = args.config.len() + 1,
        "config loaded"
    );

    let unused = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    if !unused.is_clean() {
        warn!(keys = ?unused.unused_leaf_pointers, "config contains keys nothing reads");
    }

    let app_cfg = AppConfig::from_config_json(&loaded.config_json)?;
    let secrets = resolve_secrets(&loaded.config_json)?;
    info!(
        database_configured = secrets.database_url.is_some(),
        "secrets resolved"
    );

    let service_cfg = ServiceConfig {
        orderspace: OrderspaceConfig::new(
            app_cfg.orderspace.base_url.clone(),
            secrets.orderspace_client_id.clone(),
            secrets.orderspace_client_secret.clone(),
        )
        .with_token_url(app_cfg.orderspace.token_url.clone()),
        woocommerce: WooCommerceConfig::new(
            app_cfg.woocommerce.base_url.clone(),
            secrets.woocommerce_consumer_key.clone(),
            secrets.woocommerce_consumer_secret.clone(),
        ),
        recent_count: app_cfg.recent_count,
    }
    .with_timeout(app_cfg.http_timeout);

    let service = OrderService::new(service_cfg).context("failed to build order sources")?;
    info!(
        origins = ?service.origins(),
        recent_count = service.recent_count(),
        "order service initialized"
    );

    let shared = Arc::new(state::AppState::new(service));
    let app = middleware::apply(
        routes::build_router(Arc::clone(&shared)),
        &app_cfg.server.cors_origins,
    );

    let addr = args.bind.unwrap_or_else(|| app_cfg.server.bind_addr());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("paddy-daemon listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    info!("paddy-daemon stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl-c handler unavailable; running until killed");
        std::future::pending::<()>().await;
    }
}
