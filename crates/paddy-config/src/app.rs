//! Typed view of the merged config: everything the daemon reads apart from
//! credentials.

use anyhow::{bail, Result};
use serde_json::Value;
use std::time::Duration;

/// WooCommerce caps `per_page` at 100.
pub const MAX_RECENT_COUNT: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; `"*"` allows any.
    pub cors_origins: Vec<String>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderspaceEndpoints {
    pub base_url: String,
    pub token_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WooCommerceEndpoints {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerSettings,
    /// Orders requested from each source per aggregate call.
    pub recent_count: usize,
    pub http_timeout: Duration,
    pub orderspace: OrderspaceEndpoints,
    pub woocommerce: WooCommerceEndpoints,
}

impl AppConfig {
    pub fn from_config_json(config: &Value) -> Result<Self> {
        let port = read_u64(config, "/server/port")?;
        if port == 0 || port > u64::from(u16::MAX) {
            bail!("CONFIG_INVALID /server/port: {port} is not a valid TCP port");
        }

        let recent_count = read_u64(config, "/orders/recent_count")?;
        if recent_count == 0 || recent_count > MAX_RECENT_COUNT {
            bail!(
                "CONFIG_INVALID /orders/recent_count: {recent_count} outside 1..={MAX_RECENT_COUNT}"
            );
        }

        let timeout_secs = read_u64(config, "/http/timeout_secs")?;
        if timeout_secs == 0 {
            bail!("CONFIG_INVALID /http/timeout_secs: must be positive");
        }

        Ok(Self {
            server: ServerSettings {
                host: read_string(config, "/server/host")?,
                port: port as u16,
                cors_origins: read_string_list(config, "/server/cors_origins")?,
            },
            recent_count: recent_count as usize,
            http_timeout: Duration::from_secs(timeout_secs),
            orderspace: OrderspaceEndpoints {
                base_url: read_url(config, "/sources/orderspace/base_url")?,
                token_url: read_url(config, "/sources/orderspace/token_url")?,
            },
            woocommerce: WooCommerceEndpoints {
                base_url: read_url(config, "/sources/woocommerce/base_url")?,
            },
        })
    }
}

fn read_string(config: &Value, pointer: &str) -> Result<String> {
    match config.pointer(pointer).and_then(Value::as_str).map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => bail!("CONFIG_INVALID {pointer}: expected a non-empty string"),
    }
}

fn read_u64(config: &Value, pointer: &str) -> Result<u64> {
    match config.pointer(pointer).and_then(Value::as_u64) {
        Some(n) => Ok(n),
        None => bail!("CONFIG_INVALID {pointer}: expected a non-negative integer"),
    }
}

fn read_url(config: &Value, pointer: &str) -> Result<String> {
    let s = read_string(config, pointer)?;
    if !(s.starts_with("http://") || s.starts_with("https://")) {
        bail!("CONFIG_INVALID {pointer}: '{s}' is not an http(s) url");
    }
    Ok(s)
}

/// Accepts a YAML list of strings or a single comma-separated string.
fn read_string_list(config: &Value, pointer: &str) -> Result<Vec<String>> {
    let items: Vec<String> = match config.pointer(pointer) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => s.split(',').map(|p| p.trim().to_string()).collect(),
        Some(Value::Array(arr)) => {
            let mut out = Vec::with_capacity(arr.len());
            for v in arr {
                match v.as_str() {
                    Some(s) => out.push(s.trim().to_string()),
                    None => bail!("CONFIG_INVALID {pointer}: list entries must be strings"),
                }
            }
            out
        }
        Some(_) => bail!("CONFIG_INVALID {pointer}: expected a list of strings"),
    };
    Ok(items.into_iter().filter(|s| !s.is_empty()).collect())
}
