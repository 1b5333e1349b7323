//! Runtime secret resolution.
//!
//! # Contract
//! - Config YAML stores only **env var NAMES** (e.g. `"WOO_CONSUMER_KEY"`).
//! - The daemon calls [`resolve_secrets`] once at startup and hands the
//!   result to the client constructors; nothing else reads credentials from
//!   the environment.
//! - `Debug` on [`ResolvedSecrets`] redacts every value.
//! - Error messages name the env var, never its value.
//!
//! Orderspace client id/secret and WooCommerce key/secret are required. The
//! database connection string is optional.

use anyhow::{bail, Result};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Credentials for one daemon instance. **Values are redacted in `Debug`.**
#[derive(Clone)]
pub struct ResolvedSecrets {
    pub orderspace_client_id: String,
    pub orderspace_client_secret: String,
    pub woocommerce_consumer_key: String,
    pub woocommerce_consumer_secret: String,
    /// `None` when the named env var is absent or empty.
    pub database_url: Option<String>,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field("orderspace_client_id", &"<REDACTED>")
            .field("orderspace_client_secret", &"<REDACTED>")
            .field("woocommerce_consumer_key", &"<REDACTED>")
            .field("woocommerce_consumer_secret", &"<REDACTED>")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "<REDACTED>"),
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Env var names extracted from the config JSON, with well-known fallbacks.
struct SecretEnvNames {
    orderspace_client_id_var: String,
    orderspace_client_secret_var: String,
    woocommerce_key_var: String,
    woocommerce_secret_var: String,
    database_url_var: String,
}

fn read_str_at(config: &Value, pointer: &str) -> Option<String> {
    let s = config.pointer(pointer)?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn parse_env_names(config_json: &Value) -> SecretEnvNames {
    let name = |pointer: &str, fallback: &str| {
        read_str_at(config_json, pointer).unwrap_or_else(|| fallback.to_string())
    };
    SecretEnvNames {
        orderspace_client_id_var: name(
            "/sources/orderspace/credentials_env/client_id",
            "ORDERSPACE_CLIENT_ID",
        ),
        orderspace_client_secret_var: name(
            "/sources/orderspace/credentials_env/client_secret",
            "ORDERSPACE_CLIENT_SECRET",
        ),
        woocommerce_key_var: name(
            "/sources/woocommerce/credentials_env/consumer_key",
            "WOO_CONSUMER_KEY",
        ),
        woocommerce_secret_var: name(
            "/sources/woocommerce/credentials_env/consumer_secret",
            "WOO_CONSUMER_SECRET",
        ),
        database_url_var: name("/database/url_env", "DB_CONNECTION_STRING"),
    }
}

fn env_lookup(var_name: &str) -> Option<String> {
    std::env::var(var_name).ok()
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Resolve all credentials from the process environment.
///
/// # Errors
/// `SECRETS_MISSING` naming the first required variable that is unset or
/// blank.
pub fn resolve_secrets(config_json: &Value) -> Result<ResolvedSecrets> {
    resolve_secrets_with(config_json, env_lookup)
}

/// [`resolve_secrets`] against an arbitrary variable source.
pub fn resolve_secrets_with<F>(config_json: &Value, lookup: F) -> Result<ResolvedSecrets>
where
    F: Fn(&str) -> Option<String>,
{
    let names = parse_env_names(config_json);
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    let required = |var: &str, what: &str| -> Result<String> {
        match get(var) {
            Some(v) => Ok(v),
            None => bail!("SECRETS_MISSING: required env var '{var}' ({what}) is not set or empty"),
        }
    };

    Ok(ResolvedSecrets {
        orderspace_client_id: required(&names.orderspace_client_id_var, "orderspace client_id")?,
        orderspace_client_secret: required(
            &names.orderspace_client_secret_var,
            "orderspace client_secret",
        )?,
        woocommerce_consumer_key: required(&names.woocommerce_key_var, "woocommerce consumer_key")?,
        woocommerce_consumer_secret: required(
            &names.woocommerce_secret_var,
            "woocommerce consumer_secret",
        )?,
        database_url: get(&names.database_url_var),
    })
}
