//! paddy-config
//!
//! Layered YAML configuration: merge, secret-literal guard, canonical hash,
//! unused-key report, and the typed [`AppConfig`] view the daemon runs on.
//!
//! Credentials are never written into YAML. The YAML names environment
//! variables; [`secrets::resolve_secrets`] reads them once at startup.

pub mod app;
pub mod secrets;

pub use app::{AppConfig, OrderspaceEndpoints, ServerSettings, WooCommerceEndpoints};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Built-in base layer. Every loaded config starts from this document.
pub const DEFAULT_CONFIG_YAML: &str = r#"
server:
  host: "localhost"
  port: 8080
  cors_origins:
    - "*"

orders:
  recent_count: 10

http:
  timeout_secs: 30

sources:
  orderspace:
    base_url: "https://api.orderspace.com/v1"
    token_url: "https://identity.orderspace.com/oauth/token"
    credentials_env:
      client_id: "ORDERSPACE_CLIENT_ID"
      client_secret: "ORDERSPACE_CLIENT_SECRET"
  woocommerce:
    base_url: "https://shop.example.com/wp-json/wc/v3"
    credentials_env:
      consumer_key: "WOO_CONSUMER_KEY"
      consumer_secret: "WOO_CONSUMER_SECRET"

database:
  url_env: "DB_CONNECTION_STRING"
"#;

/// If any leaf string in the merged config starts with one of these, loading
/// aborts with CONFIG_SECRET_DETECTED.
const SECRET_PREFIXES: &[&str] = &[
    "ck_",        // WooCommerce consumer key
    "cs_",        // WooCommerce consumer secret
    "sk-",        // OpenAI style
    "sk_live",    // Stripe live
    "sk_test",    // Stripe test
    "AKIA",       // AWS access key ID
    "-----BEGIN", // PEM private keys
    "ghp_",       // GitHub PAT
    "glpat-",     // GitLab PAT
    "xoxb-",      // Slack bot token
];

// ---------------------------------------------------------------------------
// Unused-key report
// ---------------------------------------------------------------------------

/// JSON-pointer prefixes the code actually reads. A leaf under any of these is
/// consumed; anything else is reported as unused.
///
/// Readers:
/// - `AppConfig::from_config_json`: `/server`, `/orders`, `/http`, source urls
/// - `secrets::resolve_secrets`: `credentials_env` subtrees, `/database/url_env`
pub const CONSUMED_POINTERS: &[&str] = &[
    "/server/host",
    "/server/port",
    "/server/cors_origins",
    "/orders/recent_count",
    "/http/timeout_secs",
    "/sources/orderspace/base_url",
    "/sources/orderspace/token_url",
    "/sources/orderspace/credentials_env",
    "/sources/woocommerce/base_url",
    "/sources/woocommerce/credentials_env",
    "/database/url_env",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Consumed JSON-pointer prefixes used for this analysis (sorted, unique).
    pub consumed_prefixes: Vec<String>,
    /// Unused leaf pointers (sorted).
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Report leaves of `config_json` that nothing reads.
///
/// With `Fail`, returns an error when unused keys exist; with `Warn`, always
/// returns the report and leaves logging to the caller.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let consumed: BTreeSet<String> = CONSUMED_POINTERS
        .iter()
        .map(|p| normalize_pointer(p))
        .collect();
    let consumed_prefixes: Vec<String> = consumed.into_iter().collect();

    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|leaf| !consumed_prefixes.iter().any(|cp| is_prefix_pointer(cp, leaf)))
        .collect();
    unused.sort();
    unused.dedup();

    let report = UnusedKeyReport {
        consumed_prefixes,
        unused_leaf_pointers: unused,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        bail!(
            "CONFIG_UNUSED_KEYS: {} unused config leaf key(s) detected. \
            Remove them or update the consumed registry. First few: {}",
            report.unused_leaf_pointers.len(),
            preview_list(&report.unused_leaf_pointers, 12)
        );
    }

    Ok(report)
}

/// Leading `/`, no trailing `/` unless the pointer is just `/`.
fn normalize_pointer(p: &str) -> String {
    let mut s = p.trim().to_string();
    if s.is_empty() {
        return "/".to_string();
    }
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    while s.ends_with('/') && s.len() > 1 {
        s.pop();
    }
    s
}

/// `"/a/b"` is a prefix of `"/a/b"` and `"/a/b/c"` but not `"/a/bc"`.
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if prefix == "/" || leaf == prefix {
        return true;
    }
    leaf.strip_prefix(prefix)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false)
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map {
                collect_leaf_pointers(vv, &format!("{prefix}/{}", escape_pointer_token(k)), out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                collect_leaf_pointers(vv, &format!("{prefix}/{i}"), out);
            }
        }
        _ => out.push(if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.to_string()
        }),
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn preview_list(items: &[String], n: usize) -> String {
    format!("{:?}", items.iter().take(n).collect::<Vec<_>>())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

/// [`DEFAULT_CONFIG_YAML`] followed by each file in `paths`, later layers
/// overriding earlier ones.
pub fn load_layered_yaml<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = vec![DEFAULT_CONFIG_YAML.to_string()];
    for p in paths {
        let p = p.as_ref();
        let raw = fs::read_to_string(p)
            .with_context(|| format!("failed to read yaml path: {}", p.display()))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

/// Merge exactly the given documents; no built-in base layer.
pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        // An empty document parses to null; it contributes nothing.
        if !v_json.is_null() {
            merged = deep_merge(merged, v_json);
        }
    }

    enforce_no_secret_literals(&merged)?;

    let canonical_json = serde_json::to_string(&merged).context("canonical json serialize failed")?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut leaves = Vec::new();
    collect_leaf_pointers(v, "", &mut leaves);

    for ptr in leaves {
        if let Some(s) = v.pointer(&ptr).and_then(Value::as_str) {
            if looks_like_secret(s) {
                bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
            }
        }
    }
    Ok(())
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    if t.len() < 8 {
        return false;
    }
    SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}
