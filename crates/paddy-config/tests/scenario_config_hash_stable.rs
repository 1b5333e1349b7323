//! Scenario: config hash stability
//!
//! GREEN when:
//! - `load_layered_yaml_from_strings` called twice on the same inputs returns
//!   an identical `config_hash`.
//! - Reordering keys within YAML doesn't change the hash.
//! - Different values produce different hashes.
//! - Later layers override earlier ones, deep-merging maps.

use paddy_config::{load_layered_yaml, load_layered_yaml_from_strings, DEFAULT_CONFIG_YAML};

const BASE_YAML: &str = r#"
server:
  host: "0.0.0.0"
  port: 8080
orders:
  recent_count: 10
sources:
  woocommerce:
    base_url: "https://shop.example.com/wp-json/wc/v3"
    credentials_env:
      consumer_key: "WOO_CONSUMER_KEY"
      consumer_secret: "WOO_CONSUMER_SECRET"
"#;

/// Same content as BASE_YAML with keys in a different order.
const BASE_YAML_REORDERED: &str = r#"
sources:
  woocommerce:
    credentials_env:
      consumer_secret: "WOO_CONSUMER_SECRET"
      consumer_key: "WOO_CONSUMER_KEY"
    base_url: "https://shop.example.com/wp-json/wc/v3"
orders:
  recent_count: 10
server:
  port: 8080
  host: "0.0.0.0"
"#;

const OVERLAY_YAML: &str = r#"
server:
  port: 9443
orders:
  recent_count: 50
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();

    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let original = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let reordered = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();

    assert_eq!(
        original.config_hash, reordered.config_hash,
        "reordering keys in YAML must not change the hash"
    );
}

#[test]
fn different_values_produce_different_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML, "orders:\n  recent_count: 11\n"]).unwrap();

    assert_ne!(a.config_hash, b.config_hash);
}

#[test]
fn overlay_deep_merges_over_base() {
    let merged = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    let cfg = &merged.config_json;

    assert_eq!(cfg.pointer("/server/port").and_then(|v| v.as_u64()), Some(9443));
    // Sibling keys in an overridden map survive.
    assert_eq!(
        cfg.pointer("/server/host").and_then(|v| v.as_str()),
        Some("0.0.0.0")
    );
    assert_eq!(
        cfg.pointer("/orders/recent_count").and_then(|v| v.as_u64()),
        Some(50)
    );
}

#[test]
fn hash_is_64_hex_chars() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();

    assert_eq!(loaded.config_hash.len(), 64);
    assert!(loaded.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn file_loading_starts_from_built_in_defaults() {
    let dir = std::env::temp_dir().join(format!("paddy-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("overlay.yaml");
    std::fs::write(&path, OVERLAY_YAML).unwrap();

    let from_files = load_layered_yaml(&[&path]).unwrap();
    let from_strings = load_layered_yaml_from_strings(&[DEFAULT_CONFIG_YAML, OVERLAY_YAML]).unwrap();
    assert_eq!(from_files.config_hash, from_strings.config_hash);

    let defaults_only = load_layered_yaml::<&str>(&[]).unwrap();
    assert_eq!(
        defaults_only
            .config_json
            .pointer("/server/port")
            .and_then(|v| v.as_u64()),
        Some(8080)
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_file_is_an_error() {
    let err = load_layered_yaml(&["/definitely/not/here/paddy.yaml"]).unwrap_err();
    assert!(err.to_string().contains("failed to read yaml path"));
}
