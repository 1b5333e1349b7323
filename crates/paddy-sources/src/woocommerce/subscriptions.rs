//! Subscription detection over raw WooCommerce orders.
//!
//! Stores running WooCommerce Subscriptions / All Products for Subscriptions
//! mark renewal orders with `created_via = "subscription"` and meta keys.

use serde_json::Value;

use super::types::Order;

const RENEWAL_META_KEY: &str = "_subscription_renewal";
const SCHEME_META_KEY: &str = "_wcsatt_scheme";

pub fn is_subscription_order(order: &Order) -> bool {
    is_renewal(order)
        || order.meta_data.iter().any(|m| m.key == RENEWAL_META_KEY)
        || order
            .line_items
            .iter()
            .flat_map(|li| li.meta_data.iter())
            .any(|m| m.key == SCHEME_META_KEY)
}

pub fn is_renewal(order: &Order) -> bool {
    order.created_via == "subscription"
}

/// Subscription id from the renewal meta entry, when present and numeric.
pub fn subscription_renewal_id(order: &Order) -> Option<u64> {
    order
        .meta_data
        .iter()
        .filter(|m| m.key == RENEWAL_META_KEY)
        .find_map(|m| match &m.value {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        })
        .filter(|id| *id > 0)
}

/// First line-item subscription scheme (e.g. `"1_month"`), if any.
pub fn subscription_scheme(order: &Order) -> Option<&str> {
    order
        .line_items
        .iter()
        .flat_map(|li| li.meta_data.iter())
        .filter(|m| m.key == SCHEME_META_KEY)
        .find_map(|m| m.value.as_str())
}
