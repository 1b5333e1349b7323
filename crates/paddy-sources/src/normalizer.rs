//! Mapping from each source's raw order shape into the canonical
//! [`paddy_schemas::Order`].
//!
//! Everything here is pure apart from reading the clock for the sort-key
//! fallback and emitting a warning when a date does not parse. Parse failures
//! never propagate: the record is still produced.
//!
//! This module does **not**:
//! - fetch anything (see the client modules)
//! - sort or merge (that is the aggregator's job)

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use paddy_schemas::{Order, Origin, NOT_APPLICABLE};
use tracing::warn;

use crate::orderspace;
use crate::woocommerce;

/// Display format for dates: `Jan 2, 2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// `12.5, "USD"` -> `"$12.50"`; unknown codes render as `"12.50 XYZ"`.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let symbol = match currency.trim().to_ascii_uppercase().as_str() {
        "USD" => Some("$"),
        "GBP" => Some("£"),
        "EUR" => Some("€"),
        _ => None,
    };
    match symbol {
        Some(s) => format!("{s}{amount:.2}"),
        None => format!("{amount:.2} {}", currency.trim()),
    }
}

/// Upper-case the first letter of every word, lower-case the rest. Words are
/// split on whitespace, `-` and `_`, and the separators are kept.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn first_non_empty<'a>(candidates: impl IntoIterator<Item = &'a str>) -> String {
    candidates
        .into_iter()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive_utc(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, NAIVE_DATETIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Resolve `(sort_key, display)` for a creation timestamp. On failure the sort
/// key becomes "now" and the raw string is displayed as-is.
fn resolve_created(
    raw: &str,
    origin: Origin,
    parsers: &[fn(&str) -> Option<DateTime<Utc>>],
) -> (DateTime<Utc>, String) {
    let trimmed = raw.trim();
    match parsers.iter().find_map(|p| p(trimmed)) {
        Some(dt) => (dt, dt.format(DISPLAY_DATE_FORMAT).to_string()),
        None => {
            warn!(
                origin = %origin,
                date = raw,
                "order creation date did not parse; sorting as now"
            );
            (Utc::now(), raw.to_string())
        }
    }
}

fn format_delivery(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NOT_APPLICABLE.to_string();
    }
    match NaiveDate::parse_from_str(trimmed, DATE_ONLY_FORMAT) {
        Ok(d) => d.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(_) => trimmed.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Per-source mapping
// ---------------------------------------------------------------------------

/// Customer: company, billing contact, billing company, shipping contact,
/// order e-mail.
pub fn normalize_orderspace(order: &orderspace::Order) -> Order {
    let customer = first_non_empty([
        order.company_name.as_str(),
        order.billing_address.contact_name.as_str(),
        order.billing_address.company_name.as_str(),
        order.shipping_address.contact_name.as_str(),
        order.email_addresses.orders.as_str(),
    ]);

    let (sort_key, order_date_display) =
        resolve_created(&order.created, Origin::Orderspace, &[parse_rfc3339, parse_naive_utc]);

    Order {
        id: order.id.clone(),
        order_number: order.number,
        customer,
        order_date_display,
        deliver_on: format_delivery(&order.delivery_date),
        total: format_currency(order.gross_total, &order.currency),
        status: title_case(&order.status),
        origin: Origin::Orderspace,
        sort_key,
    }
}

/// Customer: billing name, billing company, shipping name, billing e-mail.
/// WooCommerce has no delivery date, so `deliver_on` is always `N/A`.
pub fn normalize_woocommerce(order: &woocommerce::Order) -> Order {
    let billing_name = order.billing.full_name();
    let shipping_name = order.shipping.full_name();
    let customer = first_non_empty([
        billing_name.as_str(),
        order.billing.company.as_str(),
        shipping_name.as_str(),
        order.billing.email.as_str(),
    ]);

    let (sort_key, order_date_display) = resolve_created(
        &order.date_created,
        Origin::WooCommerce,
        &[parse_naive_utc, parse_rfc3339],
    );

    let amount = match order.total.trim().parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            warn!(order_id = order.id, total = %order.total, "woocommerce total did not parse; using 0");
            0.0
        }
    };

    let order_number = order
        .number
        .trim()
        .parse::<i64>()
        .unwrap_or_else(|_| i64::try_from(order.id).unwrap_or(i64::MAX));

    Order {
        id: order.id.to_string(),
        order_number,
        customer,
        order_date_display,
        deliver_on: NOT_APPLICABLE.to_string(),
        total: format_currency(amount, &order.currency),
        status: title_case(&order.status),
        origin: Origin::WooCommerce,
        sort_key,
    }
}
