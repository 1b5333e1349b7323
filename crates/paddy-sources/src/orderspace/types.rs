//! Orderspace wire shapes. Every field is defaulted so partial payloads decode;
//! an explicit `null` is treated like a missing key.

use serde::{Deserialize, Serialize};

use crate::http::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub number: i64,
    /// Creation instant, e.g. `2024-01-03T10:00:00Z`.
    #[serde(deserialize_with = "null_as_default")]
    pub created: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub customer_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email_addresses: EmailAddresses,
    #[serde(deserialize_with = "null_as_default")]
    pub created_by: String,
    /// Requested delivery date, `YYYY-MM-DD`, empty when not set.
    #[serde(deserialize_with = "null_as_default")]
    pub delivery_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reference: String,
    #[serde(deserialize_with = "null_as_default")]
    pub internal_note: String,
    #[serde(deserialize_with = "null_as_default")]
    pub customer_po_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub customer_note: String,
    #[serde(deserialize_with = "null_as_default")]
    pub standing_order_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shipping_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shipping_address: Address,
    #[serde(deserialize_with = "null_as_default")]
    pub billing_address: Address,
    #[serde(deserialize_with = "null_as_default")]
    pub order_lines: Vec<OrderLine>,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub net_total: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub gross_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailAddresses {
    #[serde(deserialize_with = "null_as_default")]
    pub orders: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dispatches: String,
    #[serde(deserialize_with = "null_as_default")]
    pub invoices: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub line1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub line2: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postal_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderLine {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sku: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub options: String,
    #[serde(deserialize_with = "null_as_default")]
    pub grouping_category: GroupingCategory,
    #[serde(deserialize_with = "null_as_default")]
    pub shipping: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub unit_price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub sub_total: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub tax_rate_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tax_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tax_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub tax_amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub preorder_window_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub on_hold: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub invoiced: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub paid: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub dispatched: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingCategory {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// Filters and cursor for `GET orders`.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Page size; `0` leaves the server default.
    pub limit: usize,
    /// Cursor: return orders after this order id.
    pub starting_after: Option<String>,
    pub status: Option<String>,
    pub customer_id: Option<String>,
    /// ISO 8601 lower bound on creation.
    pub created_since: Option<String>,
    pub created_until: Option<String>,
    pub updated_since: Option<String>,
    pub updated_until: Option<String>,
    /// Extra query parameters passed through untouched.
    pub params: Vec<(String, String)>,
}

impl ListOptions {
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut q: Vec<(String, String)> = Vec::new();
        if self.limit > 0 {
            q.push(("limit".into(), self.limit.to_string()));
        }
        let optional = [
            ("starting_after", &self.starting_after),
            ("status", &self.status),
            ("customer_id", &self.customer_id),
            ("created_since", &self.created_since),
            ("created_until", &self.created_until),
            ("updated_since", &self.updated_since),
            ("updated_until", &self.updated_until),
        ];
        for (key, value) in optional {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                q.push((key.to_string(), v.to_string()));
            }
        }
        q.extend(self.params.iter().cloned());
        q
    }
}

/// Cursor pagination metadata.
///
/// `has_more` is inferred from a full page and is a hint only: the server
/// provides no authoritative flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub limit: usize,
    pub starting_after: Option<String>,
    pub has_more: bool,
    /// Cursor for the next page (last order id) when `has_more`.
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrdersPage {
    pub orders: Vec<Order>,
    pub page: PageInfo,
}
