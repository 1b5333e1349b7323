//! WooCommerce REST (`wc/v3`) wire shapes. Missing keys and explicit `null`s
//! both decode to the field default.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub parent_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub order_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_via: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    /// Site-local creation time without offset, e.g. `2024-01-02T09:30:00`.
    #[serde(deserialize_with = "null_as_default")]
    pub date_created: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date_created_gmt: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date_modified: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date_modified_gmt: String,
    #[serde(deserialize_with = "null_as_default")]
    pub discount_total: String,
    #[serde(deserialize_with = "null_as_default")]
    pub discount_tax: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shipping_total: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shipping_tax: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cart_tax: String,
    /// Decimal string, e.g. `"12.50"`.
    #[serde(deserialize_with = "null_as_default")]
    pub total: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_tax: String,
    #[serde(deserialize_with = "null_as_default")]
    pub prices_include_tax: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub customer_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub customer_ip_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub customer_user_agent: String,
    #[serde(deserialize_with = "null_as_default")]
    pub customer_note: String,
    #[serde(deserialize_with = "null_as_default")]
    pub billing: Address,
    #[serde(deserialize_with = "null_as_default")]
    pub shipping: Address,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_method: String,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_method_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub transaction_id: String,
    pub date_paid: Option<String>,
    pub date_paid_gmt: Option<String>,
    pub date_completed: Option<String>,
    pub date_completed_gmt: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub cart_hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub meta_data: Vec<MetaData>,
    #[serde(deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub tax_lines: Vec<TaxLine>,
    #[serde(deserialize_with = "null_as_default")]
    pub shipping_lines: Vec<ShippingLine>,
    #[serde(deserialize_with = "null_as_default")]
    pub fee_lines: Vec<FeeLine>,
    #[serde(deserialize_with = "null_as_default")]
    pub coupon_lines: Vec<CouponLine>,
    #[serde(deserialize_with = "null_as_default")]
    pub refunds: Vec<Refund>,
    #[serde(rename = "_links", skip_serializing_if = "Value::is_null")]
    pub links: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address_1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address_2: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postcode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    /// Billing only.
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    /// Billing only.
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
}

impl Address {
    /// `"first last"`, trimmed; empty when both parts are blank.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaData {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub variation_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub tax_class: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subtotal: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subtotal_tax: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_tax: String,
    #[serde(deserialize_with = "null_as_default")]
    pub taxes: Vec<LineItemTax>,
    #[serde(deserialize_with = "null_as_default")]
    pub meta_data: Vec<MetaData>,
    #[serde(deserialize_with = "null_as_default")]
    pub sku: String,
    /// Integer or float depending on the store.
    pub price: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItemTax {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subtotal: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxLine {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub rate_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rate_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub compound: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub tax_total: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shipping_tax_total: String,
    #[serde(deserialize_with = "null_as_default")]
    pub meta_data: Vec<MetaData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingLine {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub method_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub method_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_tax: String,
    #[serde(deserialize_with = "null_as_default")]
    pub taxes: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub meta_data: Vec<MetaData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeLine {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tax_class: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tax_status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_tax: String,
    #[serde(deserialize_with = "null_as_default")]
    pub taxes: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub meta_data: Vec<MetaData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouponLine {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub discount: String,
    #[serde(deserialize_with = "null_as_default")]
    pub discount_tax: String,
    #[serde(deserialize_with = "null_as_default")]
    pub meta_data: Vec<MetaData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Refund {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub refund: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total: String,
}

/// Filters and page for `GET orders`.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// 1-based page number; `0` leaves the server default.
    pub page: u32,
    /// Page size; `0` leaves the server default.
    pub per_page: u32,
    pub offset: u32,
    /// `pending`, `processing`, `on-hold`, `completed`, `cancelled`, `refunded`,
    /// `failed` or `trash`.
    pub status: Option<String>,
    pub customer: Option<String>,
    pub product: Option<String>,
    pub search: Option<String>,
    /// ISO 8601 lower bound on creation.
    pub after: Option<String>,
    pub before: Option<String>,
    pub modified_after: Option<String>,
    /// `date`, `id`, `include`, `title` or `slug`.
    pub orderby: Option<String>,
    /// `asc` or `desc`.
    pub order: Option<String>,
    /// Comma-separated ids.
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub params: Vec<(String, String)>,
}

impl ListOptions {
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut q: Vec<(String, String)> = Vec::new();
        let numeric = [
            ("page", self.page),
            ("per_page", self.per_page),
            ("offset", self.offset),
        ];
        for (key, value) in numeric {
            if value > 0 {
                q.push((key.to_string(), value.to_string()));
            }
        }
        let optional = [
            ("status", &self.status),
            ("customer", &self.customer),
            ("product", &self.product),
            ("search", &self.search),
            ("after", &self.after),
            ("before", &self.before),
            ("modified_after", &self.modified_after),
            ("orderby", &self.orderby),
            ("order", &self.order),
            ("include", &self.include),
            ("exclude", &self.exclude),
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

/// Page-number pagination metadata. `total` / `total_pages` come from the
/// `X-WP-Total` / `X-WP-TotalPages` headers when the store sends them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub per_page: u32,
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
    /// Authoritative when `total_pages` is known, otherwise a full-page hint.
    pub has_more: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OrdersPage {
    pub orders: Vec<Order>,
    pub page: PageInfo,
}
