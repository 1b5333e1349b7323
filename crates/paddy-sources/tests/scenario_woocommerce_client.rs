//! Scenario: WooCommerce client
//!
//! # Invariant under test
//!
//! - Every request carries HTTP basic auth built from the consumer key/secret.
//! - Recent orders are requested as page 1, `per_page = count`, newest first.
//! - `X-WP-Total` / `X-WP-TotalPages` drive page metadata.
//! - A non-numeric id is rejected before any request.
//! - WooCommerce's string error codes still yield the upstream message.

use httpmock::prelude::*;
use paddy_schemas::{Origin, NOT_APPLICABLE};
use paddy_sources::woocommerce::ListOptions;
use paddy_sources::{OrderSource, RawOrder, SourceError, WooCommerceClient, WooCommerceConfig};
use serde_json::json;

// base64("ck_test:cs_test")
const BASIC: &str = "Basic Y2tfdGVzdDpjc190ZXN0";

fn client(server: &MockServer) -> WooCommerceClient {
    WooCommerceClient::new(WooCommerceConfig::new(
        server.url("/wp-json/wc/v3"),
        "ck_test",
        "cs_test",
    ))
    .expect("client builds")
}

fn woo_order(id: u64, created: &str) -> serde_json::Value {
    json!({
        "id": id,
        "number": id.to_string(),
        "status": "on-hold",
        "currency": "USD",
        "date_created": created,
        "total": "19.99",
        "billing": {"first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com"}
    })
}

#[tokio::test]
async fn recent_orders_use_basic_auth_and_date_ordering() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wp-json/wc/v3/orders")
                .header("authorization", BASIC)
                .query_param("page", "1")
                .query_param("per_page", "3")
                .query_param("orderby", "date")
                .query_param("order", "desc");
            then.status(200)
                .json_body(json!([woo_order(12, "2024-01-02T09:30:00")]));
        })
        .await;

    let c = client(&server);
    assert_eq!(OrderSource::origin(&c), Origin::WooCommerce);
    let orders = c.fetch_recent_orders(3).await.unwrap();
    m.assert_hits_async(1).await;

    assert_eq!(orders.len(), 1);
    let o = &orders[0];
    assert_eq!(o.id, "12");
    assert_eq!(o.order_number, 12);
    assert_eq!(o.customer, "Ada Lovelace");
    assert_eq!(o.order_date_display, "Jan 2, 2024");
    assert_eq!(o.deliver_on, NOT_APPLICABLE);
    assert_eq!(o.total, "$19.99");
    assert_eq!(o.status, "On-Hold");
}

#[tokio::test]
async fn pagination_headers_are_read() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wp-json/wc/v3/orders")
                .query_param("page", "2")
                .query_param("per_page", "1");
            then.status(200)
                .header("X-WP-Total", "3")
                .header("X-WP-TotalPages", "3")
                .json_body(json!([woo_order(2, "2024-01-01T00:00:00")]));
        })
        .await;

    let opts = ListOptions {
        page: 2,
        per_page: 1,
        ..Default::default()
    };
    let page = client(&server).list_orders(&opts).await.unwrap();
    assert_eq!(page.page.total, Some(3));
    assert_eq!(page.page.total_pages, Some(3));
    assert!(page.page.has_more);
}

#[tokio::test]
async fn non_numeric_id_makes_no_request() {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|when, then| {
            when.path_contains("/orders");
            then.status(200).json_body(json!({}));
        })
        .await;

    let err = client(&server).fetch_order("abc").await.unwrap_err();
    assert_eq!(err, SourceError::InvalidId("abc".into()));
    assert!(err.is_client_error());
    any.assert_hits_async(0).await;
}

#[tokio::test]
async fn single_order_is_returned_raw() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wp-json/wc/v3/orders/12")
                .header("authorization", BASIC);
            then.status(200).json_body(woo_order(12, "2024-01-02T09:30:00"));
        })
        .await;

    match client(&server).fetch_order("12").await.unwrap() {
        RawOrder::WooCommerce(o) => {
            assert_eq!(o.id, 12);
            assert_eq!(o.total, "19.99");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn upstream_not_found_carries_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wp-json/wc/v3/orders/999");
            then.status(404).json_body(json!({
                "code": "woocommerce_rest_shop_order_invalid_id",
                "message": "Invalid ID.",
                "data": {"status": 404}
            }));
        })
        .await;

    let err = client(&server).get_order("999").await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert!(err.to_string().contains("Invalid ID."));
}

#[tokio::test]
async fn subscription_renewals_are_filtered() {
    let server = MockServer::start_async().await;
    let mut renewal = woo_order(5, "2024-01-05T00:00:00");
    renewal["created_via"] = json!("subscription");
    let plain = woo_order(4, "2024-01-04T00:00:00");
    let body = json!([renewal, plain]);

    server
        .mock_async(move |when, then| {
            when.method(GET).path("/wp-json/wc/v3/orders");
            then.status(200).json_body(body.clone());
        })
        .await;

    let page = client(&server)
        .list_subscription_renewals(&ListOptions::default())
        .await
        .unwrap();
    let ids: Vec<u64> = page.orders.iter().map(|o| o.id).collect();
    assert_eq!(ids, [5]);
}
