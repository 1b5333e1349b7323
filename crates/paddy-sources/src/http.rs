//! Request plumbing shared by both source clients: client construction, URL
//! building, error-body translation and order-list envelope decoding.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::SourceError;

/// Client-level timeout applied to every outbound call unless configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SourceError::Transport(format!("http client build failed: {e}")))
}

/// Join `base` and `endpoint` with exactly one `/` and append `query` pairs in
/// the order given. No trailing `?` is emitted when `query` is empty.
pub fn build_url(base: &str, endpoint: &str, query: &[(String, String)]) -> Result<Url, SourceError> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined)
        .map_err(|e| SourceError::Transport(format!("invalid url '{joined}': {e}")))?;

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in query {
            pairs.append_pair(k, v);
        }
    }
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    /// Numeric on Orderspace, a string slug on WooCommerce.
    #[serde(default)]
    code: serde_json::Value,
}

/// Translate a non-2xx response body into [`SourceError::Api`].
///
/// A structured `{ "message": .., "code": .. }` body is decoded when possible;
/// anything else is carried as the raw body text.
pub(crate) fn api_error(status: StatusCode, body: &[u8]) -> SourceError {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(parsed) => SourceError::Api {
            status: status.as_u16(),
            message: parsed.message,
            code: parsed.code.as_i64(),
        },
        Err(_) => SourceError::Api {
            status: status.as_u16(),
            message: String::from_utf8_lossy(body).trim().to_string(),
            code: None,
        },
    }
}

/// Field deserializer for wire shapes: an explicit `null` decodes to the
/// type's default, same as a missing key under `#[serde(default)]`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Deserialize)]
struct WrappedOrders<T> {
    orders: Vec<T>,
}

/// Decode an order list that is either a bare JSON array or an object
/// wrapping the array under `"orders"`. The direct shape is tried first.
pub fn decode_order_list<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, SourceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let direct_err = match serde_json::from_slice::<Vec<T>>(body) {
        Ok(list) => return Ok(list),
        Err(e) => e,
    };

    match serde_json::from_slice::<WrappedOrders<T>>(body) {
        Ok(wrapped) => Ok(wrapped.orders),
        Err(wrapped_err) => Err(SourceError::Decode(format!(
            "order list matched neither array ({direct_err}) nor wrapped object ({wrapped_err})"
        ))),
    }
}

/// Read the body of `resp`, failing with a translated API error on non-2xx.
pub(crate) async fn read_success_body(
    resp: reqwest::Response,
) -> Result<(reqwest::header::HeaderMap, Vec<u8>), SourceError> {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp.bytes().await?.to_vec();

    if !status.is_success() {
        return Err(api_error(status, &body));
    }
    Ok((headers, body))
}
