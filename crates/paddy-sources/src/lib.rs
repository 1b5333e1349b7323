//! paddy-sources
//!
//! Upstream order backends: an Orderspace client (OAuth2 client credentials)
//! and a WooCommerce client (consumer key/secret), the normalizer that maps
//! both into [`paddy_schemas::Order`], and the [`OrderSource`] trait the
//! aggregator fans out over.
//!
//! This crate does **not** merge, sort or serve anything; see `paddy-service`
//! and `paddy-daemon`.

pub mod error;
pub mod http;
pub mod normalizer;
pub mod orderspace;
pub mod source;
pub mod woocommerce;

pub use error::SourceError;
pub use orderspace::{OrderspaceClient, OrderspaceConfig};
pub use source::{OrderSource, RawOrder};
pub use woocommerce::{WooCommerceClient, WooCommerceConfig};
