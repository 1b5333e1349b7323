//! paddy-daemon library target.
//!
//! Exposes the router, middleware and state for integration tests.
//! The binary `main.rs` depends on this library target.

pub mod api_types;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod state;
