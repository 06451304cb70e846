//! HTTP API Module
//!
//! Serves bucket listings as HTML pages.

mod http;

pub use http::{create_router, derive_base_url, extract_prefix, AppState, HttpServer};
