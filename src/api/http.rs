//! HTTP Listing Server
//!
//! Every path under the mount point is a folder prefix. The handler lists
//! that prefix once and renders the result as HTML.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Router,
};
use percent_encoding::percent_decode_str;
use tower_http::trace::TraceLayer;

use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::storage::ObjectLister;
use crate::view::{self, RenderContext};

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Shared application state
pub struct AppState {
    /// Mount path with any trailing slash removed ("" for the root)
    pub mount_path: String,
    /// Scheme and host that file links point at
    pub base_url: String,
    /// Storage listing backend
    pub lister: Arc<dyn ObjectLister>,
}

impl AppState {
    /// Build request state from the startup configuration
    pub fn new(config: &ViewerConfig, lister: Arc<dyn ObjectLister>) -> Self {
        Self {
            mount_path: config.server.mount_path.trim_end_matches('/').to_string(),
            base_url: derive_base_url(config),
            lister,
        }
    }
}

/// HTTP listing server
pub struct HttpServer {
    bind_address: String,
    state: Arc<AppState>,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: &ViewerConfig, lister: Arc<dyn ObjectLister>) -> Self {
        Self {
            bind_address: config.server.bind_address.clone(),
            state: Arc::new(AppState::new(config, lister)),
        }
    }

    /// Get the state for sharing with other components
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Create the router
    pub fn router(&self) -> Router {
        create_router(self.state())
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&self.bind_address).await?;
        tracing::info!(
            "Bucket viewer listening on {} (mount: {})",
            self.bind_address,
            if self.state.mount_path.is_empty() { "/" } else { self.state.mount_path.as_str() }
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Network(format!("HTTP server error: {}", e)))?;

        Ok(())
    }
}

/// Build the listing router. Any path is accepted; method is not inspected.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(handle_listing)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Base URL for file links.
///
/// An explicit `links.base_url` wins. Otherwise website hosting links to the
/// bucket name as host, and direct links go to `<bucket>.<storage.domain>`.
pub fn derive_base_url(config: &ViewerConfig) -> String {
    if let Some(base) = &config.links.base_url {
        return base.trim_end_matches('/').to_string();
    }

    let host = if config.links.website_hosting {
        config.storage.bucket.clone()
    } else {
        format!("{}.{}", config.storage.bucket, config.storage.domain)
    };

    format!("{}://{}", config.scheme(), host)
}

/// Map a request path to a storage prefix.
///
/// Returns `None` when the path is outside the mount point.
pub fn extract_prefix(mount_path: &str, path: &str) -> Option<String> {
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    let mount = mount_path.trim_end_matches('/');

    let rest = if mount.is_empty() {
        &decoded[..]
    } else if let Some(rest) = decoded.strip_prefix(mount) {
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        rest
    } else {
        return None;
    };

    Some(rest.strip_prefix('/').unwrap_or(rest).to_string())
}

// ============ Handlers ============

async fn handle_listing(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    // Relative folder links only resolve under a trailing slash
    if !state.mount_path.is_empty() && uri.path() == state.mount_path {
        return (
            [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)],
            Redirect::permanent(&format!("{}/", state.mount_path)),
        )
            .into_response();
    }

    let Some(prefix) = extract_prefix(&state.mount_path, uri.path()) else {
        return html_response(StatusCode::NOT_FOUND, "404 page not found".to_string());
    };

    let listing = match state.lister.list(&prefix).await {
        Ok(listing) => listing,
        Err(e) => {
            tracing::error!("ListObjects failed for prefix {:?}: {}", prefix, e);
            return html_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                view::html_escape(&e.to_string()),
            );
        }
    };

    if listing.is_truncated {
        tracing::warn!(
            "Listing of {:?} truncated at {} entries",
            prefix,
            listing.entries.len() + listing.common_prefixes.len()
        );
    }

    let body = view::render(&RenderContext {
        prefix: &prefix,
        listing: &listing,
        base_url: &state.base_url,
    });

    html_response(StatusCode::OK, body)
}

fn html_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(bucket: &str, website_hosting: bool, https: bool) -> ViewerConfig {
        let mut config = ViewerConfig::default();
        config.storage.bucket = bucket.to_string();
        config.links.website_hosting = website_hosting;
        config.links.https = https;
        config
    }

    #[test]
    fn test_base_url_direct_http() {
        assert_eq!(derive_base_url(&config("b", false, false)), "http://b.s3.amazonaws.com");
    }

    #[test]
    fn test_base_url_website_https() {
        assert_eq!(derive_base_url(&config("b", true, true)), "https://b");
    }

    #[test]
    fn test_base_url_custom_domain() {
        let mut c = config("b", false, true);
        c.storage.domain = "s3.eu-west-1.amazonaws.com".to_string();
        assert_eq!(derive_base_url(&c), "https://b.s3.eu-west-1.amazonaws.com");
    }

    #[test]
    fn test_base_url_override() {
        let mut c = config("b", true, false);
        c.links.base_url = Some("https://cdn.example.com/".to_string());
        assert_eq!(derive_base_url(&c), "https://cdn.example.com");
    }

    #[test]
    fn test_extract_prefix_mounted() {
        assert_eq!(extract_prefix("/viewer", "/viewer"), Some(String::new()));
        assert_eq!(extract_prefix("/viewer", "/viewer/"), Some(String::new()));
        assert_eq!(extract_prefix("/viewer", "/viewer/docs/"), Some("docs/".to_string()));
        assert_eq!(extract_prefix("/viewer/", "/viewer/a/b"), Some("a/b".to_string()));
        assert_eq!(extract_prefix("/viewer", "/viewers/docs/"), None);
        assert_eq!(extract_prefix("/viewer", "/other"), None);
    }

    #[test]
    fn test_extract_prefix_root_mount() {
        assert_eq!(extract_prefix("", "/"), Some(String::new()));
        assert_eq!(extract_prefix("/", "/docs/"), Some("docs/".to_string()));
    }

    #[test]
    fn test_extract_prefix_keeps_empty_segments() {
        assert_eq!(extract_prefix("/viewer", "/viewer/docs//"), Some("docs//".to_string()));
    }

    #[test]
    fn test_extract_prefix_decodes() {
        assert_eq!(
            extract_prefix("/viewer", "/viewer/my%20docs/caf%C3%A9/"),
            Some("my docs/café/".to_string())
        );
    }
}
