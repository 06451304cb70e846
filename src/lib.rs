//! Bucket Viewer - Browsable HTML listings for S3 buckets
//!
//! Renders the contents of an object-storage bucket as a folder-style web
//! page. Each request path is treated as a key prefix, listed once with a
//! `/` delimiter, and rendered with links to sub-folders and objects.
//!
//! # Architecture
//!
//! - [`storage`]: delimited single-page listings behind the [`storage::ObjectLister`] trait
//! - [`view`]: pure HTML rendering of a listing
//! - [`api`]: axum server mapping request paths to prefixes
//! - [`config`]: startup configuration from TOML and the environment

pub mod config;
pub mod error;
pub mod storage;
pub mod view;
pub mod api;

pub use config::ViewerConfig;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ViewerConfig;
    pub use crate::error::{Error, Result};
    pub use crate::storage::{ListingEntry, ListingResult, ObjectLister};
    pub use crate::api::HttpServer;
}
