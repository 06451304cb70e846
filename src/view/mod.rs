//! HTML View Module
//!
//! Renders a bucket listing as a browsable page.

mod helpers;
mod page;

pub use helpers::{basename, html_escape, humanize_bytes, is_directory_marker, url_escape_key, url_escape_segment};
pub use page::{render, RenderContext};
