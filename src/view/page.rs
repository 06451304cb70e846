//! Listing page renderer

use chrono::{DateTime, Utc};

use super::helpers::{
    basename, html_escape, humanize_bytes, url_escape_key, url_escape_segment,
};
use crate::storage::{ListingResult, DELIMITER};

const STYLESHEET: &str = "https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/css/bootstrap.min.css";
const STYLESHEET_INTEGRITY: &str =
    "sha384-BVYiiSIFeK1dGmJRAkycuHAHRg32OmUcww7on3RYdg4Va+PmSTsz/K68vbdEjh4u";

/// Everything one listing page needs
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Prefix that was requested
    pub prefix: &'a str,
    /// Listing returned for the prefix
    pub listing: &'a ListingResult,
    /// Scheme and host that file links point at, without a trailing slash
    pub base_url: &'a str,
}

/// Render the listing page as a complete HTML document
pub fn render(ctx: &RenderContext<'_>) -> String {
    let bucket = html_escape(&ctx.listing.bucket);
    let prefix = html_escape(ctx.prefix);

    let mut html = String::from("<!doctype html>\n");
    html.push_str("<html charset=\"utf-8\">\n");
    html.push_str("  <head>\n");
    html.push_str(&format!("    <title>{}/{}</title>\n", bucket, prefix));
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "    <link rel=\"stylesheet\" href=\"{}\" integrity=\"{}\" crossorigin=\"anonymous\">\n",
        STYLESHEET, STYLESHEET_INTEGRITY
    ));
    html.push_str("  </head>\n");
    html.push_str("  <body>\n");
    html.push_str("    <div class=\"container\">\n");
    html.push_str("    <div class=\"page-header\">\n");
    html.push_str(&format!("      <h1>s3://{}/{}</h1>\n", bucket, prefix));
    html.push_str("    </div>\n");

    if ctx.listing.is_truncated {
        html.push_str(
            "    <div class=\"alert alert-warning\">Listing truncated: only the first page of results is shown.</div>\n",
        );
    }

    html.push_str("    <div class=\"list-group\">\n");

    if !ctx.prefix.is_empty() {
        push_folder_link(&mut html, "../", "../");
    }

    for common in &ctx.listing.common_prefixes {
        let name = folder_segment(ctx.prefix, common);
        // An empty segment needs "./" so the href stays relative
        let href = if name.is_empty() {
            ".//".to_string()
        } else {
            format!("{}/", url_escape_segment(name))
        };
        push_folder_link(&mut html, &href, &format!("{}/", html_escape(name)));
    }

    for entry in ctx.listing.files() {
        let href = format!("{}/{}", ctx.base_url, url_escape_key(&entry.key));
        html.push_str(&format!(
            "      <a href=\"{}\" class=\"list-group-item\">\n",
            html_escape(&href)
        ));
        html.push_str("        <h4 class=\"list-group-item-heading\">\n");
        html.push_str("          <span class=\"glyphicon glyphicon-file\" aria-hidden=\"true\"></span>\n");
        html.push_str(&format!("          {}\n", html_escape(basename(&entry.key))));
        html.push_str("        </h4>\n");
        html.push_str(&format!(
            "        <p class=\"list-group-item-text\">{} | {}</p>\n",
            humanize_bytes(entry.size),
            format_time(entry.last_modified.as_ref())
        ));
        html.push_str("      </a>\n");
    }

    html.push_str("    </div>\n");
    html.push_str("    </div>\n");
    html.push_str("  </body>\n");
    html.push_str("</html>\n");
    html
}

/// Segment a common prefix adds below the listed folder.
///
/// Falls back to the basename when the page is not itself a folder
/// (prefix without a trailing separator) or the prefix does not match.
fn folder_segment<'a>(prefix: &str, common: &'a str) -> &'a str {
    if prefix.is_empty() || prefix.ends_with(DELIMITER) {
        if let Some(rest) = common.strip_prefix(prefix) {
            return rest.strip_suffix(DELIMITER).unwrap_or(rest);
        }
    }
    basename(common)
}

fn push_folder_link(html: &mut String, href: &str, label: &str) {
    html.push_str(&format!(
        "      <a href=\"{}\" class=\"list-group-item\">\n",
        html_escape(href)
    ));
    html.push_str(&format!(
        "        <span class=\"glyphicon glyphicon-folder-close\" aria-hidden=\"true\"></span> {}\n",
        label
    ));
    html.push_str("      </a>\n");
}

fn format_time(time: Option<&DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_default()
}
