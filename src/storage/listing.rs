//! Listing types and the backend seam

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// Path separator used to group keys into common prefixes
pub const DELIMITER: &str = "/";

/// An object returned by a delimited listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Full object key
    pub key: String,
    /// Size in bytes
    pub size: u64,
    /// Last modified timestamp, when the backend reports one
    pub last_modified: Option<DateTime<Utc>>,
}

/// One page of immediate children under a prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingResult {
    /// Bucket the listing came from
    pub bucket: String,
    /// Prefix that was listed
    pub prefix: String,
    /// Sub-folders, each ending with the delimiter
    pub common_prefixes: Vec<String>,
    /// Objects directly under the prefix, directory markers included
    pub entries: Vec<ListingEntry>,
    /// Backend had more results than fit in this page
    pub is_truncated: bool,
}

impl ListingResult {
    /// Create an empty listing for a bucket and prefix
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Entries that are real files, skipping directory markers
    pub fn files(&self) -> impl Iterator<Item = &ListingEntry> {
        self.entries
            .iter()
            .filter(|e| !crate::view::is_directory_marker(&e.key))
    }
}

/// Backend capable of listing the immediate children of a prefix.
///
/// Implementations make a single attempt and return only the first page.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// List `prefix` using [`DELIMITER`]
    async fn list(&self, prefix: &str) -> Result<ListingResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, size: u64) -> ListingEntry {
        ListingEntry {
            key: key.to_string(),
            size,
            last_modified: None,
        }
    }

    #[test]
    fn test_files_skip_directory_markers() {
        let mut listing = ListingResult::new("b", "docs/");
        listing.entries = vec![entry("docs/", 0), entry("docs/a.txt", 10), entry("docs/empty/", 0)];

        let keys: Vec<_> = listing.files().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["docs/a.txt"]);
    }

    #[test]
    fn test_marker_with_size_still_skipped() {
        let mut listing = ListingResult::new("b", "");
        listing.entries = vec![entry("odd/", 4096)];
        assert_eq!(listing.files().count(), 0);
    }
}
