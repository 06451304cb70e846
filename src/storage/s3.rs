//! S3 listing client

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::Client;
use chrono::DateTime;

use super::listing::{ListingEntry, ListingResult, ObjectLister, DELIMITER};
use crate::config::StorageConfig;
use crate::error::{Error, Result};

/// Lists a single bucket through the AWS SDK
#[derive(Clone)]
pub struct S3Lister {
    client: Client,
    bucket: String,
}

impl S3Lister {
    /// Wrap an existing SDK client
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from configuration.
    ///
    /// Credentials always come from the SDK default provider chain
    /// (environment, profile files, instance metadata).
    pub async fn connect(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;

        // Custom endpoints are S3-compatible stores that expect path-style addressing
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        tracing::debug!(
            "S3 client ready for bucket {} (endpoint: {})",
            config.bucket,
            config.endpoint.as_deref().unwrap_or("default")
        );

        Self::new(Client::from_conf(s3_config), config.bucket.clone())
    }

    /// Bucket this client lists
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectLister for S3Lister {
    async fn list(&self, prefix: &str) -> Result<ListingResult> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .delimiter(DELIMITER)
            .send()
            .await
            .map_err(|e| Error::ListingFailed(DisplayErrorContext(&e).to_string()))?;

        let listing = listing_from_output(&self.bucket, prefix, &resp);

        tracing::debug!(
            "Listed s3://{}/{}: {} prefixes, {} objects",
            listing.bucket,
            prefix,
            listing.common_prefixes.len(),
            listing.entries.len()
        );

        Ok(listing)
    }
}

/// Map one ListObjectsV2 page into a listing.
///
/// Objects without a key are dropped and negative sizes read as zero.
/// `bucket` is used when the response carries no bucket name.
fn listing_from_output(bucket: &str, prefix: &str, resp: &ListObjectsV2Output) -> ListingResult {
    let mut listing = ListingResult::new(resp.name().unwrap_or(bucket), prefix);

    listing.common_prefixes = resp
        .common_prefixes()
        .iter()
        .filter_map(|cp| cp.prefix().map(str::to_string))
        .collect();

    listing.entries = resp
        .contents()
        .iter()
        .filter_map(|obj| {
            let key = obj.key()?;
            Some(ListingEntry {
                key: key.to_string(),
                size: obj.size().unwrap_or(0).max(0) as u64,
                last_modified: obj
                    .last_modified()
                    .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
            })
        })
        .collect();

    listing.is_truncated = resp.is_truncated().unwrap_or(false);
    listing
}
