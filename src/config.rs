//! Bucket Viewer Configuration
//!
//! Configuration is read once at startup from an optional TOML file and
//! the process environment, then shared read-only with every request.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the bucket to list
pub const ENV_BUCKET_NAME: &str = "BUCKET_NAME";

/// Environment variable selecting website-hosting link derivation
pub const ENV_WEBSITE_HOSTING: &str = "WEBSITE_HOSTING";

/// Environment variable forcing https links
pub const ENV_HTTPS: &str = "HTTPS";

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No file found; defaults plus environment
    Defaults,
}

/// Main viewer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Storage backend configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Generated link configuration
    #[serde(default)]
    pub links: LinkConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket to list
    #[serde(default)]
    pub bucket: String,

    /// AWS region (SDK default chain when unset)
    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint URL for S3-compatible stores
    #[serde(default)]
    pub endpoint: Option<String>,

    /// AWS profile name
    #[serde(default)]
    pub profile: Option<String>,

    /// Provider domain used to build direct object links
    #[serde(default = "default_storage_domain")]
    pub domain: String,
}

/// Generated link configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Bucket is served through static website hosting under its own name
    #[serde(default)]
    pub website_hosting: bool,

    /// Emit https links instead of http
    #[serde(default)]
    pub https: bool,

    /// Fixed base URL for file links, overriding host derivation
    #[serde(default)]
    pub base_url: Option<String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Path under which listings are served
    #[serde(default = "default_mount_path")]
    pub mount_path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_storage_domain() -> String {
    "s3.amazonaws.com".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_mount_path() -> String {
    "/viewer".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: None,
            endpoint: None,
            profile: None,
            domain: default_storage_domain(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            mount_path: default_mount_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> crate::Result<Self> {
        let config: ViewerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the startup configuration.
    ///
    /// Reads `path` when it exists, otherwise starts from defaults, then
    /// applies the `BUCKET_NAME`, `WEBSITE_HOSTING` and `HTTPS` environment
    /// variables on top.
    pub fn load(path: &Path) -> crate::Result<(Self, ConfigSource)> {
        Self::load_with_env(path, |name| std::env::var(name).ok())
    }

    /// Load from `path` with an explicit environment lookup
    pub fn load_with_env<F>(path: &Path, lookup: F) -> crate::Result<(Self, ConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (mut config, source) = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            (toml::from_str::<ViewerConfig>(&content)?, ConfigSource::File(path.to_path_buf()))
        } else {
            (ViewerConfig::default(), ConfigSource::Defaults)
        };

        config.apply_env_overrides(lookup);
        config.validate()?;
        Ok((config, source))
    }

    /// Render as TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Overlay values from an environment lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bucket) = lookup(ENV_BUCKET_NAME) {
            self.storage.bucket = bucket;
        }
        if let Some(value) = lookup(ENV_WEBSITE_HOSTING) {
            self.links.website_hosting = parse_bool(&value);
        }
        if let Some(value) = lookup(ENV_HTTPS) {
            self.links.https = parse_bool(&value);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.storage.bucket.is_empty() {
            return Err(crate::Error::Config(format!(
                "storage.bucket cannot be empty (set it in the config file or {})",
                ENV_BUCKET_NAME
            )));
        }

        if !self.server.mount_path.starts_with('/') {
            return Err(crate::Error::Config(format!(
                "server.mount_path must start with '/': {}",
                self.server.mount_path
            )));
        }

        if self.server.bind_address.is_empty() {
            return Err(crate::Error::Config("server.bind_address cannot be empty".into()));
        }

        Ok(())
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.storage.bucket
    }

    /// Get the link scheme
    pub fn scheme(&self) -> &'static str {
        if self.links.https {
            "https"
        } else {
            "http"
        }
    }
}

/// Commented starter configuration for `bucket`
pub fn sample_config(bucket: &str) -> String {
    let bucket = toml::Value::String(bucket.to_string());
    format!(r#"# Bucket Viewer Configuration
# Generated configuration file
#
# BUCKET_NAME, WEBSITE_HOSTING and HTTPS in the environment override
# the matching settings below.

[storage]
bucket = {bucket}
# region = "us-east-1"
# endpoint = "http://localhost:9000"
# profile = "default"
domain = "s3.amazonaws.com"

[links]
website_hosting = false
https = false
# base_url = "https://cdn.example.com"

[server]
bind_address = "0.0.0.0:8080"
mount_path = "/viewer"

[logging]
level = "info"
"#)
}

/// Parse a boolean flag leniently. Unknown values read as false.
fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "t" | "T" | "true" | "TRUE" | "True")
}
