//! Configuration management for Folio.
//!
//! Configuration is layered: built-in defaults, then an optional YAML file,
//! then `FOLIO__SECTION__KEY` environment variables.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::content::DEFAULT_MAIN_CATEGORIES;
use crate::error::{FolioError, Result};
use crate::ratelimit::RateLimitPolicy;

/// Prefix for environment overrides, e.g. `FOLIO__CONTACT__API_KEY`.
const ENV_PREFIX: &str = "FOLIO";
const ENV_SEPARATOR: &str = "__";

/// Main configuration for the Folio service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Rate limiting configuration
    pub rate_limiting: RateLimitingConfig,

    /// Content store configuration
    pub content: ContentConfig,

    /// Contact form delivery configuration
    pub contact: ContactConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen address
    pub listen_addr: SocketAddr,

    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitingConfig {
    /// Whether the gate is installed at all
    pub enabled: bool,

    /// Requests whose path starts with this prefix pass through the gate
    pub path_prefix: String,

    /// Requests admitted per identity per window
    pub max_requests: u32,

    /// Window length in seconds
    pub window_secs: u64,

    /// Header carrying the forwarded client address
    pub identity_header: String,

    /// Shared identity for requests without the forwarded-address header
    pub fallback_identity: String,

    /// Upper bound on tracked identities
    pub max_entries: usize,

    /// How often expired records are swept, in seconds
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path_prefix: "/api/".to_string(),
            max_requests: 60,
            window_secs: 60,
            identity_header: "x-forwarded-for".to_string(),
            fallback_identity: "anonymous".to_string(),
            max_entries: 10_000,
            sweep_interval_secs: 60,
        }
    }
}

impl RateLimitingConfig {
    /// The admission policy described by this configuration.
    pub fn policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(self.max_requests, Duration::from_secs(self.window_secs))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Content store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Hosted content store project id
    pub project_id: Option<String>,

    /// Dataset within the project
    pub dataset: String,

    /// Query API version (date string)
    pub api_version: String,

    /// Query the edge cache instead of the live API
    pub use_cdn: bool,

    /// Serve content from a local YAML/JSON fixture instead of the hosted store
    pub fixture_path: Option<PathBuf>,

    /// Outbound request timeout in seconds
    pub request_timeout_secs: u64,

    /// Number of related projects returned next to a project
    pub related_limit: usize,

    /// Categories with their own portfolio tab; the rest are grouped as "Other"
    pub main_categories: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            fixture_path: None,
            request_timeout_secs: 10,
            related_limit: 3,
            main_categories: DEFAULT_MAIN_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Contact form delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Transactional email API key; the contact endpoint is disabled without it
    pub api_key: Option<String>,

    /// Transactional email API endpoint
    pub endpoint: String,

    /// Sender mailbox
    pub from: String,

    /// Recipient mailbox
    pub to: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.resend.com/emails".to_string(),
            from: "Folio <noreply@example.com>".to_string(),
            to: "info@example.com".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl FolioConfig {
    /// Load configuration from an optional YAML file plus environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path.to_path_buf()).format(config::FileFormat::Yaml),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| FolioError::Config(e.to_string()))
    }

    /// Parse configuration from a YAML string, without environment overrides.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| FolioError::Config(e.to_string()))
    }
}
