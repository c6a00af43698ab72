//! Configuration management for the MCP server.
//!
//! Configuration is resolved once at startup from environment variables
//! (optionally seeded from a `.env` file) and is read-only afterwards. The
//! WordPress section carries the site credentials every API wrapper needs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::error::{Error, Result};
use super::transport::TransportConfig;

/// Default base URL of the public WordPress.org plugin directory API.
pub const DEFAULT_DIRECTORY_URL: &str = "https://wordpress.org/plugins/wp-json/wp/v2";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// WordPress site and credentials.
    pub wordpress: WordPressConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// WordPress site location and credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct WordPressConfig {
    /// Site base URL without trailing slash, e.g. `https://example.com`.
    pub url: String,

    /// Account used for Basic authentication (usually with an application password).
    pub username: String,

    /// Password or application password for `username`.
    pub password: String,

    /// WooCommerce REST consumer key.
    pub wc_consumer_key: Option<String>,

    /// WooCommerce REST consumer secret.
    pub wc_consumer_secret: Option<String>,

    /// Base URL of the public plugin directory API.
    pub directory_url: String,

    /// Optional request timeout in seconds. `None` leaves requests unbounded.
    pub timeout_secs: Option<u64>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for WordPressConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordPressConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field(
                "wc_consumer_key",
                &self.wc_consumer_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "wc_consumer_secret",
                &self.wc_consumer_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("directory_url", &self.directory_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl WordPressConfig {
    /// Build a config for `url` with the given credentials and no WooCommerce keys.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: normalize_url(&url.into()),
            username: username.into(),
            password: password.into(),
            wc_consumer_key: None,
            wc_consumer_secret: None,
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            timeout_secs: None,
        }
    }

    /// Set WooCommerce consumer credentials.
    pub fn with_commerce_keys(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.wc_consumer_key = Some(key.into());
        self.wc_consumer_secret = Some(secret.into());
        self
    }

    /// Override the plugin directory base URL.
    pub fn with_directory_url(mut self, url: impl Into<String>) -> Self {
        self.directory_url = normalize_url(&url.into());
        self
    }

    /// Basic-auth token: base64 of `username:password`.
    ///
    /// Recomputed on every call; nothing is cached.
    pub fn auth_token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.username, self.password))
    }

    /// WooCommerce key/secret pair, only when both are present and non-empty.
    pub fn commerce_credentials(&self) -> Option<(&str, &str)> {
        match (
            self.wc_consumer_key.as_deref(),
            self.wc_consumer_secret.as_deref(),
        ) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some((key, secret))
            }
            _ => None,
        }
    }

    /// Startup gate: the site URL and both credentials must be present.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::config(
                "WORDPRESS_URL environment variable is required",
            ));
        }
        if self.username.is_empty() || self.password.is_empty() {
            return Err(Error::config(
                "WORDPRESS_USERNAME and WORDPRESS_PASSWORD environment variables are required",
            ));
        }
        Ok(())
    }

    /// Read the WordPress section from the environment.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let mut config = Self::new(
            var("WORDPRESS_URL").unwrap_or_default(),
            var("WORDPRESS_USERNAME").unwrap_or_default(),
            var("WORDPRESS_PASSWORD").unwrap_or_default(),
        );
        config.wc_consumer_key = var("WC_CONSUMER_KEY");
        config.wc_consumer_secret = var("WC_CONSUMER_SECRET");

        if let Some(directory_url) = var("WORDPRESS_DIRECTORY_URL") {
            config.directory_url = normalize_url(&directory_url);
        }
        config.timeout_secs = var("WORDPRESS_TIMEOUT_SECS").and_then(|v| v.parse().ok());

        config
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "wordpress-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            wordpress: WordPressConfig {
                directory_url: DEFAULT_DIRECTORY_URL.to_string(),
                ..WordPressConfig::default()
            },
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TRANSPORT`, ...); the site uses `WORDPRESS_*`
    /// and `WC_*`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();
        config.wordpress = WordPressConfig::from_env();

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    const WP_VARS: [&str; 7] = [
        "WORDPRESS_URL",
        "WORDPRESS_USERNAME",
        "WORDPRESS_PASSWORD",
        "WC_CONSUMER_KEY",
        "WC_CONSUMER_SECRET",
        "WORDPRESS_DIRECTORY_URL",
        "WORDPRESS_TIMEOUT_SECS",
    ];

    fn clear_wp_env() {
        for name in WP_VARS {
            unsafe {
                std::env::remove_var(name);
            }
        }
    }

    #[test]
    fn test_wordpress_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_wp_env();
        unsafe {
            std::env::set_var("WORDPRESS_URL", "https://blog.example.com/");
            std::env::set_var("WORDPRESS_USERNAME", "editor");
            std::env::set_var("WORDPRESS_PASSWORD", "app pass");
            std::env::set_var("WC_CONSUMER_KEY", "ck_1");
            std::env::set_var("WORDPRESS_TIMEOUT_SECS", "15");
        }

        let config = WordPressConfig::from_env();
        assert_eq!(config.url, "https://blog.example.com");
        assert_eq!(config.username, "editor");
        assert_eq!(config.password, "app pass");
        assert_eq!(config.wc_consumer_key.as_deref(), Some("ck_1"));
        assert_eq!(config.wc_consumer_secret, None);
        assert_eq!(config.directory_url, DEFAULT_DIRECTORY_URL);
        assert_eq!(config.timeout_secs, Some(15));

        clear_wp_env();
    }

    #[test]
    fn test_missing_env_fails_validation() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_wp_env();

        let config = WordPressConfig::from_env();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("WORDPRESS_URL"));
    }

    #[test]
    fn test_auth_token_is_base64_of_credentials() {
        let config = WordPressConfig::new("https://example.com", "admin", "secret");
        assert_eq!(config.auth_token(), "YWRtaW46c2VjcmV0");

        let config = WordPressConfig::new("https://example.com", "user", "pa:ss");
        assert_eq!(config.auth_token(), STANDARD.encode("user:pa:ss"));
    }

    #[test]
    fn test_validate_requires_url_first() {
        let config = WordPressConfig::new("", "", "");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("WORDPRESS_URL"));
    }

    #[test]
    fn test_validate_requires_both_credentials() {
        let config = WordPressConfig::new("https://example.com", "admin", "");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("WORDPRESS_PASSWORD"));

        let config = WordPressConfig::new("https://example.com", "", "secret");
        assert!(config.validate().is_err());

        let config = WordPressConfig::new("https://example.com", "admin", "secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config = WordPressConfig::new("https://example.com/blog/", "a", "b");
        assert_eq!(config.url, "https://example.com/blog");
    }

    #[test]
    fn test_commerce_credentials_need_both_halves() {
        let base = WordPressConfig::new("https://example.com", "a", "b");
        assert!(base.commerce_credentials().is_none());

        let mut half = base.clone();
        half.wc_consumer_key = Some("ck".to_string());
        assert!(half.commerce_credentials().is_none());

        let mut empty_secret = base.clone().with_commerce_keys("ck", "");
        assert!(empty_secret.commerce_credentials().is_none());
        empty_secret.wc_consumer_secret = Some("cs".to_string());
        assert_eq!(empty_secret.commerce_credentials(), Some(("ck", "cs")));
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let config = WordPressConfig::new("https://example.com", "admin", "super_secret")
            .with_commerce_keys("ck_live", "cs_live");
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret"));
        assert!(!debug_str.contains("cs_live"));
        assert!(!debug_str.contains("ck_live"));
    }
}
