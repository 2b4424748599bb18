//! Configuration management for the Zoho Analytics SDK

use crate::errors::{Result, ZohoError};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// Default Zoho accounts (identity provider) domain, EU data center
pub const DEFAULT_ACCOUNTS_DOMAIN: &str = "https://accounts.zoho.eu";

/// Default Zoho Analytics reports API domain, EU data center
pub const DEFAULT_ANALYTICS_DOMAIN: &str = "https://analyticsapi.zoho.eu";

/// Zoho Analytics SDK configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZohoConfig {
    /// OAuth2 client ID issued by the Zoho API console
    pub client_id: String,

    /// OAuth2 client secret issued by the Zoho API console
    pub client_secret: String,

    /// Long-lived refresh token exchanged for short-lived access tokens
    pub refresh_token: String,

    /// Accounts domain hosting the OAuth2 token endpoint.
    /// Zoho runs regional data centers, so this must match where the
    /// refresh token was issued (e.g. "https://accounts.zoho.com").
    pub accounts_domain: String,

    /// Analytics reports API domain, same data center as the account
    pub analytics_domain: String,

    /// Additional configuration options
    pub options: ZohoOptions,
}

/// Additional configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZohoOptions {
    /// HTTP request timeout in seconds (default: 30)
    pub timeout_seconds: u64,

    /// Enable debug logging of outbound requests (default: false)
    pub debug_logging: bool,
}

impl Default for ZohoOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            debug_logging: false,
        }
    }
}

impl ZohoConfig {
    /// Create a new configuration with the default (EU) domains
    ///
    /// # Example
    ///
    /// ```rust
    /// use zoho_analytics_sdk::ZohoConfig;
    ///
    /// let config = ZohoConfig::new("client_id", "client_secret", "refresh_token");
    /// ```
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
            accounts_domain: DEFAULT_ACCOUNTS_DOMAIN.to_string(),
            analytics_domain: DEFAULT_ANALYTICS_DOMAIN.to_string(),
            options: ZohoOptions::default(),
        }
    }

    /// Set the accounts domain hosting the token endpoint
    pub fn with_accounts_domain(mut self, domain: impl Into<String>) -> Self {
        self.accounts_domain = domain.into();
        self
    }

    /// Set the analytics reports API domain
    pub fn with_analytics_domain(mut self, domain: impl Into<String>) -> Self {
        self.analytics_domain = domain.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.options.timeout_seconds = timeout_seconds;
        self
    }

    /// Enable debug logging of outbound requests
    pub fn with_debug_logging(mut self, debug: bool) -> Self {
        self.options.debug_logging = debug;
        self
    }

    /// Set custom options
    pub fn with_options(mut self, options: ZohoOptions) -> Self {
        self.options = options;
        self
    }

    /// Load configuration from environment variables
    ///
    /// Required environment variables:
    /// - `ZOHO_CLIENT_ID`: OAuth2 client ID
    /// - `ZOHO_CLIENT_SECRET`: OAuth2 client secret
    /// - `ZOHO_REFRESH_TOKEN`: OAuth2 refresh token
    ///
    /// Optional environment variables:
    /// - `ZOHO_ACCOUNTS_DOMAIN`: token endpoint domain (default: EU)
    /// - `ZOHO_ANALYTICS_DOMAIN`: reports API domain (default: EU)
    /// - `ZOHO_TIMEOUT_SECONDS`: request timeout (default: 30)
    /// - `ZOHO_DEBUG_LOGGING`: enable debug logging (default: false)
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let client_id = env::var("ZOHO_CLIENT_ID").map_err(|_| {
            ZohoError::config_error("ZOHO_CLIENT_ID environment variable is required")
        })?;

        let client_secret = env::var("ZOHO_CLIENT_SECRET").map_err(|_| {
            ZohoError::config_error("ZOHO_CLIENT_SECRET environment variable is required")
        })?;

        let refresh_token = env::var("ZOHO_REFRESH_TOKEN").map_err(|_| {
            ZohoError::config_error("ZOHO_REFRESH_TOKEN environment variable is required")
        })?;

        let accounts_domain = env::var("ZOHO_ACCOUNTS_DOMAIN")
            .unwrap_or_else(|_| DEFAULT_ACCOUNTS_DOMAIN.to_string());

        let analytics_domain = env::var("ZOHO_ANALYTICS_DOMAIN")
            .unwrap_or_else(|_| DEFAULT_ANALYTICS_DOMAIN.to_string());

        let timeout_seconds = env::var("ZOHO_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let debug_logging = env::var("ZOHO_DEBUG_LOGGING")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        Ok(Self {
            client_id,
            client_secret,
            refresh_token,
            accounts_domain,
            analytics_domain,
            options: ZohoOptions {
                timeout_seconds,
                debug_logging,
            },
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() {
            return Err(ZohoError::config_error("client ID cannot be empty"));
        }

        if self.client_secret.is_empty() {
            return Err(ZohoError::config_error("client secret cannot be empty"));
        }

        if self.refresh_token.is_empty() {
            return Err(ZohoError::config_error("refresh token cannot be empty"));
        }

        for (name, domain) in [
            ("accounts domain", &self.accounts_domain),
            ("analytics domain", &self.analytics_domain),
        ] {
            let url = Url::parse(domain).map_err(|_| {
                ZohoError::config_error(format!("invalid {} URL: {}", name, domain))
            })?;

            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ZohoError::config_error(format!(
                    "{} must use HTTP or HTTPS",
                    name
                )));
            }
        }

        if self.options.timeout_seconds == 0 {
            return Err(ZohoError::config_error("timeout must be greater than 0"));
        }

        if self.options.timeout_seconds > 300 {
            return Err(ZohoError::config_error("timeout too long (max 300 seconds)"));
        }

        Ok(())
    }

    /// Get the OAuth2 token endpoint URL
    pub fn token_url(&self) -> String {
        format!("{}/oauth/v2/token", self.accounts_domain.trim_end_matches('/'))
    }

    /// Get the full URL for a table in a Zoho Analytics workspace
    ///
    /// The path must not be percent-escaped; slashes inside workspace or
    /// table names use Zoho's own `(/)` / `(//)` escaping instead.
    pub fn table_url(&self, email_id: &str, workspace: &str, table: &str) -> String {
        format!(
            "{}/api/{}/{}/{}",
            self.analytics_domain.trim_end_matches('/'),
            email_id,
            escape_path_segment(workspace),
            escape_path_segment(table)
        )
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.options.debug_logging
    }
}

// Zoho's escaping for special characters in workspace and table names.
fn escape_path_segment(value: &str) -> String {
    value.replace('/', "(/)").replace('\\', "(//)")
}

/// Builder for Zoho Analytics configuration
pub struct ZohoConfigBuilder {
    config: ZohoConfig,
}

impl ZohoConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            config: ZohoConfig {
                client_id: String::new(),
                client_secret: String::new(),
                refresh_token: String::new(),
                accounts_domain: DEFAULT_ACCOUNTS_DOMAIN.to_string(),
                analytics_domain: DEFAULT_ANALYTICS_DOMAIN.to_string(),
                options: ZohoOptions::default(),
            },
        }
    }

    /// Set OAuth2 client ID
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.config.client_id = id.into();
        self
    }

    /// Set OAuth2 client secret
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.client_secret = secret.into();
        self
    }

    /// Set OAuth2 refresh token
    pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
        self.config.refresh_token = token.into();
        self
    }

    /// Set accounts domain
    pub fn accounts_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.accounts_domain = domain.into();
        self
    }

    /// Set analytics domain
    pub fn analytics_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.analytics_domain = domain.into();
        self
    }

    /// Set options
    pub fn options(mut self, options: ZohoOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ZohoConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ZohoConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
