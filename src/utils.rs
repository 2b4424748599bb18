//! Utility functions for the Zoho Analytics SDK

use crate::{config::ZohoConfig, errors::Result};
use reqwest::Client;

/// HTTP client creation with common configuration
pub fn create_http_client(config: &ZohoConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(
            config.options.timeout_seconds,
        ))
        .user_agent(format!("Zoho-Analytics-Rust-SDK/{}", crate::VERSION))
        .build()?;
    Ok(client)
}

/// Mask sensitive data for logging
pub fn mask_sensitive_data(data: &str, show_chars: usize) -> String {
    if data.len() <= show_chars * 2 {
        "*".repeat(data.len())
    } else {
        let start = &data[..show_chars];
        let end = &data[data.len() - show_chars..];
        format!("{}***{}", start, end)
    }
}

/// Log an outbound API request when debug logging is enabled
pub fn log_api_request(config: &ZohoConfig, action: &str, url: &str) {
    if config.is_debug_enabled() {
        log::debug!("Zoho API request: action={} url={}", action, url);
    }
}
