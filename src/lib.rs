//! # Zoho Analytics SDK for Rust
//!
//! An unofficial Rust SDK for the Zoho Analytics HTTP API.
//!
//! The SDK authenticates through OAuth2 refresh-token exchange, keeps the
//! short-lived access token cached between calls, and exposes the reports
//! API's row-append and CSV bulk-import operations with typed responses and
//! errors.
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use zoho_analytics_sdk::{ZohoClient, ZohoConfig};
//!
//! # async fn run() -> zoho_analytics_sdk::Result<()> {
//! let config = ZohoConfig::new("client_id", "client_secret", "refresh_token");
//! let client = ZohoClient::new(config)?;
//!
//! let table_url = client.table_url("user@example.com", "Sales", "Orders");
//! let row = HashMap::from([("Name".to_string(), "Widget".to_string())]);
//! let response = client.add_row(&table_url, &row).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod utils;

pub use auth::{AccessToken, TokenCache};
pub use client::{AddRowResponse, ApiResponse, ResponseResult, ZohoClient};
pub use config::{ZohoConfig, ZohoConfigBuilder, ZohoOptions};
pub use errors::{Result, ZohoError};
pub use utils::create_http_client;

// Version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
