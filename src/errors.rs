//! Error types for the Zoho Analytics SDK

use serde::Deserialize;
use thiserror::Error;

/// Result type for Zoho Analytics operations
pub type Result<T> = std::result::Result<T, ZohoError>;

/// Errors produced by the Zoho Analytics SDK
#[derive(Error, Debug)]
pub enum ZohoError {
    /// Network or HTTP transport error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Structured error envelope returned by the Zoho Analytics API
    #[error("Uri: {uri}, Action: {action}, ErrorCode: {code}, ErrorMessage: {message}")]
    Api {
        /// Request URI echoed back by the server
        uri: String,
        /// `ZOHO_ACTION` the failed request carried
        action: String,
        /// Zoho error code
        code: i64,
        /// Human-readable message
        message: String,
    },

    /// The token endpoint rejected the refresh-token exchange
    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Request or response body could not be serialized/deserialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response that does not match the documented API contract
    #[error("unexpected response: {0}")]
    Response(String),
}

// Zoho error code for a rejected OAuth token.
const INVALID_OAUTH_TOKEN: i64 = 8535;

// Error envelope as returned with ZOHO_ERROR_FORMAT=JSON:
// {"response": {"uri": ..., "action": ..., "error": {"code": ..., "message": ...}}}

#[derive(Deserialize)]
struct ErrorEnvelope {
    response: ErrorEnvelopeResponse,
}

#[derive(Deserialize)]
struct ErrorEnvelopeResponse {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    action: String,
    error: ErrorEnvelopeBody,
}

#[derive(Deserialize)]
struct ErrorEnvelopeBody {
    code: i64,
    message: String,
}

impl ZohoError {
    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        ZohoError::Config(msg.into())
    }

    /// Create a new token refresh error
    pub fn token_error(msg: impl Into<String>) -> Self {
        ZohoError::TokenRefresh(msg.into())
    }

    /// Create a new unexpected-response error
    pub fn response_error(msg: impl Into<String>) -> Self {
        ZohoError::Response(msg.into())
    }

    /// Build an error from a non-success HTTP response body.
    ///
    /// Zoho reports failures through a JSON error envelope when
    /// `ZOHO_ERROR_FORMAT=JSON` is requested; any body that does not carry
    /// the envelope falls back to a generic response error.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => ZohoError::Api {
                uri: envelope.response.uri,
                action: envelope.response.action,
                code: envelope.response.error.code,
                message: envelope.response.error.message,
            },
            Err(_) => ZohoError::Response(format!("HTTP {}: {}", status, body)),
        }
    }

    /// Check if this error indicates a rejected or expired credential
    pub fn is_auth_error(&self) -> bool {
        match self {
            ZohoError::TokenRefresh(_) => true,
            ZohoError::Api { code, .. } => *code == INVALID_OAUTH_TOKEN,
            _ => false,
        }
    }
}
