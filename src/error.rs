//! Error types for storefront-kit
//!
//! Only the provider, configuration and CLI boundaries produce errors. The
//! resolver and formatter always return a definite value.

use thiserror::Error;

/// Error codes for storefront errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorefrontErrorCode {
    /// Request never reached the backend or the response could not be read
    Network,
    /// API key rejected (401/403)
    Unauthorized,
    /// Subscriber or resource does not exist (404)
    NotFound,
    /// Backend asked us to slow down (429)
    RateLimited,
    /// Backend failed (5xx)
    ServerError,
    /// Input was malformed
    ValidationError,
    /// Required configuration is missing or invalid
    ConfigError,
    /// The purchasing SDK answered without a customer record
    NoCustomerInfo,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for StorefrontErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Network => "NETWORK_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::RateLimited => "RATE_LIMITED",
            Self::ServerError => "SERVER_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::NoCustomerInfo => "NO_CUSTOMER_INFO",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Storefront error
#[derive(Error, Debug, Clone)]
#[error("{code}: {message}")]
pub struct StorefrontError {
    /// Error code
    pub code: StorefrontErrorCode,
    /// Human-readable message
    pub message: String,
    /// HTTP status, when the error came from the backend
    pub status: Option<u16>,
}

impl StorefrontError {
    pub fn new(code: StorefrontErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(code: StorefrontErrorCode, message: impl Into<String>, status: u16) -> Self {
        Self {
            code,
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(StorefrontErrorCode::Network, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StorefrontErrorCode::ValidationError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(StorefrontErrorCode::ConfigError, message)
    }

    pub fn no_customer_info() -> Self {
        Self::new(
            StorefrontErrorCode::NoCustomerInfo,
            "Purchasing SDK returned no customer info",
        )
    }

    /// Whether retrying later could succeed. Nothing in this crate retries;
    /// callers own that policy.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.code,
            StorefrontErrorCode::Network
                | StorefrontErrorCode::RateLimited
                | StorefrontErrorCode::ServerError
        )
    }
}

impl From<serde_json::Error> for StorefrontError {
    fn from(e: serde_json::Error) -> Self {
        Self::validation(format!("Invalid JSON: {}", e))
    }
}

impl From<std::io::Error> for StorefrontError {
    fn from(e: std::io::Error) -> Self {
        Self::new(StorefrontErrorCode::Unknown, e.to_string())
    }
}

/// Map an HTTP status from the purchasing backend to an error code.
pub fn map_status_to_error_code(status: u16) -> StorefrontErrorCode {
    match status {
        401 | 403 => StorefrontErrorCode::Unauthorized,
        404 => StorefrontErrorCode::NotFound,
        429 => StorefrontErrorCode::RateLimited,
        500..=599 => StorefrontErrorCode::ServerError,
        400..=499 => StorefrontErrorCode::ValidationError,
        _ => StorefrontErrorCode::Unknown,
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
