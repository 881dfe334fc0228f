//! Error types for the brokerage order API.
//!
//! Provides typed errors for authentication, API communication, validation,
//! and fill-aggregation failures.

use thiserror::Error;

/// Errors that can occur when talking to the order store.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Authentication failed or credentials are missing.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// API request returned a non-success status.
    #[error("API error during {operation}: {status_code} - {message}")]
    Api {
        /// The operation that failed (e.g. "amend order").
        operation: String,
        /// HTTP status code.
        status_code: u16,
        /// Error message or body from the API.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit {
        /// Seconds to wait before retry.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Invalid order parameters or identifiers.
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Order not found in the store's response.
    #[error("order not found: {order_id}")]
    OrderNotFound {
        /// The order ID that was not found.
        order_id: u64,
    },

    /// Fill aggregation over an order with no size or no legs.
    #[error("order {order_id} has no fills to aggregate")]
    EmptyFill {
        /// The order whose fills were requested.
        order_id: u64,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl BrokerError {
    /// Creates an API error from an operation name, status code, and message.
    pub fn api(operation: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Creates a rate limit error.
    pub fn rate_limit(retry_after_secs: u64) -> Self {
        Self::RateLimit { retry_after_secs }
    }

    /// Creates an order not found error.
    pub fn order_not_found(order_id: u64) -> Self {
        Self::OrderNotFound { order_id }
    }

    /// Creates an empty fill error.
    pub fn empty_fill(order_id: u64) -> Self {
        Self::EmptyFill { order_id }
    }

    /// Returns true if the error indicates the request could be retried later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimit { .. } => true,
            Self::Api { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }

    /// Returns the suggested retry delay in seconds, if applicable.
    #[must_use]
    pub fn retry_delay_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after_secs } => Some(*retry_after_secs),
            Self::Network(_) | Self::Timeout(_) => Some(1),
            Self::Api { status_code, .. } if *status_code >= 500 => Some(2),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BrokerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BrokerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for broker operations.
pub type Result<T> = std::result::Result<T, BrokerError>;
