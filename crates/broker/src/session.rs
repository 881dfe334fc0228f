//! Session credentials for the order API.
//!
//! The broker authenticates every request with a session token in the
//! `Authorization` header. Obtaining and refreshing that token is the job of
//! an external login collaborator; this module only carries the token and
//! keeps it out of logs.

use crate::error::{BrokerError, Result};
use secrecy::{ExposeSecret, SecretString};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for session credentials.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Environment variable name for the session token.
    pub token_env: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_env: "TASTY_SESSION_TOKEN".to_string(),
        }
    }
}

impl SessionConfig {
    /// Creates config for the certification (sandbox) environment.
    #[must_use]
    pub fn sandbox() -> Self {
        Self {
            token_env: "TASTY_SANDBOX_SESSION_TOKEN".to_string(),
        }
    }

    /// Sets a custom environment variable name.
    #[must_use]
    pub fn with_token_env(mut self, token_env: impl Into<String>) -> Self {
        self.token_env = token_env.into();
        self
    }
}

// =============================================================================
// Session
// =============================================================================

/// Session token holder.
///
/// The token is stored as a secret and never appears in `Debug` output.
pub struct Session {
    token: SecretString,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl Session {
    /// Creates a session from an already-obtained token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// Loads the session token from the configured environment variable.
    ///
    /// # Errors
    /// Returns `BrokerError::Authentication` if the variable is unset or empty.
    pub fn from_env(config: &SessionConfig) -> Result<Self> {
        let token = std::env::var(&config.token_env).map_err(|_| {
            BrokerError::Authentication(format!(
                "environment variable {} not set",
                config.token_env
            ))
        })?;

        if token.trim().is_empty() {
            return Err(BrokerError::Authentication(format!(
                "environment variable {} is empty",
                config.token_env
            )));
        }

        Ok(Self::new(token))
    }

    /// Returns the `Authorization` header value for a request.
    #[must_use]
    pub fn auth_header(&self) -> String {
        self.token.expose_secret().to_string()
    }
}
