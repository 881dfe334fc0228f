//! Order API REST client with rate limiting.
//!
//! Provides typed access to the brokerage's account order endpoints with
//! client-side rate limiting via the governor crate.
//!
//! # Example
//!
//! ```ignore
//! use tastyleg_broker::{BrokerClient, BrokerConfig};
//! use tastyleg_broker::types::OrderFilters;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BrokerClient::new(BrokerConfig::sandbox())?;
//!
//!     let orders = client.live_orders("5WT00001").await?;
//!     println!("{} live orders", orders.len());
//!
//!     Ok(())
//! }
//! ```

use crate::error::{BrokerError, Result};
use crate::session::{Session, SessionConfig};
use crate::types::{NewOrder, OrderFilters, OrderSnapshot, PlacedOrder};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;

// =============================================================================
// Constants
// =============================================================================

/// Production API base URL.
pub const PROD_URL: &str = "https://api.tastytrade.com";

/// Certification (sandbox) API base URL.
pub const SANDBOX_URL: &str = "https://api.cert.tastyworks.com";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the broker client.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Session credential configuration.
    pub session_config: SessionConfig,

    /// Requests per minute limit.
    pub requests_per_minute: NonZeroU32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            base_url: PROD_URL.to_string(),
            session_config: SessionConfig::default(),
            requests_per_minute: nonzero!(120u32),
            timeout_secs: 30,
        }
    }
}

impl BrokerConfig {
    /// Creates a configuration for production.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Creates a configuration for the certification environment.
    #[must_use]
    pub fn sandbox() -> Self {
        Self {
            base_url: SANDBOX_URL.to_string(),
            session_config: SessionConfig::sandbox(),
            ..Default::default()
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// =============================================================================
// Response Envelopes
// =============================================================================

/// Every API response wraps its payload in a `data` object.
#[derive(Debug, serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Order-creation responses nest the order one level deeper.
#[derive(Debug, serde::Deserialize)]
struct CreatedOrder {
    order: OrderSnapshot,
}

/// Paginated order listings.
#[derive(Debug, serde::Deserialize)]
struct OrderPage {
    items: Vec<OrderSnapshot>,
}

// =============================================================================
// BrokerClient
// =============================================================================

/// REST client for the account order endpoints.
///
/// All requests are rate-limited and carry the session token.
pub struct BrokerClient {
    /// Configuration.
    config: BrokerConfig,

    /// HTTP client.
    http: Client,

    /// Rate limiter.
    rate_limiter: Arc<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,

    /// Session credentials.
    session: Session,
}

impl std::fmt::Debug for BrokerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerClient")
            .field("base_url", &self.config.base_url)
            .field("requests_per_minute", &self.config.requests_per_minute)
            .finish_non_exhaustive()
    }
}

impl BrokerClient {
    /// Creates a new client, loading the session token from the environment.
    ///
    /// # Errors
    /// Returns error if the session token is missing or the HTTP client
    /// cannot be built.
    pub fn new(config: BrokerConfig) -> Result<Self> {
        let session = Session::from_env(&config.session_config)?;
        Self::with_session(config, session)
    }

    /// Creates a new client with an explicit session.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn with_session(config: BrokerConfig, session: Session) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BrokerError::Network(format!("failed to build HTTP client: {e}")))?;

        let quota = Quota::per_minute(config.requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            config,
            http,
            rate_limiter,
            session,
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Validates an account number before it is interpolated into a path.
    ///
    /// Account numbers are short alphanumeric identifiers; anything else is
    /// rejected to keep path construction safe.
    fn validate_account(account: &str) -> Result<&str> {
        if account.is_empty() {
            return Err(BrokerError::InvalidOrder(
                "account number cannot be empty".to_string(),
            ));
        }

        if !account
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(BrokerError::InvalidOrder(format!(
                "invalid account number: {account}"
            )));
        }

        if account.len() > 32 {
            return Err(BrokerError::InvalidOrder(format!(
                "account number exceeds maximum length of 32: {}",
                account.len()
            )));
        }

        Ok(account)
    }

    /// Waits for the rate limiter and makes an authenticated GET request.
    async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(operation, %url, "GET");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .header("Authorization", self.session.auth_header())
            .query(query)
            .send()
            .await?;

        self.handle_response(operation, response).await
    }

    /// Waits for the rate limiter and sends an authenticated request with a
    /// JSON body (POST, PUT, or PATCH).
    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: reqwest::Method,
        path: &str,
        body: &NewOrder,
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(operation, %url, method = %method, "sending order payload");

        let response = self
            .http
            .request(method, &url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("Authorization", self.session.auth_header())
            .json(body)
            .send()
            .await?;

        self.handle_response(operation, response).await
    }

    /// Waits for the rate limiter and makes an authenticated DELETE request.
    async fn delete<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(operation, %url, "DELETE");

        let response = self
            .http
            .delete(&url)
            .header("Accept", "application/json")
            .header("Authorization", self.session.auth_header())
            .send()
            .await?;

        self.handle_response(operation, response).await
    }

    /// Handles an API response, converting errors appropriately.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(BrokerError::rate_limit(retry_after));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BrokerError::api(operation, status.as_u16(), text));
        }

        let body = response.json::<T>().await?;
        Ok(body)
    }

    // =========================================================================
    // Order Endpoints
    // =========================================================================

    /// Submits a new order.
    ///
    /// Returns the store-assigned id and raw status without interpretation.
    ///
    /// # Errors
    /// Returns error if the payload is invalid or the API call fails.
    pub async fn create_order(&self, account: &str, order: &NewOrder) -> Result<PlacedOrder> {
        order.validate()?;
        let account = Self::validate_account(account)?;
        let path = format!("/accounts/{account}/orders");

        let response: Envelope<CreatedOrder> = self
            .send_json("create order", reqwest::Method::POST, &path, order)
            .await?;

        Ok(PlacedOrder::from(&response.data.order))
    }

    /// Edits a live order's price and execution properties by replacement.
    ///
    /// The store implements this as cancel-and-replace; the returned snapshot
    /// is authoritative for the order's new id, price, and status.
    ///
    /// # Errors
    /// Returns error if the payload is invalid or the API call fails.
    pub async fn amend_order(
        &self,
        account: &str,
        order_id: u64,
        order: &NewOrder,
    ) -> Result<OrderSnapshot> {
        order.validate()?;
        let account = Self::validate_account(account)?;
        let path = format!("/accounts/{account}/orders/{order_id}");

        let response: Envelope<OrderSnapshot> = self
            .send_json("amend order", reqwest::Method::PATCH, &path, order)
            .await?;

        Ok(response.data)
    }

    /// Replaces a live order with a new one.
    ///
    /// Like [`Self::amend_order`] but the full-replacement (PUT) variant.
    ///
    /// # Errors
    /// Returns error if the payload is invalid or the API call fails.
    pub async fn replace_order(
        &self,
        account: &str,
        order_id: u64,
        order: &NewOrder,
    ) -> Result<OrderSnapshot> {
        order.validate()?;
        let account = Self::validate_account(account)?;
        let path = format!("/accounts/{account}/orders/{order_id}");

        let response: Envelope<OrderSnapshot> = self
            .send_json("replace order", reqwest::Method::PUT, &path, order)
            .await?;

        Ok(response.data)
    }

    /// Fetches a single order, including legs and their fill events.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn read_order(&self, account: &str, order_id: u64) -> Result<OrderSnapshot> {
        let account = Self::validate_account(account)?;
        let path = format!("/accounts/{account}/orders/{order_id}");

        let response: Envelope<OrderSnapshot> = self.get("read order", &path, &[]).await?;
        Ok(response.data)
    }

    /// Requests cancellation of a live order.
    ///
    /// # Errors
    /// Returns error if the order cannot be cancelled.
    pub async fn cancel_order(&self, account: &str, order_id: u64) -> Result<OrderSnapshot> {
        let account = Self::validate_account(account)?;
        let path = format!("/accounts/{account}/orders/{order_id}");

        let response: Envelope<OrderSnapshot> = self.delete("cancel order", &path).await?;
        Ok(response.data)
    }

    /// Runs order preflights without routing.
    ///
    /// The response shape varies by account and order, so it is surfaced as
    /// raw JSON.
    ///
    /// # Errors
    /// Returns error if the payload is invalid or the API call fails.
    pub async fn dry_run_order(
        &self,
        account: &str,
        order: &NewOrder,
    ) -> Result<serde_json::Value> {
        order.validate()?;
        let account = Self::validate_account(account)?;
        let path = format!("/accounts/{account}/orders/dry-run");

        self.send_json("dry-run order", reqwest::Method::POST, &path, order)
            .await
    }

    /// Fetches a page of the account's order history.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn list_orders(
        &self,
        account: &str,
        filters: &OrderFilters,
    ) -> Result<Vec<OrderSnapshot>> {
        let account = Self::validate_account(account)?;
        let path = format!("/accounts/{account}/orders");

        let response: Envelope<OrderPage> =
            self.get("list orders", &path, &filters.to_query()).await?;
        Ok(response.data.items)
    }

    /// Fetches the account's live (working) orders.
    ///
    /// # Errors
    /// Returns error if the API call fails.
    pub async fn live_orders(&self, account: &str) -> Result<Vec<OrderSnapshot>> {
        let account = Self::validate_account(account)?;
        let path = format!("/accounts/{account}/orders/live");

        let response: Envelope<OrderPage> = self.get("live orders", &path, &[]).await?;
        Ok(response.data.items)
    }
}
