//! Brokerage order-management REST client.
//!
//! This crate provides:
//! - REST client with rate limiting for the account order endpoints
//! - Session-token authentication forwarded on every request
//! - Typed order payloads, snapshots, and fill events
//! - The [`OrderGateway`] trait seam consumed by the spread/negotiation layer
//!
//! # Example
//!
//! ```ignore
//! use tastyleg_broker::{BrokerClient, BrokerConfig};
//! use tastyleg_broker::types::{NewOrder, OrderFilters, OrderStatus};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BrokerClient::new(BrokerConfig::sandbox())?;
//!
//!     let filled = client
//!         .list_orders("5WT00001", &OrderFilters::new().status(OrderStatus::Filled))
//!         .await?;
//!     println!("{} filled orders", filled.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Authentication
//!
//! The broker authenticates with a session token supplied by an external
//! login collaborator. Set `TASTY_SESSION_TOKEN` (production) or
//! `TASTY_SANDBOX_SESSION_TOKEN` (certification environment).
//!
//! # API Endpoints
//!
//! - `POST /accounts/{account}/orders` - Submit order
//! - `POST /accounts/{account}/orders/dry-run` - Preflight without routing
//! - `GET /accounts/{account}/orders` - Paginated order history
//! - `GET /accounts/{account}/orders/live` - Live orders
//! - `GET /accounts/{account}/orders/{id}` - Get order with fills
//! - `PATCH /accounts/{account}/orders/{id}` - Edit order by replacement
//! - `PUT /accounts/{account}/orders/{id}` - Replace order
//! - `DELETE /accounts/{account}/orders/{id}` - Cancel order

pub mod client;
pub mod error;
pub mod gateway;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use client::{BrokerClient, BrokerConfig, PROD_URL, SANDBOX_URL};
pub use error::{BrokerError, Result};
pub use gateway::OrderGateway;
pub use session::{Session, SessionConfig};
pub use types::{
    Fill, InstrumentType, LegSnapshot, NewOrder, OrderAction, OrderFilters, OrderLeg,
    OrderSnapshot, OrderStatus, OrderType, PlacedOrder, PriceEffect, TimeInForce,
};
