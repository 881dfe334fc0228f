//! Options spread construction, limit-price negotiation, and fill pricing.
//!
//! This crate turns a four-strike spread description into a broker-shaped
//! multi-leg order, walks a live limit order's price toward the market on a
//! fixed cadence, and reduces an order's fill events to a single net price.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use rust_decimal_macros::dec;
//! use tastyleg_broker::{BrokerClient, BrokerConfig};
//! use tastyleg_broker::types::OrderType;
//! use tastyleg_options::{place_and_walk, SpreadOrder, TradeDirection, WalkConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BrokerClient::new(BrokerConfig::sandbox())?;
//!
//!     let spread = SpreadOrder {
//!         underlying: "SPXW".to_string(),
//!         expiry: chrono::NaiveDate::from_ymd_opt(2024, 8, 16).unwrap(),
//!         quantity: 1,
//!         short_call: dec!(5500),
//!         long_call: dec!(5520),
//!         short_put: dec!(5400),
//!         long_put: dec!(5380),
//!         direction: TradeDirection::Credit,
//!         order_type: OrderType::Limit,
//!         price: dec!(2.50),
//!     };
//!
//!     let walk = WalkConfig {
//!         interval: Duration::from_secs(15),
//!         price_step: dec!(0.05),
//!         max_attempts: 10,
//!     };
//!
//!     let execution = place_and_walk(&client, "5WT00001", &spread, &walk).await?;
//!     println!("filled at net {}", execution.net_fill);
//!
//!     Ok(())
//! }
//! ```

pub mod execute;
pub mod fills;
pub mod negotiate;
pub mod spread;
pub mod symbology;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export main types for convenience
pub use execute::{place_and_walk, SpreadExecution};
pub use fills::{net_fill_price, net_market_fill, MarketFillSummary};
pub use negotiate::{walk_order, WalkConfig, WalkOutcome};
pub use spread::{assemble_spread, build_leg, SpreadOrder, SpreadShape, TradeDirection};
pub use symbology::{option_symbol, OptionRight};
