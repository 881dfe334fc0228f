//! Data models for the brokerage order API.
//!
//! All money uses `rust_decimal::Decimal`. Prices cross the wire as decimal
//! strings and field names are kebab-case, matching the API's JSON shape.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BrokerError, Result};

// =============================================================================
// Order Vocabulary
// =============================================================================

/// Side and position intent of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderAction {
    /// Open a long position.
    #[serde(rename = "Buy to Open")]
    BuyToOpen,
    /// Open a short position.
    #[serde(rename = "Sell to Open")]
    SellToOpen,
    /// Close a short position.
    #[serde(rename = "Buy to Close")]
    BuyToClose,
    /// Close a long position.
    #[serde(rename = "Sell to Close")]
    SellToClose,
}

impl OrderAction {
    /// Returns true for the buying actions.
    #[must_use]
    pub fn is_buy(self) -> bool {
        matches!(self, Self::BuyToOpen | Self::BuyToClose)
    }

    /// Returns true for the selling actions.
    #[must_use]
    pub fn is_sell(self) -> bool {
        !self.is_buy()
    }

    /// Returns the API string representation.
    #[must_use]
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::BuyToOpen => "Buy to Open",
            Self::SellToOpen => "Sell to Open",
            Self::BuyToClose => "Buy to Close",
            Self::SellToClose => "Sell to Close",
        }
    }
}

/// Instrument type of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentType {
    /// Listed equity option.
    #[serde(rename = "Equity Option")]
    EquityOption,
    /// Common stock.
    #[serde(rename = "Equity")]
    Equity,
    /// Option on a future.
    #[serde(rename = "Future Option")]
    FutureOption,
}

/// Time-in-force of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good for the trading day.
    Day,
    /// Good till cancelled.
    #[serde(rename = "GTC")]
    Gtc,
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Fill at the limit price or better.
    Limit,
    /// Fill at best available.
    Market,
}

/// Whether the order's net premium is received or paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceEffect {
    /// Premium received.
    Credit,
    /// Premium paid.
    Debit,
}

impl PriceEffect {
    /// Returns the opposite effect.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Credit => Self::Debit,
            Self::Debit => Self::Credit,
        }
    }
}

// =============================================================================
// Order Payload
// =============================================================================

/// One instrument + side + quantity component of an order.
///
/// Immutable once built; amendments replace the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OrderLeg {
    /// Side and position intent.
    pub action: OrderAction,

    /// Instrument symbol (OCC-encoded for options).
    pub symbol: String,

    /// Number of contracts.
    pub quantity: u32,

    /// Instrument type.
    pub instrument_type: InstrumentType,
}

/// An order payload as submitted to the store.
///
/// Invariant: `price` and `price_effect` are present exactly when
/// `order_type` is `Limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NewOrder {
    /// Time-in-force.
    pub time_in_force: TimeInForce,

    /// Order type.
    pub order_type: OrderType,

    /// Limit price, as a decimal string on the wire.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::str_option"
    )]
    pub price: Option<Decimal>,

    /// Price effect for limit orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_effect: Option<PriceEffect>,

    /// Ordered legs.
    pub legs: Vec<OrderLeg>,
}

impl NewOrder {
    /// Creates a day limit order.
    pub fn limit(price: Decimal, price_effect: PriceEffect, legs: Vec<OrderLeg>) -> Self {
        Self {
            time_in_force: TimeInForce::Day,
            order_type: OrderType::Limit,
            price: Some(price),
            price_effect: Some(price_effect),
            legs,
        }
    }

    /// Creates a day market order (no price or price effect).
    pub fn market(legs: Vec<OrderLeg>) -> Self {
        Self {
            time_in_force: TimeInForce::Day,
            order_type: OrderType::Market,
            price: None,
            price_effect: None,
            legs,
        }
    }

    /// Sets the time-in-force.
    #[must_use]
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Returns a copy of this payload with a new limit price.
    #[must_use]
    pub fn with_price(&self, price: Decimal) -> Self {
        let mut next = self.clone();
        next.price = Some(price);
        next
    }

    /// Returns a copy of this payload with a new price effect.
    #[must_use]
    pub fn with_price_effect(&self, effect: PriceEffect) -> Self {
        let mut next = self.clone();
        next.price_effect = Some(effect);
        next
    }

    /// Checks the price/price-effect/order-type invariant.
    ///
    /// # Errors
    /// Returns `BrokerError::InvalidOrder` on violation or empty legs.
    pub fn validate(&self) -> Result<()> {
        if self.legs.is_empty() {
            return Err(BrokerError::InvalidOrder(
                "order must have at least one leg".to_string(),
            ));
        }

        match self.order_type {
            OrderType::Limit => {
                if self.price.is_none() || self.price_effect.is_none() {
                    return Err(BrokerError::InvalidOrder(
                        "limit order requires price and price-effect".to_string(),
                    ));
                }
            }
            OrderType::Market => {
                if self.price.is_some() || self.price_effect.is_some() {
                    return Err(BrokerError::InvalidOrder(
                        "market order must not carry price or price-effect".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

// =============================================================================
// Order Snapshots
// =============================================================================

/// Status of an order as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted by the broker, not yet routed.
    Received,
    /// Routed to the exchange.
    Routed,
    /// Working on the exchange book.
    Live,
    /// Fully filled.
    Filled,
    /// Cancelled.
    Cancelled,
    /// Rejected.
    Rejected,
    /// Expired unfilled.
    Expired,
    /// A status this client does not recognize.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Returns true if the order can no longer change.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Cancelled | Self::Rejected | Self::Expired
        )
    }
}

/// A recorded execution against one leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Fill {
    /// Execution price, as a decimal string on the wire.
    #[serde(with = "rust_decimal::serde::str")]
    pub fill_price: Decimal,

    /// Executed quantity.
    pub quantity: u32,
}

/// A leg within an order snapshot, with its fill events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LegSnapshot {
    /// Side and position intent.
    pub action: OrderAction,

    /// Instrument symbol.
    pub symbol: String,

    /// Fill events recorded against this leg.
    #[serde(default)]
    pub fills: Vec<Fill>,
}

/// The store's canonical view of an order.
///
/// This is the only authority for an order's id, price, and status; an edit
/// is cancel-and-replace and may change the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OrderSnapshot {
    /// Store-assigned order id.
    pub id: u64,

    /// Current status.
    pub status: OrderStatus,

    /// Order type.
    pub order_type: OrderType,

    /// Current limit price, if any.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::str_option"
    )]
    pub price: Option<Decimal>,

    /// Current price effect, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_effect: Option<PriceEffect>,

    /// Total order size in contracts.
    #[serde(default)]
    pub size: u32,

    /// When the store received the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,

    /// Legs with their fill events.
    #[serde(default)]
    pub legs: Vec<LegSnapshot>,
}

impl OrderSnapshot {
    /// Returns the symbol of the first leg, if any.
    #[must_use]
    pub fn first_leg_symbol(&self) -> Option<&str> {
        self.legs.first().map(|l| l.symbol.as_str())
    }
}

/// Result of order creation: the assigned id and the store's raw status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    /// Store-assigned order id.
    pub id: u64,

    /// Status as reported by the store, uninterpreted.
    pub status: OrderStatus,
}

impl From<&OrderSnapshot> for PlacedOrder {
    fn from(snapshot: &OrderSnapshot) -> Self {
        Self {
            id: snapshot.id,
            status: snapshot.status,
        }
    }
}

// =============================================================================
// History Filters
// =============================================================================

/// Filters for the paginated order-history endpoint.
#[derive(Debug, Clone, Default)]
pub struct OrderFilters {
    /// Filter by order status.
    pub status: Option<OrderStatus>,

    /// Filter by order type.
    pub order_type: Option<OrderType>,

    /// Filter by underlying symbol.
    pub underlying_symbol: Option<String>,

    /// Only orders received at or after this time.
    pub start_at: Option<DateTime<Utc>>,

    /// Page size (store default applies when unset).
    pub per_page: Option<u32>,

    /// Page offset.
    pub page_offset: Option<u32>,
}

impl OrderFilters {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters to a status.
    #[must_use]
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filters to an order type.
    #[must_use]
    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    /// Filters to an underlying symbol.
    #[must_use]
    pub fn underlying_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.underlying_symbol = Some(symbol.into());
        self
    }

    /// Keeps orders received at or after `start_at`.
    #[must_use]
    pub fn start_at(mut self, start_at: DateTime<Utc>) -> Self {
        self.start_at = Some(start_at);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Sets the page offset.
    #[must_use]
    pub fn page_offset(mut self, page_offset: u32) -> Self {
        self.page_offset = Some(page_offset);
        self
    }

    /// Maps the filters onto the API's query-parameter names.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();

        if let Some(status) = self.status {
            query.push(("status[]", format!("{status:?}")));
        }
        if let Some(order_type) = self.order_type {
            query.push(("order-type", format!("{order_type:?}")));
        }
        if let Some(symbol) = &self.underlying_symbol {
            query.push(("underlying-symbol", symbol.clone()));
        }
        if let Some(start_at) = self.start_at {
            query.push(("start-at", start_at.to_rfc3339()));
        }
        if let Some(per_page) = self.per_page {
            query.push(("per-page", per_page.to_string()));
        }
        if let Some(page_offset) = self.page_offset {
            query.push(("page-offset", page_offset.to_string()));
        }

        query
    }
}
