//! Fill aggregation over terminal orders.
//!
//! Two reductions: a volume-weighted net price across one order's legs, and
//! a time-windowed sum over recent market-order fills for a symbol.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tastyleg_broker::error::{BrokerError, Result};
use tastyleg_broker::gateway::OrderGateway;
use tastyleg_broker::types::{OrderFilters, OrderStatus, OrderType};

/// Computes the net fill price of an order, normalized per contract.
///
/// Every fill on a selling leg adds `price × quantity`, every fill on a
/// buying leg subtracts it; the total is divided by the order's reported
/// size and rounded to two decimal places.
///
/// # Errors
/// Returns `BrokerError::EmptyFill` if the order has no legs or zero size,
/// and propagates any fault from reading the order.
pub async fn net_fill_price<G: OrderGateway + ?Sized>(
    gateway: &G,
    account: &str,
    order_id: u64,
) -> Result<Decimal> {
    let snapshot = gateway.read_order(account, order_id).await?;

    if snapshot.size == 0 || snapshot.legs.is_empty() {
        return Err(BrokerError::empty_fill(order_id));
    }

    let mut net = Decimal::ZERO;
    for leg in &snapshot.legs {
        for fill in &leg.fills {
            let value = fill.fill_price * Decimal::from(fill.quantity);
            if leg.action.is_buy() {
                net -= value;
            } else {
                net += value;
            }
        }
    }

    Ok((net / Decimal::from(snapshot.size)).round_dp(2))
}

/// Summed fill prices of recent market orders for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketFillSummary {
    /// Sum of first-leg fill prices, not weighted by quantity.
    pub net: Decimal,

    /// The orders that contributed fills.
    pub order_ids: Vec<u64>,
}

/// Sums fill prices of filled market orders for `symbol` received after
/// `since`.
///
/// Queries the order history filtered to filled market orders, then keeps
/// entries whose first leg matches `symbol` and whose receipt time is after
/// `since`. Fill prices are summed unweighted; this simpler aggregation
/// serves market legs, where no negotiation occurs.
///
/// # Errors
/// Propagates any fault from listing orders.
pub async fn net_market_fill<G: OrderGateway + ?Sized>(
    gateway: &G,
    account: &str,
    symbol: &str,
    since: DateTime<Utc>,
) -> Result<MarketFillSummary> {
    let filters = OrderFilters::new()
        .status(OrderStatus::Filled)
        .order_type(OrderType::Market)
        .start_at(since);

    let orders = gateway.list_orders(account, &filters).await?;

    let mut net = Decimal::ZERO;
    let mut order_ids = Vec::new();

    for order in orders {
        if order.order_type != OrderType::Market {
            continue;
        }
        let Some(received_at) = order.received_at else {
            continue;
        };
        if received_at <= since {
            continue;
        }
        if order.first_leg_symbol() != Some(symbol) {
            continue;
        }

        let Some(first_leg) = order.legs.first() else {
            continue;
        };
        if first_leg.fills.is_empty() {
            continue;
        }

        for fill in &first_leg.fills {
            net += fill.fill_price;
        }
        order_ids.push(order.id);
    }

    Ok(MarketFillSummary { net, order_ids })
}
