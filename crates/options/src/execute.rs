//! Build, submit, negotiate, and price a spread in one call.
//!
//! Limit spreads go out as a single multi-leg order whose price is then
//! walked toward the market. Market spreads route each leg as its own
//! single-leg order and recover fills from recent order history, since no
//! negotiation applies.

use chrono::Utc;
use rust_decimal::Decimal;
use std::time::Duration;
use tastyleg_broker::error::Result;
use tastyleg_broker::gateway::OrderGateway;
use tastyleg_broker::types::{InstrumentType, NewOrder, OrderLeg, OrderType};

use crate::fills::{net_fill_price, net_market_fill};
use crate::negotiate::{walk_order, WalkConfig};
use crate::spread::{assemble_spread, build_leg, SpreadOrder};
use crate::symbology::OptionRight;

/// Pause between routing individual market legs.
const LEG_PAUSE: Duration = Duration::from_secs(2);

/// Wait before reading market fills back from order history.
const SETTLE_DELAY: Duration = Duration::from_secs(4);

/// How far back the market-fill history window opens.
const MARKET_LOOKBACK_SECS: i64 = 60;

/// Result of executing a spread end to end.
#[derive(Debug)]
pub struct SpreadExecution {
    /// Orders that ended up owning the position. One entry for a limit
    /// spread; one per routed leg for a market spread.
    pub order_ids: Vec<u64>,

    /// Amendment attempts issued while negotiating (zero for market spreads).
    pub attempts: u32,

    /// True if negotiation stopped on a fault.
    pub aborted: bool,

    /// Net fill across legs, per contract for limit spreads.
    pub net_fill: Decimal,
}

/// Assembles a spread, submits it, walks its price, and prices the fills.
///
/// For limit spreads the walk runs until fill-or-exhaustion and the terminal
/// order's net fill is computed; a walk fault is carried in the result, not
/// raised, because the order may still be live under its last good id. For
/// market spreads each present leg routes individually and the net comes
/// from recent history.
///
/// # Errors
/// Returns error if assembly or submission fails, or if the fill read fails.
pub async fn place_and_walk<G: OrderGateway + ?Sized>(
    gateway: &G,
    account: &str,
    spread: &SpreadOrder,
    walk: &WalkConfig,
) -> Result<SpreadExecution> {
    match spread.order_type {
        OrderType::Limit => {
            let order = assemble_spread(spread)?;
            let placed = gateway.create_order(account, &order).await?;
            tracing::info!(order_id = placed.id, status = ?placed.status, "spread order placed");

            let outcome = walk_order(gateway, account, placed.id, order, walk).await;
            let net_fill = net_fill_price(gateway, account, outcome.order_id).await?;

            Ok(SpreadExecution {
                order_ids: vec![outcome.order_id],
                attempts: outcome.attempts,
                aborted: outcome.aborted(),
                net_fill,
            })
        }
        OrderType::Market => execute_market_legs(gateway, account, spread).await,
    }
}

/// Routes each present leg as its own market order, then nets the fills
/// from order history.
async fn execute_market_legs<G: OrderGateway + ?Sized>(
    gateway: &G,
    account: &str,
    spread: &SpreadOrder,
) -> Result<SpreadExecution> {
    let since = Utc::now() - chrono::Duration::seconds(MARKET_LOOKBACK_SECS);
    let legs = market_legs(spread)?;

    for leg in &legs {
        let order = NewOrder::market(vec![leg.clone()]);
        match gateway.create_order(account, &order).await {
            Ok(placed) => {
                tracing::info!(order_id = placed.id, symbol = leg.symbol, "market leg routed");
            }
            Err(e) => {
                tracing::warn!(symbol = leg.symbol, error = %e, "market leg failed, continuing");
            }
        }
        tokio::time::sleep(LEG_PAUSE).await;
    }

    // Fills land asynchronously; give the store a moment before reading
    // history back.
    tokio::time::sleep(SETTLE_DELAY).await;

    let mut net = Decimal::ZERO;
    let mut order_ids = Vec::new();

    for leg in &legs {
        let summary = net_market_fill(gateway, account, &leg.symbol, since).await?;
        if leg.action.is_sell() {
            net += summary.net;
        } else {
            net -= summary.net;
        }
        order_ids.extend(summary.order_ids);
    }

    Ok(SpreadExecution {
        order_ids,
        attempts: 0,
        aborted: false,
        net_fill: net.round_dp(2),
    })
}

/// The present legs of a spread, buying legs first.
fn market_legs(spread: &SpreadOrder) -> Result<Vec<OrderLeg>> {
    let (near, wing) = spread.direction.leg_actions();

    let candidates = [
        (spread.short_call, OptionRight::Call, near),
        (spread.long_call, OptionRight::Call, wing),
        (spread.short_put, OptionRight::Put, near),
        (spread.long_put, OptionRight::Put, wing),
    ];

    let mut legs = Vec::new();
    for (strike, right, action) in candidates {
        if strike.is_zero() {
            continue;
        }
        legs.push(build_leg(
            action,
            &spread.underlying,
            right,
            strike,
            spread.expiry,
            spread.quantity,
            InstrumentType::EquityOption,
        )?);
    }

    // Buying legs route first.
    legs.sort_by_key(|leg| leg.action.is_sell());

    Ok(legs)
}
