//! Limit-price negotiation ("walking") for a live order.
//!
//! On a fixed cadence the loop amends the order's limit price one step
//! toward the market: credit orders offer less, debit orders bid more. The
//! store implements an edit as cancel-and-replace, so after every successful
//! amendment the loop re-anchors its id, price, and price effect to the
//! snapshot the store returned. The first fault ends the loop; exhausting
//! the attempt budget is normal termination.
//!
//! One loop owns one order for its lifetime. Running two loops against the
//! same order races on which id is current and corrupts both.

use rust_decimal::Decimal;
use std::time::Duration;
use tastyleg_broker::error::BrokerError;
use tastyleg_broker::gateway::OrderGateway;
use tastyleg_broker::types::{NewOrder, OrderSnapshot, PriceEffect};

// =============================================================================
// Configuration
// =============================================================================

/// Pacing and budget for a negotiation run.
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Pause before each amendment attempt.
    pub interval: Duration,

    /// Absolute price shift per attempt.
    pub price_step: Decimal,

    /// Number of amendment attempts. Zero is a no-op.
    pub max_attempts: u32,
}

// =============================================================================
// Outcome
// =============================================================================

/// How a negotiation run ended.
///
/// `fault` is `None` when the attempt budget was consumed normally, and
/// carries the amendment error when the run aborted early. Either way,
/// `order_id` is the last id the store confirmed.
#[derive(Debug)]
pub struct WalkOutcome {
    /// The final known order id.
    pub order_id: u64,

    /// Amendment attempts issued, including a faulted one.
    pub attempts: u32,

    /// The fault that stopped the run, if any.
    pub fault: Option<BrokerError>,
}

impl WalkOutcome {
    /// Returns true if the run stopped on a fault rather than exhaustion.
    #[must_use]
    pub fn aborted(&self) -> bool {
        self.fault.is_some()
    }
}

// =============================================================================
// Loop State
// =============================================================================

/// The loop's view of the order, replaced wholesale each tick.
struct WalkState {
    order_id: u64,
    price: Decimal,
    effect: PriceEffect,
    payload: NewOrder,
}

impl WalkState {
    /// Re-anchors to the store's snapshot after a successful amendment.
    ///
    /// Price, price effect, and id all come from the snapshot; the locally
    /// computed price is only a fallback if the store omitted one.
    fn anchor(self, sent: NewOrder, snapshot: &OrderSnapshot, requested: Decimal) -> Self {
        let price = snapshot.price.unwrap_or(requested);
        let effect = snapshot.price_effect.unwrap_or(self.effect);

        Self {
            order_id: snapshot.id,
            price,
            effect,
            payload: sent.with_price(price).with_price_effect(effect),
        }
    }
}

// =============================================================================
// Negotiation
// =============================================================================

/// Walks a live limit order's price toward the market.
///
/// Each tick sleeps for `config.interval`, computes the next price (credit:
/// current minus step; debit: current plus step), submits the full payload
/// with the updated price, and adopts the store's returned state. Stops
/// after `config.max_attempts` attempts or on the first fault, whichever
/// comes first, and never raises: faults are carried in the outcome.
pub async fn walk_order<G: OrderGateway + ?Sized>(
    gateway: &G,
    account: &str,
    order_id: u64,
    payload: NewOrder,
    config: &WalkConfig,
) -> WalkOutcome {
    let (Some(price), Some(effect)) = (payload.price, payload.price_effect) else {
        return WalkOutcome {
            order_id,
            attempts: 0,
            fault: Some(BrokerError::InvalidOrder(
                "negotiation requires a limit payload with price and price-effect".to_string(),
            )),
        };
    };

    let mut state = WalkState {
        order_id,
        price,
        effect,
        payload,
    };

    for attempt in 1..=config.max_attempts {
        tokio::time::sleep(config.interval).await;

        let next_price = match state.effect {
            PriceEffect::Credit => state.price - config.price_step,
            PriceEffect::Debit => state.price + config.price_step,
        };
        let amended = state.payload.with_price(next_price);

        match gateway.amend_order(account, state.order_id, &amended).await {
            Ok(snapshot) => {
                tracing::debug!(
                    attempt,
                    order_id = snapshot.id,
                    price = %next_price,
                    status = ?snapshot.status,
                    "order re-priced"
                );
                state = state.anchor(amended, &snapshot, next_price);
            }
            Err(fault) => {
                tracing::warn!(
                    attempt,
                    order_id = state.order_id,
                    error = %fault,
                    "price negotiation aborted"
                );
                return WalkOutcome {
                    order_id: state.order_id,
                    attempts: attempt,
                    fault: Some(fault),
                };
            }
        }
    }

    WalkOutcome {
        order_id: state.order_id,
        attempts: config.max_attempts,
        fault: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{limit_payload, snapshot, FakeGateway};
    use rust_decimal_macros::dec;
    use tastyleg_broker::error::BrokerError;

    fn config(max_attempts: u32) -> WalkConfig {
        WalkConfig {
            interval: Duration::from_secs(5),
            price_step: dec!(0.05),
            max_attempts,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_budget_returns_initial_id_without_calls() {
        let gateway = FakeGateway::new();

        let outcome = walk_order(
            &gateway,
            "5WT00001",
            100,
            limit_payload(dec!(2.00), PriceEffect::Credit),
            &config(0),
        )
        .await;

        assert_eq!(outcome.order_id, 100);
        assert_eq!(outcome.attempts, 0);
        assert!(!outcome.aborted());
        assert!(gateway.amendments().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn credit_prices_step_down_each_attempt() {
        let gateway = FakeGateway::new();
        for id in [101, 102, 103] {
            gateway.push_amend(Ok(snapshot(id, None, None)));
        }

        let outcome = walk_order(
            &gateway,
            "5WT00001",
            100,
            limit_payload(dec!(2.00), PriceEffect::Credit),
            &config(3),
        )
        .await;

        assert_eq!(outcome.attempts, 3);
        assert!(!outcome.aborted());

        let prices: Vec<Decimal> = gateway
            .amendments()
            .iter()
            .map(|(_, payload)| payload.price.unwrap())
            .collect();
        assert_eq!(prices, vec![dec!(1.95), dec!(1.90), dec!(1.85)]);
    }

    #[tokio::test(start_paused = true)]
    async fn debit_prices_step_up_each_attempt() {
        let gateway = FakeGateway::new();
        gateway.push_amend(Ok(snapshot(101, None, None)));
        gateway.push_amend(Ok(snapshot(102, None, None)));

        walk_order(
            &gateway,
            "5WT00001",
            100,
            limit_payload(dec!(1.00), PriceEffect::Debit),
            &config(2),
        )
        .await;

        let prices: Vec<Decimal> = gateway
            .amendments()
            .iter()
            .map(|(_, payload)| payload.price.unwrap())
            .collect();
        assert_eq!(prices, vec![dec!(1.05), dec!(1.10)]);
    }

    #[tokio::test(start_paused = true)]
    async fn each_amendment_targets_the_latest_id() {
        let gateway = FakeGateway::new();
        // Every edit is a cancel-and-replace that hands back a new id.
        gateway.push_amend(Ok(snapshot(201, None, None)));
        gateway.push_amend(Ok(snapshot(202, None, None)));
        gateway.push_amend(Ok(snapshot(203, None, None)));

        let outcome = walk_order(
            &gateway,
            "5WT00001",
            200,
            limit_payload(dec!(2.00), PriceEffect::Credit),
            &config(3),
        )
        .await;

        let targeted: Vec<u64> = gateway.amendments().iter().map(|(id, _)| *id).collect();
        assert_eq!(targeted, vec![200, 201, 202]);
        assert_eq!(outcome.order_id, 203);
    }

    #[tokio::test(start_paused = true)]
    async fn server_price_overrides_local_computation() {
        let gateway = FakeGateway::new();
        // The store reports a different price than requested; the next step
        // must start from the store's number.
        gateway.push_amend(Ok(snapshot(101, Some(dec!(1.80)), None)));
        gateway.push_amend(Ok(snapshot(102, None, None)));

        walk_order(
            &gateway,
            "5WT00001",
            100,
            limit_payload(dec!(2.00), PriceEffect::Credit),
            &config(2),
        )
        .await;

        let prices: Vec<Decimal> = gateway
            .amendments()
            .iter()
            .map(|(_, payload)| payload.price.unwrap())
            .collect();
        assert_eq!(prices, vec![dec!(1.95), dec!(1.75)]);
    }

    #[tokio::test(start_paused = true)]
    async fn fault_on_first_attempt_returns_initial_id() {
        let gateway = FakeGateway::new();
        gateway.push_amend(Err(BrokerError::api("amend order", 422, "rejected")));

        let outcome = walk_order(
            &gateway,
            "5WT00001",
            100,
            limit_payload(dec!(2.00), PriceEffect::Credit),
            &config(5),
        )
        .await;

        assert_eq!(outcome.order_id, 100);
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.aborted());
        assert_eq!(gateway.amendments().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fault_mid_run_stops_immediately_and_keeps_last_good_id() {
        let gateway = FakeGateway::new();
        gateway.push_amend(Ok(snapshot(101, None, None)));
        gateway.push_amend(Ok(snapshot(102, None, None)));
        gateway.push_amend(Err(BrokerError::Network("connection reset".to_string())));

        let outcome = walk_order(
            &gateway,
            "5WT00001",
            100,
            limit_payload(dec!(2.00), PriceEffect::Credit),
            &config(5),
        )
        .await;

        // Attempt 3 faulted, so the id from attempt 2 stands and attempts
        // 4 and 5 never happen.
        assert_eq!(outcome.order_id, 102);
        assert_eq!(outcome.attempts, 3);
        assert!(outcome.aborted());
        assert_eq!(gateway.amendments().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_once_per_attempt() {
        let gateway = FakeGateway::new();
        gateway.push_amend(Ok(snapshot(101, None, None)));
        gateway.push_amend(Ok(snapshot(102, None, None)));
        gateway.push_amend(Ok(snapshot(103, None, None)));

        let started = tokio::time::Instant::now();
        walk_order(
            &gateway,
            "5WT00001",
            100,
            limit_payload(dec!(2.00), PriceEffect::Credit),
            &config(3),
        )
        .await;

        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn market_payload_is_rejected_without_amendments() {
        let gateway = FakeGateway::new();
        let payload = NewOrder::market(limit_payload(dec!(1.00), PriceEffect::Credit).legs);

        let outcome = walk_order(&gateway, "5WT00001", 100, payload, &config(3)).await;

        assert_eq!(outcome.order_id, 100);
        assert_eq!(outcome.attempts, 0);
        assert!(matches!(
            outcome.fault,
            Some(BrokerError::InvalidOrder(_))
        ));
        assert!(gateway.amendments().is_empty());
    }
}
