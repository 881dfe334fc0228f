//! Order leg construction and spread assembly.
//!
//! Builds broker-shaped order payloads for single-sided spreads and iron
//! flies from a four-strike description. A strike of `0` is the sentinel for
//! "this leg does not exist"; which legs land in the payload is decided by
//! the strike values alone, not by the trade's intent.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tastyleg_broker::error::Result;
use tastyleg_broker::types::{
    InstrumentType, NewOrder, OrderAction, OrderLeg, OrderType, PriceEffect,
};

use crate::symbology::{option_symbol, OptionRight};

// =============================================================================
// Trade Direction
// =============================================================================

/// Whether the spread is opened for a credit or a debit.
///
/// A credit trade sells the near strikes and buys the protective wings; a
/// debit trade inverts the sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    Credit,
    Debit,
}

impl TradeDirection {
    /// Parses a trade-type code by its leading character (`C...` is credit,
    /// anything else debit).
    #[must_use]
    pub fn from_trade_code(code: &str) -> Self {
        if code.starts_with(['C', 'c']) {
            Self::Credit
        } else {
            Self::Debit
        }
    }

    /// The price effect this direction produces.
    #[must_use]
    pub fn price_effect(self) -> PriceEffect {
        match self {
            Self::Credit => PriceEffect::Credit,
            Self::Debit => PriceEffect::Debit,
        }
    }

    /// The actions for (near strikes, wing strikes).
    #[must_use]
    pub fn leg_actions(self) -> (OrderAction, OrderAction) {
        match self {
            Self::Credit => (OrderAction::SellToOpen, OrderAction::BuyToOpen),
            Self::Debit => (OrderAction::BuyToOpen, OrderAction::SellToOpen),
        }
    }
}

// =============================================================================
// Spread Shape
// =============================================================================

/// Which legs a four-strike description actually carries.
///
/// Classified once from the strikes, in priority order; dispatch happens on
/// the result rather than on scattered zero-checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpreadShape {
    /// Short put, optionally with a protective long put.
    PutSpread { winged: bool },
    /// Short call, optionally with a protective long call.
    CallSpread { winged: bool },
    /// Short call and short put, no wings.
    BareIronFly,
    /// All four legs.
    IronFly,
}

impl SpreadShape {
    /// Classifies the four strikes. `0` means the leg is absent.
    #[must_use]
    pub fn classify(
        short_call: Decimal,
        long_call: Decimal,
        short_put: Decimal,
        long_put: Decimal,
    ) -> Self {
        if short_call.is_zero() {
            Self::PutSpread {
                winged: !long_put.is_zero(),
            }
        } else if short_put.is_zero() {
            Self::CallSpread {
                winged: !long_call.is_zero(),
            }
        } else if long_call.is_zero() && long_put.is_zero() {
            Self::BareIronFly
        } else {
            Self::IronFly
        }
    }
}

// =============================================================================
// Spread Order
// =============================================================================

/// A spread to be assembled into an order payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadOrder {
    /// Underlying root (e.g. "SPXW").
    pub underlying: String,

    /// Expiry of every leg.
    pub expiry: NaiveDate,

    /// Contracts per leg.
    pub quantity: u32,

    /// Short call strike, `0` if absent.
    pub short_call: Decimal,

    /// Long call (wing) strike, `0` if absent.
    pub long_call: Decimal,

    /// Short put strike, `0` if absent.
    pub short_put: Decimal,

    /// Long put (wing) strike, `0` if absent.
    pub long_put: Decimal,

    /// Credit or debit.
    pub direction: TradeDirection,

    /// Limit or market.
    pub order_type: OrderType,

    /// Limit price; ignored for market orders.
    pub price: Decimal,
}

impl SpreadOrder {
    /// The shape implied by this spread's strikes.
    #[must_use]
    pub fn shape(&self) -> SpreadShape {
        SpreadShape::classify(self.short_call, self.long_call, self.short_put, self.long_put)
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Builds a single option leg.
///
/// Pure; the only failure mode is a strike/expiry/root the symbol encoding
/// rejects, and that error propagates unchanged.
///
/// # Errors
/// Returns error if the OCC symbol cannot be encoded.
pub fn build_leg(
    action: OrderAction,
    underlying: &str,
    right: OptionRight,
    strike: Decimal,
    expiry: NaiveDate,
    quantity: u32,
    instrument_type: InstrumentType,
) -> Result<OrderLeg> {
    let symbol = option_symbol(underlying, strike, right, expiry)?;

    Ok(OrderLeg {
        action,
        symbol,
        quantity,
        instrument_type,
    })
}

/// Assembles a spread into a broker-shaped order payload.
///
/// Legs appear in the canonical order short call, long call, short put,
/// long put, restricted to the legs the classified shape carries.
///
/// # Errors
/// Returns error if any present leg's symbol cannot be encoded.
pub fn assemble_spread(spread: &SpreadOrder) -> Result<NewOrder> {
    let (near, wing) = spread.direction.leg_actions();

    let call = |action, strike| {
        build_leg(
            action,
            &spread.underlying,
            OptionRight::Call,
            strike,
            spread.expiry,
            spread.quantity,
            InstrumentType::EquityOption,
        )
    };
    let put = |action, strike| {
        build_leg(
            action,
            &spread.underlying,
            OptionRight::Put,
            strike,
            spread.expiry,
            spread.quantity,
            InstrumentType::EquityOption,
        )
    };

    let legs = match spread.shape() {
        SpreadShape::PutSpread { winged: false } => vec![put(near, spread.short_put)?],
        SpreadShape::PutSpread { winged: true } => {
            vec![put(near, spread.short_put)?, put(wing, spread.long_put)?]
        }
        SpreadShape::CallSpread { winged: false } => vec![call(near, spread.short_call)?],
        SpreadShape::CallSpread { winged: true } => {
            vec![call(near, spread.short_call)?, call(wing, spread.long_call)?]
        }
        SpreadShape::BareIronFly => {
            vec![call(near, spread.short_call)?, put(near, spread.short_put)?]
        }
        SpreadShape::IronFly => vec![
            call(near, spread.short_call)?,
            call(wing, spread.long_call)?,
            put(near, spread.short_put)?,
            put(wing, spread.long_put)?,
        ],
    };

    Ok(match spread.order_type {
        OrderType::Limit => NewOrder::limit(spread.price, spread.direction.price_effect(), legs),
        OrderType::Market => NewOrder::market(legs),
    })
}
