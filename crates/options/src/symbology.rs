//! OCC option symbol encoding.
//!
//! The broker addresses listed options by their OCC symbol: root padded to
//! six characters, expiry as `yymmdd`, `C` or `P`, and the strike times 1000
//! zero-padded to eight digits, e.g. `SPXW  240816C05500000`.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tastyleg_broker::error::{BrokerError, Result};

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionRight {
    Call,
    Put,
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "C"),
            Self::Put => write!(f, "P"),
        }
    }
}

/// Encodes an option contract as an OCC symbol.
///
/// # Errors
/// Returns `BrokerError::InvalidOrder` if the root or strike cannot be
/// encoded: empty or overlong root, non-positive strike, or a strike finer
/// than one-thousandth of a point.
pub fn option_symbol(
    underlying: &str,
    strike: Decimal,
    right: OptionRight,
    expiry: NaiveDate,
) -> Result<String> {
    let root = underlying.trim();

    if root.is_empty() {
        return Err(BrokerError::InvalidOrder(
            "option root cannot be empty".to_string(),
        ));
    }
    if root.len() > 6 {
        return Err(BrokerError::InvalidOrder(format!(
            "option root {root} exceeds six characters"
        )));
    }
    if !root.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(BrokerError::InvalidOrder(format!(
            "option root {root} must be alphanumeric"
        )));
    }

    if strike <= Decimal::ZERO {
        return Err(BrokerError::InvalidOrder(format!(
            "strike must be positive, got {strike}"
        )));
    }

    let millis = strike * dec!(1000);
    if millis.fract() != Decimal::ZERO {
        return Err(BrokerError::InvalidOrder(format!(
            "strike {strike} is finer than one-thousandth of a point"
        )));
    }

    let millis = millis.to_u64().filter(|m| *m <= 99_999_999).ok_or_else(|| {
        BrokerError::InvalidOrder(format!("strike {strike} does not fit the OCC encoding"))
    })?;

    Ok(format!(
        "{:<6}{}{}{:08}",
        root.to_uppercase(),
        expiry.format("%y%m%d"),
        right,
        millis
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 16).unwrap()
    }

    #[test]
    fn encodes_whole_strike() {
        let symbol = option_symbol("SPXW", dec!(5500), OptionRight::Call, expiry()).unwrap();
        assert_eq!(symbol, "SPXW  240816C05500000");
    }

    #[test]
    fn encodes_fractional_strike() {
        let symbol = option_symbol("XSP", dec!(547.5), OptionRight::Put, expiry()).unwrap();
        assert_eq!(symbol, "XSP   240816P00547500");
    }

    #[test]
    fn pads_single_character_root() {
        let symbol = option_symbol("F", dec!(12), OptionRight::Call, expiry()).unwrap();
        assert_eq!(symbol, "F     240816C00012000");
        assert_eq!(symbol.len(), 21);
    }

    #[test]
    fn uppercases_root() {
        let symbol = option_symbol("spxw", dec!(5500), OptionRight::Call, expiry()).unwrap();
        assert!(symbol.starts_with("SPXW  "));
    }

    #[test]
    fn rejects_empty_root() {
        assert!(option_symbol("", dec!(100), OptionRight::Call, expiry()).is_err());
        assert!(option_symbol("   ", dec!(100), OptionRight::Call, expiry()).is_err());
    }

    #[test]
    fn rejects_overlong_root() {
        assert!(option_symbol("TOOLONG", dec!(100), OptionRight::Call, expiry()).is_err());
    }

    #[test]
    fn rejects_zero_strike() {
        let err = option_symbol("SPXW", Decimal::ZERO, OptionRight::Call, expiry()).unwrap_err();
        assert!(matches!(err, BrokerError::InvalidOrder(_)));
    }

    #[test]
    fn rejects_negative_strike() {
        assert!(option_symbol("SPXW", dec!(-5), OptionRight::Call, expiry()).is_err());
    }

    #[test]
    fn rejects_sub_milli_strike() {
        assert!(option_symbol("SPXW", dec!(100.0005), OptionRight::Call, expiry()).is_err());
    }

    #[test]
    fn rejects_oversized_strike() {
        assert!(option_symbol("SPXW", dec!(100000), OptionRight::Call, expiry()).is_err());
    }
}
