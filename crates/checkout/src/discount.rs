//! Discount strategies.

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use orderly_core::Price;

/// Discount configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscountError {
    /// Unknown discount policy name in configuration.
    #[error("unknown discount policy: {0}")]
    UnknownPolicy(String),
}

/// A discount policy.
pub trait Discount: fmt::Debug + Send + Sync {
    /// Short stable name.
    fn name(&self) -> &'static str;

    /// The amount to take off `subtotal`, in the same currency.
    fn apply(&self, subtotal: Price) -> Price;
}

/// No discount. The default policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiscount;

impl Discount for NullDiscount {
    fn name(&self) -> &'static str {
        "none"
    }

    fn apply(&self, subtotal: Price) -> Price {
        Price::zero(subtotal.currency_code)
    }
}

/// Discount policy selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscountPolicy {
    #[default]
    None,
}

impl DiscountPolicy {
    /// Instantiate the strategy.
    #[must_use]
    pub fn strategy(self) -> Arc<dyn Discount> {
        match self {
            Self::None => Arc::new(NullDiscount),
        }
    }
}

impl FromStr for DiscountPolicy {
    type Err = DiscountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "null" => Ok(Self::None),
            _ => Err(DiscountError::UnknownPolicy(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use orderly_core::CurrencyCode;

    use super::*;

    #[test]
    fn test_null_discount_is_zero_in_same_currency() {
        let discount = NullDiscount.apply(Price::from_cents(4200, CurrencyCode::GBP));
        assert!(discount.is_zero());
        assert_eq!(discount.currency_code, CurrencyCode::GBP);
    }

    #[test]
    fn test_policy_from_config() {
        assert_eq!("null".parse::<DiscountPolicy>(), Ok(DiscountPolicy::None));
        assert_eq!(" None ".parse::<DiscountPolicy>(), Ok(DiscountPolicy::None));
    }

    #[test]
    fn test_unknown_policy_is_typed_error() {
        let err = "vip".parse::<DiscountPolicy>().unwrap_err();
        assert_eq!(err, DiscountError::UnknownPolicy("vip".to_owned()));
        assert_eq!(err.to_string(), "unknown discount policy: vip");
    }
}
