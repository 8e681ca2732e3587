//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors from price arithmetic and parsing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Two prices in different currencies were combined.
    #[error("currency mismatch: {left:?} vs {right:?}")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: CurrencyCode,
        /// Currency of the right operand.
        right: CurrencyCode,
    },
    /// Unknown ISO 4217 code.
    #[error("unsupported currency code: {0}")]
    UnknownCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from minor units (cents).
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(cents, 2), currency_code)
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Add two prices of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::CurrencyMismatch` if the currencies differ.
    pub fn checked_add(self, other: Self) -> Result<Self, PriceError> {
        self.same_currency(other)?;
        Ok(Self::new(self.amount + other.amount, self.currency_code))
    }

    /// Subtract `other`, clamping at zero.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::CurrencyMismatch` if the currencies differ.
    pub fn saturating_sub(self, other: Self) -> Result<Self, PriceError> {
        self.same_currency(other)?;
        let amount = (self.amount - other.amount).max(Decimal::ZERO);
        Ok(Self::new(amount, self.currency_code))
    }

    /// Sum an iterator of prices. An empty iterator sums to zero in `currency_code`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::CurrencyMismatch` if any price is in another currency.
    pub fn sum<I>(prices: I, currency_code: CurrencyCode) -> Result<Self, PriceError>
    where
        I: IntoIterator<Item = Self>,
    {
        prices
            .into_iter()
            .try_fold(Self::zero(currency_code), Self::checked_add)
    }

    fn same_currency(self, other: Self) -> Result<(), PriceError> {
        if self.currency_code == other.currency_code {
            Ok(())
        } else {
            Err(PriceError::CurrencyMismatch {
                left: self.currency_code,
                right: other.currency_code,
            })
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(PriceError::UnknownCurrency(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total = Price::sum(Vec::new(), CurrencyCode::EUR).unwrap();
        assert!(total.is_zero());
        assert_eq!(total.currency_code, CurrencyCode::EUR);
    }

    #[test]
    fn test_sum_same_currency() {
        let prices = [
            Price::from_cents(1999, CurrencyCode::USD),
            Price::from_cents(1, CurrencyCode::USD),
        ];
        let total = Price::sum(prices, CurrencyCode::USD).unwrap();
        assert_eq!(total, Price::from_cents(2000, CurrencyCode::USD));
    }

    #[test]
    fn test_mixed_currencies_are_rejected() {
        let err = Price::from_cents(100, CurrencyCode::USD)
            .checked_add(Price::from_cents(100, CurrencyCode::GBP))
            .unwrap_err();
        assert!(matches!(err, PriceError::CurrencyMismatch { .. }));
    }

    #[test]
    fn test_saturating_sub_clamps_at_zero() {
        let price = Price::from_cents(500, CurrencyCode::USD);
        let discount = Price::from_cents(800, CurrencyCode::USD);
        assert!(price.saturating_sub(discount).unwrap().is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Price::from_cents(1999, CurrencyCode::GBP).to_string(),
            "£19.99"
        );
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
