//! Billing strategies.
//!
//! Payment gateway integration lives outside this crate; a billing strategy
//! only decides how the order total is to be collected and records it.

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use orderly_core::Price;

/// Errors a billing strategy can return.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// The amount cannot be charged.
    #[error("cannot charge {0}")]
    InvalidAmount(Price),
    /// Unknown billing method name in configuration.
    #[error("unknown billing method: {0}")]
    UnknownMethod(String),
}

/// How a recorded payment stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Funds reserved on the card.
    Authorized,
    /// Waiting for the customer's transfer.
    AwaitingTransfer,
}

/// A recorded charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    /// Reference for reconciliation.
    pub reference: Uuid,
    /// Name of the billing strategy that produced it.
    pub method: &'static str,
    /// Charged amount.
    pub amount: Price,
    /// Current status.
    pub status: PaymentStatus,
}

/// A way of collecting payment for an order.
pub trait Billing: fmt::Debug + Send + Sync {
    /// Short stable name (`"card"`, `"bank_transfer"`).
    fn name(&self) -> &'static str;

    /// Charge `amount`.
    ///
    /// # Errors
    ///
    /// Returns a `BillingError` if the amount cannot be collected.
    fn charge(&self, amount: Price) -> Result<Payment, BillingError>;
}

/// Card payment. The default billing method.
#[derive(Debug, Clone, Copy, Default)]
pub struct Card;

impl Billing for Card {
    fn name(&self) -> &'static str {
        "card"
    }

    fn charge(&self, amount: Price) -> Result<Payment, BillingError> {
        // Cards cannot authorize a zero amount.
        if amount.is_zero() || amount.amount.is_sign_negative() {
            return Err(BillingError::InvalidAmount(amount));
        }
        tracing::info!(%amount, "card payment authorized");
        Ok(Payment {
            reference: Uuid::new_v4(),
            method: self.name(),
            amount,
            status: PaymentStatus::Authorized,
        })
    }
}

/// Bank transfer: the order waits for the customer to pay.
#[derive(Debug, Clone, Copy, Default)]
pub struct BankTransfer;

impl Billing for BankTransfer {
    fn name(&self) -> &'static str {
        "bank_transfer"
    }

    fn charge(&self, amount: Price) -> Result<Payment, BillingError> {
        if amount.amount.is_sign_negative() {
            return Err(BillingError::InvalidAmount(amount));
        }
        tracing::info!(%amount, "bank transfer requested");
        Ok(Payment {
            reference: Uuid::new_v4(),
            method: self.name(),
            amount,
            status: PaymentStatus::AwaitingTransfer,
        })
    }
}

/// Billing method selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BillingMethod {
    #[default]
    Card,
    BankTransfer,
}

impl BillingMethod {
    /// Instantiate the strategy.
    #[must_use]
    pub fn strategy(self) -> Arc<dyn Billing> {
        match self {
            Self::Card => Arc::new(Card),
            Self::BankTransfer => Arc::new(BankTransfer),
        }
    }
}

impl FromStr for BillingMethod {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "bank_transfer" | "bank-transfer" => Ok(Self::BankTransfer),
            _ => Err(BillingError::UnknownMethod(s.to_owned())),
        }
    }
}
