//! Checkout error types.

use core::fmt;

use thiserror::Error;

use orderly_core::PriceError;

use crate::billing::BillingError;
use crate::catalog::RepositoryError;
use crate::communication::CommunicationError;
use crate::security::Unauthenticated;
use crate::session::SessionError;

/// A required order slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderSlot {
    /// The product list (also reported when the list is empty and empty
    /// orders are rejected).
    Products,
    /// The user security strategy.
    UsersSecurity,
}

impl fmt::Display for OrderSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Products => write!(f, "products"),
            Self::UsersSecurity => write!(f, "users_security"),
        }
    }
}

/// Errors that can occur while assembling or processing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The builder was finalized with a required slot missing.
    #[error("incomplete order: missing {missing}")]
    IncompleteOrder {
        /// The first missing slot.
        missing: OrderSlot,
    },

    /// No identity could be resolved from the session.
    #[error(transparent)]
    Unauthenticated(#[from] Unauthenticated),

    /// Session storage failed.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Product lookup failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Order totals could not be computed.
    #[error("price error: {0}")]
    Price(#[from] PriceError),

    /// The billing strategy refused the charge.
    #[error("billing error: {0}")]
    Billing(#[from] BillingError),

    /// The customer could not be notified.
    #[error("communication error: {0}")]
    Communication(#[from] CommunicationError),
}

/// Result type alias for `CheckoutError`.
pub type Result<T> = std::result::Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_order_display() {
        let err = CheckoutError::IncompleteOrder {
            missing: OrderSlot::UsersSecurity,
        };
        assert_eq!(err.to_string(), "incomplete order: missing users_security");
    }

    #[test]
    fn test_repository_error_is_not_rewrapped() {
        let err = CheckoutError::from(RepositoryError::Unavailable("catalog down".to_string()));
        assert_eq!(err.to_string(), "catalog unavailable: catalog down");
    }
}
