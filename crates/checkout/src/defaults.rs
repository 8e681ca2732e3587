//! Default strategies for the optional order slots.
//!
//! The defaults are ordinary values handed to the basket and builder, so a
//! deployment picks them from configuration and tests pick them directly.

use std::sync::Arc;

use crate::billing::{Billing, BillingMethod, Card};
use crate::communication::{Communication, CommunicationChannel, Email};
use crate::discount::{Discount, DiscountPolicy, NullDiscount};

/// Strategies installed when a slot is left at its default.
#[derive(Debug, Clone)]
pub struct StrategyDefaults {
    billing: Arc<dyn Billing>,
    discount: Arc<dyn Discount>,
    communication: Arc<dyn Communication>,
}

impl StrategyDefaults {
    /// Card billing, no discount, email notification.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            billing: Arc::new(Card),
            discount: Arc::new(NullDiscount),
            communication: Arc::new(Email),
        }
    }

    /// Defaults selected by name from configuration.
    #[must_use]
    pub fn from_config(
        billing: BillingMethod,
        discount: DiscountPolicy,
        communication: CommunicationChannel,
    ) -> Self {
        Self {
            billing: billing.strategy(),
            discount: discount.strategy(),
            communication: communication.strategy(),
        }
    }

    /// Replace the default billing strategy.
    #[must_use]
    pub fn with_billing(mut self, billing: Arc<dyn Billing>) -> Self {
        self.billing = billing;
        self
    }

    /// Replace the default discount strategy.
    #[must_use]
    pub fn with_discount(mut self, discount: Arc<dyn Discount>) -> Self {
        self.discount = discount;
        self
    }

    /// Replace the default communication strategy.
    #[must_use]
    pub fn with_communication(mut self, communication: Arc<dyn Communication>) -> Self {
        self.communication = communication;
        self
    }

    /// The default billing strategy.
    #[must_use]
    pub fn billing(&self) -> Arc<dyn Billing> {
        Arc::clone(&self.billing)
    }

    /// The default discount strategy.
    #[must_use]
    pub fn discount(&self) -> Arc<dyn Discount> {
        Arc::clone(&self.discount)
    }

    /// The default communication strategy.
    #[must_use]
    pub fn communication(&self) -> Arc<dyn Communication> {
        Arc::clone(&self.communication)
    }
}

impl Default for StrategyDefaults {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::BankTransfer;

    #[test]
    fn test_standard_defaults() {
        let defaults = StrategyDefaults::default();
        assert_eq!(defaults.billing().name(), "card");
        assert_eq!(defaults.discount().name(), "none");
        assert_eq!(defaults.communication().name(), "email");
    }

    #[test]
    fn test_from_config() {
        let defaults = StrategyDefaults::from_config(
            BillingMethod::BankTransfer,
            DiscountPolicy::None,
            CommunicationChannel::Sms,
        );
        assert_eq!(defaults.billing().name(), "bank_transfer");
        assert_eq!(defaults.communication().name(), "sms");
    }

    #[test]
    fn test_override_one_default() {
        let defaults = StrategyDefaults::standard().with_billing(Arc::new(BankTransfer));
        assert_eq!(defaults.billing().name(), "bank_transfer");
        assert_eq!(defaults.communication().name(), "email");
    }
}
