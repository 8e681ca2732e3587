//! Order assembly.
//!
//! Two front doors onto the same finalization:
//!
//! - [`DraftOrder`] takes the required slots (products, security) as
//!   constructor arguments, so it can never be missing one.
//! - [`OrderBuilder`] fills slots in any order and checks for the required
//!   ones in [`OrderBuilder::build`]. This is what a [`Basket`](crate::Basket)
//!   hands out.
//!
//! Optional slots (billing, discount, communication) left unset resolve to
//! the injected [`StrategyDefaults`].

use std::sync::Arc;

use tracing::instrument;

use orderly_core::Product;

use crate::billing::Billing;
use crate::communication::Communication;
use crate::defaults::StrategyDefaults;
use crate::discount::Discount;
use crate::error::{CheckoutError, OrderSlot, Result};
use crate::order::Order;
use crate::security::UserSecurity;

/// Whether an order may have no products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyOrders {
    /// An empty product list fails with `IncompleteOrder { missing: Products }`.
    #[default]
    Reject,
    /// An empty product list is a legal order.
    Allow,
}

/// An order with its required slots filled.
#[derive(Debug, Clone)]
pub struct DraftOrder {
    products: Vec<Product>,
    security: Arc<dyn UserSecurity>,
    billing: Option<Arc<dyn Billing>>,
    discount: Option<Arc<dyn Discount>>,
    communication: Option<Arc<dyn Communication>>,
    empty_orders: EmptyOrders,
}

impl DraftOrder {
    /// Start a draft from its required parts.
    #[must_use]
    pub fn new(products: Vec<Product>, security: Arc<dyn UserSecurity>) -> Self {
        Self {
            products,
            security,
            billing: None,
            discount: None,
            communication: None,
            empty_orders: EmptyOrders::default(),
        }
    }

    /// Set the billing strategy.
    #[must_use]
    pub fn billing(mut self, billing: Arc<dyn Billing>) -> Self {
        self.billing = Some(billing);
        self
    }

    /// Set the discount strategy.
    #[must_use]
    pub fn discounting(mut self, discount: Arc<dyn Discount>) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Set the communication strategy.
    #[must_use]
    pub fn communication(mut self, communication: Arc<dyn Communication>) -> Self {
        self.communication = Some(communication);
        self
    }

    /// Set the empty-order policy.
    #[must_use]
    pub fn empty_orders(mut self, policy: EmptyOrders) -> Self {
        self.empty_orders = policy;
        self
    }

    /// Resolve defaults and identity into an [`Order`].
    ///
    /// # Errors
    ///
    /// - `IncompleteOrder { missing: Products }` if the product list is empty
    ///   and the policy is [`EmptyOrders::Reject`]
    /// - `Unauthenticated` if the security strategy has no identity
    #[instrument(skip_all, fields(products = self.products.len()))]
    pub fn finalize(self, defaults: &StrategyDefaults) -> Result<Order> {
        if self.products.is_empty() && self.empty_orders == EmptyOrders::Reject {
            return Err(CheckoutError::IncompleteOrder {
                missing: OrderSlot::Products,
            });
        }

        let customer = self.security.identity()?;

        let order = Order::new(
            self.products,
            self.billing.unwrap_or_else(|| defaults.billing()),
            self.discount.unwrap_or_else(|| defaults.discount()),
            self.communication
                .unwrap_or_else(|| defaults.communication()),
            customer,
        );
        tracing::debug!(order_id = %order.id(), "order finalized");
        Ok(order)
    }
}

/// Step-by-step order builder.
///
/// Each setter replaces one slot. `build` consumes the builder, so a builder
/// produces at most one order. It is not `Clone`: copying a half-filled
/// builder would let one basket yield two orders.
///
/// ```compile_fail
/// fn cloneable<T: Clone>() {}
/// cloneable::<orderly_checkout::OrderBuilder>();
/// ```
#[derive(Debug)]
#[must_use]
pub struct OrderBuilder {
    defaults: StrategyDefaults,
    products: Option<Vec<Product>>,
    billing: Option<Arc<dyn Billing>>,
    discount: Option<Arc<dyn Discount>>,
    communication: Option<Arc<dyn Communication>>,
    security: Option<Arc<dyn UserSecurity>>,
    empty_orders: EmptyOrders,
}

impl OrderBuilder {
    /// An empty builder that falls back to `defaults`.
    pub fn new(defaults: StrategyDefaults) -> Self {
        Self {
            defaults,
            products: None,
            billing: None,
            discount: None,
            communication: None,
            security: None,
            empty_orders: EmptyOrders::Reject,
        }
    }

    /// Set the products. Required.
    pub fn products(mut self, products: Vec<Product>) -> Self {
        self.products = Some(products);
        self
    }

    /// Set the billing strategy.
    pub fn billing(mut self, billing: Arc<dyn Billing>) -> Self {
        self.billing = Some(billing);
        self
    }

    /// Install the default billing strategy.
    pub fn default_billing(mut self) -> Self {
        self.billing = Some(self.defaults.billing());
        self
    }

    /// Set the discount strategy.
    pub fn discounting(mut self, discount: Arc<dyn Discount>) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Install the default discount strategy.
    pub fn default_discounting(mut self) -> Self {
        self.discount = Some(self.defaults.discount());
        self
    }

    /// Set the communication strategy.
    pub fn communication(mut self, communication: Arc<dyn Communication>) -> Self {
        self.communication = Some(communication);
        self
    }

    /// Install the default communication strategy.
    pub fn default_communication(mut self) -> Self {
        self.communication = Some(self.defaults.communication());
        self
    }

    /// Set the user security strategy. Required.
    pub fn users_security(mut self, security: Arc<dyn UserSecurity>) -> Self {
        self.security = Some(security);
        self
    }

    /// Set the empty-order policy.
    pub fn empty_orders(mut self, policy: EmptyOrders) -> Self {
        self.empty_orders = policy;
        self
    }

    /// Finalize into an [`Order`].
    ///
    /// # Errors
    ///
    /// - `IncompleteOrder` naming the first missing required slot
    /// - anything [`DraftOrder::finalize`] returns
    pub fn build(self) -> Result<Order> {
        let products = self.products.ok_or(CheckoutError::IncompleteOrder {
            missing: OrderSlot::Products,
        })?;
        let security = self.security.ok_or(CheckoutError::IncompleteOrder {
            missing: OrderSlot::UsersSecurity,
        })?;

        let mut draft = DraftOrder::new(products, security).empty_orders(self.empty_orders);
        draft.billing = self.billing;
        draft.discount = self.discount;
        draft.communication = self.communication;
        draft.finalize(&self.defaults)
    }
}

impl Default for OrderBuilder {
    fn default() -> Self {
        Self::new(StrategyDefaults::default())
    }
}
