//! The finalized order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use orderly_core::{CurrencyCode, CurrentUser, Price, Product};

use crate::billing::{Billing, Payment};
use crate::communication::{Communication, Notification};
use crate::discount::Discount;
use crate::error::Result;

/// An immutable checkout record.
///
/// Only [`DraftOrder::finalize`](crate::DraftOrder::finalize) creates one;
/// all fields are read through getters.
#[derive(Debug, Clone)]
pub struct Order {
    id: Uuid,
    placed_at: DateTime<Utc>,
    products: Vec<Product>,
    billing: Arc<dyn Billing>,
    discount: Arc<dyn Discount>,
    communication: Arc<dyn Communication>,
    customer: CurrentUser,
}

/// Outcome of processing an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderReceipt {
    /// The processed order.
    pub order_id: Uuid,
    /// Sum of product prices.
    pub subtotal: Price,
    /// Discount taken off.
    pub discount: Price,
    /// Amount charged.
    pub total: Price,
    /// Recorded payment.
    pub payment: Payment,
    /// Confirmation sent to the customer.
    pub notification: Notification,
}

impl Order {
    pub(crate) fn new(
        products: Vec<Product>,
        billing: Arc<dyn Billing>,
        discount: Arc<dyn Discount>,
        communication: Arc<dyn Communication>,
        customer: CurrentUser,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            placed_at: Utc::now(),
            products,
            billing,
            discount,
            communication,
            customer,
        }
    }

    /// Order identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// When the order was finalized.
    #[must_use]
    pub const fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    /// Ordered products.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Billing strategy.
    #[must_use]
    pub fn billing(&self) -> &dyn Billing {
        self.billing.as_ref()
    }

    /// Discount strategy.
    #[must_use]
    pub fn discount(&self) -> &dyn Discount {
        self.discount.as_ref()
    }

    /// Communication strategy.
    #[must_use]
    pub fn communication(&self) -> &dyn Communication {
        self.communication.as_ref()
    }

    /// The customer the order is bound to.
    #[must_use]
    pub const fn customer(&self) -> &CurrentUser {
        &self.customer
    }

    /// Sum of product prices.
    ///
    /// An order without products has a zero subtotal in the default currency.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Price` if products are priced in different
    /// currencies.
    pub fn subtotal(&self) -> Result<Price> {
        let currency = self
            .products
            .first()
            .map_or_else(CurrencyCode::default, |p| p.price.currency_code);
        Ok(Price::sum(self.products.iter().map(|p| p.price), currency)?)
    }

    /// Discount granted by the discount strategy.
    ///
    /// # Errors
    ///
    /// Same as [`Order::subtotal`].
    pub fn discount_amount(&self) -> Result<Price> {
        Ok(self.discount.apply(self.subtotal()?))
    }

    /// Subtotal minus discount, never below zero.
    ///
    /// # Errors
    ///
    /// Same as [`Order::subtotal`], or if the discount is in another currency.
    pub fn total(&self) -> Result<Price> {
        let subtotal = self.subtotal()?;
        let discount = self.discount.apply(subtotal);
        Ok(subtotal.saturating_sub(discount)?)
    }

    /// Charge the customer and send the confirmation.
    ///
    /// # Errors
    ///
    /// Returns the first failure among total computation, billing and
    /// notification. Nothing is sent if billing fails.
    #[instrument(skip(self), fields(order_id = %self.id, user_id = %self.customer.id))]
    pub fn process(&self) -> Result<OrderReceipt> {
        let subtotal = self.subtotal()?;
        let discount = self.discount.apply(subtotal);
        let total = subtotal.saturating_sub(discount)?;

        let payment = self.billing.charge(total)?;
        let message = format!(
            "Your order {} of {} item(s) is confirmed. Total: {total}.",
            self.id,
            self.products.len()
        );
        let notification = self.communication.notify(&self.customer, &message)?;

        tracing::info!(
            billing = self.billing.name(),
            communication = self.communication.name(),
            %total,
            "order processed"
        );

        Ok(OrderReceipt {
            order_id: self.id,
            subtotal,
            discount,
            total,
            payment,
            notification,
        })
    }
}
