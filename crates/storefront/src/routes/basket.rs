//! Basket and checkout route handlers.
//!
//! The basket lives in the visitor's session; checkout turns it into an
//! order for the signed-in user and empties it once the order is processed.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use orderly_checkout::{Order, OrderReceipt};
use orderly_core::Product;

use crate::error::{Result, set_sentry_user};
use crate::state::AppState;

/// Basket contents as resolved by the catalog.
#[derive(Debug, Serialize)]
pub struct BasketView {
    pub products: Vec<Product>,
    pub count: usize,
}

/// A processed order.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub products: Vec<Product>,
    pub billing: &'static str,
    pub discount: &'static str,
    pub communication: &'static str,
    pub receipt: OrderReceipt,
}

impl CheckoutView {
    fn new(order: &Order, receipt: OrderReceipt) -> Self {
        Self {
            order_id: order.id(),
            placed_at: order.placed_at(),
            products: order.products().to_vec(),
            billing: order.billing().name(),
            discount: order.discount().name(),
            communication: order.communication().name(),
            receipt,
        }
    }
}

/// Display the basket.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<BasketView>> {
    let products = state.basket(session).products_info().await?;
    Ok(Json(BasketView {
        count: products.len(),
        products,
    }))
}

/// Check out the basket.
///
/// Unauthenticated visitors get 401 and an empty basket gets 422; the basket
/// is left untouched unless the order is processed.
#[instrument(skip(state, session))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CheckoutView>> {
    let basket = state.basket(session);
    let order = basket.basket_builder().await?.build()?;

    let customer = order.customer();
    set_sentry_user(&customer.id, Some(customer.email.as_str()));

    let receipt = order.process()?;
    basket.clear().await?;

    tracing::info!(order_id = %order.id(), total = %receipt.total, "checkout complete");
    Ok(Json(CheckoutView::new(&order, receipt)))
}
