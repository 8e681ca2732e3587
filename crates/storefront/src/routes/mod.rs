//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Products
//! GET  /products               - Catalog listing, by id
//! GET  /products/{id}          - Product detail with basket membership
//! POST /products/{id}          - Add the form's `product` to the basket, then detail
//!
//! # Basket
//! GET  /basket                 - Resolved basket contents
//! POST /checkout               - Build, process and clear the basket (requires login)
//! ```

pub mod basket;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list))
        .route("/{id}", get(products::show).post(products::add))
}

/// Create the basket and checkout routes router.
pub fn basket_routes() -> Router<AppState> {
    Router::new()
        .route("/basket", get(basket::show))
        .route("/checkout", post(basket::checkout))
}

/// All storefront routes except health checks.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .merge(basket_routes())
}
