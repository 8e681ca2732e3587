//! Product route handlers.

use axum::{
    Form, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use orderly_core::{Product, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::{AppState, StoreBasket};

/// Product detail as seen by the current visitor.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub product: Product,
    pub in_basket: bool,
}

/// Add-to-basket form.
#[derive(Debug, Deserialize)]
pub struct AddToBasketForm {
    pub product: ProductId,
}

/// List the catalog.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.products().list().await?))
}

/// Display a product.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let basket = state.basket(session);
    product_view(&state, &basket, id).await.map(Json)
}

/// Add the submitted product to the basket, then display product `id`.
#[instrument(skip(state, session, form), fields(product = %form.product))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    Form(form): Form<AddToBasketForm>,
) -> Result<Json<ProductView>> {
    let basket = state.basket(session);
    basket.add_product(form.product).await?;

    add_breadcrumb(
        "basket",
        "Added product to basket",
        Some(&[("product_id", &form.product.to_string())]),
    );

    product_view(&state, &basket, id).await.map(Json)
}

async fn product_view(
    state: &AppState,
    basket: &StoreBasket,
    id: ProductId,
) -> Result<ProductView> {
    let product = state
        .products()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let in_basket = basket.is_product_in_basket(id).await?;

    Ok(ProductView { product, in_basket })
}
