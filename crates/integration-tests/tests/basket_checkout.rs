//! End-to-end basket and checkout flow.
//!
//! Runs entirely in memory: `MemorySessionStore` stands in for the session
//! backend and `InMemoryCatalog` for the product catalog.

use std::sync::Arc;

use orderly_checkout::{
    Basket, BankTransfer, CheckoutError, EmptyOrders, MemorySessionStore, OrderSlot, Sms,
    StrategyDefaults,
};
use orderly_core::{CurrencyCode, Price, ProductId};
use orderly_integration_tests::{catalog_with, logged_in_session, test_user};

// =============================================================================
// Basket Scenario
// =============================================================================

#[tokio::test]
async fn test_add_twice_then_checkout() {
    let session = logged_in_session("scenario").await;
    let basket = Basket::new(session.clone(), catalog_with(&[5]));

    assert!(
        !basket
            .is_product_in_basket(ProductId::new(5))
            .await
            .expect("read basket")
    );

    basket.add_product(ProductId::new(5)).await.expect("add");
    assert!(
        basket
            .is_product_in_basket(ProductId::new(5))
            .await
            .expect("read basket")
    );

    basket.add_product(ProductId::new(5)).await.expect("add again");
    assert_eq!(
        basket.product_ids().await.expect("read basket"),
        vec![ProductId::new(5)]
    );

    let order = basket
        .basket_builder()
        .await
        .expect("builder")
        .build()
        .expect("order");

    assert_eq!(order.products().len(), 1);
    assert_eq!(order.billing().name(), "card");
    assert_eq!(order.discount().name(), "none");
    assert_eq!(order.communication().name(), "email");
    assert_eq!(order.customer(), &test_user());
}

#[tokio::test]
async fn test_checkout_fails_when_catalog_does_not_know_the_product() {
    let session = logged_in_session("stale").await;
    let basket = Basket::new(session, catalog_with(&[]));
    basket.add_product(ProductId::new(5)).await.expect("add");

    let result = basket.basket_builder().await.expect("builder").build();
    assert!(matches!(
        result,
        Err(CheckoutError::IncompleteOrder {
            missing: OrderSlot::Products
        })
    ));
}

#[tokio::test]
async fn test_empty_basket_checkout_when_empty_orders_allowed() {
    let session = logged_in_session("empty").await;
    let basket =
        Basket::new(session, catalog_with(&[1])).with_empty_orders(EmptyOrders::Allow);

    let order = basket
        .basket_builder()
        .await
        .expect("builder")
        .build()
        .expect("empty order is legal under Allow");
    assert!(order.products().is_empty());
}

#[tokio::test]
async fn test_anonymous_checkout_is_refused() {
    let basket = Basket::new(MemorySessionStore::new("guest"), catalog_with(&[1]));
    basket.add_product(ProductId::new(1)).await.expect("add");

    let result = basket.basket_builder().await.expect("builder").build();
    assert!(matches!(result, Err(CheckoutError::Unauthenticated(_))));
}

// =============================================================================
// Repository Pass-through
// =============================================================================

#[tokio::test]
async fn test_products_info_returns_what_the_catalog_knows() {
    let session = logged_in_session("passthrough").await;
    let basket = Basket::new(session, catalog_with(&[1, 3]));
    for id in [1, 2, 3] {
        basket.add_product(ProductId::new(id)).await.expect("add");
    }

    let mut ids: Vec<i64> = basket
        .products_info()
        .await
        .expect("resolve")
        .iter()
        .map(|p| p.id.as_i64())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 3]);
}

// =============================================================================
// Strategy Selection and Processing
// =============================================================================

#[tokio::test]
async fn test_configured_defaults_flow_into_the_receipt() {
    let session = logged_in_session("configured").await;
    let defaults = StrategyDefaults::standard().with_billing(Arc::new(BankTransfer));
    let basket = Basket::new(session, catalog_with(&[1, 2])).with_defaults(defaults);
    basket.add_product(ProductId::new(1)).await.expect("add");
    basket.add_product(ProductId::new(2)).await.expect("add");

    let order = basket
        .basket_builder()
        .await
        .expect("builder")
        .build()
        .expect("order");
    let receipt = order.process().expect("processed");

    assert_eq!(receipt.total, Price::from_cents(2000, CurrencyCode::USD));
    assert_eq!(receipt.payment.method, "bank_transfer");
    assert_eq!(receipt.notification.channel, "email");
    assert_eq!(receipt.notification.recipient, "shopper@orderly.test");
}

#[tokio::test]
async fn test_sms_without_phone_fails_processing() {
    let session = logged_in_session("sms").await;
    let basket = Basket::new(session, catalog_with(&[1]));
    basket.add_product(ProductId::new(1)).await.expect("add");

    let order = basket
        .basket_builder()
        .await
        .expect("builder")
        .communication(Arc::new(Sms))
        .build()
        .expect("order");

    assert!(matches!(
        order.process(),
        Err(CheckoutError::Communication(_))
    ));
}

#[tokio::test]
async fn test_clear_after_checkout() {
    let session = logged_in_session("clear").await;
    let basket = Basket::new(session.clone(), catalog_with(&[1]));
    basket.add_product(ProductId::new(1)).await.expect("add");
    basket
        .basket_builder()
        .await
        .expect("builder")
        .build()
        .expect("order");
    basket.clear().await.expect("clear");

    let fresh = Basket::new(session, catalog_with(&[1]));
    assert!(fresh.product_ids().await.expect("read").is_empty());
}
