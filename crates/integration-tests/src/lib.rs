//! Integration tests for Orderly.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p orderly-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `basket_checkout` - Basket to order, end to end, over in-memory
//!   session and catalog
//! - `basket_concurrency` - Concurrent basket writes on one session
//!
//! The helpers below build the shared fixtures.

use orderly_checkout::{InMemoryCatalog, MemorySessionStore, SessionStore, session::keys};
use orderly_core::{CurrencyCode, CurrentUser, Email, Price, Product, ProductId, UserId};

/// A catalog holding products with the given ids, each priced at `$10.00`.
#[must_use]
pub fn catalog_with(ids: &[i64]) -> InMemoryCatalog {
    InMemoryCatalog::new(ids.iter().map(|&id| {
        Product::new(
            ProductId::new(id),
            format!("Product {id}"),
            Price::from_cents(1000, CurrencyCode::USD),
        )
    }))
}

/// The identity tests log in as.
///
/// # Panics
///
/// Never; the address is a valid literal.
#[must_use]
pub fn test_user() -> CurrentUser {
    CurrentUser::new(
        UserId::new(100),
        Email::parse("shopper@orderly.test").expect("valid test email"),
    )
}

/// A session with `test_user()` logged in.
///
/// # Panics
///
/// If the in-memory store rejects the write.
pub async fn logged_in_session(id: &str) -> MemorySessionStore {
    let store = MemorySessionStore::new(id);
    store
        .set(keys::CURRENT_USER, test_user())
        .await
        .expect("store current user");
    store
}
