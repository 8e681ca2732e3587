//! Session-backed shopping basket.
//!
//! The session owns the ordered list of product ids under
//! [`keys::BASKET`]; a [`Basket`] is a short-lived view over it, built per
//! request from the request's session handle.

use std::sync::Arc;

use tracing::instrument;

use orderly_core::{Product, ProductId};

use crate::builder::{EmptyOrders, OrderBuilder};
use crate::catalog::ProductRepository;
use crate::defaults::StrategyDefaults;
use crate::error::Result;
use crate::locks::BasketLocks;
use crate::security::SessionSecurity;
use crate::session::{SessionError, SessionStore, keys};

/// A visitor's basket.
#[derive(Debug)]
pub struct Basket<S, R> {
    session: S,
    repository: R,
    defaults: StrategyDefaults,
    empty_orders: EmptyOrders,
    locks: Option<BasketLocks>,
}

impl<S, R> Basket<S, R>
where
    S: SessionStore,
    R: ProductRepository,
{
    /// A basket over `session`, resolving products through `repository`,
    /// with the standard default strategies and no write locking.
    pub fn new(session: S, repository: R) -> Self {
        Self {
            session,
            repository,
            defaults: StrategyDefaults::standard(),
            empty_orders: EmptyOrders::default(),
            locks: None,
        }
    }

    /// Use `defaults` for the optional order slots.
    #[must_use]
    pub fn with_defaults(mut self, defaults: StrategyDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Policy handed to builders for an empty product list.
    #[must_use]
    pub fn with_empty_orders(mut self, policy: EmptyOrders) -> Self {
        self.empty_orders = policy;
        self
    }

    /// Serialize `add_product` per session through `locks`.
    ///
    /// Required whenever requests for one session can run concurrently.
    #[must_use]
    pub fn with_locks(mut self, locks: BasketLocks) -> Self {
        self.locks = Some(locks);
        self
    }

    /// The underlying session handle.
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Add a product. Adding an id that is already present does nothing.
    ///
    /// The id is not checked against the catalog; unknown ids are dropped
    /// later, when the repository resolves them.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session cannot be read or written.
    #[instrument(skip(self), fields(session = ?self.session.session_key()))]
    pub async fn add_product(&self, product_id: ProductId) -> std::result::Result<(), SessionError> {
        let _guard = match (&self.locks, self.session.session_key()) {
            (Some(locks), Some(key)) => Some(locks.acquire(&key).await),
            _ => None,
        };

        let mut ids = self.product_ids().await?;
        if ids.contains(&product_id) {
            tracing::debug!("product already in basket");
            return Ok(());
        }

        ids.push(product_id);
        self.session.set(keys::BASKET, &ids).await?;
        tracing::debug!(count = ids.len(), "product added to basket");
        Ok(())
    }

    /// Whether `product_id` is in the basket.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session cannot be read.
    pub async fn is_product_in_basket(
        &self,
        product_id: ProductId,
    ) -> std::result::Result<bool, SessionError> {
        Ok(self.product_ids().await?.contains(&product_id))
    }

    /// Product ids in insertion order. A fresh session has none.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session cannot be read.
    pub async fn product_ids(&self) -> std::result::Result<Vec<ProductId>, SessionError> {
        Ok(self
            .session
            .get::<Vec<ProductId>>(keys::BASKET)
            .await?
            .unwrap_or_default())
    }

    /// Remove every product from the basket.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session cannot be written.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> std::result::Result<(), SessionError> {
        self.session.remove(keys::BASKET).await
    }

    /// Resolve the basket's products through the repository in one call.
    ///
    /// Returns exactly what the repository returns: ids it does not know are
    /// missing from the result, and ordering is the repository's.
    ///
    /// # Errors
    ///
    /// Session errors, and repository errors unchanged.
    #[instrument(skip(self))]
    pub async fn products_info(&self) -> Result<Vec<Product>> {
        let ids = self.product_ids().await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let products = self.repository.search(&ids).await?;
        if products.len() < ids.len() {
            tracing::warn!(
                requested = ids.len(),
                found = products.len(),
                "basket holds ids unknown to the catalog"
            );
        }
        Ok(products)
    }

    /// A builder for checking out this basket.
    ///
    /// Seeded with the resolved products, the default billing, discount and
    /// communication strategies, and a [`SessionSecurity`] bound to the
    /// session's current user. Any slot can still be overridden before
    /// [`OrderBuilder::build`].
    ///
    /// # Errors
    ///
    /// Session or repository errors while resolving the seed data.
    #[instrument(skip(self))]
    pub async fn basket_builder(&self) -> Result<OrderBuilder> {
        let products = self.products_info().await?;
        let security = SessionSecurity::from_session(&self.session).await?;

        Ok(OrderBuilder::new(self.defaults.clone())
            .products(products)
            .default_billing()
            .default_discounting()
            .default_communication()
            .users_security(Arc::new(security))
            .empty_orders(self.empty_orders))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use orderly_core::{CurrencyCode, CurrentUser, Email, Price, UserId};

    use super::*;
    use crate::billing::BankTransfer;
    use crate::catalog::InMemoryCatalog;
    use crate::error::{CheckoutError, OrderSlot};
    use crate::session::MemorySessionStore;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new([1, 3, 5].map(|id| {
            Product::new(
                ProductId::new(id),
                format!("Product {id}"),
                Price::from_cents(1000, CurrencyCode::USD),
            )
        }))
    }

    fn basket(store: &MemorySessionStore) -> Basket<MemorySessionStore, InMemoryCatalog> {
        Basket::new(store.clone(), catalog())
    }

    async fn log_in(store: &MemorySessionStore) {
        let user = CurrentUser::new(UserId::new(1), Email::parse("buyer@shop.example").unwrap());
        store.set(keys::CURRENT_USER, user).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_session_is_empty_basket() {
        let store = MemorySessionStore::new("s1");
        let basket = basket(&store);
        assert!(basket.product_ids().await.unwrap().is_empty());
        assert!(!basket.is_product_in_basket(ProductId::new(1)).await.unwrap());
        assert!(basket.products_info().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let store = MemorySessionStore::new("s1");
        let basket = basket(&store);
        basket.add_product(ProductId::new(5)).await.unwrap();
        basket.add_product(ProductId::new(5)).await.unwrap();

        assert_eq!(basket.product_ids().await.unwrap(), vec![ProductId::new(5)]);
        assert_eq!(store.raw(keys::BASKET).await, Some(serde_json::json!([5])));
    }

    #[tokio::test]
    async fn test_membership_ignores_insertion_order() {
        let forward = MemorySessionStore::new("a");
        let backward = MemorySessionStore::new("b");
        for id in [1, 2, 3] {
            basket(&forward).add_product(ProductId::new(id)).await.unwrap();
        }
        for id in [3, 2, 1] {
            basket(&backward).add_product(ProductId::new(id)).await.unwrap();
        }

        for id in 0..5 {
            let id = ProductId::new(id);
            assert_eq!(
                basket(&forward).is_product_in_basket(id).await.unwrap(),
                basket(&backward).is_product_in_basket(id).await.unwrap()
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_ids_are_kept_until_resolution() {
        let store = MemorySessionStore::new("s1");
        let basket = basket(&store);
        for id in [1, 2, 3] {
            basket.add_product(ProductId::new(id)).await.unwrap();
        }

        assert!(basket.is_product_in_basket(ProductId::new(2)).await.unwrap());
        let ids: Vec<_> = basket
            .products_info()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id.as_i64())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemorySessionStore::new("s1");
        let basket = basket(&store);
        basket.add_product(ProductId::new(1)).await.unwrap();
        basket.clear().await.unwrap();
        assert!(basket.product_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_builder_is_seeded_with_defaults_and_identity() {
        let store = MemorySessionStore::new("s1");
        log_in(&store).await;
        let basket = basket(&store);
        basket.add_product(ProductId::new(5)).await.unwrap();

        let order = basket.basket_builder().await.unwrap().build().unwrap();
        assert_eq!(order.products().len(), 1);
        assert_eq!(order.billing().name(), "card");
        assert_eq!(order.discount().name(), "none");
        assert_eq!(order.communication().name(), "email");
        assert_eq!(order.customer().id, UserId::new(1));
    }

    #[tokio::test]
    async fn test_builder_slots_can_be_overridden() {
        let store = MemorySessionStore::new("s1");
        log_in(&store).await;
        let basket = basket(&store);
        basket.add_product(ProductId::new(1)).await.unwrap();

        let order = basket
            .basket_builder()
            .await
            .unwrap()
            .billing(Arc::new(BankTransfer))
            .build()
            .unwrap();
        assert_eq!(order.billing().name(), "bank_transfer");
        assert_eq!(order.communication().name(), "email");
    }

    #[tokio::test]
    async fn test_unresolvable_basket_cannot_be_built() {
        let store = MemorySessionStore::new("s1");
        log_in(&store).await;
        let basket = basket(&store);
        basket.add_product(ProductId::new(42)).await.unwrap();

        let err = basket.basket_builder().await.unwrap().build().unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::IncompleteOrder {
                missing: OrderSlot::Products
            }
        ));
    }

    #[tokio::test]
    async fn test_injected_defaults_reach_the_order() {
        let store = MemorySessionStore::new("s1");
        log_in(&store).await;
        let basket = basket(&store)
            .with_defaults(StrategyDefaults::standard().with_billing(Arc::new(BankTransfer)));
        basket.add_product(ProductId::new(3)).await.unwrap();

        let order = basket.basket_builder().await.unwrap().build().unwrap();
        assert_eq!(order.billing().name(), "bank_transfer");
    }
}
