//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use tower_sessions::Session;

use orderly_checkout::{Basket, BasketLocks, StrategyDefaults};

use crate::config::StorefrontConfig;
use crate::db::PgProductRepository;
use crate::middleware::RequestSession;

/// The basket type handed to route handlers.
pub type StoreBasket = Basket<RequestSession, PgProductRepository>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    products: PgProductRepository,
    locks: BasketLocks,
    defaults: StrategyDefaults,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Checkout defaults and the basket lock registry are built once here
    /// from `config.checkout`.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let products = PgProductRepository::new(pool.clone());
        let locks = BasketLocks::with_idle(config.checkout.basket_lock_idle);
        let defaults = config.checkout.strategy_defaults();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                products,
                locks,
                defaults,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn products(&self) -> &PgProductRepository {
        &self.inner.products
    }

    /// Per-session lock registry used by
    /// [`serialize_session_requests`](crate::middleware::serialize_session_requests).
    #[must_use]
    pub fn locks(&self) -> &BasketLocks {
        &self.inner.locks
    }

    /// The basket stored in `session`, wired to the shared catalog and
    /// checkout defaults.
    ///
    /// The basket takes no lock of its own: the request already holds its
    /// session's lock for its whole lifetime, and the registry is not
    /// reentrant.
    #[must_use]
    pub fn basket(&self, session: Session) -> StoreBasket {
        Basket::new(RequestSession::new(session), self.inner.products.clone())
            .with_defaults(self.inner.defaults.clone())
            .with_empty_orders(self.inner.config.checkout.empty_orders())
    }
}
