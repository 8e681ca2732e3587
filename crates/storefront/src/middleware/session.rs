//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions, and adapts the
//! per-request [`Session`] to the checkout crate's [`SessionStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use orderly_checkout::{SessionError, SessionStore};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "orderly_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the `PostgreSQL` session store and its table.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session table cannot be created.
pub async fn create_session_store(pool: &PgPool) -> Result<PostgresStore, sqlx::Error> {
    let store = PostgresStore::new(pool.clone());
    store.migrate().await?;
    Ok(store)
}

/// Create the session layer over `store`.
///
/// Cookies are marked secure only when the base URL is HTTPS.
#[must_use]
pub fn create_session_layer(
    store: PostgresStore,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// A request's tower-sessions [`Session`] as a basket session store.
///
/// The session key is the session id, which only exists once the session has
/// been saved. A brand new visitor therefore has no key until their first
/// response is sent.
#[derive(Debug, Clone)]
pub struct RequestSession(Session);

impl RequestSession {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }
}

impl SessionStore for RequestSession {
    fn session_key(&self) -> Option<String> {
        self.0.id().map(|id| id.to_string())
    }

    async fn get<T>(&self, key: &str) -> Result<Option<T>, SessionError>
    where
        T: DeserializeOwned + Send,
    {
        self.0.get::<T>(key).await.map_err(backend_error)
    }

    async fn set<T>(&self, key: &str, value: T) -> Result<(), SessionError>
    where
        T: Serialize + Send + Sync,
    {
        self.0.insert(key, value).await.map_err(backend_error)
    }

    async fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.0
            .remove::<serde_json::Value>(key)
            .await
            .map(|_| ())
            .map_err(backend_error)
    }
}

fn backend_error(err: tower_sessions::session::Error) -> SessionError {
    SessionError::Backend(err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use orderly_checkout::{Basket, InMemoryCatalog};
    use orderly_core::ProductId;

    use super::*;

    fn fresh(store: &Arc<MemoryStore>) -> Session {
        Session::new(None, store.clone(), None)
    }

    fn basket(session: Session) -> Basket<RequestSession, InMemoryCatalog> {
        Basket::new(RequestSession::new(session), InMemoryCatalog::new(Vec::new()))
    }

    #[tokio::test]
    async fn test_get_set_remove() {
        let store = Arc::new(MemoryStore::default());
        let session = RequestSession::new(fresh(&store));

        assert_eq!(session.get::<Vec<i64>>("basket").await.unwrap(), None);

        session.set("basket", vec![1_i64, 2]).await.unwrap();
        assert_eq!(
            session.get::<Vec<i64>>("basket").await.unwrap(),
            Some(vec![1, 2])
        );

        session.remove("basket").await.unwrap();
        assert_eq!(session.get::<Vec<i64>>("basket").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_undecodable_value_is_backend_error() {
        let store = Arc::new(MemoryStore::default());
        let session = RequestSession::new(fresh(&store));
        session.set("basket", "not a list").await.unwrap();

        let err = session.get::<Vec<i64>>("basket").await.unwrap_err();
        assert!(matches!(err, SessionError::Backend(_)));
    }

    #[tokio::test]
    async fn test_session_key_appears_on_first_save() {
        let store = Arc::new(MemoryStore::default());
        let session = fresh(&store);
        let adapter = RequestSession::new(session.clone());
        assert_eq!(adapter.session_key(), None);

        adapter.set("basket", vec![1_i64]).await.unwrap();
        session.save().await.unwrap();

        let id = session.id().unwrap();
        assert_eq!(adapter.session_key(), Some(id.to_string()));
    }

    #[tokio::test]
    async fn test_saved_basket_is_visible_to_the_next_request() {
        let store = Arc::new(MemoryStore::default());
        let first = fresh(&store);
        basket(first.clone())
            .add_product(ProductId::new(4))
            .await
            .unwrap();
        first.save().await.unwrap();

        let next = Session::new(first.id(), store.clone(), None);
        assert!(
            basket(next)
                .is_product_in_basket(ProductId::new(4))
                .await
                .unwrap()
        );
    }
}
