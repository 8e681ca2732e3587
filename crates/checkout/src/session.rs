//! Session storage abstraction.
//!
//! The basket never owns its data: the session does. A [`SessionStore`] is
//! the per-request handle onto that session, with typed get/set over JSON
//! values (the same model `tower-sessions` uses).

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;

/// Session keys used by checkout.
pub mod keys {
    /// Key for the ordered list of product ids in the basket.
    pub const BASKET: &str = "basket";

    /// Key for the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

/// Errors raised by a session backend.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A stored value could not be (de)serialized.
    #[error("session value for `{key}` is invalid: {source}")]
    Serialization {
        /// Session key involved.
        key: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The backing store failed.
    #[error("session backend error: {0}")]
    Backend(String),
}

/// Per-request handle onto a visitor's session.
pub trait SessionStore: Send + Sync {
    /// Stable key identifying the session, if it has one yet.
    ///
    /// Used to serialize concurrent writers; a session without a key (never
    /// saved, no cookie issued) cannot be shared between requests.
    fn session_key(&self) -> Option<String>;

    /// Read a value. A missing key is `Ok(None)`.
    fn get<T>(&self, key: &str) -> impl Future<Output = Result<Option<T>, SessionError>> + Send
    where
        T: DeserializeOwned + Send;

    /// Write a value, replacing any previous one.
    fn set<T>(&self, key: &str, value: T) -> impl Future<Output = Result<(), SessionError>> + Send
    where
        T: Serialize + Send + Sync;

    /// Delete a value.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// In-process session store.
///
/// Clones share the same data, so several `Basket` views built from clones
/// behave like concurrent requests on one session.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    id: Option<String>,
    data: Arc<Mutex<HashMap<String, serde_json::Value>>>,
}

impl MemorySessionStore {
    /// Create an empty session with the given key.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            data: Arc::default(),
        }
    }

    /// Create an empty session that has no key yet.
    #[must_use]
    pub fn unsaved() -> Self {
        Self {
            id: None,
            data: Arc::default(),
        }
    }

    /// Raw JSON stored under `key`, for assertions.
    pub async fn raw(&self, key: &str) -> Option<serde_json::Value> {
        self.data.lock().await.get(key).cloned()
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::unsaved()
    }
}

impl SessionStore for MemorySessionStore {
    fn session_key(&self) -> Option<String> {
        self.id.clone()
    }

    async fn get<T>(&self, key: &str) -> Result<Option<T>, SessionError>
    where
        T: DeserializeOwned + Send,
    {
        let value = self.data.lock().await.get(key).cloned();
        value
            .map(serde_json::from_value)
            .transpose()
            .map_err(|source| SessionError::Serialization {
                key: key.to_owned(),
                source,
            })
    }

    async fn set<T>(&self, key: &str, value: T) -> Result<(), SessionError>
    where
        T: Serialize + Send + Sync,
    {
        let value = serde_json::to_value(value).map_err(|source| SessionError::Serialization {
            key: key.to_owned(),
            source,
        })?;
        self.data.lock().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.data.lock().await.remove(key);
        Ok(())
    }
}
