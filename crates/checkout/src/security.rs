//! User security: binding an order to an identity.

use core::fmt;

use thiserror::Error;

use orderly_core::CurrentUser;

use crate::session::{SessionError, SessionStore, keys};

/// No authenticated identity is available.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no authenticated user in session")]
pub struct Unauthenticated;

/// Resolves the identity an order is placed for.
pub trait UserSecurity: fmt::Debug + Send + Sync {
    /// The current identity. Must be deterministic for one instance.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` if there is no identity to bind to.
    fn identity(&self) -> Result<CurrentUser, Unauthenticated>;
}

/// Identity taken from a session snapshot.
///
/// The session is read once, when the strategy is created; later changes to
/// the session do not affect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSecurity {
    user: Option<CurrentUser>,
}

impl SessionSecurity {
    /// Snapshot the current user from `session`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session cannot be read.
    pub async fn from_session<S: SessionStore>(session: &S) -> Result<Self, SessionError> {
        let user = session.get::<CurrentUser>(keys::CURRENT_USER).await?;
        Ok(Self { user })
    }

    /// Security for a known user.
    #[must_use]
    pub const fn authenticated(user: CurrentUser) -> Self {
        Self { user: Some(user) }
    }

    /// Security with no logged-in user.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user: None }
    }
}

impl UserSecurity for SessionSecurity {
    fn identity(&self) -> Result<CurrentUser, Unauthenticated> {
        self.user.clone().ok_or(Unauthenticated)
    }
}
