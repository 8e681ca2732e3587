//! Session-stored user identity.

use serde::{Deserialize, Serialize};

use super::{Email, UserId};

/// The logged-in user, as kept in the session by the authentication layer.
///
/// Checkout binds every order to one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Mobile number for SMS notifications, if the user gave one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CurrentUser {
    /// Create an identity without a phone number.
    #[must_use]
    pub const fn new(id: UserId, email: Email) -> Self {
        Self {
            id,
            email,
            phone: None,
        }
    }
}
