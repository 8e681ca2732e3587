//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use orderly_checkout::{CheckoutError, CommunicationError, RepositoryError, SessionError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Basket or checkout operation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        Self::Checkout(err.into())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        Self::Checkout(err.into())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Checkout(err) => match err {
                CheckoutError::IncompleteOrder { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
                CheckoutError::Billing(_) => StatusCode::PAYMENT_REQUIRED,
                CheckoutError::Communication(CommunicationError::NoAddress { .. }) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                CheckoutError::Repository(RepositoryError::Unavailable(_)) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                CheckoutError::Session(_)
                | CheckoutError::Repository(_)
                | CheckoutError::Price(_)
                | CheckoutError::Communication(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Checkout(CheckoutError::Unauthenticated(_)) => {
                "Please sign in to check out".to_string()
            }
            Self::Checkout(CheckoutError::IncompleteOrder { .. }) => {
                "Your basket has nothing to order".to_string()
            }
            Self::Checkout(err @ (CheckoutError::Billing(_) | CheckoutError::Communication(_)))
                if !status.is_server_error() =>
            {
                err.to_string()
            }
            Self::NotFound(_) => self.to_string(),
            _ if status == StatusCode::SERVICE_UNAVAILABLE => {
                "Service temporarily unavailable".to_string()
            }
            _ => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this once the customer is known to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("basket", "Added product", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
