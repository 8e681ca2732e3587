//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Basket lock (one request at a time per session cookie)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)

pub mod basket_lock;
pub mod session;

pub use basket_lock::serialize_session_requests;
pub use session::{RequestSession, create_session_layer};
