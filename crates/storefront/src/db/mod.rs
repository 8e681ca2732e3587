//! Database operations for storefront `PostgreSQL`.
//!
//! ## Tables
//!
//! - `storefront.product` - Catalog read by the basket
//! - `tower_sessions.session` - Tower-sessions storage (created by the store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and embedded with
//! [`MIGRATOR`]; the server applies them on startup.

mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

pub use products::PgProductRepository;

/// Embedded storefront migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
