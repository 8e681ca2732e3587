//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag (default: production)
//! - `LOG_FORMAT` - `text` or `json` (default: text)
//! - `CHECKOUT_BILLING` - Default billing method: `card` or `bank_transfer` (default: card)
//! - `CHECKOUT_DISCOUNT` - Default discount policy: `none` (default: none)
//! - `CHECKOUT_COMMUNICATION` - Default channel: `email` or `sms` (default: email)
//! - `CHECKOUT_ALLOW_EMPTY_ORDERS` - Accept orders without products (default: false)
//! - `BASKET_LOCK_IDLE_SECS` - Idle expiry of per-session basket locks (default: 600)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use orderly_checkout::{
    BillingMethod, CommunicationChannel, DiscountPolicy, EmptyOrders, StrategyDefaults,
};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    /// Checkout defaults
    pub checkout: CheckoutConfig,
}

/// Checkout behavior selected at deploy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutConfig {
    pub billing: BillingMethod,
    pub discount: DiscountPolicy,
    pub communication: CommunicationChannel,
    pub allow_empty_orders: bool,
    /// How long an unused basket lock survives.
    pub basket_lock_idle: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database_url = env.database_url("STOREFRONT_DATABASE_URL")?;
        let host = env.parsed("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parsed("STOREFRONT_PORT", "3000")?;
        let base_url = env.required("STOREFRONT_BASE_URL").and_then(|raw| {
            Url::parse(&raw).map_err(|e| invalid("STOREFRONT_BASE_URL", e))
        })?;
        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.or_default("SENTRY_ENVIRONMENT", "production");
        let json_logs = match env.or_default("LOG_FORMAT", "text").trim() {
            "text" => false,
            "json" => true,
            other => return Err(invalid("LOG_FORMAT", format!("unknown format '{other}'"))),
        };
        let checkout = CheckoutConfig::load(&env)?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            sentry_dsn,
            sentry_environment,
            json_logs,
            checkout,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

impl CheckoutConfig {
    fn load<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let idle_secs: u64 = env.parsed("BASKET_LOCK_IDLE_SECS", "600")?;
        if idle_secs == 0 {
            return Err(invalid("BASKET_LOCK_IDLE_SECS", "must be positive"));
        }

        Ok(Self {
            billing: env.parsed("CHECKOUT_BILLING", "card")?,
            discount: env.parsed("CHECKOUT_DISCOUNT", "none")?,
            communication: env.parsed("CHECKOUT_COMMUNICATION", "email")?,
            allow_empty_orders: parse_flag(
                "CHECKOUT_ALLOW_EMPTY_ORDERS",
                &env.or_default("CHECKOUT_ALLOW_EMPTY_ORDERS", "false"),
            )?,
            basket_lock_idle: Duration::from_secs(idle_secs),
        })
    }

    /// Strategy defaults for the configured names.
    #[must_use]
    pub fn strategy_defaults(&self) -> StrategyDefaults {
        StrategyDefaults::from_config(self.billing, self.discount, self.communication)
    }

    /// Empty-order policy for the configured flag.
    #[must_use]
    pub const fn empty_orders(&self) -> EmptyOrders {
        if self.allow_empty_orders {
            EmptyOrders::Allow
        } else {
            EmptyOrders::Reject
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            billing: BillingMethod::default(),
            discount: DiscountPolicy::default(),
            communication: CommunicationChannel::default(),
            allow_empty_orders: false,
            basket_lock_idle: Duration::from_secs(600),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the usual required/optional/default helpers.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable (or its default) with `FromStr`.
    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| invalid(key, e))
    }

    /// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }
}

fn invalid(key: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(invalid(key, format!("expected a boolean, got '{other}'"))),
    }
}
