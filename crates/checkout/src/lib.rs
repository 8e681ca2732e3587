//! Orderly Checkout - Session basket and order assembly.
//!
//! A [`Basket`] keeps the product ids a visitor intends to buy in their
//! session. At checkout the basket hands out an [`OrderBuilder`] seeded with
//! the resolved products, the configured default strategies and the session's
//! identity; the builder finalizes into an immutable [`Order`].
//!
//! # Architecture
//!
//! Everything outside the order-assembly logic is a trait:
//!
//! - [`SessionStore`] - key/value session storage (tower-sessions in the
//!   storefront, [`MemorySessionStore`] in tests)
//! - [`ProductRepository`] - batch product lookup
//! - [`Billing`], [`Discount`], [`Communication`], [`UserSecurity`] - the
//!   swappable capabilities an order is composed from
//!
//! # Modules
//!
//! - [`basket`] - Session-backed basket
//! - [`builder`] - `OrderBuilder` and the typed `DraftOrder`
//! - [`order`] - The finalized order and its processing
//! - [`defaults`] - Injected default strategies
//! - [`locks`] - Per-session serialization of basket writes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod basket;
pub mod billing;
pub mod builder;
pub mod catalog;
pub mod communication;
pub mod defaults;
pub mod discount;
pub mod error;
pub mod locks;
pub mod order;
pub mod security;
pub mod session;

pub use basket::Basket;
pub use billing::{BankTransfer, Billing, BillingError, BillingMethod, Card, Payment};
pub use builder::{DraftOrder, EmptyOrders, OrderBuilder};
pub use catalog::{InMemoryCatalog, ProductRepository, RepositoryError};
pub use communication::{
    Communication, CommunicationChannel, CommunicationError, Email, Notification, Sms,
};
pub use defaults::StrategyDefaults;
pub use discount::{Discount, DiscountError, DiscountPolicy, NullDiscount};
pub use error::{CheckoutError, OrderSlot, Result};
pub use locks::BasketLocks;
pub use order::{Order, OrderReceipt};
pub use security::{SessionSecurity, Unauthenticated, UserSecurity};
pub use session::{MemorySessionStore, SessionError, SessionStore};
