//! Core types for Orderly.
//!
//! This module provides type-safe wrappers for the checkout domain.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
pub use product::Product;
pub use user::CurrentUser;
