//! Orderly Core - Shared domain types.
//!
//! This crate provides the types shared by every Orderly component:
//! - `checkout` - Session basket and order assembly
//! - `storefront` - HTTP host for the basket and checkout flow
//!
//! # Architecture
//!
//! The core crate contains only plain data types - no I/O, no sessions,
//! no database access. Behaviour (strategies, repositories) lives in
//! `orderly-checkout`.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, emails, products and user identities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
