//! Orderly storefront: the HTTP host for the session basket and checkout.
//!
//! Products come from `PostgreSQL`, baskets live in tower-sessions sessions
//! stored in the same database, and checkout runs the order builder from
//! `orderly-checkout` with defaults taken from configuration.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
