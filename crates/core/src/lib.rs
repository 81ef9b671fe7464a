//! Folkmint Core - Shared domain types.
//!
//! This crate provides the types shared by the Folkmint components:
//! - `storefront` - JSON API for signup, catalog, reviews, cart and checkout
//! - `cli` - Operator tooling (demo catalog seeding, connectivity checks, user creation)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Database encoding for the newtypes is gated behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, email addresses, decimal prices and user roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
