//! Folkmint storefront library.
//!
//! The JSON API behind the Folkmint handicraft shop: accounts, catalog,
//! reviews, cart and checkout. Exposed as a library so the binary, the CLI
//! and the router tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
