//! Storefront - accounts and access control for the shop backend
//!
//! This is the library interface for Storefront: password hashing, bearer
//! tokens, the sign-in and admin gates, account storage and the HTTP API.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use config::Config;
pub use error::Error;
