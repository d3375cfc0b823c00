//! # Clinic Shared Library
//!
//! Storage and identity building blocks used by the clinic API server.
//!
//! ## Module Organization
//!
//! - `db`: connection pool lifecycle and migrations
//! - `auth`: JWT, password hashing, principal and role checks
//! - `models`: row models for users, beds and departments

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
