//! # Clinic API Server Library
//!
//! Request pipeline for the clinic backend: configuration, the interceptor
//! chain (CORS, authentication), and the resource handlers.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration from environment variables
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Authentication interceptor
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
