//! Configuration loaded from environment variables.
//!
//! - [`cors`]: allowed origins for the browser frontend
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: signing secret and token lifetime for the admin gate

pub mod cors;
pub mod database;
pub mod jwt;
