//! Library crate for hangman-back, exposing modules for binaries and integration tests.

/// JSON configuration file.
pub mod config;
/// Storage entities and backends.
pub mod dao;
mod dto;
mod error;
/// HTTP routes.
pub mod routes;
/// Business logic and background jobs.
pub mod services;
/// Shared application state and game domain.
pub mod state;
