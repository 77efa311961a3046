//! cafelist-server: HTTP server for the café listing service
//!
//! Axum routes over a SQLite store, with JWT-gated writes and a
//! content-similarity recommendation endpoint.

pub mod auth;
pub mod config;
pub mod db;
pub mod http;
pub mod state;

pub use config::ServerConfig;
pub use http::{build_router, run_server, ApiError};
pub use state::AppState;
