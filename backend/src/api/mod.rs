//! HTTP API module.
//!
//! This module provides the HTTP server and API types for the custsync backend.

pub mod server;
pub mod types;

pub use server::{router, start_server, AppState};
pub use types::*;
