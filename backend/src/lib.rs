//! # custsync - customer and purchase export to a remote API
//!
//! custsync reads a customers file and a purchases file (`;`-delimited CSV),
//! joins every purchase onto its customer and sends the resulting documents
//! to a remote endpoint with a single HTTP `PUT`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV Files  │────▶│   Parser    │────▶│  Formatter  │────▶│   Client    │
//! │ (customers, │     │ (skip rows, │     │ (join into  │     │ (PUT JSON,  │
//! │  purchases) │     │  coerce)    │     │  documents) │     │ status,body)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use custsync::{run, ApiClient, SendOptions, Settings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let options = SendOptions::from_settings(&Settings::from_env());
//!     let report = run(&ApiClient::new(), &options).await.unwrap();
//!     println!("Response: {}", report.transmission);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Environment settings
//! - [`error`] - Hierarchical error types
//! - [`logging`] - Log file subscriber
//! - [`models`] - Domain models (Customer, Purchase, PurchaseIndex)
//! - [`parser`] - CSV parsing into typed records
//! - [`validation`] - Row coercion and document schema checks
//! - [`transform`] - Formatter and pipeline
//! - [`client`] - Outbound HTTP client
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod logging;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Transformation
pub mod transform;

// Transport
pub mod client;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{CsvError, FieldError, LoggingError, PipelineError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Customer, CustomerDocument, Purchase, PurchaseIndex, Title};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{parse_customers, parse_purchases, Parsed, SkippedRow};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{is_valid_document, validate_document, validate_purchase_row};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{format_customers, prepare, run, run_blocking, PreparedPayload, RunReport, SendOptions};

// =============================================================================
// Re-exports - Client, config, server
// =============================================================================

pub use client::{ApiClient, TransmissionResult};
pub use config::Settings;
pub use api::{start_server, AppState, SendResponse};
