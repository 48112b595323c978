//! High-level pipeline: parse, join, format, validate, transmit.
//!
//! # Example
//!
//! ```rust,ignore
//! use custsync::{run, ApiClient, SendOptions, Settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = SendOptions::from_settings(&Settings::from_env());
//!     let report = run(&ApiClient::new(), &options).await?;
//!     println!("Response: {}", report.transmission);
//!     Ok(())
//! }
//! ```
//!
//! Parse and format failures are returned as [`PipelineError`]. The transmit
//! step cannot fail; its outcome is always carried in [`RunReport`].
//!
//! [`run`] reads the files on tokio's blocking pool. [`prepare`] and the
//! `load_*` functions are synchronous.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use super::formatter::format_customers;
use crate::client::{ApiClient, TransmissionResult};
use crate::config::Settings;
use crate::error::PipelineResult;
use crate::models::{Customer, PurchaseIndex};
use crate::parser::{parse_customers, parse_purchases};
use crate::validation::validate_document;

/// Inputs of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendOptions {
    pub customers_file: PathBuf,
    pub purchases_file: PathBuf,
    pub api_url: String,
}

impl SendOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            customers_file: settings.customers_file.clone(),
            purchases_file: settings.purchases_file.clone(),
            api_url: settings.api_url.clone(),
        }
    }
}

/// Formatted payload and what was dropped while building it.
#[derive(Debug, Clone)]
pub struct PreparedPayload {
    /// JSON array of customer documents, in customers file order.
    pub payload: Value,
    pub document_count: usize,
    pub skipped_customers: usize,
    pub skipped_purchases: usize,
    /// Documents that failed schema validation. They are still sent.
    pub invalid_documents: usize,
}

/// Outcome of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub document_count: usize,
    pub skipped_customers: usize,
    pub skipped_purchases: usize,
    pub invalid_documents: usize,
    pub transmission: TransmissionResult,
}

/// Load the customers file.
pub fn load_customers(path: &Path) -> PipelineResult<Vec<Customer>> {
    Ok(parse_customers(path)?.records)
}

/// Load the purchases file as an index.
pub fn load_purchases(path: &Path) -> PipelineResult<PurchaseIndex> {
    Ok(parse_purchases(path)?.records)
}

/// Parse both files, join them and shape the payload.
pub fn prepare(customers_file: &Path, purchases_file: &Path) -> PipelineResult<PreparedPayload> {
    let customers = parse_customers(customers_file)?;
    info!("Customers: {} parsed, {} skipped", customers.records.len(), customers.skipped.len());

    let purchases = parse_purchases(purchases_file)?;
    info!(
        "Purchases: {} for {} customers, {} skipped",
        purchases.records.purchase_count(),
        purchases.records.len(),
        purchases.skipped.len()
    );

    let documents = format_customers(&customers.records, &purchases.records);
    let payload = serde_json::to_value(&documents)?;
    info!("Formatted {} documents", documents.len());

    let invalid_documents = payload.as_array().map_or(0, |docs| count_invalid(docs));

    Ok(PreparedPayload {
        payload,
        document_count: documents.len(),
        skipped_customers: customers.skipped.len(),
        skipped_purchases: purchases.skipped.len(),
        invalid_documents,
    })
}

/// Run the whole pipeline once.
pub async fn run(client: &ApiClient, options: &SendOptions) -> PipelineResult<RunReport> {
    let run_id = Uuid::new_v4().to_string();
    let span = info_span!("pipeline", run_id = %run_id);

    async move {
        info!(
            customers = %options.customers_file.display(),
            purchases = %options.purchases_file.display(),
            "Starting pipeline run"
        );

        let (customers_file, purchases_file) = (options.customers_file.clone(), options.purchases_file.clone());
        let prepared = run_blocking(move || prepare(&customers_file, &purchases_file)).await?;

        info!("Sending formatted data to {}", options.api_url);
        let transmission = client.send(&options.api_url, &prepared.payload).await;
        info!(status = transmission.status, "Pipeline run finished");

        Ok(RunReport {
            run_id,
            document_count: prepared.document_count,
            skipped_customers: prepared.skipped_customers,
            skipped_purchases: prepared.skipped_purchases,
            invalid_documents: prepared.invalid_documents,
            transmission,
        })
    }
    .instrument(span)
    .await
}

/// Run a file-reading step on the blocking pool, inside the caller's span.
pub async fn run_blocking<T, F>(step: F) -> PipelineResult<T>
where
    F: FnOnce() -> PipelineResult<T> + Send + 'static,
    T: Send + 'static,
{
    let span = Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(step)).await?
}

/// Validate every document and log the first few failures.
fn count_invalid(documents: &[Value]) -> usize {
    let mut invalid = 0;
    for (i, doc) in documents.iter().enumerate() {
        if let Err(errs) = validate_document(doc) {
            invalid += 1;
            if invalid <= 3 {
                warn!(document = i, "Document failed validation: {}", errs.join(", "));
            }
        }
    }
    if invalid > 0 {
        warn!("{} documents failed validation", invalid);
    }
    invalid
}
