//! Validation of purchase rows and outbound documents.
//!
//! # Row validation
//!
//! [`validate_purchase_row`] coerces the typed columns of a purchase row that
//! already passed the presence checks: `price` must be a finite float and
//! `quantity` an integer. The purchase decoder calls it, so a failure here
//! fails the whole parse. The `date` column is read as a `YYYY-MM-DD` date
//! when possible and never rejected; the document schema flags other formats.
//!
//! # Document validation
//!
//! [`validate_document`] checks a formatted document against the embedded
//! JSON Schema (Draft 7) `schemas/customer-document.json`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::FieldError;
use crate::parser::RawRow;

/// Date format of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static DOCUMENT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/customer-document.json"))
        .expect("Invalid embedded schema")
});

/// Coerced values of a purchase row.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseValues {
    pub price: f64,
    pub quantity: i64,
    /// The `date` column as a calendar date, `None` when it is not `YYYY-MM-DD`.
    pub purchased_at: Option<NaiveDate>,
}

/// Coerce the price and quantity of a purchase row and read its date.
///
/// Only the numeric columns can fail. A date in another format is kept by
/// the caller as written.
pub fn validate_purchase_row(row: &RawRow) -> Result<PurchaseValues, FieldError> {
    let raw_price = row.trimmed("price");
    let price = raw_price
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| {
            FieldError::new(row.line(), "expected a decimal number")
                .with_column("price")
                .with_value(raw_price)
        })?;

    let raw_quantity = row.trimmed("quantity");
    let quantity = raw_quantity.parse::<i64>().map_err(|e| {
        FieldError::new(row.line(), e.to_string())
            .with_column("quantity")
            .with_value(raw_quantity)
    })?;

    let purchased_at = NaiveDate::parse_from_str(row.trimmed("date"), DATE_FORMAT).ok();

    Ok(PurchaseValues {
        price,
        quantity,
        purchased_at,
    })
}

/// Validate a JSON value against a JSON Schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with one message per violation
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick check of a value against a JSON Schema.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate one formatted document against the embedded document schema.
pub fn validate_document(document: &Value) -> Result<(), Vec<String>> {
    validate(&DOCUMENT_SCHEMA, document)
}

/// Quick check against the document schema.
pub fn is_valid_document(document: &Value) -> bool {
    is_valid(&DOCUMENT_SCHEMA, document)
}
