//! Row decoders for the customers and purchases files.
//!
//! Every text value is trimmed, ids included. The title code is compared as
//! written and `currency` also loses its surrounding quotes.

use tracing::debug;

use super::{RawRow, Record};
use crate::error::FieldError;
use crate::models::{Customer, Purchase, Title};
use crate::validation::validate_purchase_row;

impl Record for Customer {
    const LABEL: &'static str = "customers";
    const REQUIRED: &'static [&'static str] = &["customer_id", "email"];

    fn decode(row: &RawRow) -> Result<Self, FieldError> {
        Ok(Customer {
            customer_id: row.trimmed("customer_id").to_string(),
            title: Title::from_code(row.value("title")),
            last_name: row.trimmed("lastname").to_string(),
            first_name: row.trimmed("firstname").to_string(),
            postal_code: row.trimmed("postal_code").to_string(),
            city: row.trimmed("city").to_string(),
            email: row.trimmed("email").to_string(),
        })
    }
}

/// A purchase together with the customer id it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRow {
    pub customer_id: String,
    pub purchase: Purchase,
}

impl Record for PurchaseRow {
    const LABEL: &'static str = "purchases";
    const REQUIRED: &'static [&'static str] =
        &["customer_id", "product_id", "quantity", "price", "currency", "date"];

    fn decode(row: &RawRow) -> Result<Self, FieldError> {
        let values = validate_purchase_row(row)?;
        if values.purchased_at.is_none() {
            debug!(line = row.line(), date = row.trimmed("date"), "Date is not YYYY-MM-DD, kept as written");
        }

        Ok(PurchaseRow {
            customer_id: row.trimmed("customer_id").to_string(),
            purchase: Purchase {
                product_id: row.trimmed("product_id").to_string(),
                quantity: values.quantity,
                price: values.price,
                currency: row.trimmed("currency").trim_matches('"').to_string(),
                purchased_at: row.trimmed("date").to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{decode_row, RowOutcome};

    #[test]
    fn test_decode_customer_trims_id() {
        let row = RawRow::from_pairs(
            2,
            &[
                ("customer_id", Some(" C-01 ")),
                ("title", Some("1")),
                ("lastname", Some("Doe")),
                ("firstname", Some("Jane")),
                ("email", Some("jane.doe@example.com")),
            ],
        );
        let customer = Customer::decode(&row).unwrap();
        assert_eq!(customer.customer_id, "C-01");
        assert_eq!(customer.title, Title::Female);
    }

    #[test]
    fn test_decode_purchase_strips_currency_quotes() {
        let row = RawRow::from_pairs(
            4,
            &[
                ("customer_id", Some("1")),
                ("product_id", Some("P1")),
                ("quantity", Some("3")),
                ("price", Some("4.50")),
                ("currency", Some("\"EUR\"")),
                ("date", Some("2023-01-01")),
            ],
        );
        let decoded = PurchaseRow::decode(&row).unwrap();
        assert_eq!(decoded.customer_id, "1");
        assert_eq!(decoded.purchase.currency, "EUR");
        assert_eq!(decoded.purchase.quantity, 3);
        assert_eq!(decoded.purchase.price, 4.5);
    }

    #[test]
    fn test_blank_required_field_skips_before_coercion() {
        let row = RawRow::from_pairs(
            2,
            &[
                ("customer_id", Some("1")),
                ("product_id", Some("P1")),
                ("quantity", Some("not a number")),
                ("price", Some("  ")),
                ("currency", Some("EUR")),
                ("date", Some("2023-01-01")),
            ],
        );
        match decode_row::<PurchaseRow>(&row).unwrap() {
            RowOutcome::Skipped(skip) => assert_eq!(skip.missing_fields, vec!["price"]),
            RowOutcome::Accepted(_) => panic!("row should be skipped"),
        }
    }

    #[test]
    fn test_decode_purchase_trims_every_field() {
        let row = RawRow::from_pairs(
            3,
            &[
                ("customer_id", Some(" 1 ")),
                ("product_id", Some(" P1 ")),
                ("quantity", Some(" 2 ")),
                ("price", Some(" 19.99 ")),
                ("currency", Some(" \"EUR\" ")),
                ("date", Some(" 2023-01-01 ")),
            ],
        );
        let decoded = PurchaseRow::decode(&row).unwrap();
        assert_eq!(decoded.customer_id, "1");
        assert_eq!(decoded.purchase.product_id, "P1");
        assert_eq!(decoded.purchase.currency, "EUR");
        assert_eq!(decoded.purchase.purchased_at, "2023-01-01");
    }

    #[test]
    fn test_other_date_format_is_kept() {
        let row = RawRow::from_pairs(
            6,
            &[
                ("customer_id", Some("2")),
                ("product_id", Some("P2")),
                ("quantity", Some("1")),
                ("price", Some("9.99")),
                ("currency", Some("USD")),
                ("date", Some("01/02/2023")),
            ],
        );
        match decode_row::<PurchaseRow>(&row).unwrap() {
            RowOutcome::Accepted(decoded) => assert_eq!(decoded.purchase.purchased_at, "01/02/2023"),
            RowOutcome::Skipped(_) => panic!("row should be accepted"),
        }
    }
}
