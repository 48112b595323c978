//! Join customers with their purchases into outbound documents.
//!
//! ```text
//! customers (ordered)          purchase index              documents (customer order)
//! ┌──────────────────┐        ┌──────────────────┐        ┌──────────────────────────┐
//! │ 1 Jane Doe       │        │ 1 → [P1]         │        │ Jane Doe, purchases [P1] │
//! │ 2 John Smith     │   +    │ 3 → [P9]         │   →    │ John Smith, purchases [] │
//! └──────────────────┘        └──────────────────┘        └──────────────────────────┘
//! ```
//!
//! Index entries with no matching customer are not sent.

use crate::models::{Customer, CustomerDocument, PurchaseIndex};

impl CustomerDocument {
    /// Build the document for one customer from its purchases.
    pub fn from_customer(customer: &Customer, purchases: &PurchaseIndex) -> Self {
        Self {
            salutation: customer.title,
            last_name: customer.last_name.clone(),
            first_name: customer.first_name.clone(),
            email: customer.email.clone(),
            purchases: purchases.purchases_for(&customer.customer_id).to_vec(),
        }
    }
}

/// One document per customer, in the order of `customers`.
pub fn format_customers(customers: &[Customer], purchases: &PurchaseIndex) -> Vec<CustomerDocument> {
    customers
        .iter()
        .map(|customer| CustomerDocument::from_customer(customer, purchases))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Purchase, Title};

    fn customer(id: &str, title: Title, last_name: &str, first_name: &str) -> Customer {
        Customer {
            customer_id: id.into(),
            title,
            last_name: last_name.into(),
            first_name: first_name.into(),
            postal_code: String::new(),
            city: String::new(),
            email: format!("{}.{}@example.com", first_name, last_name).to_lowercase(),
        }
    }

    fn purchase(product_id: &str, price: f64, currency: &str, quantity: i64, date: &str) -> Purchase {
        Purchase {
            product_id: product_id.into(),
            quantity,
            price,
            currency: currency.into(),
            purchased_at: date.into(),
        }
    }

    fn sample_customers() -> Vec<Customer> {
        vec![
            customer("1", Title::Female, "Doe", "Jane"),
            customer("2", Title::Male, "Smith", "John"),
        ]
    }

    #[test]
    fn test_format_with_purchases() {
        let index: PurchaseIndex = vec![
            ("1".to_string(), purchase("P1", 19.99, "EUR", 2, "2023-01-01")),
            ("2".to_string(), purchase("P2", 9.99, "USD", 1, "2023-01-02")),
        ]
        .into_iter()
        .collect();

        let docs = format_customers(&sample_customers(), &index);

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].salutation, Title::Female);
        assert_eq!(docs[0].last_name, "Doe");
        assert_eq!(docs[0].email, "jane.doe@example.com");
        assert_eq!(docs[0].purchases.len(), 1);
        assert_eq!(docs[0].purchases[0].product_id, "P1");
        assert_eq!(docs[1].salutation, Title::Male);
        assert_eq!(docs[1].purchases[0].currency, "USD");
    }

    #[test]
    fn test_format_without_purchases() {
        let docs = format_customers(&sample_customers()[..1], &PurchaseIndex::new());

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].salutation, Title::Female);
        assert!(docs[0].purchases.is_empty());
    }

    #[test]
    fn test_format_empty_customers() {
        let index: PurchaseIndex = vec![("1".to_string(), purchase("P1", 19.99, "EUR", 2, "2023-01-01"))]
            .into_iter()
            .collect();

        assert!(format_customers(&[], &index).is_empty());
    }

    #[test]
    fn test_format_unmatched_purchase_key() {
        let index: PurchaseIndex = vec![("2".to_string(), purchase("P2", 9.99, "USD", 1, "2023-01-02"))]
            .into_iter()
            .collect();

        let docs = format_customers(&sample_customers()[..1], &index);

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].salutation, Title::Female);
        assert!(docs[0].purchases.is_empty());
    }

    #[test]
    fn test_format_preserves_customer_order() {
        let mut customers = sample_customers();
        customers.reverse();
        let docs = format_customers(&customers, &PurchaseIndex::new());

        let names: Vec<&str> = docs.iter().map(|d| d.first_name.as_str()).collect();
        assert_eq!(names, vec!["John", "Jane"]);
    }

    #[test]
    fn test_document_json_shape() {
        let index: PurchaseIndex = vec![("1".to_string(), purchase("P1", 19.99, "EUR", 2, "2023-01-01"))]
            .into_iter()
            .collect();
        let docs = format_customers(&sample_customers()[..1], &index);
        let value = serde_json::to_value(&docs[0]).unwrap();

        assert_eq!(value["salutation"], "Female");
        assert_eq!(value["purchases"][0]["purchased_at"], "2023-01-01");
        assert!(value.get("customer_id").is_none());
        assert!(crate::validation::is_valid_document(&value));
    }
}
