//! Domain models for the custsync pipeline.
//!
//! - [`Customer`] - one row of the customers file
//! - [`Title`] - salutation decoded from the raw title code
//! - [`Purchase`] - one row of the purchases file, without its owner key
//! - [`PurchaseIndex`] - purchases grouped by owning customer id
//! - [`CustomerDocument`] - the payload entry sent to the remote API

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

// =============================================================================
// Customer
// =============================================================================

/// Salutation of a customer.
///
/// The customers file stores it as a numeric code where `1` means a woman.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Title {
    Female,
    Male,
}

impl Title {
    /// Decode a raw title code. Only `"1"` maps to [`Title::Female`].
    pub fn from_code(code: &str) -> Self {
        if code == "1" {
            Self::Female
        } else {
            Self::Male
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer as read from the customers file.
///
/// `customer_id` and `email` are never empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub customer_id: String,
    pub title: Title,
    pub last_name: String,
    pub first_name: String,
    pub postal_code: String,
    pub city: String,
    pub email: String,
}

// =============================================================================
// Purchase
// =============================================================================

/// A purchase line. The owning customer is the key it is stored under in a
/// [`PurchaseIndex`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Purchase {
    pub product_id: String,
    pub quantity: i64,
    pub price: f64,
    pub currency: String,
    /// Purchase date as written in the file (`YYYY-MM-DD`).
    pub purchased_at: String,
}

/// Purchases grouped by customer id.
///
/// Keys iterate in first-occurrence order and each sequence keeps file row
/// order. Serializes as a JSON object in key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseIndex {
    order: Vec<String>,
    entries: HashMap<String, Vec<Purchase>>,
}

impl PurchaseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a purchase to a customer's sequence, creating it on first use.
    pub(crate) fn push(&mut self, customer_id: &str, purchase: Purchase) {
        match self.entries.get_mut(customer_id) {
            Some(list) => list.push(purchase),
            None => {
                self.order.push(customer_id.to_string());
                self.entries.insert(customer_id.to_string(), vec![purchase]);
            }
        }
    }

    /// Purchases of one customer, if any were recorded.
    pub fn get(&self, customer_id: &str) -> Option<&[Purchase]> {
        self.entries.get(customer_id).map(Vec::as_slice)
    }

    /// Purchases of one customer; empty when the customer has none.
    pub fn purchases_for(&self, customer_id: &str) -> &[Purchase] {
        self.get(customer_id).unwrap_or(&[])
    }

    pub fn contains_key(&self, customer_id: &str) -> bool {
        self.entries.contains_key(customer_id)
    }

    /// Number of distinct customers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of purchases across all customers.
    pub fn purchase_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Purchase])> {
        self.order
            .iter()
            .map(|id| (id.as_str(), self.purchases_for(id)))
    }
}

impl FromIterator<(String, Purchase)> for PurchaseIndex {
    fn from_iter<I: IntoIterator<Item = (String, Purchase)>>(iter: I) -> Self {
        let mut index = PurchaseIndex::new();
        for (customer_id, purchase) in iter {
            index.push(&customer_id, purchase);
        }
        index
    }
}

impl Serialize for PurchaseIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (customer_id, purchases) in self.iter() {
            map.serialize_entry(customer_id, purchases)?;
        }
        map.end()
    }
}

// =============================================================================
// Outbound Document
// =============================================================================

/// One customer with its purchases, shaped for the remote API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerDocument {
    pub salutation: Title,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub purchases: Vec<Purchase>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn purchase(product_id: &str) -> Purchase {
        Purchase {
            product_id: product_id.into(),
            quantity: 1,
            price: 9.99,
            currency: "EUR".into(),
            purchased_at: "2023-01-02".into(),
        }
    }

    #[test]
    fn test_title_from_code() {
        assert_eq!(Title::from_code("1"), Title::Female);
        assert_eq!(Title::from_code("2"), Title::Male);
        assert_eq!(Title::from_code(""), Title::Male);
        assert_eq!(Title::from_code("F"), Title::Male);
    }

    #[test]
    fn test_title_serializes_as_name() {
        assert_eq!(serde_json::to_value(Title::Female).unwrap(), json!("Female"));
        assert_eq!(Title::Male.to_string(), "Male");
    }

    #[test]
    fn test_index_keeps_insertion_order() {
        let index: PurchaseIndex = vec![
            ("2".to_string(), purchase("P2")),
            ("1".to_string(), purchase("P1")),
            ("2".to_string(), purchase("P3")),
        ]
        .into_iter()
        .collect();

        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["2", "1"]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.purchase_count(), 3);

        let products: Vec<&str> = index
            .purchases_for("2")
            .iter()
            .map(|p| p.product_id.as_str())
            .collect();
        assert_eq!(products, vec!["P2", "P3"]);
    }

    #[test]
    fn test_index_missing_customer_is_empty() {
        let index = PurchaseIndex::new();
        assert!(index.get("42").is_none());
        assert!(index.purchases_for("42").is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_index_serializes_as_object() {
        let index: PurchaseIndex = vec![("7".to_string(), purchase("P1"))].into_iter().collect();
        let value = serde_json::to_value(&index).unwrap();

        assert_eq!(
            value,
            json!({
                "7": [{
                    "product_id": "P1",
                    "quantity": 1,
                    "price": 9.99,
                    "currency": "EUR",
                    "purchased_at": "2023-01-02"
                }]
            })
        );
    }
}
