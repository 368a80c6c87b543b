use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pricegate_core::{DomainError, DomainResult, ProductId};

/// Descriptive attributes of a product, without identity.
///
/// This is what callers propose on create/update. A detached copy of it travels
/// inside approval requests until the catalog takes ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Exact decimal price in the catalog currency.
    pub price: Decimal,
    /// Free-form descriptive attributes (e.g. "color" -> "red").
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ProductDetails {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Reject drafts that can never become catalog records.
    ///
    /// Runs before any gating so a malformed proposal never reaches the queue.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        if self.price < Decimal::ZERO {
            return Err(DomainError::validation("price cannot be negative"));
        }

        Ok(())
    }
}

/// A catalog product: identity plus details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub details: ProductDetails,
}

impl Product {
    pub fn new(id: ProductId, details: ProductDetails) -> Self {
        Self { id, details }
    }

    pub fn price(&self) -> Decimal {
        self.details.price
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(price: i64) -> ProductDetails {
        ProductDetails::new("Desk Lamp", Decimal::new(price, 0))
    }

    #[test]
    fn validate_accepts_well_formed_details() {
        assert_eq!(details(100).validate(), Ok(()));
        assert_eq!(details(0).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_blank_name() {
        let d = ProductDetails::new("   ", Decimal::new(10, 0));
        match d.validate().unwrap_err() {
            DomainError::Validation(_) => {}
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_negative_price() {
        let d = ProductDetails::new("Chair", Decimal::new(-1, 2));
        match d.validate().unwrap_err() {
            DomainError::Validation(msg) => assert!(msg.contains("negative")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn product_json_flattens_details() {
        let product = Product::new(
            ProductId::new(3),
            details(1250)
                .with_description("brass")
                .with_attribute("color", "gold"),
        );

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Desk Lamp");
        assert_eq!(json["price"], "1250");
        assert_eq!(json["attributes"]["color"], "gold");

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn details_default_optional_fields_when_absent() {
        let d: ProductDetails =
            serde_json::from_str(r#"{"name":"Stool","price":"19.99"}"#).unwrap();
        assert_eq!(d.price, Decimal::new(1999, 2));
        assert!(d.description.is_empty());
        assert!(d.attributes.is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: any non-blank name with a non-negative price validates.
            #[test]
            fn non_negative_prices_validate(
                name in "[A-Za-z][A-Za-z0-9 ]{0,40}",
                cents in 0i64..100_000_000
            ) {
                let d = ProductDetails::new(name, Decimal::new(cents, 2));
                prop_assert!(d.validate().is_ok());
            }
        }
    }
}
