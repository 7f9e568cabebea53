//! Fixtures
//!
//! YAML seed files that stock a till with catalog items and discounts at start-up.
//! Every entry goes through the same checks as operator input.

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::{
    catalog::CatalogError,
    discounts::Discount,
    fixtures::{discounts::DiscountFixture, products::ProductFixture},
    items::Item,
    system::{System, SystemError},
};

pub mod discounts;
pub mod products;

pub use products::{parse_currency, parse_price};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Fixture currency differs from the till currency
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// A product could not be added to the catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A discount was rejected by the till
    #[error(transparent)]
    System(#[from] SystemError),
}

/// Seed file contents
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TillFixture {
    /// Currency code the prices are in; must match the till when given
    #[serde(default)]
    pub currency: Option<String>,

    /// Catalog items, in listing order
    #[serde(default)]
    pub products: Vec<ProductFixture>,

    /// Discounts, in id order
    #[serde(default)]
    pub discounts: Vec<DiscountFixture>,
}

impl TillFixture {
    /// Read and parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse seed YAML.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] if the document does not match the fixture layout.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Stock `system` with the fixture's products, then its discounts.
    ///
    /// # Errors
    ///
    /// Returns an error on a currency mismatch or the first entry the till rejects.
    pub fn apply_to(self, system: &mut System<'_>) -> Result<(), FixtureError> {
        if let Some(code) = &self.currency {
            let currency = parse_currency(code)?;

            if currency != system.currency() {
                return Err(FixtureError::CurrencyMismatch(
                    system.currency().iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }
        }

        let product_count = self.products.len();
        let discount_count = self.discounts.len();

        for product in self.products {
            system.add_item(Item::try_from(product)?)?;
        }

        for discount in self.discounts {
            system.add_discount(Discount::try_from(discount)?)?;
        }

        info!(
            products = product_count,
            discounts = discount_count,
            "loaded till fixture"
        );

        Ok(())
    }
}
