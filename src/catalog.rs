//! Catalog
//!
//! The items a till can scan, keyed by their unique name. Scanning copies a catalog
//! item into the basket, so later catalog edits never change items already scanned.

use std::fmt;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::items::Item;

/// Errors from catalog edits.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// An item with this name already exists.
    #[error("Item {0:?} already exists")]
    DuplicateName(String),

    /// No item with this name exists.
    #[error("Item {0:?} does not exist")]
    ItemNotFound(String),

    /// Item names must not be blank.
    #[error("Item name must not be empty")]
    EmptyName,

    /// Price in another currency than the catalog.
    #[error("Item {name:?} is priced in {found}, but the catalog uses {expected}")]
    CurrencyMismatch {
        /// Item name
        name: String,

        /// Catalog currency
        expected: &'static str,

        /// Item currency
        found: &'static str,
    },

    /// Prices must not be negative.
    #[error("Item {0:?} has a negative price")]
    NegativePrice(String),
}

/// Partial edit of a catalog item; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemUpdate<'a> {
    /// New unique name
    pub name: Option<String>,

    /// New normal price
    pub price: Option<Money<'a, Currency>>,

    /// New category
    pub category: Option<String>,
}

/// Items available for scanning.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog<'a> {
    items: Vec<Item<'a>>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog priced in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Currency every catalog price is in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Add a new item.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the name is blank or taken, or the price is negative
    /// or in another currency.
    pub fn add(&mut self, mut item: Item<'a>) -> Result<(), CatalogError> {
        if item.name().trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }

        if self.find_item_by_name(item.name()).is_some() {
            return Err(CatalogError::DuplicateName(item.name().to_string()));
        }

        self.check_price(item.name(), item.price())?;

        item.clear_claim();

        self.items.push(item);

        Ok(())
    }

    /// Update an existing item; every field is checked before anything changes.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the item does not exist, the new name is blank or
    /// taken, or the new price is invalid.
    pub fn update(&mut self, name: &str, update: ItemUpdate<'a>) -> Result<(), CatalogError> {
        let position = self
            .position(name)
            .ok_or_else(|| CatalogError::ItemNotFound(name.to_string()))?;

        if let Some(new_name) = &update.name {
            if new_name.trim().is_empty() {
                return Err(CatalogError::EmptyName);
            }

            if new_name != name && self.find_item_by_name(new_name).is_some() {
                return Err(CatalogError::DuplicateName(new_name.clone()));
            }
        }

        if let Some(price) = &update.price {
            self.check_price(name, price)?;
        }

        let Some(item) = self.items.get_mut(position) else {
            return Err(CatalogError::ItemNotFound(name.to_string()));
        };

        if let Some(new_name) = update.name {
            item.set_name(new_name);
        }
        if let Some(price) = update.price {
            item.set_price(price);
        }
        if let Some(category) = update.category {
            item.set_category(category);
        }

        Ok(())
    }

    /// Remove an item, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ItemNotFound`] if no item has this name.
    pub fn remove(&mut self, name: &str) -> Result<Item<'a>, CatalogError> {
        let position = self
            .position(name)
            .ok_or_else(|| CatalogError::ItemNotFound(name.to_string()))?;

        Ok(self.items.remove(position))
    }

    /// Look up an item by its exact name.
    #[must_use]
    pub fn find_item_by_name(&self, name: &str) -> Option<&Item<'a>> {
        self.items.iter().find(|item| item.name() == name)
    }

    /// Iterate over items in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &Item<'a>> {
        self.items.iter()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name() == name)
    }

    fn check_price(&self, name: &str, price: &Money<'_, Currency>) -> Result<(), CatalogError> {
        if price.currency() != self.currency {
            return Err(CatalogError::CurrencyMismatch {
                name: name.to_string(),
                expected: self.currency.iso_alpha_code,
                found: price.currency().iso_alpha_code,
            });
        }

        if price.is_negative() {
            return Err(CatalogError::NegativePrice(name.to_string()));
        }

        Ok(())
    }
}

impl fmt::Display for Catalog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("The catalog is empty.");
        }

        let mut builder = Builder::default();

        builder.push_record(["Item", "Price", "Category"]);

        for item in &self.items {
            builder.push_record([
                item.name().to_string(),
                item.price().to_string(),
                item.category().to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(1..2), Alignment::right());

        write!(f, "{table}")
    }
}
