//! Till System
//!
//! Owns the catalog, the active discounts and the live basket, and enforces the rules
//! that keep them consistent: discounts only ever reference catalog items, and at most
//! `max_discounts` of them are active so the exhaustive search stays bounded.

use std::io;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    basket::{Basket, BasketError},
    catalog::{Catalog, CatalogError, ItemUpdate},
    discounts::{Discount, DiscountError, DiscountId, DiscountPatch},
    engine::{DiscountEngine, PricingOutcome},
    items::Item,
    pricing::TotalPriceError,
    receipt::{Denomination, Receipt, ReceiptError},
    validation::{ValidationError, parse_minor_units, validate_discount},
};

/// Default cap on active discounts.
pub const DEFAULT_MAX_DISCOUNTS: usize = 8;

/// Errors from till operations.
#[derive(Debug, Error)]
pub enum SystemError {
    /// Catalog edit failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Input or discount failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Discount edit failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Basket operation failed.
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// Basket could not be totalled.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Receipt could not be built.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// The active discount list is full.
    #[error("Cannot add the discount: at most {0} discounts can be active")]
    TooManyDiscounts(usize),

    /// No discount with this 1-based number.
    #[error("Discount {0} does not exist")]
    DiscountNotFound(usize),

    /// The item is still referenced by an active discount.
    #[error("Cannot remove {name:?}: it is used by discount {discount}")]
    ItemInUse {
        /// Item name
        name: String,

        /// First discount referencing it
        discount: DiscountId,
    },

    /// Scanned names not present in the catalog.
    #[error("Cannot scan: items {0:?} do not exist")]
    UnknownItems(Vec<String>),
}

/// A finalized sale: the cheapest priced basket and its receipt.
#[derive(Debug, Clone)]
pub struct Sale<'a> {
    /// Winning pricing run
    pub outcome: PricingOutcome<'a>,

    /// Totals for the priced basket
    pub receipt: Receipt<'a>,
}

impl Sale<'_> {
    /// Print the receipt for this sale.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the receipt cannot be written.
    pub fn write_to(
        &self,
        out: impl io::Write,
        denomination: &Denomination,
    ) -> Result<(), ReceiptError> {
        self.receipt
            .write_to(out, &self.outcome.basket, denomination)
    }
}

/// Till state: catalog, active discounts and the live basket.
#[derive(Debug, Clone)]
pub struct System<'a> {
    catalog: Catalog<'a>,
    discounts: Vec<Discount<'a>>,
    basket: Basket<'a>,
    max_discounts: usize,
}

impl<'a> System<'a> {
    /// Create an empty till priced in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency, max_discounts: usize) -> Self {
        Self {
            catalog: Catalog::new(currency),
            discounts: Vec::new(),
            basket: Basket::new(currency),
            max_discounts,
        }
    }

    /// Currency for every price in the till.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.catalog.currency()
    }

    /// The item catalog
    #[must_use]
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// Active discounts; a discount's id is its position here.
    #[must_use]
    pub fn discounts(&self) -> &[Discount<'a>] {
        &self.discounts
    }

    /// The live basket
    #[must_use]
    pub fn basket(&self) -> &Basket<'a> {
        &self.basket
    }

    /// Maximum number of active discounts.
    #[must_use]
    pub fn max_discounts(&self) -> usize {
        self.max_discounts
    }

    /// Add a catalog item.
    ///
    /// # Errors
    ///
    /// Returns a [`SystemError`] if the name is taken or the price is not a whole number
    /// of minor units.
    pub fn add_catalog_item(
        &mut self,
        name: &str,
        price: &str,
        category: &str,
    ) -> Result<(), SystemError> {
        let price = self.parse_price(price)?;

        self.add_item(Item::new(name.trim(), category.trim(), price))?;

        Ok(())
    }

    /// Add an already priced item to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the name is taken or the price is invalid.
    pub fn add_item(&mut self, item: Item<'a>) -> Result<(), CatalogError> {
        let name = item.name().to_string();

        self.catalog.add(item)?;

        info!(item = %name, "added catalog item");

        Ok(())
    }

    /// Update a catalog item; `"-"` leaves a field unchanged.
    ///
    /// A rename is carried into every active discount that refers to the item.
    ///
    /// # Errors
    ///
    /// Returns a [`SystemError`] if the item does not exist, the new name is taken or the
    /// new price is invalid. Nothing changes on error.
    pub fn update_catalog_item(
        &mut self,
        name: &str,
        new_name: &str,
        new_price: &str,
        new_category: &str,
    ) -> Result<(), SystemError> {
        let name = name.trim();

        let update = ItemUpdate {
            name: unchanged_or(new_name).map(str::to_string),
            price: unchanged_or(new_price)
                .map(|price| self.parse_price(price))
                .transpose()?,
            category: unchanged_or(new_category).map(str::to_string),
        };

        let rename = update.name.clone().filter(|new_name| new_name != name);

        self.catalog.update(name, update)?;

        if let Some(new_name) = rename {
            for discount in &mut self.discounts {
                discount.rename_item(name, &new_name);
            }

            info!(item = name, new_name = %new_name, "renamed catalog item");
        }

        Ok(())
    }

    /// Remove a catalog item.
    ///
    /// # Errors
    ///
    /// Returns a [`SystemError`] if the item does not exist or an active discount still
    /// refers to it.
    pub fn remove_catalog_item(&mut self, name: &str) -> Result<(), SystemError> {
        let name = name.trim();

        if let Some(position) = self.discounts.iter().position(|d| d.references(name)) {
            return Err(SystemError::ItemInUse {
                name: name.to_string(),
                discount: DiscountId::new(position),
            });
        }

        self.catalog.remove(name)?;

        info!(item = name, "removed catalog item");

        Ok(())
    }

    /// Validate and activate a discount.
    ///
    /// # Errors
    ///
    /// Returns a [`SystemError`] if the discount is invalid or the active list is full.
    pub fn add_discount(&mut self, discount: Discount<'a>) -> Result<DiscountId, SystemError> {
        if self.discounts.len() >= self.max_discounts {
            return Err(SystemError::TooManyDiscounts(self.max_discounts));
        }

        validate_discount(&discount, &self.catalog)?;

        let id = DiscountId::new(self.discounts.len());

        info!(%id, %discount, "added discount");

        self.discounts.push(discount);

        Ok(id)
    }

    /// Edit the discount with the given 1-based number.
    ///
    /// The patched discount is validated before it replaces the original.
    ///
    /// # Errors
    ///
    /// Returns a [`SystemError`] if there is no such discount, the patch does not fit its
    /// kind, or the result is invalid.
    pub fn edit_discount(
        &mut self,
        number: usize,
        patch: DiscountPatch<'a>,
    ) -> Result<(), SystemError> {
        let slot = number
            .checked_sub(1)
            .and_then(|index| self.discounts.get_mut(index))
            .ok_or(SystemError::DiscountNotFound(number))?;

        let mut edited = slot.clone();
        edited.apply_patch(patch)?;

        validate_discount(&edited, &self.catalog)?;

        info!(number, discount = %edited, "edited discount");

        *slot = edited;

        Ok(())
    }

    /// Remove the discount with the given 1-based number; later discounts move up one.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::DiscountNotFound`] if there is no such discount.
    pub fn remove_discount(&mut self, number: usize) -> Result<Discount<'a>, SystemError> {
        let index = number
            .checked_sub(1)
            .filter(|index| *index < self.discounts.len())
            .ok_or(SystemError::DiscountNotFound(number))?;

        let removed = self.discounts.remove(index);

        info!(number, discount = %removed, "removed discount");

        Ok(removed)
    }

    /// One line per active discount, `"<n>. <description>"`.
    #[must_use]
    pub fn discount_listing(&self) -> String {
        if self.discounts.is_empty() {
            return "No active discounts.".to_string();
        }

        self.discounts
            .iter()
            .enumerate()
            .map(|(idx, discount)| format!("{}. {discount}", DiscountId::new(idx)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Scan a batch of items by name, in order.
    ///
    /// Names are trimmed and blank entries ignored. If any name is unknown nothing is
    /// scanned. Returns the number of items added.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::UnknownItems`] listing every unknown name.
    pub fn scan_items<'n>(
        &mut self,
        names: impl IntoIterator<Item = &'n str>,
    ) -> Result<usize, SystemError> {
        let names: Vec<&str> = names
            .into_iter()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        let unknown: Vec<String> = names
            .iter()
            .filter(|name| self.catalog.find_item_by_name(name).is_none())
            .map(|name| (*name).to_string())
            .collect();

        if !unknown.is_empty() {
            warn!(?unknown, "rejected scan of unknown items");

            return Err(SystemError::UnknownItems(unknown));
        }

        let scanned: Vec<Item<'a>> = names
            .iter()
            .filter_map(|name| self.catalog.find_item_by_name(name).cloned())
            .collect();

        let count = scanned.len();

        for item in scanned {
            self.basket.push(item)?;
        }

        debug!(count, basket = self.basket.len(), "scanned items");

        Ok(count)
    }

    /// Sum of normal prices in the live basket.
    ///
    /// # Errors
    ///
    /// Returns a [`SystemError`] if the basket cannot be totalled.
    pub fn running_total(&self) -> Result<Money<'a, Currency>, SystemError> {
        Ok(self.basket.total_price()?)
    }

    /// Price the live basket with the cheapest discount order and empty it.
    ///
    /// # Errors
    ///
    /// Returns a [`SystemError`] if pricing fails; the basket is kept in that case.
    pub fn finalize(&mut self) -> Result<Sale<'a>, SystemError> {
        let outcome = DiscountEngine::new(&self.discounts).best_combination(&self.basket)?;
        let receipt = Receipt::from_basket(&outcome.basket)?;

        self.basket.clear();

        Ok(Sale { outcome, receipt })
    }

    /// Empty the live basket without pricing it.
    pub fn discard(&mut self) {
        debug!(items = self.basket.len(), "discarded basket");

        self.basket.clear();
    }

    fn parse_price(&self, price: &str) -> Result<Money<'a, Currency>, SystemError> {
        let minor = parse_minor_units(price, "price")?;

        Ok(Money::from_minor(minor, self.currency()))
    }
}

fn unchanged_or(value: &str) -> Option<&str> {
    let value = value.trim();

    (value != "-").then_some(value)
}
