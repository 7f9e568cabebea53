//! Bulk Discount

use std::fmt;

use rusty_money::{Money, iso::Currency};

use crate::{basket::Basket, discounts::DiscountId};

/// Bulk discount: `threshold` or more of an item, all at a flat unit price.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDiscount<'a> {
    item: String,
    threshold: usize,
    new_price: Money<'a, Currency>,
}

impl<'a> BulkDiscount<'a> {
    /// Create a new bulk discount.
    pub fn new(item: impl Into<String>, threshold: usize, new_price: Money<'a, Currency>) -> Self {
        Self {
            item: item.into(),
            threshold,
            new_price,
        }
    }

    /// Target item name
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Minimum quantity for the discount to apply
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Flat unit price once the threshold is met
    pub fn new_price(&self) -> &Money<'a, Currency> {
        &self.new_price
    }

    /// Claim every eligible unit at the flat price, if there are at least `threshold`.
    pub fn apply_to_basket(&self, basket: &mut Basket<'_>, id: DiscountId) {
        let eligible = basket.unclaimed_indices(|item| item.name() == self.item);

        if eligible.is_empty() || eligible.len() < self.threshold {
            return;
        }

        for idx in eligible {
            if let Some(item) = basket.item_mut(idx) {
                let price = Money::from_minor(self.new_price.to_minor_units(), item.price().currency());
                item.claim_at(id, price);
            }
        }
    }

    pub(crate) fn set_item(&mut self, item: String) {
        self.item = item;
    }

    pub(crate) fn set_threshold(&mut self, threshold: usize) {
        self.threshold = threshold;
    }

    pub(crate) fn set_new_price(&mut self, new_price: Money<'a, Currency>) {
        self.new_price = new_price;
    }

    pub(crate) fn rename_item(&mut self, old: &str, new: &str) {
        if self.item == old {
            new.clone_into(&mut self.item);
        }
    }
}

impl fmt::Display for BulkDiscount<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bulk Purchase: {} or more \"{}\" for {} each",
            self.threshold, self.item, self.new_price
        )
    }
}
