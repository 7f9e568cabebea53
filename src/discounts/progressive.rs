//! Progressive Discount
//!
//! "Buy N, get the next one at P% off", repeated for every complete group of N + 1.

use std::fmt;

use rusty_money::Money;
use tracing::warn;

use crate::{
    basket::Basket,
    discounts::{DiscountId, percent_of_minor},
};

/// Progressive discount on a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveDiscount {
    item: String,
    threshold: usize,
    percentage_off_next: u8,
}

impl ProgressiveDiscount {
    /// Create a new progressive discount.
    pub fn new(item: impl Into<String>, threshold: usize, percentage_off_next: u8) -> Self {
        Self {
            item: item.into(),
            threshold,
            percentage_off_next,
        }
    }

    /// Target item name
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Items bought at full price before the bonus item
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Percentage taken off the bonus item
    pub fn percentage_off_next(&self) -> u8 {
        self.percentage_off_next
    }

    /// Claim and price eligible items in whole groups of `threshold + 1`.
    ///
    /// One item per complete group is discounted, and the discounted items are the
    /// earliest scanned ones among the claimed set.
    pub fn apply_to_basket(&self, basket: &mut Basket<'_>, id: DiscountId) {
        let eligible = basket.unclaimed_indices(|item| item.name() == self.item);

        let group_size = self.threshold.saturating_add(1);
        let groups = eligible.len() / group_size;

        if groups == 0 {
            return;
        }

        for (position, idx) in eligible.into_iter().take(groups * group_size).enumerate() {
            let Some(item) = basket.item_mut(idx) else {
                continue;
            };

            if position >= groups {
                item.claim_at_full_price(id);
                continue;
            }

            let normal = item.price().to_minor_units();

            match percent_of_minor(self.percentage_off_next, normal) {
                Ok(off) => {
                    let price = Money::from_minor(normal - off, item.price().currency());
                    item.claim_at(id, price);
                }
                Err(err) => {
                    warn!(item = %self.item, %err, "progressive discount left item at full price");
                    item.claim_at_full_price(id);
                }
            }
        }
    }

    pub(crate) fn set_item(&mut self, item: String) {
        self.item = item;
    }

    pub(crate) fn set_threshold(&mut self, threshold: usize) {
        self.threshold = threshold;
    }

    pub(crate) fn set_percentage_off_next(&mut self, percentage_off_next: u8) {
        self.percentage_off_next = percentage_off_next;
    }

    pub(crate) fn rename_item(&mut self, old: &str, new: &str) {
        if self.item == old {
            new.clone_into(&mut self.item);
        }
    }
}

impl fmt::Display for ProgressiveDiscount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Progressive Discount: Buy {} Get 1 at {}% off on \"{}\"",
            self.threshold, self.percentage_off_next, self.item
        )
    }
}
