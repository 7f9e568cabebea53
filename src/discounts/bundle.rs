//! Bundle Discount
//!
//! "N for M" pricing: once `threshold` items from the same bundle are in the basket,
//! only `quantity_to_pay` of them are charged. The cheapest ones go free.

use std::fmt;

use rusty_money::Money;
use smallvec::SmallVec;

use crate::{basket::Basket, discounts::DiscountId};

/// A set of item names that count together towards a bundle discount.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bundle {
    items: SmallVec<[String; 4]>,
}

impl Bundle {
    /// Create a bundle from item names.
    pub fn new<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Item names in this bundle
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Whether the named item belongs to this bundle.
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item == name)
    }

    /// Whether the bundle names no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn rename_item(&mut self, old: &str, new: &str) {
        for item in self.items.iter_mut().filter(|item| item.as_str() == old) {
            new.clone_into(item);
        }
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.items.join(", "))
    }
}

/// Bundle discount: buy `threshold` from a bundle, pay for `quantity_to_pay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDiscount {
    bundles: Vec<Bundle>,
    threshold: usize,
    quantity_to_pay: usize,
}

impl BundleDiscount {
    /// Create a new bundle discount.
    pub fn new(bundles: Vec<Bundle>, threshold: usize, quantity_to_pay: usize) -> Self {
        Self {
            bundles,
            threshold,
            quantity_to_pay,
        }
    }

    /// Bundles, in the order they are evaluated
    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    /// Items needed from one bundle to trigger the discount
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Items out of `threshold` that are paid for
    pub fn quantity_to_pay(&self) -> usize {
        self.quantity_to_pay
    }

    /// Claim and price eligible items, one bundle at a time.
    ///
    /// For each bundle the first `threshold` unclaimed members (in basket order) are
    /// claimed together; the cheapest `threshold - quantity_to_pay` of those become free.
    /// A bundle with fewer than `threshold` unclaimed members is skipped.
    pub fn apply_to_basket(&self, basket: &mut Basket<'_>, id: DiscountId) {
        let free = self.threshold.saturating_sub(self.quantity_to_pay);

        for bundle in &self.bundles {
            let eligible = basket.unclaimed_indices(|item| bundle.contains(item.name()));

            if eligible.len() < self.threshold {
                continue;
            }

            let mut candidates: SmallVec<[usize; 8]> =
                eligible.into_iter().take(self.threshold).collect();

            // Stable, so equal prices keep basket order.
            candidates.sort_by_key(|&idx| {
                basket
                    .get_item(idx)
                    .map_or(i64::MAX, |item| item.price().to_minor_units())
            });

            for (position, idx) in candidates.into_iter().enumerate() {
                let Some(item) = basket.item_mut(idx) else {
                    continue;
                };

                if position < free {
                    let zero = Money::from_minor(0, item.price().currency());
                    item.claim_at(id, zero);
                } else {
                    item.claim_at_full_price(id);
                }
            }
        }
    }

    pub(crate) fn set_bundles(&mut self, bundles: Vec<Bundle>) {
        self.bundles = bundles;
    }

    pub(crate) fn set_threshold(&mut self, threshold: usize) {
        self.threshold = threshold;
    }

    pub(crate) fn set_quantity_to_pay(&mut self, quantity_to_pay: usize) {
        self.quantity_to_pay = quantity_to_pay;
    }

    pub(crate) fn rename_item(&mut self, old: &str, new: &str) {
        for bundle in &mut self.bundles {
            bundle.rename_item(old, new);
        }
    }
}

impl fmt::Display for BundleDiscount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bundle Discount: {} for {} on ",
            self.threshold, self.quantity_to_pay
        )?;

        for (idx, bundle) in self.bundles.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }

            write!(f, "{bundle}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::items::Item;

    use super::*;

    fn item<'a>(name: &str, price: i64) -> Item<'a> {
        Item::new(name, "test", Money::from_minor(price, GBP))
    }

    fn prices(basket: &Basket<'_>) -> Vec<Option<i64>> {
        basket
            .iter()
            .map(|item| item.discounted_price().map(Money::to_minor_units))
            .collect()
    }

    #[test]
    fn cheapest_item_in_the_group_goes_free() -> TestResult {
        let mut basket = Basket::with_items(
            [item("A", 100), item("A", 100), item("A", 50)],
            GBP,
        )?;

        let discount = BundleDiscount::new(vec![Bundle::new(["A"])], 3, 2);
        discount.apply_to_basket(&mut basket, DiscountId::new(0));

        assert_eq!(prices(&basket), vec![Some(100), Some(100), Some(0)]);
        assert!(
            basket
                .iter()
                .all(|item| item.applied_discount() == Some(DiscountId::new(0)))
        );
        assert_eq!(basket.total_price()?.to_minor_units(), 250);
        assert_eq!(basket.discounted_price()?.to_minor_units(), 200);

        Ok(())
    }

    #[test]
    fn too_few_items_is_a_no_op() -> TestResult {
        let mut basket = Basket::with_items([item("A", 100), item("B", 100)], GBP)?;
        let before = basket.clone();

        let discount = BundleDiscount::new(vec![Bundle::new(["A", "B"])], 3, 2);
        discount.apply_to_basket(&mut basket, DiscountId::new(0));

        assert_eq!(basket, before);

        Ok(())
    }

    #[test]
    fn only_first_threshold_items_in_basket_order_are_claimed() -> TestResult {
        let mut basket = Basket::with_items(
            [item("A", 300), item("B", 200), item("C", 100), item("A", 10)],
            GBP,
        )?;

        let discount = BundleDiscount::new(vec![Bundle::new(["A", "B", "C"])], 3, 2);
        discount.apply_to_basket(&mut basket, DiscountId::new(4));

        // The 10p "A" was scanned fourth, so it is outside the group.
        assert_eq!(prices(&basket), vec![Some(300), Some(200), Some(0), None]);
        assert_eq!(basket.get_item(3)?.applied_discount(), None);

        Ok(())
    }

    #[test]
    fn several_free_items() -> TestResult {
        let mut basket = Basket::with_items(
            [item("A", 40), item("A", 10), item("A", 30), item("A", 20)],
            GBP,
        )?;

        let discount = BundleDiscount::new(vec![Bundle::new(["A"])], 4, 2);
        discount.apply_to_basket(&mut basket, DiscountId::new(0));

        assert_eq!(prices(&basket), vec![Some(40), Some(0), Some(30), Some(0)]);

        Ok(())
    }

    #[test]
    fn claimed_items_are_not_reused_by_later_bundles() -> TestResult {
        let mut basket = Basket::with_items(
            [item("A", 100), item("B", 100), item("B", 100)],
            GBP,
        )?;

        let discount = BundleDiscount::new(
            vec![Bundle::new(["A", "B"]), Bundle::new(["B"])],
            2,
            1,
        );
        discount.apply_to_basket(&mut basket, DiscountId::new(0));

        // First bundle takes A and the first B; one B is left, too few for the second.
        assert_eq!(prices(&basket), vec![Some(0), Some(100), None]);

        Ok(())
    }

    #[test]
    fn already_claimed_items_are_ineligible() -> TestResult {
        let mut basket = Basket::with_items([item("A", 100), item("A", 100)], GBP)?;

        if let Some(first) = basket.item_mut(0) {
            first.claim_at_full_price(DiscountId::new(1));
        }

        let discount = BundleDiscount::new(vec![Bundle::new(["A"])], 2, 1);
        discount.apply_to_basket(&mut basket, DiscountId::new(0));

        assert_eq!(basket.get_item(1)?.applied_discount(), None);

        Ok(())
    }

    #[test]
    fn display_lists_every_bundle() {
        let discount = BundleDiscount::new(
            vec![Bundle::new(["apple", "pear"]), Bundle::new(["plum"])],
            3,
            2,
        );

        assert_eq!(
            discount.to_string(),
            "Bundle Discount: 3 for 2 on [apple, pear], [plum]"
        );
    }
}
