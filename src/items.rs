//! Items

use rusty_money::{Money, iso::Currency};

use crate::discounts::DiscountId;

/// A discount claim on a single item.
///
/// Holding the discount id and the discounted price together means an item can never
/// carry one without the other.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Claim<'a> {
    discount: DiscountId,
    price: Money<'a, Currency>,
}

impl<'a> Claim<'a> {
    /// Id of the discount that claimed the item
    pub fn discount(&self) -> DiscountId {
        self.discount
    }

    /// Price the item is sold at under the claiming discount
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }
}

/// A catalog item, or a scanned copy of one.
#[derive(Clone, Debug, PartialEq)]
pub struct Item<'a> {
    name: String,
    category: String,
    price: Money<'a, Currency>,
    claim: Option<Claim<'a>>,
}

impl<'a> Item<'a> {
    /// Creates a new, unclaimed item.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            claim: None,
        }
    }

    /// Returns the name of the item
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the category of the item
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the normal (undiscounted) price of the item
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Returns the discounted price, if a discount claimed this item.
    pub fn discounted_price(&self) -> Option<&Money<'a, Currency>> {
        self.claim.as_ref().map(Claim::price)
    }

    /// Returns the id of the discount that claimed this item.
    pub fn applied_discount(&self) -> Option<DiscountId> {
        self.claim.map(|claim| claim.discount)
    }

    /// Returns the claim on this item, if any.
    pub fn claim(&self) -> Option<&Claim<'a>> {
        self.claim.as_ref()
    }

    /// The price the customer pays: discounted when claimed, normal otherwise.
    pub fn final_price(&self) -> &Money<'a, Currency> {
        self.discounted_price().unwrap_or(&self.price)
    }

    /// Whether a discount has already claimed this item in the current pricing run.
    pub fn is_claimed(&self) -> bool {
        self.claim.is_some()
    }

    /// Claims the item for a discount at its normal price.
    pub(crate) fn claim_at_full_price(&mut self, discount: DiscountId) {
        self.claim_at(discount, self.price);
    }

    /// Claims the item for a discount at the given price.
    ///
    /// The price is capped at the normal price so a claim never makes an item dearer.
    pub(crate) fn claim_at(&mut self, discount: DiscountId, price: Money<'a, Currency>) {
        let price = if price.to_minor_units() > self.price.to_minor_units() {
            self.price
        } else {
            price
        };

        self.claim = Some(Claim { discount, price });
    }

    /// Drops any discount claim, leaving the item at its normal price.
    pub(crate) fn clear_claim(&mut self) {
        self.claim = None;
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    pub(crate) fn set_price(&mut self, price: Money<'a, Currency>) {
        self.price = price;
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use super::*;

    #[test]
    fn new_item_is_unclaimed() {
        let item = Item::new("apple", "fruit", Money::from_minor(75, GBP));

        assert!(!item.is_claimed());
        assert_eq!(item.discounted_price(), None);
        assert_eq!(item.applied_discount(), None);
        assert_eq!(item.final_price(), &Money::from_minor(75, GBP));
    }

    #[test]
    fn claim_at_sets_price_and_discount_together() {
        let mut item = Item::new("apple", "fruit", Money::from_minor(75, GBP));

        item.claim_at(DiscountId::new(2), Money::from_minor(40, GBP));

        assert_eq!(item.applied_discount(), Some(DiscountId::new(2)));
        assert_eq!(item.discounted_price(), Some(&Money::from_minor(40, GBP)));
        assert_eq!(item.final_price(), &Money::from_minor(40, GBP));
    }

    #[test]
    fn claim_never_raises_the_price() {
        let mut item = Item::new("apple", "fruit", Money::from_minor(75, GBP));

        item.claim_at(DiscountId::new(0), Money::from_minor(90, GBP));

        assert_eq!(item.discounted_price(), Some(&Money::from_minor(75, GBP)));
    }

    #[test]
    fn full_price_claim_keeps_normal_price() {
        let mut item = Item::new("pear", "fruit", Money::from_minor(60, GBP));

        item.claim_at_full_price(DiscountId::new(1));

        assert!(item.is_claimed());
        assert_eq!(item.final_price(), item.price());
    }

    #[test]
    fn clones_are_independent() {
        let original = Item::new("pear", "fruit", Money::from_minor(60, GBP));
        let mut copy = original.clone();

        copy.claim_at(DiscountId::new(0), Money::from_minor(0, GBP));

        assert!(!original.is_claimed());
        assert!(copy.is_claimed());
    }
}
