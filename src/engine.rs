//! Discount Engine
//!
//! Discount outcomes depend on the order they run in: an earlier discount can claim
//! items a later one needed. The engine therefore tries every ordering of the active
//! discounts on a fresh copy of the basket and keeps the cheapest result.
//!
//! The search is exhaustive and costs `O(d! * n)` for `d` discounts and `n` items, so
//! callers cap the number of active discounts instead of interrupting a run.

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::{
    basket::Basket,
    discounts::{Discount, DiscountId},
    pricing::TotalPriceError,
};

/// Discount ids in the order they were applied.
pub type DiscountOrder = SmallVec<[DiscountId; 8]>;

/// Result of a pricing run.
#[derive(Debug, Clone)]
pub struct PricingOutcome<'a> {
    /// The priced basket
    pub basket: Basket<'a>,

    /// Application order that produced `basket`
    pub order: DiscountOrder,

    /// Number of orderings evaluated
    pub evaluated: usize,
}

/// Runs the best-combination search over a list of active discounts.
#[derive(Debug, Clone, Copy)]
pub struct DiscountEngine<'d, 'a> {
    discounts: &'d [Discount<'a>],
}

impl<'d, 'a> DiscountEngine<'d, 'a> {
    /// Create an engine over the active discount list.
    ///
    /// Each discount's id is its position in `discounts`.
    pub fn new(discounts: &'d [Discount<'a>]) -> Self {
        Self { discounts }
    }

    /// Apply the discounts to a copy of `basket` in the given order.
    ///
    /// Ids not present in the discount list are skipped.
    pub fn apply_in_order(&self, basket: &Basket<'a>, order: &[DiscountId]) -> Basket<'a> {
        order.iter().fold(basket.clone(), |mut priced, &id| {
            if let Some(discount) = self.discounts.get(id.index()) {
                discount.apply_to_basket(&mut priced, id);
            }

            priced
        })
    }

    /// Find the cheapest result over every ordering of the discounts.
    ///
    /// Ties go to the first ordering generated; orderings are generated in
    /// lexicographic order of discount ids. `basket` itself is not modified.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if a priced basket cannot be totalled.
    pub fn best_combination(
        &self,
        basket: &Basket<'a>,
    ) -> Result<PricingOutcome<'a>, TotalPriceError> {
        let mut best: Option<(i64, PricingOutcome<'a>)> = None;
        let mut evaluated = 0;

        for order in Permutations::new(self.discounts.len()) {
            let priced = self.apply_in_order(basket, &order);
            let total = priced.discounted_price()?.to_minor_units();

            evaluated += 1;

            debug!(order = ?ids(&order), total, "evaluated discount order");

            let improves = best
                .as_ref()
                .is_none_or(|(best_total, _)| total < *best_total);

            if improves {
                best = Some((
                    total,
                    PricingOutcome {
                        basket: priced,
                        order,
                        evaluated: 0,
                    },
                ));
            }
        }

        let Some((total, mut outcome)) = best else {
            return Ok(PricingOutcome {
                basket: basket.clone(),
                order: DiscountOrder::new(),
                evaluated,
            });
        };

        outcome.evaluated = evaluated;

        info!(
            order = ?ids(&outcome.order),
            total,
            evaluated,
            "selected cheapest discount order"
        );

        Ok(outcome)
    }
}

fn ids(order: &[DiscountId]) -> SmallVec<[usize; 8]> {
    order.iter().map(|id| id.number()).collect()
}

/// Every ordering of `0..n` as discount ids, in lexicographic order.
///
/// `n == 0` yields a single empty ordering.
#[derive(Debug)]
struct Permutations {
    next: Option<DiscountOrder>,
}

impl Permutations {
    fn new(n: usize) -> Self {
        Self {
            next: Some((0..n).map(DiscountId::new).collect()),
        }
    }
}

impl Iterator for Permutations {
    type Item = DiscountOrder;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        let mut successor = current.clone();
        if advance(&mut successor) {
            self.next = Some(successor);
        }

        Some(current)
    }
}

/// Step `order` to its lexicographic successor; returns false after the last ordering.
fn advance(order: &mut [DiscountId]) -> bool {
    // Rightmost position that is smaller than its right neighbour.
    let Some(pivot) = order.windows(2).rposition(|pair| matches!(pair, [a, b] if a < b)) else {
        return false;
    };

    let Some((head, tail)) = order.split_at_mut_checked(pivot + 1) else {
        return false;
    };

    let Some(pivot_value) = head.last_mut() else {
        return false;
    };

    let pivot_id = *pivot_value;

    // Rightmost element of the tail larger than the pivot; the tail is non-increasing.
    let Some(swap) = tail.iter().rposition(|id| *id > pivot_id) else {
        return false;
    };

    if let Some(larger) = tail.get_mut(swap) {
        std::mem::swap(pivot_value, larger);
    }

    tail.reverse();

    true
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::{
        discounts::{BulkDiscount, Bundle, BundleDiscount, ProgressiveDiscount},
        items::Item,
    };

    use super::*;

    fn numbers(order: &[DiscountId]) -> Vec<usize> {
        order.iter().map(|id| id.index()).collect()
    }

    #[test]
    fn permutations_are_lexicographic() {
        let orders: Vec<Vec<usize>> = Permutations::new(3).map(|o| numbers(&o)).collect();

        assert_eq!(
            orders,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
    }

    #[test]
    fn permutations_count_is_factorial() {
        assert_eq!(Permutations::new(0).count(), 1);
        assert_eq!(Permutations::new(1).count(), 1);
        assert_eq!(Permutations::new(4).count(), 24);
        assert_eq!(Permutations::new(5).count(), 120);
    }

    #[test]
    fn no_discounts_returns_basket_unchanged() -> TestResult {
        let basket = Basket::with_items(
            [Item::new("apple", "fruit", Money::from_minor(75, GBP))],
            GBP,
        )?;

        let outcome = DiscountEngine::new(&[]).best_combination(&basket)?;

        assert_eq!(outcome.basket, basket);
        assert!(outcome.order.is_empty());
        assert_eq!(outcome.evaluated, 1);

        Ok(())
    }

    #[test]
    fn empty_basket_prices_to_zero() -> TestResult {
        let discounts = [Discount::Progressive(ProgressiveDiscount::new("X", 1, 50))];
        let basket = Basket::new(GBP);

        let outcome = DiscountEngine::new(&discounts).best_combination(&basket)?;

        assert!(outcome.basket.is_empty());
        assert_eq!(outcome.basket.discounted_price()?.to_minor_units(), 0);

        Ok(())
    }

    #[test]
    fn order_matters_and_the_cheaper_order_wins() -> TestResult {
        // Bulk first claims every X at 90 (total 270 + 100 = 370).
        // Bundle first makes one X free and claims another, leaving a single X, too few
        // for the bulk rule's threshold of 3 (total 0 + 100 + 100 + 100 = 300).
        let discounts = [
            Discount::Bulk(BulkDiscount::new("X", 3, Money::from_minor(90, GBP))),
            Discount::Bundle(BundleDiscount::new(vec![Bundle::new(["X", "Y"])], 2, 1)),
        ];

        let basket = Basket::with_items(
            [
                Item::new("X", "test", Money::from_minor(100, GBP)),
                Item::new("X", "test", Money::from_minor(100, GBP)),
                Item::new("X", "test", Money::from_minor(100, GBP)),
                Item::new("Y", "test", Money::from_minor(100, GBP)),
            ],
            GBP,
        )?;

        let engine = DiscountEngine::new(&discounts);

        let bulk_first = engine
            .apply_in_order(&basket, &[DiscountId::new(0), DiscountId::new(1)])
            .discounted_price()?
            .to_minor_units();
        let bundle_first = engine
            .apply_in_order(&basket, &[DiscountId::new(1), DiscountId::new(0)])
            .discounted_price()?
            .to_minor_units();

        assert_eq!(bulk_first, 370);
        assert_eq!(bundle_first, 300);

        let outcome = engine.best_combination(&basket)?;

        assert_eq!(outcome.basket.discounted_price()?.to_minor_units(), 300);
        assert_eq!(numbers(&outcome.order), vec![1, 0]);
        assert_eq!(outcome.evaluated, 2);

        Ok(())
    }

    #[test]
    fn ties_keep_the_first_order() -> TestResult {
        let discounts = [
            Discount::Bulk(BulkDiscount::new("X", 1, Money::from_minor(50, GBP))),
            Discount::Bulk(BulkDiscount::new("Y", 1, Money::from_minor(50, GBP))),
        ];

        let basket = Basket::with_items(
            [
                Item::new("X", "test", Money::from_minor(100, GBP)),
                Item::new("Y", "test", Money::from_minor(100, GBP)),
            ],
            GBP,
        )?;

        let outcome = DiscountEngine::new(&discounts).best_combination(&basket)?;

        assert_eq!(numbers(&outcome.order), vec![0, 1]);

        Ok(())
    }

    #[test]
    fn ids_stay_fixed_regardless_of_order() -> TestResult {
        let discounts = [
            Discount::Bulk(BulkDiscount::new("X", 1, Money::from_minor(90, GBP))),
            Discount::Bulk(BulkDiscount::new("X", 1, Money::from_minor(10, GBP))),
        ];

        let basket = Basket::with_items(
            [Item::new("X", "test", Money::from_minor(100, GBP))],
            GBP,
        )?;

        let outcome = DiscountEngine::new(&discounts).best_combination(&basket)?;

        assert_eq!(
            outcome.basket.get_item(0)?.applied_discount(),
            Some(DiscountId::new(1))
        );

        Ok(())
    }

    #[test]
    fn input_basket_is_not_modified() -> TestResult {
        let discounts = [Discount::Bulk(BulkDiscount::new(
            "X",
            1,
            Money::from_minor(10, GBP),
        ))];

        let basket = Basket::with_items(
            [Item::new("X", "test", Money::from_minor(100, GBP))],
            GBP,
        )?;
        let before = basket.clone();

        let _outcome = DiscountEngine::new(&discounts).best_combination(&basket)?;

        assert_eq!(basket, before);

        Ok(())
    }
}
