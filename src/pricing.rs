//! Prices

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::Item;

/// Errors that can occur while calculating total price.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// No items were provided, so currency could not be determined.
    #[error("no items provided; cannot determine currency")]
    NoItems,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the total normal price of a list of items
///
/// # Errors
///
/// - [`TotalPriceError::NoItems`]: No items were provided, so currency could not be determined.
/// - [`TotalPriceError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn total_price<'a>(items: &[Item<'a>]) -> Result<Money<'a, Currency>, TotalPriceError> {
    sum_by(items, Item::price)
}

/// Calculates the total price of a list of items after discounts.
///
/// Unclaimed items count at their normal price.
///
/// # Errors
///
/// - [`TotalPriceError::NoItems`]: No items were provided, so currency could not be determined.
/// - [`TotalPriceError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn discounted_price<'a>(items: &[Item<'a>]) -> Result<Money<'a, Currency>, TotalPriceError> {
    sum_by(items, Item::final_price)
}

fn sum_by<'a>(
    items: &[Item<'a>],
    price: impl for<'i> Fn(&'i Item<'a>) -> &'i Money<'a, Currency>,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    let first = items.first().ok_or(TotalPriceError::NoItems)?;

    let total = items.iter().try_fold(
        Money::from_minor(0, first.price().currency()),
        |acc, item| acc.add(*price(item)),
    )?;

    Ok(total)
}
