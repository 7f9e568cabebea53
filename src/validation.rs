//! Input validation
//!
//! Parsing of operator input and the rules a discount must satisfy before it becomes
//! active. The engine itself assumes these rules hold and never re-checks them.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{
    catalog::Catalog,
    discounts::{Bundle, Discount},
};

/// Rejected operator input.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A field that must be a whole, non-negative number was not one.
    #[error("Invalid {field} value: {value:?}")]
    NotANumber {
        /// Field being parsed
        field: &'static str,

        /// The rejected input
        value: String,
    },

    /// Percentage outside 0 to 100.
    #[error("Invalid percentage value: {0} (expected 0 to 100)")]
    PercentageOutOfRange(String),

    /// Bundle discounts need at least one item to trigger.
    #[error("Invalid threshold value: a bundle needs at least one item")]
    ZeroBundleThreshold,

    /// More items paid for than are in the group.
    #[error("Invalid number of items to pay for: {quantity_to_pay} is more than the threshold {threshold}")]
    QuantityExceedsThreshold {
        /// Items paid for
        quantity_to_pay: usize,

        /// Items in the group
        threshold: usize,
    },

    /// No bundle, or a bundle with no items.
    #[error("Invalid bundles: every bundle needs at least one item")]
    EmptyBundle,

    /// Item names not present in the catalog.
    #[error("Invalid input: items {0:?} do not exist")]
    UnknownItems(Vec<String>),

    /// Discount price is in another currency than the catalog.
    #[error("Invalid discounted price: priced in {found}, but the till uses {expected}")]
    CurrencyMismatch {
        /// Catalog currency
        expected: &'static str,

        /// Discount price currency
        found: &'static str,
    },

    /// Discount price below zero.
    #[error("Invalid discounted price: must not be negative")]
    NegativePrice,

    /// Blank item name.
    #[error("Invalid item name: must not be empty")]
    EmptyName,
}

/// Parse a whole, non-negative count such as a threshold.
///
/// # Errors
///
/// Returns [`ValidationError::NotANumber`] unless `value` is all ASCII digits.
pub fn parse_count(value: &str, field: &'static str) -> Result<usize, ValidationError> {
    digits(value, field)?
        .parse()
        .map_err(|_err| not_a_number(value, field))
}

/// Parse an amount in minor currency units, such as `"75"` for 75p.
///
/// # Errors
///
/// Returns [`ValidationError::NotANumber`] unless `value` is all ASCII digits.
pub fn parse_minor_units(value: &str, field: &'static str) -> Result<i64, ValidationError> {
    digits(value, field)?
        .parse()
        .map_err(|_err| not_a_number(value, field))
}

/// Parse a percentage between 0 and 100.
///
/// # Errors
///
/// Returns [`ValidationError::NotANumber`] or [`ValidationError::PercentageOutOfRange`].
pub fn parse_percentage(value: &str) -> Result<u8, ValidationError> {
    let percentage = parse_count(value, "percentage")?;

    u8::try_from(percentage)
        .ok()
        .filter(|percentage| *percentage <= 100)
        .ok_or_else(|| ValidationError::PercentageOutOfRange(value.trim().to_string()))
}

/// Check a discount against the catalog it will run with.
///
/// # Errors
///
/// Returns the first rule the discount breaks.
pub fn validate_discount(
    discount: &Discount<'_>,
    catalog: &Catalog<'_>,
) -> Result<(), ValidationError> {
    match discount {
        Discount::Bundle(bundle) => {
            if bundle.threshold() == 0 {
                return Err(ValidationError::ZeroBundleThreshold);
            }

            if bundle.quantity_to_pay() > bundle.threshold() {
                return Err(ValidationError::QuantityExceedsThreshold {
                    quantity_to_pay: bundle.quantity_to_pay(),
                    threshold: bundle.threshold(),
                });
            }

            if bundle.bundles().is_empty() || bundle.bundles().iter().any(Bundle::is_empty) {
                return Err(ValidationError::EmptyBundle);
            }
        }
        Discount::Progressive(progressive) => {
            if progressive.percentage_off_next() > 100 {
                return Err(ValidationError::PercentageOutOfRange(
                    progressive.percentage_off_next().to_string(),
                ));
            }
        }
        Discount::Bulk(bulk) => {
            let found = bulk.new_price().currency();

            if found != catalog.currency() {
                return Err(ValidationError::CurrencyMismatch {
                    expected: catalog.currency().iso_alpha_code,
                    found: found.iso_alpha_code,
                });
            }

            if bulk.new_price().is_negative() {
                return Err(ValidationError::NegativePrice);
            }
        }
    }

    validate_items_exist(discount.item_names(), catalog)
}

/// Check that every name refers to a catalog item.
///
/// # Errors
///
/// Returns [`ValidationError::UnknownItems`] listing each missing name once, in order.
pub fn validate_items_exist<'n>(
    names: impl IntoIterator<Item = &'n str>,
    catalog: &Catalog<'_>,
) -> Result<(), ValidationError> {
    let mut seen = FxHashSet::default();

    let unknown: Vec<String> = names
        .into_iter()
        .filter(|name| catalog.find_item_by_name(name).is_none() && seen.insert(*name))
        .map(str::to_string)
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::UnknownItems(unknown))
    }
}

fn digits<'v>(value: &'v str, field: &'static str) -> Result<&'v str, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(not_a_number(value, field));
    }

    Ok(trimmed)
}

fn not_a_number(value: &str, field: &'static str) -> ValidationError {
    ValidationError::NotANumber {
        field,
        value: value.trim().to_string(),
    }
}
