//! Operator input parsing
//!
//! Turns comma separated answers into discounts and patches. A lone `-` in an edit
//! leaves that field unchanged.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    discounts::{
        BulkDiscount, Bundle, BundleDiscount, Discount, DiscountKind, DiscountPatch,
        DiscountTarget, DiscountValue, ProgressiveDiscount,
    },
    system::SystemError,
    validation::{ValidationError, parse_count, parse_minor_units, parse_percentage},
};

/// Marks a field that an edit leaves unchanged.
pub const UNCHANGED: &str = "-";

/// Rejected operator input.
#[derive(Debug, Error)]
pub enum InputError {
    /// Wrong number of comma separated values.
    #[error("Invalid input: expected {expected} values separated with commas, got {found}")]
    FieldCount {
        /// Values expected
        expected: usize,

        /// Values given
        found: usize,
    },

    /// Unrecognised discount type.
    #[error("Invalid discount type: {0:?} (expected bundle, progressive or bulk)")]
    UnknownKind(String),

    /// A value failed to parse.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The till rejected the request.
    #[error(transparent)]
    System(#[from] SystemError),
}

/// Split a line into exactly `N` trimmed, comma separated fields.
///
/// # Errors
///
/// Returns [`InputError::FieldCount`] if there are more or fewer than `N` fields.
pub fn split_fields<const N: usize>(line: &str) -> Result<[&str; N], InputError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let found = fields.len();

    <[&str; N]>::try_from(fields).map_err(|_fields| InputError::FieldCount { expected: N, found })
}

/// Parse a discount type name.
///
/// # Errors
///
/// Returns [`InputError::UnknownKind`] for anything but bundle, progressive or bulk.
pub fn parse_kind(value: &str) -> Result<DiscountKind, InputError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "bundle" => Ok(DiscountKind::Bundle),
        "progressive" => Ok(DiscountKind::Progressive),
        "bulk" => Ok(DiscountKind::Bulk),
        _ => Err(InputError::UnknownKind(value.trim().to_string())),
    }
}

/// Parse bundles written as `a, b; c, d`. Blank bundles are skipped.
pub fn parse_bundles(line: &str) -> Vec<Bundle> {
    line.split(';')
        .filter(|bundle| !bundle.trim().is_empty())
        .map(|bundle| {
            Bundle::new(
                bundle
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty()),
            )
        })
        .collect()
}

/// Build a bundle discount from `threshold, quantity_to_pay` and a bundles line.
///
/// # Errors
///
/// Returns an [`InputError`] if either line is malformed.
pub fn bundle_discount<'a>(counts: &str, bundles: &str) -> Result<Discount<'a>, InputError> {
    let [threshold, quantity_to_pay] = split_fields(counts)?;

    Ok(Discount::Bundle(BundleDiscount::new(
        parse_bundles(bundles),
        parse_count(threshold, "threshold")?,
        parse_count(quantity_to_pay, "number of items to pay for")?,
    )))
}

/// Build a progressive discount from `item, threshold, percentage`.
///
/// # Errors
///
/// Returns an [`InputError`] if the line is malformed.
pub fn progressive_discount<'a>(line: &str) -> Result<Discount<'a>, InputError> {
    let [item, threshold, percentage] = split_fields(line)?;

    Ok(Discount::Progressive(ProgressiveDiscount::new(
        item,
        parse_count(threshold, "threshold")?,
        parse_percentage(percentage)?,
    )))
}

/// Build a bulk discount from `item, threshold, price`, the price in minor units.
///
/// # Errors
///
/// Returns an [`InputError`] if the line is malformed.
pub fn bulk_discount<'a>(
    line: &str,
    currency: &'a Currency,
) -> Result<Discount<'a>, InputError> {
    let [item, threshold, price] = split_fields(line)?;

    Ok(Discount::Bulk(BulkDiscount::new(
        item,
        parse_count(threshold, "threshold")?,
        Money::from_minor(parse_minor_units(price, "discounted price")?, currency),
    )))
}

/// Build a bundle discount edit; `-` keeps a field.
///
/// # Errors
///
/// Returns an [`InputError`] if either line is malformed.
pub fn bundle_patch<'a>(counts: &str, bundles: &str) -> Result<DiscountPatch<'a>, InputError> {
    let [threshold, quantity_to_pay] = split_fields(counts)?;

    let target = (bundles.trim() != UNCHANGED)
        .then(|| DiscountTarget::Bundles(parse_bundles(bundles)));

    Ok(DiscountPatch {
        target,
        threshold: optional(threshold, |v| parse_count(v, "threshold"))?,
        value: optional(quantity_to_pay, |v| parse_count(v, "number of items to pay for"))?
            .map(DiscountValue::QuantityToPay),
    })
}

/// Build a progressive discount edit; `-` keeps a field.
///
/// # Errors
///
/// Returns an [`InputError`] if the line is malformed.
pub fn progressive_patch<'a>(line: &str) -> Result<DiscountPatch<'a>, InputError> {
    let [item, threshold, percentage] = split_fields(line)?;

    Ok(DiscountPatch {
        target: item_target(item),
        threshold: optional(threshold, |v| parse_count(v, "threshold"))?,
        value: optional(percentage, parse_percentage)?.map(DiscountValue::Percentage),
    })
}

/// Build a bulk discount edit; `-` keeps a field.
///
/// # Errors
///
/// Returns an [`InputError`] if the line is malformed.
pub fn bulk_patch<'a>(
    line: &str,
    currency: &'a Currency,
) -> Result<DiscountPatch<'a>, InputError> {
    let [item, threshold, price] = split_fields(line)?;

    Ok(DiscountPatch {
        target: item_target(item),
        threshold: optional(threshold, |v| parse_count(v, "threshold"))?,
        value: optional(price, |v| parse_minor_units(v, "discounted price"))?
            .map(|minor| DiscountValue::Price(Money::from_minor(minor, currency))),
    })
}

fn item_target(item: &str) -> Option<DiscountTarget> {
    (item != UNCHANGED).then(|| DiscountTarget::Item(item.to_string()))
}

fn optional<T>(
    field: &str,
    parse: impl FnOnce(&str) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    if field == UNCHANGED {
        return Ok(None);
    }

    parse(field).map(Some)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn split_fields_requires_exact_count() -> TestResult {
        assert_eq!(split_fields::<3>(" apple , 75,fruit ")?, ["apple", "75", "fruit"]);
        assert!(matches!(
            split_fields::<3>("apple, 75"),
            Err(InputError::FieldCount {
                expected: 3,
                found: 2
            })
        ));

        Ok(())
    }

    #[test]
    fn parse_kind_is_case_insensitive() -> TestResult {
        assert_eq!(parse_kind(" Bulk ")?, DiscountKind::Bulk);
        assert!(matches!(parse_kind("bogof"), Err(InputError::UnknownKind(_))));

        Ok(())
    }

    #[test]
    fn parse_bundles_splits_on_semicolons_then_commas() {
        assert_eq!(
            parse_bundles("apple, pear; plum ;"),
            vec![Bundle::new(["apple", "pear"]), Bundle::new(["plum"])]
        );
        assert!(parse_bundles("  ").is_empty());
    }

    #[test]
    fn builds_each_discount_kind() -> TestResult {
        assert_eq!(
            bundle_discount("3, 2", "apple, pear")?,
            Discount::Bundle(BundleDiscount::new(
                vec![Bundle::new(["apple", "pear"])],
                3,
                2
            ))
        );
        assert_eq!(
            progressive_discount("milk, 2, 50")?,
            Discount::Progressive(ProgressiveDiscount::new("milk", 2, 50))
        );
        assert_eq!(
            bulk_discount("egg, 6, 20", GBP)?,
            Discount::Bulk(BulkDiscount::new("egg", 6, Money::from_minor(20, GBP)))
        );

        Ok(())
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(matches!(
            progressive_discount("milk, two, 50"),
            Err(InputError::Validation(ValidationError::NotANumber { .. }))
        ));
        assert!(matches!(
            progressive_discount("milk, 2, 150"),
            Err(InputError::Validation(ValidationError::PercentageOutOfRange(_)))
        ));
    }

    #[test]
    fn dashes_leave_fields_unchanged() -> TestResult {
        assert!(progressive_patch("-, -, -")?.is_empty());
        assert!(bundle_patch("-, -", "-")?.is_empty());

        let patch = bulk_patch("-, 10, -", GBP)?;

        assert_eq!(patch.threshold, Some(10));
        assert_eq!(patch.target, None);
        assert_eq!(patch.value, None);

        Ok(())
    }

    #[test]
    fn patch_values_match_their_kind() -> TestResult {
        assert_eq!(
            bulk_patch("egg, -, 15", GBP)?.value,
            Some(DiscountValue::Price(Money::from_minor(15, GBP)))
        );
        assert_eq!(
            bundle_patch("-, 1", "plum")?,
            DiscountPatch {
                target: Some(DiscountTarget::Bundles(vec![Bundle::new(["plum"])])),
                threshold: None,
                value: Some(DiscountValue::QuantityToPay(1)),
            }
        );

        Ok(())
    }
}
