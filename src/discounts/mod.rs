//! Discounts
//!
//! The three discount rules a till can run, and the shared plumbing they use to claim
//! items in a basket. Every rule follows the same contract: it only touches items no
//! other discount has claimed yet in the current pricing run, it never removes or
//! reorders items, and it does nothing when too few eligible items are present.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::basket::Basket;

pub mod bulk;
pub mod bundle;
pub mod progressive;

pub use bulk::BulkDiscount;
pub use bundle::{Bundle, BundleDiscount};
pub use progressive::ProgressiveDiscount;

/// Errors specific to discount calculations and edits.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A patch field does not belong to the discount being edited.
    #[error("a {kind} discount has no {field}")]
    PatchMismatch {
        /// Kind of the discount being edited
        kind: DiscountKind,

        /// The field that does not apply
        field: &'static str,
    },
}

/// Position of a discount in the active discount list for a pricing run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscountId(usize);

impl DiscountId {
    /// Create an id from a 0-based list position.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// 0-based position in the active discount list.
    pub const fn index(self) -> usize {
        self.0
    }

    /// 1-based number shown to the operator.
    pub const fn number(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for DiscountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Kind of discount rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiscountKind {
    /// "N for M" across one or more bundles of items
    Bundle,

    /// "Buy N, get the next one at P% off"
    Progressive,

    /// "N or more for a flat unit price"
    Bulk,
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiscountKind::Bundle => "bundle",
            DiscountKind::Progressive => "progressive",
            DiscountKind::Bulk => "bulk",
        })
    }
}

/// A configured discount rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Discount<'a> {
    /// Bundle discount
    Bundle(BundleDiscount),

    /// Progressive discount
    Progressive(ProgressiveDiscount),

    /// Bulk discount
    Bulk(BulkDiscount<'a>),
}

impl<'a> Discount<'a> {
    /// Claim and price eligible items in `basket` on behalf of discount `id`.
    pub fn apply_to_basket(&self, basket: &mut Basket<'a>, id: DiscountId) {
        match self {
            Discount::Bundle(bundle) => bundle.apply_to_basket(basket, id),
            Discount::Progressive(progressive) => progressive.apply_to_basket(basket, id),
            Discount::Bulk(bulk) => bulk.apply_to_basket(basket, id),
        }
    }

    /// Return the kind of this discount.
    pub fn kind(&self) -> DiscountKind {
        match self {
            Discount::Bundle(_) => DiscountKind::Bundle,
            Discount::Progressive(_) => DiscountKind::Progressive,
            Discount::Bulk(_) => DiscountKind::Bulk,
        }
    }

    /// Number of eligible items needed before this discount triggers.
    pub fn threshold(&self) -> usize {
        match self {
            Discount::Bundle(bundle) => bundle.threshold(),
            Discount::Progressive(progressive) => progressive.threshold(),
            Discount::Bulk(bulk) => bulk.threshold(),
        }
    }

    /// Every item name this discount refers to.
    pub fn item_names(&self) -> Vec<&str> {
        match self {
            Discount::Bundle(bundle) => bundle
                .bundles()
                .iter()
                .flat_map(|b| b.items().iter().map(String::as_str))
                .collect(),
            Discount::Progressive(progressive) => vec![progressive.item()],
            Discount::Bulk(bulk) => vec![bulk.item()],
        }
    }

    /// Whether this discount refers to the named item.
    pub fn references(&self, name: &str) -> bool {
        self.item_names().contains(&name)
    }

    /// Point every reference to `old` at `new` instead.
    pub fn rename_item(&mut self, old: &str, new: &str) {
        match self {
            Discount::Bundle(bundle) => bundle.rename_item(old, new),
            Discount::Progressive(progressive) => progressive.rename_item(old, new),
            Discount::Bulk(bulk) => bulk.rename_item(old, new),
        }
    }

    /// Apply a partial edit.
    ///
    /// The discount is left untouched when any field of the patch does not fit its kind.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PatchMismatch`] if the patch targets a field this kind of
    /// discount does not have.
    pub fn apply_patch(&mut self, patch: DiscountPatch<'a>) -> Result<(), DiscountError> {
        let kind = self.kind();

        match (self, patch.target, patch.value) {
            (Discount::Bundle(bundle), target, value) => {
                let bundles = match target {
                    None => None,
                    Some(DiscountTarget::Bundles(bundles)) => Some(bundles),
                    Some(DiscountTarget::Item(_)) => return Err(mismatch(kind, "single item")),
                };

                let quantity_to_pay = match value {
                    None => None,
                    Some(DiscountValue::QuantityToPay(quantity)) => Some(quantity),
                    Some(_) => return Err(mismatch(kind, "such value")),
                };

                if let Some(bundles) = bundles {
                    bundle.set_bundles(bundles);
                }
                if let Some(threshold) = patch.threshold {
                    bundle.set_threshold(threshold);
                }
                if let Some(quantity) = quantity_to_pay {
                    bundle.set_quantity_to_pay(quantity);
                }
            }
            (Discount::Progressive(progressive), target, value) => {
                let item = single_item(kind, target)?;

                let percentage = match value {
                    None => None,
                    Some(DiscountValue::Percentage(percentage)) => Some(percentage),
                    Some(_) => return Err(mismatch(kind, "such value")),
                };

                if let Some(item) = item {
                    progressive.set_item(item);
                }
                if let Some(threshold) = patch.threshold {
                    progressive.set_threshold(threshold);
                }
                if let Some(percentage) = percentage {
                    progressive.set_percentage_off_next(percentage);
                }
            }
            (Discount::Bulk(bulk), target, value) => {
                let item = single_item(kind, target)?;

                let new_price = match value {
                    None => None,
                    Some(DiscountValue::Price(price)) => Some(price),
                    Some(_) => return Err(mismatch(kind, "such value")),
                };

                if let Some(item) = item {
                    bulk.set_item(item);
                }
                if let Some(threshold) = patch.threshold {
                    bulk.set_threshold(threshold);
                }
                if let Some(price) = new_price {
                    bulk.set_new_price(price);
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Discount<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discount::Bundle(bundle) => fmt::Display::fmt(bundle, f),
            Discount::Progressive(progressive) => fmt::Display::fmt(progressive, f),
            Discount::Bulk(bulk) => fmt::Display::fmt(bulk, f),
        }
    }
}

/// Items a patched discount should target.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountTarget {
    /// Replacement bundles for a bundle discount
    Bundles(Vec<Bundle>),

    /// Replacement item for a progressive or bulk discount
    Item(String),
}

/// The kind-specific numeric parameter of a discount.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountValue<'a> {
    /// Bundle discount: how many of the threshold are paid for
    QuantityToPay(usize),

    /// Progressive discount: percentage off the bonus item
    Percentage(u8),

    /// Bulk discount: flat unit price
    Price(Money<'a, Currency>),
}

/// Partial edit of a discount; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountPatch<'a> {
    /// New item target
    pub target: Option<DiscountTarget>,

    /// New threshold
    pub threshold: Option<usize>,

    /// New kind-specific value
    pub value: Option<DiscountValue<'a>>,
}

impl DiscountPatch<'_> {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.target.is_none() && self.threshold.is_none() && self.value.is_none()
    }
}

fn mismatch(kind: DiscountKind, field: &'static str) -> DiscountError {
    DiscountError::PatchMismatch { kind, field }
}

fn single_item(
    kind: DiscountKind,
    target: Option<DiscountTarget>,
) -> Result<Option<String>, DiscountError> {
    match target {
        None => Ok(None),
        Some(DiscountTarget::Item(item)) => Ok(Some(item)),
        Some(DiscountTarget::Bundles(_)) => Err(mismatch(kind, "bundles")),
    }
}

/// Calculate `percent`% of a minor unit amount, rounding half to even.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the result cannot be represented.
pub fn percent_of_minor(percent: u8, minor: i64) -> Result<i64, DiscountError> {
    Decimal::from(minor)
        .checked_mul(Decimal::from(percent))
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
