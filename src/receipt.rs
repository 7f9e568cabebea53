//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{basket::Basket, pricing::TotalPriceError};

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating total price from basket items.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Names for the major and minor currency units, e.g. pounds and pence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denomination {
    major: String,
    minor: String,
}

impl Denomination {
    /// Create a denomination from unit names.
    pub fn new(major: impl Into<String>, minor: impl Into<String>) -> Self {
        Self {
            major: major.into(),
            minor: minor.into(),
        }
    }

    /// Name of the major unit
    pub fn major(&self) -> &str {
        &self.major
    }

    /// Name of the minor unit
    pub fn minor(&self) -> &str {
        &self.minor
    }

    /// Split an amount into whole major units and the remaining minor units.
    pub fn split(money: &Money<'_, Currency>) -> (i64, i64) {
        let minor = money.to_minor_units();
        let per_major = 10_i64.pow(money.currency().exponent);

        (minor / per_major, minor % per_major)
    }

    /// Render an amount as `"<major> <major unit> <minor> <minor unit>"`.
    pub fn describe(&self, money: &Money<'_, Currency>) -> String {
        let (major, minor) = Self::split(money);

        format!("{major} {} {minor} {}", self.major, self.minor)
    }
}

impl Default for Denomination {
    fn default() -> Self {
        Self::new("pounds", "pence")
    }
}

/// Totals for a priced basket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Receipt<'a> {
    /// Total cost at normal prices
    subtotal: Money<'a, Currency>,

    /// Total amount paid after discounts
    total: Money<'a, Currency>,
}

impl<'a> Receipt<'a> {
    /// Create a receipt from its totals.
    #[must_use]
    pub fn new(subtotal: Money<'a, Currency>, total: Money<'a, Currency>) -> Self {
        Self { subtotal, total }
    }

    /// Build a receipt for a priced basket.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the basket cannot be totalled.
    pub fn from_basket(basket: &Basket<'a>) -> Result<Self, ReceiptError> {
        Ok(Self {
            subtotal: basket.total_price()?,
            total: basket.discounted_price()?,
        })
    }

    /// Total cost at normal prices
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount paid for all items
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Calculate the savings made by applying discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Savings as a fraction of the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings = self.savings()?.to_minor_units();
        let subtotal = self.subtotal.to_minor_units();

        if subtotal == 0 {
            return Ok(Percentage::from(0.0));
        }

        Ok(Percentage::from(
            Decimal::from(savings) / Decimal::from(subtotal),
        ))
    }

    /// Print the item table and totals for `basket`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the savings cannot be calculated or writing fails.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        basket: &Basket<'_>,
        denomination: &Denomination,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "#",
            "Item",
            "Category",
            "Normal Price",
            "Discounted Price",
            "Discount",
        ]);

        for (idx, item) in basket.iter().enumerate() {
            builder.push_record([
                (idx + 1).to_string(),
                item.name().to_string(),
                item.category().to_string(),
                item.price().to_string(),
                item.discounted_price()
                    .map_or_else(|| "-".to_string(), ToString::to_string),
                item.applied_discount()
                    .map_or_else(|| "no discount".to_string(), |id| id.to_string()),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(3..5), Alignment::right());

        writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out, denomination)
    }

    fn write_summary(
        &self,
        out: &mut impl io::Write,
        denomination: &Denomination,
    ) -> Result<(), ReceiptError> {
        let savings = self.savings()?;
        let savings_points = percent_points(self.savings_percent()?);

        writeln!(
            out,
            "Total price:          {} = {}",
            self.subtotal,
            denomination.describe(&self.subtotal)
        )
        .map_err(|_err| ReceiptError::IO)?;

        writeln!(
            out,
            "Price with discounts: {} = {}",
            self.total,
            denomination.describe(&self.total)
        )
        .map_err(|_err| ReceiptError::IO)?;

        writeln!(out, "Saved:                {savings} ({savings_points:.2}%)")
            .map_err(|_err| ReceiptError::IO)
    }
}

fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
