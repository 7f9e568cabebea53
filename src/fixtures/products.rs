//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{fixtures::FixtureError, items::Item};

/// Product Fixture
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProductFixture {
    /// Product name, unique within the catalog
    pub name: String,

    /// Product category
    pub category: String,

    /// Product price (e.g., "0.75 GBP")
    pub price: String,
}

impl TryFrom<ProductFixture> for Item<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        Ok(Item::new(
            fixture.name,
            fixture.category,
            Money::from_minor(minor_units, currency),
        ))
    }
}

/// Parse a currency code such as `"GBP"`.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for codes other than GBP, USD and EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse price string (e.g., "0.75 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a decimal number with at most as many decimal places as the
/// currency has minor digits, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = parse_currency(currency_code)?;

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.normalize().scale() > currency.exponent {
        return Err(FixtureError::InvalidPrice(format!(
            "{s} has more decimal places than {} allows",
            currency.iso_alpha_code
        )));
    }

    let minor_units = amount
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .and_then(|value| value.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}
