//! Discount Fixtures

use rusty_money::Money;
use serde::Deserialize;

use crate::{
    discounts::{BulkDiscount, Bundle, BundleDiscount, Discount, ProgressiveDiscount},
    fixtures::{FixtureError, products::parse_price},
};

/// Discount fixture from YAML
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountFixture {
    /// Bundle discount
    Bundle {
        /// Groups of item names that count together
        bundles: Vec<Vec<String>>,

        /// Items needed from one bundle
        threshold: usize,

        /// Items out of `threshold` that are paid for
        quantity_to_pay: usize,
    },

    /// Progressive discount
    Progressive {
        /// Target item name
        item: String,

        /// Items bought at full price before the bonus item
        threshold: usize,

        /// Percentage taken off the bonus item
        percentage_off_next: u8,
    },

    /// Bulk discount
    Bulk {
        /// Target item name
        item: String,

        /// Minimum quantity
        threshold: usize,

        /// Flat unit price (e.g., "0.20 GBP")
        new_price: String,
    },
}

impl TryFrom<DiscountFixture> for Discount<'_> {
    type Error = FixtureError;

    fn try_from(fixture: DiscountFixture) -> Result<Self, Self::Error> {
        Ok(match fixture {
            DiscountFixture::Bundle {
                bundles,
                threshold,
                quantity_to_pay,
            } => Discount::Bundle(BundleDiscount::new(
                bundles.into_iter().map(Bundle::new).collect(),
                threshold,
                quantity_to_pay,
            )),
            DiscountFixture::Progressive {
                item,
                threshold,
                percentage_off_next,
            } => Discount::Progressive(ProgressiveDiscount::new(
                item,
                threshold,
                percentage_off_next,
            )),
            DiscountFixture::Bulk {
                item,
                threshold,
                new_price,
            } => {
                let (minor_units, currency) = parse_price(&new_price)?;

                Discount::Bulk(BulkDiscount::new(
                    item,
                    threshold,
                    Money::from_minor(minor_units, currency),
                ))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use super::*;

    #[test]
    fn deserializes_tagged_discounts() -> Result<(), FixtureError> {
        let yaml = r#"
- type: bundle
  bundles: [[apple, pear], [plum]]
  threshold: 3
  quantity_to_pay: 2
- type: progressive
  item: milk
  threshold: 2
  percentage_off_next: 50
- type: bulk
  item: egg
  threshold: 6
  new_price: "0.20 GBP"
"#;

        let fixtures: Vec<DiscountFixture> = serde_norway::from_str(yaml)?;
        let discounts = fixtures
            .into_iter()
            .map(Discount::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(
            discounts,
            vec![
                Discount::Bundle(BundleDiscount::new(
                    vec![Bundle::new(["apple", "pear"]), Bundle::new(["plum"])],
                    3,
                    2,
                )),
                Discount::Progressive(ProgressiveDiscount::new("milk", 2, 50)),
                Discount::Bulk(BulkDiscount::new("egg", 6, Money::from_minor(20, GBP))),
            ]
        );

        Ok(())
    }

    #[test]
    fn unknown_type_is_a_yaml_error() {
        let result: Result<Vec<DiscountFixture>, _> =
            serde_norway::from_str("- type: mystery\n  item: egg\n");

        assert!(result.is_err());
    }
}
