//! Integration tests for a till stocked from a seed file.

use std::{fs, path::Path};

use rusty_money::{Money, iso::GBP};
use tempfile::tempdir;
use testresult::TestResult;

use till::{
    discounts::DiscountId,
    fixtures::{FixtureError, TillFixture},
    receipt::Denomination,
    system::{DEFAULT_MAX_DISCOUNTS, System, SystemError},
};

fn stocked_till<'a>() -> TestResult<System<'a>> {
    let mut system = System::new(GBP, DEFAULT_MAX_DISCOUNTS);

    TillFixture::load(Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/till.yml"))?
        .apply_to(&mut system)?;

    Ok(system)
}

#[test]
fn seed_file_stocks_catalog_and_discounts() -> TestResult {
    let system = stocked_till()?;

    assert_eq!(system.catalog().len(), 6);
    assert_eq!(system.discounts().len(), 3);
    assert_eq!(
        system.catalog().find_item_by_name("egg").map(|item| *item.price()),
        Some(Money::from_minor(30, GBP))
    );
    assert_eq!(
        system.discount_listing().lines().count(),
        system.discounts().len()
    );

    Ok(())
}

#[test]
fn sale_uses_every_discount_kind() -> TestResult {
    let mut system = stocked_till()?;

    system.scan_items(["apple", "apple", "pear", "milk", "milk", "milk"])?;
    system.scan_items(["egg"; 6])?;

    assert_eq!(system.running_total()?, Money::from_minor(750, GBP));

    let sale = system.finalize()?;
    let basket = &sale.outcome.basket;

    assert_eq!(sale.receipt.subtotal(), Money::from_minor(750, GBP));
    assert_eq!(sale.receipt.total(), Money::from_minor(570, GBP));
    assert_eq!(sale.receipt.savings()?, Money::from_minor(180, GBP));

    // Pear is the cheapest of the apple/pear bundle, so it goes free.
    assert_eq!(
        basket.get_item(2)?.discounted_price(),
        Some(&Money::from_minor(0, GBP))
    );
    assert_eq!(basket.get_item(2)?.applied_discount(), Some(DiscountId::new(0)));
    assert_eq!(
        basket.get_item(3)?.discounted_price(),
        Some(&Money::from_minor(60, GBP))
    );
    assert!(
        basket
            .iter()
            .filter(|item| item.name() == "egg")
            .all(|item| item.discounted_price() == Some(&Money::from_minor(20, GBP)))
    );
    assert!(system.basket().is_empty());

    Ok(())
}

#[test]
fn receipt_lists_items_and_totals() -> TestResult {
    let mut system = stocked_till()?;

    system.scan_items(["milk", "milk", "milk", "bread"])?;

    let sale = system.finalize()?;
    let mut out = Vec::new();

    sale.write_to(&mut out, &Denomination::default())?;

    let receipt = String::from_utf8(out)?;

    assert!(receipt.contains("bread"));
    assert!(receipt.contains("Total price:          £5.05 = 5 pounds 5 pence"));
    assert!(receipt.contains("Price with discounts: £4.45 = 4 pounds 45 pence"));
    assert!(receipt.contains("Saved:                £0.60 (11.88%)"));

    Ok(())
}

#[test]
fn renamed_items_stay_discounted() -> TestResult {
    let mut system = stocked_till()?;

    system.update_catalog_item("egg", "free-range egg", "-", "-")?;
    system.scan_items(["free-range egg"; 6])?;

    let sale = system.finalize()?;

    assert_eq!(sale.receipt.total(), Money::from_minor(120, GBP));
    assert!(matches!(
        system.remove_catalog_item("free-range egg"),
        Err(SystemError::ItemInUse { .. })
    ));

    Ok(())
}

#[test]
fn seed_file_from_disk() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("till.yml");

    fs::write(
        &path,
        "products:\n  - name: tea\n    category: drinks\n    price: \"2.50 GBP\"\n\
         discounts:\n  - type: progressive\n    item: tea\n    threshold: 1\n    percentage_off_next: 10\n",
    )?;

    let mut system = System::new(GBP, DEFAULT_MAX_DISCOUNTS);

    TillFixture::load(&path)?.apply_to(&mut system)?;
    system.scan_items(["tea", "tea"])?;

    assert_eq!(system.finalize()?.receipt.total(), Money::from_minor(475, GBP));

    Ok(())
}

#[test]
fn seed_file_with_unknown_discount_item_is_rejected() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("till.yml");

    fs::write(
        &path,
        "discounts:\n  - type: bulk\n    item: tea\n    threshold: 2\n    new_price: \"1.00 GBP\"\n",
    )?;

    let mut system = System::new(GBP, DEFAULT_MAX_DISCOUNTS);
    let result = TillFixture::load(&path)?.apply_to(&mut system);

    assert!(matches!(result, Err(FixtureError::System(_))));
    assert!(system.discounts().is_empty());

    Ok(())
}

#[test]
fn missing_seed_file_is_an_io_error() -> TestResult {
    let dir = tempdir()?;

    assert!(matches!(
        TillFixture::load(dir.path().join("missing.yml")),
        Err(FixtureError::Io(_))
    ));

    Ok(())
}
