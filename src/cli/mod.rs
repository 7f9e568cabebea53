//! Interactive till
//!
//! A menu driven session over any line based input and text output. End of input at
//! any prompt ends the session cleanly.

use std::{
    fmt,
    io::{self, BufRead, Write},
};

use thiserror::Error;
use tracing::warn;

use crate::{
    discounts::{Discount, DiscountKind},
    receipt::{Denomination, ReceiptError},
    system::{System, SystemError},
    validation::parse_count,
};

pub mod input;

use input::{InputError, split_fields};

const CHOOSE: &str = "Please choose an action (using numbers):";

const MAIN_MENU: &str = "\
Available actions:
1. Begin scanning
2. Configure till
3. Exit";

const SCANNING_MENU: &str = "\
Available actions:
1. Scan items
2. Finalize
3. Discard and exit";

const CONFIGURE_MENU: &str = "\
Available actions:
Product catalog:
1. View product catalog
2. Add a product to the catalog
3. Update a product in the catalog
4. Remove a product from the catalog

Discounts:
5. View active discounts
6. Add a new discount
7. Modify an existing discount
8. Remove a discount

9. Return to main menu";

/// Errors that end an interactive session.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading input or writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The receipt could not be printed.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// Input ended at a prompt.
    #[error("end of input")]
    EndOfInput,
}

/// Interactive till session.
#[derive(Debug)]
pub struct Cli<'a, R, W> {
    system: System<'a>,
    denomination: Denomination,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Cli<'a, R, W> {
    /// Create a session over a till.
    pub fn new(system: System<'a>, denomination: Denomination, input: R, output: W) -> Self {
        Self {
            system,
            denomination,
            input,
            output,
        }
    }

    /// The till this session drives.
    pub fn system(&self) -> &System<'a> {
        &self.system
    }

    /// End the session, returning the till.
    pub fn into_system(self) -> System<'a> {
        self.system
    }

    /// Run the main menu until the operator exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns a [`CliError`] if reading or writing fails.
    pub fn run(&mut self) -> Result<(), CliError> {
        writeln!(self.output, "Grocery Store Till System")?;

        match self.main_menu() {
            Ok(()) | Err(CliError::EndOfInput) => {}
            Err(err) => return Err(err),
        }

        writeln!(self.output, "Exiting the system...")?;

        Ok(())
    }

    fn main_menu(&mut self) -> Result<(), CliError> {
        loop {
            writeln!(self.output, "{MAIN_MENU}")?;

            match self.prompt(CHOOSE)?.as_str() {
                "1" => self.scanning()?,
                "2" => self.configure()?,
                "3" => return Ok(()),
                _ => self.invalid_action()?,
            }
        }
    }

    fn scanning(&mut self) -> Result<(), CliError> {
        loop {
            match self.system.running_total() {
                Ok(total) => writeln!(self.output, "Running total = {total}")?,
                Err(err) => self.report_error(&err)?,
            }

            writeln!(self.output, "{SCANNING_MENU}")?;

            match self.prompt(CHOOSE)?.as_str() {
                "1" => self.scan_items()?,
                "2" => {
                    self.finalize()?;
                    break;
                }
                "3" => {
                    self.system.discard();
                    writeln!(self.output, "Emptying basket...\n")?;
                    break;
                }
                _ => self.invalid_action()?,
            }
        }

        writeln!(self.output, "Returning to main menu...\n")?;

        Ok(())
    }

    fn scan_items(&mut self) -> Result<(), CliError> {
        let line = self.prompt("List names of items to scan (separated with commas):")?;

        match self.system.scan_items(line.split(',')) {
            Ok(count) => writeln!(self.output, "Scanned {count} item(s).\n")?,
            Err(err) => self.report_error(&err)?,
        }

        Ok(())
    }

    fn finalize(&mut self) -> Result<(), CliError> {
        writeln!(self.output, "Finalizing...\n")?;

        match self.system.finalize() {
            Ok(sale) => {
                sale.write_to(&mut self.output, &self.denomination)?;
                writeln!(self.output)?;
            }
            Err(err) => self.report_error(&err)?,
        }

        Ok(())
    }

    fn configure(&mut self) -> Result<(), CliError> {
        writeln!(self.output, "Configuring till...\n")?;

        loop {
            writeln!(self.output, "{CONFIGURE_MENU}")?;

            match self.prompt(CHOOSE)?.as_str() {
                "1" => writeln!(self.output, "{}\n", self.system.catalog())?,
                "2" => self.add_product()?,
                "3" => self.update_product()?,
                "4" => self.remove_product()?,
                "5" => writeln!(self.output, "{}\n", self.system.discount_listing())?,
                "6" => self.add_discount()?,
                "7" => self.modify_discount()?,
                "8" => self.remove_discount()?,
                "9" => break,
                _ => self.invalid_action()?,
            }
        }

        writeln!(self.output, "Returning to main menu...\n")?;

        Ok(())
    }

    fn add_product(&mut self) -> Result<(), CliError> {
        let line = self.prompt(&format!(
            "Please enter item name, price (in {}) and category, separated with commas:\n",
            self.denomination.minor()
        ))?;

        let result = split_fields(&line).and_then(|[name, price, category]| {
            Ok(self.system.add_catalog_item(name, price, category)?)
        });

        self.report(result, "Item added.")
    }

    fn update_product(&mut self) -> Result<(), CliError> {
        let line = self.prompt(
            "Please enter information in the format:\n\
             \"<current item name>, <new name>, <new price>, <new category>\"\n\
             (type \"-\" for a field to leave it unchanged):\n",
        )?;

        let result = split_fields(&line).and_then(|[name, new_name, new_price, new_category]| {
            Ok(self
                .system
                .update_catalog_item(name, new_name, new_price, new_category)?)
        });

        self.report(result, "Item updated.")
    }

    fn remove_product(&mut self) -> Result<(), CliError> {
        let name = self.prompt("Please enter the name of the item to remove:\n")?;

        let result = self
            .system
            .remove_catalog_item(&name)
            .map_err(InputError::from);

        self.report(result, "Item removed.")
    }

    fn add_discount(&mut self) -> Result<(), CliError> {
        let kind = self.prompt("Please enter the discount type (bundle, progressive, bulk):\n")?;

        let kind = match input::parse_kind(&kind) {
            Ok(kind) => kind,
            Err(err) => return self.report_error(&err),
        };

        let currency = self.system.currency();

        let discount = match kind {
            DiscountKind::Bundle => {
                let counts = self.prompt(BUNDLE_COUNTS)?;
                let bundles = self.prompt(BUNDLE_ITEMS)?;

                input::bundle_discount(&counts, &bundles)
            }
            DiscountKind::Progressive => {
                input::progressive_discount(&self.prompt(PROGRESSIVE_FIELDS)?)
            }
            DiscountKind::Bulk => {
                let line = self.prompt(&self.bulk_fields())?;

                input::bulk_discount(&line, currency)
            }
        };

        let result = discount.and_then(|discount| {
            self.system
                .add_discount(discount)
                .map(|_id| ())
                .map_err(InputError::from)
        });

        self.report(result, "Discount added.")
    }

    fn modify_discount(&mut self) -> Result<(), CliError> {
        let number = self.prompt("Please enter the number of the discount to modify:\n")?;

        let number = match parse_count(&number, "discount number") {
            Ok(number) => number,
            Err(err) => return self.report_error(&err),
        };

        let kind = number
            .checked_sub(1)
            .and_then(|index| self.system.discounts().get(index))
            .map(Discount::kind);

        let Some(kind) = kind else {
            return self.report_error(&SystemError::DiscountNotFound(number));
        };

        writeln!(self.output, "Type \"-\" for a field to leave it unchanged.")?;

        let currency = self.system.currency();

        let patch = match kind {
            DiscountKind::Bundle => {
                let counts = self.prompt(BUNDLE_COUNTS)?;
                let bundles = self.prompt(BUNDLE_ITEMS)?;

                input::bundle_patch(&counts, &bundles)
            }
            DiscountKind::Progressive => input::progressive_patch(&self.prompt(PROGRESSIVE_FIELDS)?),
            DiscountKind::Bulk => {
                let line = self.prompt(&self.bulk_fields())?;

                input::bulk_patch(&line, currency)
            }
        };

        let result = patch.and_then(|patch| {
            self.system
                .edit_discount(number, patch)
                .map_err(InputError::from)
        });

        self.report(result, "Discount updated.")
    }

    fn remove_discount(&mut self) -> Result<(), CliError> {
        let number = self.prompt("Please enter the number of the discount to remove:\n")?;

        let result = parse_count(&number, "discount number")
            .map_err(InputError::from)
            .and_then(|number| {
                self.system
                    .remove_discount(number)
                    .map(|_removed| ())
                    .map_err(InputError::from)
            });

        self.report(result, "Discount removed.")
    }

    fn bulk_fields(&self) -> String {
        format!(
            "Please enter item name, threshold and new price (in {}), separated with commas:\n",
            self.denomination.minor()
        )
    }

    fn prompt(&mut self, message: &str) -> Result<String, CliError> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();

        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(CliError::EndOfInput);
        }

        writeln!(self.output)?;

        Ok(line.trim().to_string())
    }

    fn report(&mut self, result: Result<(), InputError>, success: &str) -> Result<(), CliError> {
        match result {
            Ok(()) => writeln!(self.output, "{success}\n")?,
            Err(err) => self.report_error(&err)?,
        }

        Ok(())
    }

    fn report_error(&mut self, err: &dyn fmt::Display) -> Result<(), CliError> {
        warn!(%err, "rejected operator input");

        writeln!(self.output, "{err}\n")?;

        Ok(())
    }

    fn invalid_action(&mut self) -> Result<(), CliError> {
        writeln!(self.output, "Invalid action.\n")?;

        Ok(())
    }
}

const BUNDLE_COUNTS: &str =
    "Please enter the threshold and the number of items to pay for, separated with commas:\n";

const BUNDLE_ITEMS: &str = "Please enter the bundles: item names separated with commas, \
                            bundles separated with semicolons:\n";

const PROGRESSIVE_FIELDS: &str = "Please enter item name, threshold and percentage off the \
                                  next item, separated with commas:\n";
