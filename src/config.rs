//! Till configuration

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use rusty_money::iso::{Currency, EUR, GBP, USD};

use crate::{receipt::Denomination, system::DEFAULT_MAX_DISCOUNTS};

/// Currency the till prices in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CurrencyCode {
    /// Pound sterling
    #[value(name = "GBP")]
    Gbp,

    /// US dollar
    #[value(name = "USD")]
    Usd,

    /// Euro
    #[value(name = "EUR")]
    Eur,
}

impl CurrencyCode {
    /// The ISO currency for this code.
    #[must_use]
    pub fn currency(self) -> &'static Currency {
        match self {
            CurrencyCode::Gbp => GBP,
            CurrencyCode::Usd => USD,
            CurrencyCode::Eur => EUR,
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Grocery till with combinatorial discount pricing
#[derive(Debug, Parser)]
#[command(name = "till", about = "Grocery store till", long_about = None)]
pub struct TillConfig {
    /// YAML file to seed the catalog and discounts from
    #[arg(short, long, env = "TILL_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Currency for every price in the till
    #[arg(long, env = "TILL_CURRENCY", value_enum, default_value_t = CurrencyCode::Gbp)]
    pub currency: CurrencyCode,

    /// Maximum number of active discounts; pricing tries every ordering of them
    #[arg(long, env = "TILL_MAX_DISCOUNTS", default_value_t = DEFAULT_MAX_DISCOUNTS)]
    pub max_discounts: usize,

    /// Name of the major currency unit on receipts
    #[arg(long, env = "TILL_MAJOR_UNIT", default_value = "pounds")]
    pub major_unit: String,

    /// Name of the minor currency unit on receipts
    #[arg(long, env = "TILL_MINOR_UNIT", default_value = "pence")]
    pub minor_unit: String,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl TillConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Unit names for receipt totals.
    #[must_use]
    pub fn denomination(&self) -> Denomination {
        Denomination::new(&self.major_unit, &self.minor_unit)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults() -> TestResult {
        let config = TillConfig::try_parse_from(["till", "--log-level", "warn"])?;

        assert_eq!(config.catalog, None);
        assert_eq!(config.currency, CurrencyCode::Gbp);
        assert_eq!(config.max_discounts, DEFAULT_MAX_DISCOUNTS);
        assert_eq!(config.denomination(), Denomination::default());
        assert_eq!(config.logging.log_format, LogFormat::Compact);

        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let config = TillConfig::try_parse_from([
            "till",
            "--catalog",
            "fixtures/till.yml",
            "--currency",
            "EUR",
            "--max-discounts",
            "4",
            "--major-unit",
            "euros",
            "--minor-unit",
            "cents",
            "--log-format",
            "json",
        ])?;

        assert_eq!(config.catalog, Some(PathBuf::from("fixtures/till.yml")));
        assert_eq!(config.currency.currency(), EUR);
        assert_eq!(config.max_discounts, 4);
        assert_eq!(config.denomination(), Denomination::new("euros", "cents"));
        assert_eq!(config.logging.log_format, LogFormat::Json);

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() {
        assert!(TillConfig::try_parse_from(["till", "--currency", "JPY"]).is_err());
    }
}
