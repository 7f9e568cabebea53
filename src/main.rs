//! Grocery store till
//!
//! Run with: `cargo run -- --catalog fixtures/till.yml`

use std::io;

use anyhow::{Context, Result};
use till::{
    cli::Cli,
    config::TillConfig,
    fixtures::TillFixture,
    logging::init_subscriber,
    system::System,
};
use tracing::info;

fn main() -> Result<()> {
    let config = TillConfig::load().unwrap_or_else(|err| err.exit());

    init_subscriber(&config.logging)?;

    let mut system = System::new(config.currency.currency(), config.max_discounts);

    if let Some(path) = &config.catalog {
        TillFixture::load(path)
            .and_then(|fixture| fixture.apply_to(&mut system))
            .with_context(|| format!("failed to load till fixture {}", path.display()))?;
    }

    info!(
        currency = system.currency().iso_alpha_code,
        items = system.catalog().len(),
        discounts = system.discounts().len(),
        "till ready"
    );

    let stdin = io::stdin();
    let mut cli = Cli::new(system, config.denomination(), stdin.lock(), io::stdout());

    cli.run()?;

    Ok(())
}
