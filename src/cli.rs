mod devices;
mod prices;
mod stats;
mod token;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    cli::{devices::DevicesArgs, prices::PricesArgs, stats::StatsArgs},
    core::{
        consumption::ConsumptionSample,
        window::{Aggregate, Window, aggregate},
    },
    output::Writer,
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub async fn run(self) -> Result {
        match self.command {
            Command::Prices(args) => args.run().await,
            Command::Stats(args) => args.run().await,
            Command::Devices(args) => args.run().await,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Export today's and tomorrow's prices, and the last 24 hours and 7 days consumption.
    #[clap(name = "prices")]
    Prices(Box<PricesArgs>),

    /// Export the consumption statistics, including the current month.
    #[clap(name = "stats")]
    Stats(Box<StatsArgs>),

    /// Dump the homes, devices, and device history from the Data API.
    #[clap(name = "devices")]
    Devices(Box<DevicesArgs>),
}

#[derive(Parser)]
pub struct OutputArgs {
    /// Directory to write the JSON files into, created when missing.
    #[clap(long = "output-dir", env = "OUTPUT_DIR", default_value = "data")]
    pub dir: PathBuf,
}

impl OutputArgs {
    pub fn writer(&self) -> Writer {
        Writer::new(self.dir.clone())
    }
}

/// Aggregate the samples and warn about the malformed ones.
fn summarize(name: &str, samples: &[ConsumptionSample], window: Window) -> Aggregate {
    let aggregate = aggregate(samples, window);
    if aggregate.skipped != 0 {
        warn!(name, ?window, skipped = aggregate.skipped, "skipped malformed consumption samples");
    }
    aggregate
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_ok() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_stats() -> Result {
        let args = Args::try_parse_from([
            "tibber-export",
            "stats",
            "--token",
            "secret",
            "--month",
            "2025-11",
            "--output-dir",
            "/tmp/dashboard",
        ])?;
        assert!(matches!(args.command, Command::Stats(_)));
        Ok(())
    }
}
