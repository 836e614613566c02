use chrono::Local;
use clap::Parser;

use crate::{
    api::graphql,
    cli::{OutputArgs, summarize, token::TokenArgs},
    core::{price::build_intervals, window::Window},
    output::{BasicStats, Format, Totals},
    prelude::*,
    tables::build_price_table,
};

#[derive(Parser)]
pub struct PricesArgs {
    #[clap(flatten)]
    token: TokenArgs,

    #[clap(flatten)]
    output: OutputArgs,
}

impl PricesArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let api = graphql::Api::try_new(&self.token.resolve()?)?;
        let home = api.get_prices_and_consumption().await?;
        info!(home_id = %home.id, "fetched");

        let last_24_hours = summarize("last24h", &home.consumption_last_day.nodes, Window::All);
        let last_7_days = summarize("last7d", &home.consumption_last_week.nodes, Window::All);

        let (today, tomorrow) = home.into_prices();
        let currency = today.iter().find_map(|sample| sample.currency.as_deref());
        info!(currency, n_today = today.len(), n_tomorrow = tomorrow.len(), "got the prices");
        let today = build_intervals(&today);
        let tomorrow = build_intervals(&tomorrow);

        let writer = self.output.writer();
        writer.write("today.json", &today, Format::Compact)?;
        if tomorrow.is_empty() {
            info!("tomorrow's prices are not published yet");
        } else {
            writer.write("tomorrow.json", &tomorrow, Format::Compact)?;
        }
        let stats = BasicStats {
            last_24_hours: Totals::from(&last_24_hours),
            last_7_days: Totals::from(&last_7_days),
        };
        writer.write("stats.json", &stats, Format::Compact)?;

        let now = Local::now().fixed_offset();
        eprintln!("{}", build_price_table(today.iter().chain(&tomorrow), now));
        info!(
            last_24_hours.kwh = %stats.last_24_hours.kwh,
            last_24_hours.cost = %stats.last_24_hours.cost,
            last_7_days.kwh = %stats.last_7_days.kwh,
            last_7_days.cost = %stats.last_7_days.cost,
            "exported",
        );
        Ok(())
    }
}
