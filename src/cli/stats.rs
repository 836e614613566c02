use chrono::Utc;
use clap::Parser;

use crate::{
    api::graphql,
    cli::{OutputArgs, summarize, token::TokenArgs},
    core::{month::YearMonth, window::Window},
    output::{ExtendedStats, Format},
    prelude::*,
    tables::build_stats_table,
};

#[derive(Parser)]
pub struct StatsArgs {
    #[clap(flatten)]
    token: TokenArgs,

    /// Home to export the statistics for, defaults to the first home of the account.
    #[clap(long = "home-id", env = "TIBBER_HOME_ID")]
    home_id: Option<String>,

    /// Month to sum up the daily consumption for, defaults to the current local month.
    #[clap(long, env = "STATS_MONTH", value_name = "YYYY-MM")]
    month: Option<YearMonth>,

    #[clap(flatten)]
    output: OutputArgs,
}

impl StatsArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let api = graphql::Api::try_new(&self.token.resolve()?)?;

        let home_id = match self.home_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(home_id) => home_id.to_owned(),
            None => {
                let home = api.get_first_home().await?;
                let address = home.address.unwrap_or_default();
                info!(
                    home_id = %home.id,
                    nickname = home.app_nickname.as_deref().unwrap_or("no nickname"),
                    address = address.address1.as_deref().unwrap_or_default(),
                    city = address.city.as_deref().unwrap_or_default(),
                    "using the first home",
                );
                home.id
            }
        };

        let history = api.get_consumption_history(&home_id).await?;
        let hourly = &history.consumption_hourly.nodes;
        let daily = &history.consumption_daily.nodes;
        info!(
            time_zone = history.time_zone.as_deref(),
            n_hourly = hourly.len(),
            n_daily = daily.len(),
            until = ?hourly.iter().filter_map(|sample| sample.to).max(),
            "fetched",
        );

        let month = self.month.unwrap_or_else(YearMonth::current);
        let stats = ExtendedStats::builder()
            .generated_at(Utc::now())
            .last_24_hours(summarize("last24h", hourly, Window::Last(24)))
            .last_7_days(summarize("last7d", daily, Window::Last(7)))
            .this_month(summarize("thisMonth", daily, Window::Month(month)))
            .build();
        self.output.writer().write("stats.json", &stats, Format::Pretty)?;

        let this_month = month.to_string();
        eprintln!(
            "{}",
            build_stats_table(&[
                ("last 24 hours", &stats.last_24_hours),
                ("last 7 days", &stats.last_7_days),
                (this_month.as_str(), &stats.this_month),
            ])
        );
        Ok(())
    }
}
