use chrono::{TimeDelta, Timelike, Utc};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;

use crate::{
    api::data::{self, Api},
    cli::token::DataTokenArgs,
    core::interval::RangeExclusive,
    prelude::*,
};

#[derive(Parser)]
pub struct DevicesArgs {
    #[clap(flatten)]
    token: DataTokenArgs,

    /// History resolution to request for the picked device.
    #[clap(long, default_value = "hour")]
    resolution: String,

    /// Number of the history items to print.
    #[clap(long = "preview", default_value = "5")]
    n_preview: usize,
}

impl DevicesArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let api = Api::try_new(&self.token.resolve()?)?;

        let homes = api.get_homes().await?;
        print_json("homes", &homes)?;
        let home_id = data::first_home_id(&homes)?;
        info!(home_id = %home_id, "picked the first home");

        let devices = api.get_devices(&home_id).await?;
        print_json("devices", &devices)?;
        let candidates = data::history_candidates(&devices)?;
        print_json("devices with history", &candidates)?;
        let candidate = data::first_candidate(&candidates, &devices)?;
        let device_id = candidate
            .id
            .as_deref()
            .ok_or_else(|| Failure::shape("the device has no ID", &devices))?;
        info!(device_id, name = candidate.name.as_deref(), "picked the first device with history");

        let now = Utc::now();
        let until = now.with_nanosecond(0).unwrap_or(now);
        let period = RangeExclusive::new(until - TimeDelta::days(1), until);
        let history = api.get_history(&home_id, device_id, period, &self.resolution).await?;

        let items = history.get("items").and_then(Value::as_array).map_or(&[][..], Vec::as_slice);
        let preview = &items[..items.len().min(self.n_preview)];
        print_json("history preview", preview)?;
        if let Some(data) =
            preview.first().and_then(|item| item.get("data")).and_then(Value::as_object)
        {
            print_json("data keys", &data.keys().collect::<Vec<_>>())?;
        }
        Ok(())
    }
}

/// Print the JSON to the standard output, keeping the label in the log.
fn print_json<T: Serialize + ?Sized>(label: &str, value: &T) -> Result {
    info!(label, "dumping");
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
