use chrono::{DateTime, FixedOffset, SecondsFormat, TimeDelta};
use itertools::Itertools;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};

use crate::{core::interval::Interval, quantity::price::KilowattHourPrice};

/// Price quote valid from its start until the next quote starts.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct PriceSample {
    #[serde(rename = "startsAt")]
    pub starts_at: DateTime<FixedOffset>,

    /// Total price including energy tax and VAT.
    #[serde(rename = "total")]
    pub unit_price: KilowattHourPrice,

    #[serde(default)]
    pub currency: Option<String>,
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PriceInterval {
    pub interval: Interval,

    /// Unrounded, rounding only happens on serialization.
    pub price: KilowattHourPrice,
}

impl Serialize for PriceInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> crate::prelude::Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("PriceInterval", 3)?;
        row.serialize_field("SEK_per_kWh", &self.price.round())?;
        row.serialize_field("time_start", &to_iso8601(self.interval.start))?;
        row.serialize_field("time_end", &to_iso8601(self.interval.end))?;
        row.end()
    }
}

/// Always spell out the offset, `Z` is never used.
fn to_iso8601(timestamp: DateTime<FixedOffset>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Reconstruct contiguous price intervals from the quotes' start times.
///
/// The last interval lasts as long as the gap between the two latest quotes,
/// or one hour when there is only one quote. Quotes starting at the same instant
/// are collapsed into the first one, so the output may be shorter than the input.
pub fn build_intervals(samples: &[PriceSample]) -> Vec<PriceInterval> {
    let mut samples = samples.iter().collect_vec();
    samples.sort_by_key(|sample| sample.starts_at);
    samples.dedup_by_key(|sample| sample.starts_at);

    let last_step = match samples.as_slice() {
        [.., previous, last] => last.starts_at - previous.starts_at,
        _ => TimeDelta::hours(1),
    };
    let ends = samples
        .iter()
        .skip(1)
        .map(|sample| sample.starts_at)
        .chain(samples.last().map(|last| last.starts_at + last_step));

    samples
        .iter()
        .zip(ends)
        .map(|(sample, end)| PriceInterval {
            interval: Interval::new(sample.starts_at, end),
            price: sample.unit_price,
        })
        .collect()
}
