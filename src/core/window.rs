use serde::Serialize;

use crate::{
    core::{consumption::ConsumptionSample, month::YearMonth},
    quantity::{cost::Cost, energy::KilowattHours},
};

/// Selects the samples that contribute to an [`Aggregate`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Window {
    /// Every sample.
    All,

    /// The latest `n` samples.
    Last(usize),

    /// Samples starting in the calendar month.
    Month(YearMonth),
}

#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Aggregate {
    #[serde(rename = "kwh")]
    pub total_kwh: KilowattHours,

    #[serde(rename = "cost")]
    pub total_cost: Cost,

    /// First currency seen, the others are not checked against it.
    pub currency: Option<String>,

    /// Number of malformed samples left out of the totals.
    #[serde(skip)]
    pub skipped: usize,
}

/// Sum up consumption and cost over the window.
///
/// Samples are ordered by their start first; the ones without a start go first.
/// A malformed sample never fails the aggregation and is only counted as skipped.
pub fn aggregate(samples: &[ConsumptionSample], window: Window) -> Aggregate {
    let mut samples: Vec<_> = samples.iter().collect();
    samples.sort_by_key(|sample| sample.from);
    if let Window::Last(n) = window {
        let excess = samples.len().saturating_sub(n);
        samples.drain(..excess);
    }

    let mut aggregate = Aggregate::default();
    for sample in samples {
        if let Window::Month(month) = window {
            match sample.from {
                Some(from) if month.contains(&from) => {}
                Some(_) => continue,
                None => {
                    aggregate.skipped += 1;
                    continue;
                }
            }
        }
        let Some((consumption, cost)) = sample.readings() else {
            aggregate.skipped += 1;
            continue;
        };
        aggregate.total_kwh += consumption;
        aggregate.total_cost += cost;
        if aggregate.currency.is_none() {
            aggregate.currency = sample.currency.clone().filter(|currency| !currency.is_empty());
        }
    }

    aggregate.total_kwh = aggregate.total_kwh.round();
    aggregate.total_cost = aggregate.total_cost.round();
    aggregate
}
