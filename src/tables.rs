use chrono::{DateTime, FixedOffset};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{price::PriceInterval, window::Aggregate},
    quantity::price::KilowattHourPrice,
};

pub fn build_price_table<'a>(
    intervals: impl IntoIterator<Item = &'a PriceInterval> + Clone,
    now: DateTime<FixedOffset>,
) -> Table {
    let (sum, count) = intervals
        .clone()
        .into_iter()
        .fold((0.0, 0_u32), |(sum, count), interval| (sum + interval.price.0, count + 1));
    let average = KilowattHourPrice(if count == 0 { 0.0 } else { sum / f64::from(count) });

    let mut table = new_table();
    table.set_header(vec!["Date", "Start", "End", "Price"]);
    for interval in intervals {
        let is_current = interval.interval.contains(now);
        let mut start = Cell::new(interval.interval.start.format("%H:%M"));
        if is_current {
            start = start.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            Cell::new(interval.interval.start.format("%Y-%m-%d")).add_attribute(Attribute::Dim),
            start,
            Cell::new(interval.interval.end.format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(interval.price.round()).set_alignment(CellAlignment::Right).fg(
                if interval.price >= average { Color::Red } else { Color::Green },
            ),
        ]);
    }
    table
}

pub fn build_stats_table(rows: &[(&str, &Aggregate)]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Window", "Energy", "Cost", "Skipped"]);
    for (window, aggregate) in rows {
        table.add_row(vec![
            Cell::new(window),
            Cell::new(aggregate.total_kwh).set_alignment(CellAlignment::Right),
            Cell::new(format!(
                "{} {}",
                aggregate.total_cost,
                aggregate.currency.as_deref().unwrap_or_default()
            ))
            .set_alignment(CellAlignment::Right),
            Cell::new(aggregate.skipped).set_alignment(CellAlignment::Right).fg(
                if aggregate.skipped == 0 { Color::Reset } else { Color::DarkYellow },
            ),
        ]);
    }
    table
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}
