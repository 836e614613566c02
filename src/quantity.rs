#[macro_use]
mod macros;

pub mod cost;
pub mod energy;
pub mod price;

/// Round the value to the specified number of decimal places, ties to even.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
