quantity!(
    /// Consumed energy, rounded to watt-hours in the output.
    KilowattHours, unit: "kWh", decimals: 3
);
