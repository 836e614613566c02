quantity!(
    /// Price per kilowatt-hour, including taxes and fees.
    KilowattHourPrice, unit: "/kWh", decimals: 5
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(KilowattHourPrice(1.234_567).to_string(), "1.23457 /kWh");
    }

    #[test]
    fn test_serialize_transparent() -> crate::prelude::Result {
        assert_eq!(serde_json::to_string(&KilowattHourPrice(2.0))?, "2.0");
        Ok(())
    }
}
