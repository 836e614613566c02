quantity!(
    /// Monetary amount in the home's currency, which is carried separately.
    Cost, unit: "", decimals: 2
);
