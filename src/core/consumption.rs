use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_with::serde_as;

use crate::quantity::{cost::Cost, energy::KilowattHours};

/// Metered consumption over `from..to`, any field may be missing because of metering gaps.
#[must_use]
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConsumptionSample {
    /// Missing or unparseable timestamps become [`None`] instead of failing the whole response.
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub from: Option<DateTime<FixedOffset>>,

    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub to: Option<DateTime<FixedOffset>>,

    #[serde(default)]
    pub consumption: Option<Reading>,

    #[serde(default)]
    pub cost: Option<Reading>,

    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub currency: Option<String>,
}

impl ConsumptionSample {
    /// Coerce both readings, treating the missing ones as zero.
    ///
    /// Returns [`None`] when a present reading is not a number.
    #[must_use]
    pub fn readings(&self) -> Option<(KilowattHours, Cost)> {
        let consumption = coerce(self.consumption.as_ref())?;
        let cost = coerce(self.cost.as_ref())?;
        Some((KilowattHours(consumption), Cost(cost)))
    }
}

fn coerce(reading: Option<&Reading>) -> Option<f64> {
    reading.map_or(Some(0.0), Reading::to_f64)
}

/// Raw numeric reading as the provider sent it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Reading {
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok().filter(|value| value.is_finite()),
            Self::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_deserialize_lenient_ok() -> Result {
        // language=json
        let body = r#"[
            {"from": "2025-11-20T00:00:00+01:00", "to": "2025-11-21T00:00:00+01:00", "consumption": 12.5, "cost": 20.1, "currency": "SEK"},
            {"from": "yesterday", "consumption": "1.5", "cost": null},
            {"consumption": true},
            {}
        ]"#;
        let samples = serde_json::from_str::<Vec<ConsumptionSample>>(body)?;
        assert_eq!(samples.len(), 4);
        assert!(samples[0].from.is_some());
        assert_eq!(samples[0].currency.as_deref(), Some("SEK"));
        assert!(samples[1].from.is_none());
        assert_eq!(samples[1].consumption, Some(Reading::Text("1.5".to_owned())));
        assert!(samples[1].cost.is_none());
        assert_eq!(samples[2].consumption, Some(Reading::Other(serde_json::Value::Bool(true))));
        assert!(samples[3].from.is_none());
        Ok(())
    }

    #[test]
    fn test_deserialize_bad_currency_ok() -> Result {
        // language=json
        let body = r#"[
            {"from": "2025-11-20T00:00:00+01:00", "consumption": 1.0, "cost": 2.0, "currency": "SEK"},
            {"consumption": 2.0, "currency": 5}
        ]"#;
        let samples = serde_json::from_str::<Vec<ConsumptionSample>>(body)?;
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].currency.as_deref(), Some("SEK"));
        assert!(samples[1].currency.is_none());
        assert_eq!(samples[1].consumption, Some(Reading::Number(2.0)));
        Ok(())
    }

    #[test]
    fn test_readings_missing_cost() {
        let sample = ConsumptionSample {
            consumption: Some(Reading::Number(0.75)),
            ..Default::default()
        };
        let (consumption, cost) = sample.readings().unwrap();
        assert_abs_diff_eq!(consumption.0, 0.75);
        assert_abs_diff_eq!(cost.0, 0.0);
    }

    #[test]
    fn test_readings_numeric_text() {
        let sample = ConsumptionSample {
            consumption: Some(Reading::Text(" 2.5 ".to_owned())),
            cost: Some(Reading::Text("3".to_owned())),
            ..Default::default()
        };
        let (consumption, cost) = sample.readings().unwrap();
        assert_abs_diff_eq!(consumption.0, 2.5);
        assert_abs_diff_eq!(cost.0, 3.0);
    }

    #[test]
    fn test_readings_malformed() {
        let sample = ConsumptionSample {
            consumption: Some(Reading::Number(1.0)),
            cost: Some(Reading::Text("n/a".to_owned())),
            ..Default::default()
        };
        assert!(sample.readings().is_none());
    }
}
