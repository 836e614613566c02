use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use bon::Builder;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::{
    core::window::Aggregate,
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
};

#[derive(Copy, Clone, Debug)]
pub enum Format {
    Compact,

    /// Indented with two spaces.
    Pretty,
}

/// Writes JSON documents into the output directory.
pub struct Writer {
    dir: PathBuf,
}

impl Writer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Serialize the document into the file, creating the directory when missing.
    #[instrument(skip_all, fields(name = name))]
    pub fn write<T: Serialize + ?Sized>(
        &self,
        name: &str,
        document: &T,
        format: Format,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create `{}`", self.dir.display()))?;
        let path = self.dir.join(name);
        write_to(&path, document, format)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        info!(path = %path.display(), "written");
        Ok(path)
    }
}

fn write_to<T: Serialize + ?Sized>(path: &Path, document: &T, format: Format) -> Result {
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        Format::Compact => serde_json::to_writer(&mut writer, document)?,
        Format::Pretty => serde_json::to_writer_pretty(&mut writer, document)?,
    }
    writer.flush()?;
    Ok(())
}

/// Energy and cost without the currency, as the dashboard expects in the basic statistics.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Totals {
    pub kwh: KilowattHours,
    pub cost: Cost,
}

impl From<&Aggregate> for Totals {
    fn from(aggregate: &Aggregate) -> Self {
        Self { kwh: aggregate.total_kwh, cost: aggregate.total_cost }
    }
}

/// `stats.json` written along with the prices.
#[derive(Serialize)]
pub struct BasicStats {
    #[serde(rename = "last24h")]
    pub last_24_hours: Totals,

    #[serde(rename = "last7d")]
    pub last_7_days: Totals,
}

/// `stats.json` written by the dedicated statistics command.
#[derive(Serialize, Builder)]
pub struct ExtendedStats {
    #[serde(serialize_with = "serialize_seconds")]
    pub generated_at: DateTime<Utc>,

    #[serde(rename = "last24h")]
    pub last_24_hours: Aggregate,

    #[serde(rename = "last7d")]
    pub last_7_days: Aggregate,

    #[serde(rename = "thisMonth")]
    pub this_month: Aggregate,
}

fn serialize_seconds<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::{Value, json};

    use super::*;

    fn aggregate(kwh: f64, cost: f64) -> Aggregate {
        Aggregate {
            total_kwh: KilowattHours(kwh),
            total_cost: Cost(cost),
            currency: Some("SEK".to_owned()),
            skipped: 1,
        }
    }

    #[test]
    fn test_basic_stats_shape() -> Result {
        let stats = BasicStats {
            last_24_hours: Totals::from(&aggregate(12.345, 23.45)),
            last_7_days: Totals::from(&aggregate(80.0, 150.5)),
        };
        assert_eq!(
            serde_json::to_value(&stats)?,
            json!({
                "last24h": {"kwh": 12.345, "cost": 23.45},
                "last7d": {"kwh": 80.0, "cost": 150.5}
            })
        );
        Ok(())
    }

    #[test]
    fn test_extended_stats_shape() -> Result {
        let stats = ExtendedStats::builder()
            .generated_at(Utc.with_ymd_and_hms(2025, 11, 20, 7, 30, 15).unwrap())
            .last_24_hours(aggregate(12.345, 23.45))
            .last_7_days(aggregate(80.0, 150.5))
            .this_month(Aggregate::default())
            .build();
        assert_eq!(
            serde_json::to_value(&stats)?,
            json!({
                "generated_at": "2025-11-20T07:30:15Z",
                "last24h": {"kwh": 12.345, "cost": 23.45, "currency": "SEK"},
                "last7d": {"kwh": 80.0, "cost": 150.5, "currency": "SEK"},
                "thisMonth": {"kwh": 0.0, "cost": 0.0, "currency": null}
            })
        );
        Ok(())
    }

    #[test]
    fn test_write_creates_directory() -> Result {
        let root = tempfile::tempdir()?;
        let writer = Writer::new(root.path().join("data"));
        let path = writer.write("stats.json", &json!({"answer": 42}), Format::Pretty)?;
        assert_eq!(path, root.path().join("data").join("stats.json"));
        let written: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(written, json!({"answer": 42}));
        Ok(())
    }

    #[test]
    fn test_write_compact_overwrites() -> Result {
        let root = tempfile::tempdir()?;
        let writer = Writer::new(root.path());
        writer.write("today.json", &[1, 2, 3], Format::Compact)?;
        let path = writer.write("today.json", &[4], Format::Compact)?;
        assert_eq!(fs::read_to_string(path)?, "[4]");
        Ok(())
    }
}
