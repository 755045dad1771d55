//! Measurement records and the metric selectors used to read them.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{HeatmapError, HeatmapResult};

/// Pixel-space location of a measurement on its floor plan.
///
/// Origin is the top-left corner of the background image, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

/// Speed-test results recorded at a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speeds {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub ping_ms: f64,
}

/// One measurement: where it was taken, what was measured, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// ISO-8601 timestamp as written by the collector, kept verbatim.
    #[serde(default)]
    pub timestamp: String,
    pub location: Location,
    pub speeds: Speeds,
}

impl Sample {
    pub fn new(x: f64, y: f64, speeds: Speeds) -> Self {
        Self {
            timestamp: String::new(),
            location: Location { x, y },
            speeds,
        }
    }

    /// Shorthand used heavily by tests and generators.
    pub fn at(x: f64, y: f64, download_mbps: f64, upload_mbps: f64, ping_ms: f64) -> Self {
        Self::new(
            x,
            y,
            Speeds {
                download_mbps,
                upload_mbps,
                ping_ms,
            },
        )
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn x(&self) -> f64 {
        self.location.x
    }

    pub fn y(&self) -> f64 {
        self.location.y
    }

    /// Parse the timestamp. Accepts RFC 3339 as well as the offset-less
    /// `YYYY-MM-DDTHH:MM:SS[.ffffff]` form.
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}

/// The scalar metrics a heatmap can be drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Download,
    Upload,
    Ping,
}

impl Metric {
    /// All metrics in report order.
    pub const ALL: [Metric; 3] = [Metric::Download, Metric::Upload, Metric::Ping];

    /// Select this metric's value from a sample.
    pub fn value(&self, sample: &Sample) -> f64 {
        match self {
            Metric::Download => sample.speeds.download_mbps,
            Metric::Upload => sample.speeds.upload_mbps,
            Metric::Ping => sample.speeds.ping_ms,
        }
    }

    /// Field name in the measurement log.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Download => "download_mbps",
            Metric::Upload => "upload_mbps",
            Metric::Ping => "ping_ms",
        }
    }

    /// Field name with its unit suffix stripped, used in artifact names.
    pub fn short_name(&self) -> &'static str {
        match self {
            Metric::Download => "download",
            Metric::Upload => "upload",
            Metric::Ping => "ping",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Download | Metric::Upload => "Mbps",
            Metric::Ping => "ms",
        }
    }

    /// Human-readable title, e.g. "Download Mbps".
    pub fn title(&self) -> String {
        self.key()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Speeds are better high, latency is better low. Drives colour scale
    /// orientation so green always means good.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, Metric::Ping)
    }

    /// Parse from string (case-insensitive). Accepts short names and keys.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "download" | "download_mbps" => Some(Metric::Download),
            "upload" | "upload_mbps" => Some(Metric::Upload),
            "ping" | "ping_ms" | "latency" => Some(Metric::Ping),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Display name for a floor key: `floor2` becomes `Floor 2`, anything else is
/// returned unchanged.
pub fn floor_display_name(key: &str) -> String {
    match floor_number(key) {
        Some(n) => format!("Floor {}", n),
        None => key.to_string(),
    }
}

fn floor_number(key: &str) -> Option<u32> {
    key.strip_prefix("floor")?.parse().ok()
}

/// All recorded samples keyed by floor (`floor1`, `floor2`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementLog {
    floors: BTreeMap<String, Vec<Sample>>,
}

impl MeasurementLog {
    /// An empty log with the two floors the collector always writes.
    pub fn new() -> Self {
        let mut log = Self::default();
        log.floors.insert("floor1".to_string(), Vec::new());
        log.floors.insert("floor2".to_string(), Vec::new());
        log
    }

    /// Parse a log from JSON. Floors missing from the document are treated as
    /// empty.
    pub fn from_json(json: &str) -> HeatmapResult<Self> {
        let parsed: MeasurementLog = serde_json::from_str(json)?;
        let mut log = Self::new();
        log.floors.extend(parsed.floors);
        Ok(log)
    }

    /// Load a log from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> HeatmapResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HeatmapError::Io(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> HeatmapResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn push(&mut self, floor: impl Into<String>, sample: Sample) {
        self.floors.entry(floor.into()).or_default().push(sample);
    }

    /// Samples for one floor, empty if the floor is unknown.
    pub fn samples(&self, floor: &str) -> &[Sample] {
        self.floors.get(floor).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Floors in numeric order (`floor2` before `floor10`), unnumbered keys last.
    pub fn floors(&self) -> Vec<(&str, &[Sample])> {
        let mut floors: Vec<(&str, &[Sample])> = self
            .floors
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .collect();
        floors.sort_by_key(|(k, _)| (floor_number(k).unwrap_or(u32::MAX), k.to_string()));
        floors
    }

    pub fn total_samples(&self) -> usize {
        self.floors.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = r#"{
        "floor1": [
            {
                "timestamp": "2024-01-15T12:00:00.123456",
                "location": {"x": 120.5, "y": 80.0},
                "speeds": {"download_mbps": 310.2, "upload_mbps": 40.1, "ping_ms": 12.3}
            }
        ]
    }"#;

    #[test]
    fn test_parse_log_fills_missing_floors() {
        let log = MeasurementLog::from_json(LOG).unwrap();
        assert_eq!(log.samples("floor1").len(), 1);
        assert!(log.samples("floor2").is_empty());
        assert_eq!(log.floors().len(), 2);

        let sample = &log.samples("floor1")[0];
        assert_eq!(sample.x(), 120.5);
        assert_eq!(Metric::Upload.value(sample), 40.1);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let naive = Sample::at(0.0, 0.0, 1.0, 1.0, 1.0).with_timestamp("2024-01-15T12:00:00.5");
        assert!(naive.parsed_timestamp().is_some());

        let rfc = Sample::at(0.0, 0.0, 1.0, 1.0, 1.0).with_timestamp("2024-01-15T12:00:00Z");
        assert!(rfc.parsed_timestamp().is_some());

        let junk = Sample::at(0.0, 0.0, 1.0, 1.0, 1.0).with_timestamp("yesterday");
        assert!(junk.parsed_timestamp().is_none());
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(Metric::Download.title(), "Download Mbps");
        assert_eq!(Metric::Ping.title(), "Ping Ms");
        assert_eq!(Metric::Ping.short_name(), "ping");
        assert_eq!(Metric::parse("UPLOAD_MBPS"), Some(Metric::Upload));
        assert!(!Metric::Ping.higher_is_better());
    }

    #[test]
    fn test_floor_order_is_numeric() {
        let mut log = MeasurementLog::new();
        log.push("floor10", Sample::at(1.0, 1.0, 1.0, 1.0, 1.0));
        let keys: Vec<&str> = log.floors().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["floor1", "floor2", "floor10"]);
        assert_eq!(floor_display_name("floor10"), "Floor 10");
        assert_eq!(floor_display_name("basement"), "basement");
    }
}
