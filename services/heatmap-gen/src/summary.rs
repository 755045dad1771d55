//! Per-floor summary of a measurement log.

use std::fmt;

use chrono::NaiveDateTime;
use heatmap_common::{floor_display_name, MeasurementLog, Metric, Sample};

/// Download statistics and time span for one floor.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorSummary {
    pub floor: String,
    pub measurements: usize,
    pub avg_download: f64,
    pub min_download: f64,
    pub max_download: f64,
    pub first_measured: Option<NaiveDateTime>,
    pub last_measured: Option<NaiveDateTime>,
}

impl FloorSummary {
    /// Summarise a floor, `None` when it has no samples.
    pub fn from_samples(floor: &str, samples: &[Sample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let downloads: Vec<f64> = samples.iter().map(|s| Metric::Download.value(s)).collect();
        let avg_download = downloads.iter().sum::<f64>() / downloads.len() as f64;
        let min_download = downloads.iter().copied().fold(f64::INFINITY, f64::min);
        let max_download = downloads.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let times: Vec<NaiveDateTime> = samples.iter().filter_map(Sample::parsed_timestamp).collect();

        Some(Self {
            floor: floor.to_string(),
            measurements: samples.len(),
            avg_download,
            min_download,
            max_download,
            first_measured: times.iter().min().copied(),
            last_measured: times.iter().max().copied(),
        })
    }
}

impl fmt::Display for FloorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", floor_display_name(&self.floor))?;
        writeln!(f, "  Measurements: {}", self.measurements)?;
        writeln!(f, "  Avg Download: {:.2} Mbps", self.avg_download)?;
        writeln!(f, "  Min Download: {:.2} Mbps", self.min_download)?;
        write!(f, "  Max Download: {:.2} Mbps", self.max_download)?;
        if let (Some(first), Some(last)) = (self.first_measured, self.last_measured) {
            write!(
                f,
                "\n  Measured: {} to {}",
                first.format("%Y-%m-%d %H:%M"),
                last.format("%Y-%m-%d %H:%M")
            )?;
        }
        Ok(())
    }
}

/// Summaries for every non-empty floor, in floor order.
pub fn summarize(log: &MeasurementLog) -> Vec<FloorSummary> {
    log.floors()
        .into_iter()
        .filter_map(|(floor, samples)| FloorSummary::from_samples(floor, samples))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_summary_statistics() {
        let samples = vec![
            Sample::at(0.0, 0.0, 10.0, 1.0, 30.0).with_timestamp("2024-01-15T10:05:00"),
            Sample::at(10.0, 0.0, 40.0, 1.0, 30.0).with_timestamp("2024-01-15T09:30:00"),
            Sample::at(0.0, 10.0, 25.0, 1.0, 30.0).with_timestamp("2024-01-15T11:45:00"),
        ];

        let summary = FloorSummary::from_samples("floor1", &samples).unwrap();
        assert_eq!(summary.measurements, 3);
        assert!((summary.avg_download - 25.0).abs() < 1e-12);
        assert_eq!(summary.min_download, 10.0);
        assert_eq!(summary.max_download, 40.0);
        assert_eq!(
            summary.first_measured.unwrap().format("%H:%M").to_string(),
            "09:30"
        );
        assert_eq!(
            summary.last_measured.unwrap().format("%H:%M").to_string(),
            "11:45"
        );
    }

    #[test]
    fn test_empty_floor_has_no_summary() {
        assert!(FloorSummary::from_samples("floor2", &[]).is_none());
    }

    #[test]
    fn test_unparseable_timestamps_are_ignored() {
        let samples = vec![Sample::at(0.0, 0.0, 12.5, 1.0, 30.0).with_timestamp("yesterday")];
        let summary = FloorSummary::from_samples("floor1", &samples).unwrap();
        assert!(summary.first_measured.is_none());

        let text = summary.to_string();
        assert!(text.starts_with("Floor 1:"));
        assert!(text.contains("Avg Download: 12.50 Mbps"));
        assert!(!text.contains("Measured:"));
    }
}
