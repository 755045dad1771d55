//! Artifact names and titles.

use heatmap_common::{floor_display_name, Metric};

/// File name for a floor's heatmap, e.g. `floor_1_download.png`.
pub fn artifact_name(floor: &str, metric: Metric) -> String {
    let floor = floor_display_name(floor).to_lowercase().replace(' ', "_");
    format!("{}_{}.png", floor, metric.short_name())
}

/// Image title, e.g. `Floor 1 - WiFi Speed Heatmap - Download Mbps`.
pub fn artifact_title(floor: &str, metric: Metric) -> String {
    format!(
        "{} - WiFi Speed Heatmap - {}",
        floor_display_name(floor),
        metric.title()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name() {
        assert_eq!(artifact_name("floor1", Metric::Download), "floor_1_download.png");
        assert_eq!(artifact_name("floor2", Metric::Upload), "floor_2_upload.png");
        assert_eq!(artifact_name("floor12", Metric::Ping), "floor_12_ping.png");
    }

    #[test]
    fn test_artifact_name_unnumbered_floor() {
        assert_eq!(artifact_name("Attic Loft", Metric::Ping), "attic_loft_ping.png");
    }

    #[test]
    fn test_artifact_title() {
        assert_eq!(
            artifact_title("floor2", Metric::Ping),
            "Floor 2 - WiFi Speed Heatmap - Ping Ms"
        );
    }
}
