//! Common test fixtures: measurement log documents and floor-plan images.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

/// Measurement log JSON as written by the collector.
pub const SAMPLE_LOG_JSON: &str = r#"{
  "floor1": [
    {
      "timestamp": "2024-01-15T12:00:00.000001",
      "location": {"x": 40.0, "y": 60.0},
      "speeds": {"download_mbps": 310.5, "upload_mbps": 42.1, "ping_ms": 11.2}
    },
    {
      "timestamp": "2024-01-15T12:05:00.000001",
      "location": {"x": 220.0, "y": 70.0},
      "speeds": {"download_mbps": 180.25, "upload_mbps": 30.0, "ping_ms": 18.9}
    },
    {
      "timestamp": "2024-01-15T12:10:00.000001",
      "location": {"x": 130.0, "y": 200.0},
      "speeds": {"download_mbps": 95.75, "upload_mbps": 12.4, "ping_ms": 35.0}
    }
  ],
  "floor2": []
}"#;

/// Floor-plan dimensions used by image fixtures.
pub const FLOOR_PLAN_SIZE: (u32, u32) = (320, 240);

/// Write a simple floor-plan PNG (white with grey walls) and return its path.
pub fn write_floor_plan(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let wall = Rgba([90, 90, 90, 255]);
    for x in 0..width {
        for t in 0..3.min(height) {
            img.put_pixel(x, t, wall);
            img.put_pixel(x, height - 1 - t, wall);
        }
    }
    for y in 0..height {
        for t in 0..3.min(width) {
            img.put_pixel(t, y, wall);
            img.put_pixel(width - 1 - t, y, wall);
            img.put_pixel((width / 2 + t).min(width - 1), y, wall);
        }
    }
    let path = dir.join(name);
    img.save(&path).expect("Failed to write floor plan fixture");
    path
}

/// Write bytes that are not a decodable image and return the path.
pub fn write_corrupt_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"\x89PNG\r\n\x1a\nthis is not really a png")
        .expect("Failed to write corrupt image fixture");
    path
}

/// Write a measurement log document and return its path.
pub fn write_log(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("wifi_measurements.json");
    std::fs::write(&path, json).expect("Failed to write measurement log fixture");
    path
}
