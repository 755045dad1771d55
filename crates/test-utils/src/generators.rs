//! Sample set generators for creating predictable measurement data.
//!
//! All generators are deterministic so surfaces built from them can be
//! compared across runs.

use heatmap_common::{MeasurementLog, Sample};

/// The four-corner square used throughout the tests.
///
/// Download values follow the plane `10 + 0.1x + 0.2y`, so any interpolant
/// that reproduces linear data gives 25.0 at the centre.
pub fn corner_samples() -> Vec<Sample> {
    vec![
        Sample::at(0.0, 0.0, 10.0, 5.0, 40.0),
        Sample::at(100.0, 0.0, 20.0, 6.0, 30.0),
        Sample::at(0.0, 100.0, 30.0, 7.0, 20.0),
        Sample::at(100.0, 100.0, 40.0, 8.0, 10.0),
    ]
}

/// Samples of a linear field `a + bx * x + by * y` (used for every metric) at
/// deterministic scattered locations inside `[0, extent]^2`.
pub fn linear_field_samples(n: usize, extent: f64, a: f64, bx: f64, by: f64) -> Vec<Sample> {
    scattered_points(n, extent)
        .into_iter()
        .map(|(x, y)| {
            let v = a + bx * x + by * y;
            Sample::at(x, y, v, v, v)
        })
        .collect()
}

/// Samples with a smooth, non-linear download field (a bump centred in the
/// extent) and derived upload/ping values.
pub fn bump_samples(n: usize, extent: f64) -> Vec<Sample> {
    let c = extent / 2.0;
    scattered_points(n, extent)
        .into_iter()
        .map(|(x, y)| {
            let r2 = ((x - c).powi(2) + (y - c).powi(2)) / (extent * extent);
            let download = 50.0 + 250.0 * (-8.0 * r2).exp();
            Sample::at(x, y, download, download / 8.0, 5.0 + 300.0 / download)
        })
        .collect()
}

/// `n` samples on a horizontal line (collinear, no triangulation possible).
pub fn collinear_samples(n: usize, y: f64) -> Vec<Sample> {
    (0..n)
        .map(|k| {
            let x = 20.0 + 30.0 * k as f64;
            Sample::at(x, y, 10.0 * (k + 1) as f64, 5.0, 20.0)
        })
        .collect()
}

/// Deterministic scattered points inside `[0, extent]^2` on a golden-angle
/// spiral, with the four corners included when `n >= 4` so the hull covers
/// most of the square.
pub fn scattered_points(n: usize, extent: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(n);
    let corners = [(0.0, 0.0), (extent, 0.0), (0.0, extent), (extent, extent)];
    if n >= 4 {
        points.extend(corners);
    }
    let golden = std::f64::consts::PI * (3.0 - 5f64.sqrt());
    let c = extent / 2.0;
    let remaining = n - points.len();
    for k in 0..remaining {
        let r = 0.45 * extent * ((k as f64 + 0.5) / remaining as f64).sqrt();
        let theta = golden * k as f64;
        points.push((c + r * theta.cos(), c + r * theta.sin()));
    }
    points
}

/// A two-floor measurement log with `floor1_count` and `floor2_count` samples.
pub fn measurement_log(floor1_count: usize, floor2_count: usize) -> MeasurementLog {
    let mut log = MeasurementLog::new();
    for (k, sample) in bump_samples(floor1_count, 400.0).into_iter().enumerate() {
        log.push(
            "floor1",
            sample.with_timestamp(format!("2024-01-15T12:{:02}:00", k % 60)),
        );
    }
    for (k, sample) in bump_samples(floor2_count, 300.0).into_iter().enumerate() {
        log.push(
            "floor2",
            sample.with_timestamp(format!("2024-01-16T09:{:02}:00", k % 60)),
        );
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_samples_are_planar() {
        for s in corner_samples() {
            let expected = 10.0 + 0.1 * s.x() + 0.2 * s.y();
            assert!((s.speeds.download_mbps - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scattered_points_inside_extent() {
        let points = scattered_points(25, 200.0);
        assert_eq!(points.len(), 25);
        for (x, y) in points {
            assert!((0.0..=200.0).contains(&x));
            assert!((0.0..=200.0).contains(&y));
        }
    }

    #[test]
    fn test_measurement_log_counts() {
        let log = measurement_log(5, 1);
        assert_eq!(log.samples("floor1").len(), 5);
        assert_eq!(log.samples("floor2").len(), 1);
        assert_eq!(log.total_samples(), 6);
    }
}
