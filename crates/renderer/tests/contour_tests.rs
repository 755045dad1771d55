//! Tests for band levels and isolines over interpolated surfaces.

use grid_builder::build_domain_and_grid;
use heatmap_common::Metric;
use renderer::contour::{band_index, band_levels, connect_segments, isolines, march_squares};
use renderer::interpolate_surface;
use test_utils::{bump_samples, corner_samples};

// ============================================================================
// Band levels
// ============================================================================

#[test]
fn test_band_levels_cover_surface_range() {
    let samples = corner_samples();
    let (_, grid) = build_domain_and_grid(&samples, None, 50.0, 40).unwrap();
    let surface = interpolate_surface(&samples, Metric::Download, &grid).unwrap();

    let levels = band_levels(surface.min(), surface.max(), 20);
    assert_eq!(levels.len(), 21);
    assert_eq!(levels[0], surface.min());
    assert_eq!(levels[20], surface.max());
    assert!(levels.windows(2).all(|w| w[0] < w[1]));

    for &v in surface.values() {
        assert!(band_index(&levels, v) < 20);
    }
}

#[test]
fn test_band_index_is_monotonic() {
    let levels = band_levels(-5.0, 5.0, 10);
    let mut previous = 0;
    for k in 0..=100 {
        let v = -6.0 + 0.12 * k as f64;
        let band = band_index(&levels, v);
        assert!(band >= previous);
        previous = band;
    }
    assert_eq!(previous, 9);
}

// ============================================================================
// Isolines
// ============================================================================

#[test]
fn test_bump_has_closed_isoline_near_peak() {
    let samples = bump_samples(40, 200.0);
    let (_, grid) = build_domain_and_grid(&samples, None, 20.0, 60).unwrap();
    let surface = interpolate_surface(&samples, Metric::Download, &grid).unwrap();
    let levels = band_levels(surface.min(), surface.max(), 6);

    let contours = isolines(&surface, &levels);
    assert!(!contours.is_empty());
    let top = levels[levels.len() - 2];
    assert!(contours.iter().any(|c| c.level == top && c.closed));
    for c in &contours {
        assert!(c.points.len() >= 2);
        for p in &c.points {
            assert!(p.x >= 0.0 && p.x <= (surface.nx() - 1) as f32);
            assert!(p.y >= 0.0 && p.y <= (surface.ny() - 1) as f32);
        }
    }
}

#[test]
fn test_flat_surface_has_no_isolines() {
    let data = vec![3.0; 25];
    assert!(march_squares(&data, 5, 5, 3.0).is_empty());
    assert!(connect_segments(&[], 3.0).is_empty());
}

#[test]
fn test_saddle_produces_two_segments() {
    let data = vec![
        10.0, 0.0, //
        0.0, 10.0,
    ];
    let segments = march_squares(&data, 2, 2, 5.0);
    assert_eq!(segments.len(), 2);
    assert_eq!(connect_segments(&segments, 5.0).len(), 2);
}
