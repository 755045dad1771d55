//! Scattered-data interpolation of sample values onto a regular grid.

pub mod clough_tocher;
pub mod delaunay;

use std::cmp::Ordering;

use heatmap_common::{Grid, HeatmapError, HeatmapResult, Metric, Sample};
use rayon::prelude::*;
use tracing::debug;

pub use clough_tocher::CloughTocher2D;
pub use delaunay::Triangulation;

/// Interpolated values over a [`Grid`], row-major with row `j` at `grid.ys[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    nx: usize,
    ny: usize,
    values: Vec<f64>,
    fill_value: f64,
    min: f64,
    max: f64,
    covered: usize,
}

impl Surface {
    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at column `i`, row `j`.
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[j * self.nx + i]
    }

    /// Value used outside the convex hull of the samples (their mean).
    pub fn fill_value(&self) -> f64 {
        self.fill_value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of grid points inside the convex hull.
    pub fn covered_cells(&self) -> usize {
        self.covered
    }

    /// Bilinear sample at fractional grid coordinates, clamped to the grid.
    pub fn sample(&self, fx: f64, fy: f64) -> f64 {
        let fx = fx.clamp(0.0, (self.nx - 1) as f64);
        let fy = fy.clamp(0.0, (self.ny - 1) as f64);
        let x0 = (fx.floor() as usize).min(self.nx - 1);
        let y0 = (fy.floor() as usize).min(self.ny - 1);
        let x1 = (x0 + 1).min(self.nx - 1);
        let y1 = (y0 + 1).min(self.ny - 1);
        let dx = fx - x0 as f64;
        let dy = fy - y0 as f64;

        let top = self.value(x0, y0) * (1.0 - dx) + self.value(x1, y0) * dx;
        let bottom = self.value(x0, y1) * (1.0 - dx) + self.value(x1, y1) * dx;
        top * (1.0 - dy) + bottom * dy
    }
}

/// Sample locations and metric values ready for triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPoints {
    /// Distinct locations in lexicographic (x, y) order.
    pub points: Vec<[f64; 2]>,
    /// Value per location; duplicates are averaged.
    pub values: Vec<f64>,
    /// Arithmetic mean over all samples, duplicates included.
    pub mean: f64,
}

/// Extract `metric` from the samples, merge duplicate locations and sort.
///
/// The ordering makes the triangulation independent of input order.
pub fn prepare_points(samples: &[Sample], metric: Metric) -> PreparedPoints {
    let mut raw: Vec<([f64; 2], f64)> = samples
        .iter()
        .map(|s| ([s.x(), s.y()], metric.value(s)))
        .collect();
    raw.sort_by(|a, b| {
        a.0[0]
            .total_cmp(&b.0[0])
            .then_with(|| a.0[1].total_cmp(&b.0[1]))
            .then_with(|| a.1.total_cmp(&b.1))
    });
    // Summed after sorting so the mean is bit-identical for any input order.
    let mean = if raw.is_empty() {
        0.0
    } else {
        raw.iter().map(|(_, v)| v).sum::<f64>() / raw.len() as f64
    };

    let mut points: Vec<[f64; 2]> = Vec::with_capacity(raw.len());
    let mut values: Vec<f64> = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let p = raw[i].0;
        let mut sum = 0.0;
        let mut count = 0usize;
        while i < raw.len() && same_location(raw[i].0, p) {
            sum += raw[i].1;
            count += 1;
            i += 1;
        }
        points.push(p);
        values.push(sum / count as f64);
    }

    PreparedPoints {
        points,
        values,
        mean,
    }
}

fn same_location(a: [f64; 2], b: [f64; 2]) -> bool {
    a[0].total_cmp(&b[0]) == Ordering::Equal && a[1].total_cmp(&b[1]) == Ordering::Equal
}

/// Interpolate `metric` over every point of `grid`.
///
/// Points outside the convex hull of the samples take the sample mean; the
/// result never contains NaN.
pub fn interpolate_surface(samples: &[Sample], metric: Metric, grid: &Grid) -> HeatmapResult<Surface> {
    if samples.is_empty() {
        return Err(HeatmapError::render("no samples to interpolate"));
    }
    if grid.is_empty() {
        return Err(HeatmapError::render("grid has no points"));
    }

    let prepared = prepare_points(samples, metric);
    let fill_value = prepared.mean;
    let interpolant = CloughTocher2D::fit(&prepared.points, &prepared.values, fill_value);

    let rows: Vec<Vec<(f64, bool)>> = grid
        .ys
        .par_iter()
        .map(|&y| {
            let mut hint = None;
            grid.xs
                .iter()
                .map(|&x| {
                    let (v, inside) = interpolant.evaluate_with_hint(x, y, &mut hint);
                    if v.is_finite() {
                        (v, inside)
                    } else {
                        (fill_value, false)
                    }
                })
                .collect()
        })
        .collect();

    let mut values = Vec::with_capacity(grid.len());
    let mut covered = 0;
    for (v, inside) in rows.into_iter().flatten() {
        covered += inside as usize;
        values.push(v);
    }
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    debug!(
        metric = %metric,
        samples = samples.len(),
        distinct_points = prepared.points.len(),
        triangles = interpolant.triangulation().triangles.len(),
        covered,
        min,
        max,
        "Interpolated surface"
    );

    Ok(Surface {
        nx: grid.nx(),
        ny: grid.ny(),
        values,
        fill_value,
        min,
        max,
        covered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_points_merges_duplicates() {
        let samples = vec![
            Sample::at(5.0, 5.0, 10.0, 1.0, 1.0),
            Sample::at(0.0, 0.0, 4.0, 1.0, 1.0),
            Sample::at(5.0, 5.0, 20.0, 1.0, 1.0),
        ];
        let prepared = prepare_points(&samples, Metric::Download);
        assert_eq!(prepared.points, vec![[0.0, 0.0], [5.0, 5.0]]);
        assert_eq!(prepared.values, vec![4.0, 15.0]);
        assert!((prepared.mean - 34.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_surface_bilinear_sample() {
        let surface = Surface {
            nx: 2,
            ny: 2,
            values: vec![0.0, 10.0, 20.0, 30.0],
            fill_value: 15.0,
            min: 0.0,
            max: 30.0,
            covered: 4,
        };
        assert_eq!(surface.sample(0.0, 0.0), 0.0);
        assert_eq!(surface.sample(1.0, 1.0), 30.0);
        assert!((surface.sample(0.5, 0.5) - 15.0).abs() < 1e-12);
        assert_eq!(surface.sample(-3.0, 9.0), 20.0);
    }

    #[test]
    fn test_empty_samples_rejected() {
        let grid = Grid {
            xs: vec![0.0, 1.0],
            ys: vec![0.0, 1.0],
        };
        let err = interpolate_surface(&[], Metric::Ping, &grid).unwrap_err();
        assert_eq!(err.kind(), "render");
    }
}
