//! Regular sampling meshes over a [`Domain`].

use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::error::{HeatmapError, HeatmapResult};

/// A regular mesh of `nx * ny` points spanning a domain.
///
/// Points are stored as two axis vectors; the point at row `j`, column `i` is
/// `(xs[i], ys[j])`. Row 0 is `y_min`, the top of the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Grid {
    /// Build a square mesh with `resolution` points per axis, end points included.
    pub fn over(domain: &Domain, resolution: usize) -> HeatmapResult<Self> {
        if resolution < 2 {
            return Err(HeatmapError::invalid_config(format!(
                "grid resolution must be >= 2, got {}",
                resolution
            )));
        }
        Ok(Self {
            xs: linspace(domain.x_min(), domain.x_max(), resolution),
            ys: linspace(domain.y_min(), domain.y_max(), resolution),
        })
    }

    /// Number of columns.
    pub fn nx(&self) -> usize {
        self.xs.len()
    }

    /// Number of rows.
    pub fn ny(&self) -> usize {
        self.ys.len()
    }

    /// Total number of points.
    pub fn len(&self) -> usize {
        self.nx() * self.ny()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinates of the point at (column, row).
    pub fn point(&self, i: usize, j: usize) -> Option<(f64, f64)> {
        Some((*self.xs.get(i)?, *self.ys.get(j)?))
    }

    /// Whether the mesh spans exactly the given domain.
    pub fn matches(&self, domain: &Domain) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()));
        match (self.xs.first(), self.xs.last(), self.ys.first(), self.ys.last()) {
            (Some(&x0), Some(&x1), Some(&y0), Some(&y1)) => {
                close(x0, domain.x_min())
                    && close(x1, domain.x_max())
                    && close(y0, domain.y_min())
                    && close(y1, domain.y_max())
            }
            _ => false,
        }
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|k| if k == n - 1 { end } else { start + step * k as f64 })
                .collect()
        }
    }
}
