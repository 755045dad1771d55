//! Domain and grid derivation.

use heatmap_common::{Domain, Grid, HeatmapConfig, HeatmapError, HeatmapResult, Sample, MIN_SAMPLES};
use tracing::debug;

/// Pixel dimensions of a floor-plan image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundExtent {
    pub width: u32,
    pub height: u32,
}

impl BackgroundExtent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Derive the padded domain for a sample set and the regular grid over it.
///
/// # Arguments
/// - `samples`: floor samples, at least [`MIN_SAMPLES`] of them
/// - `background`: floor-plan size; the domain grows to cover it
/// - `padding`: margin in pixels around the sample bounds
/// - `resolution`: grid points per axis
///
/// # Errors
/// - `InsufficientData` for fewer than three samples
/// - `DegenerateDomain` when the padded rectangle has zero width or height
/// - `InvalidConfig` for a negative padding or a resolution below 2
pub fn build_domain_and_grid(
    samples: &[Sample],
    background: Option<BackgroundExtent>,
    padding: f64,
    resolution: usize,
) -> HeatmapResult<(Domain, Grid)> {
    if samples.len() < MIN_SAMPLES {
        return Err(HeatmapError::insufficient_data(samples.len(), MIN_SAMPLES));
    }
    if !padding.is_finite() || padding < 0.0 {
        return Err(HeatmapError::invalid_config(format!(
            "padding must be a non-negative number, got {}",
            padding
        )));
    }

    let bounds = Domain::sample_bounds(samples)
        .ok_or_else(|| HeatmapError::insufficient_data(0, MIN_SAMPLES))?;
    let (x_min, mut x_max, y_min, mut y_max) = pad_bounds(bounds, padding);

    if let Some(extent) = background {
        x_max = x_max.max(extent.width as f64);
        y_max = y_max.max(extent.height as f64);
    }

    let domain = Domain::new(x_min, x_max, y_min, y_max)?;
    let grid = Grid::over(&domain, resolution)?;

    debug!(
        samples = samples.len(),
        x_min = domain.x_min(),
        x_max = domain.x_max(),
        y_min = domain.y_min(),
        y_max = domain.y_max(),
        resolution,
        "Built interpolation domain"
    );

    Ok((domain, grid))
}

/// Same as [`build_domain_and_grid`] with padding and resolution taken from a
/// configuration.
pub fn build_for_config(
    samples: &[Sample],
    background: Option<BackgroundExtent>,
    config: &HeatmapConfig,
) -> HeatmapResult<(Domain, Grid)> {
    build_domain_and_grid(samples, background, config.padding, config.resolution)
}

/// Expand `(x_min, x_max, y_min, y_max)` by `padding`. Minimums are clamped at
/// zero since pixel coordinates are non-negative.
pub fn pad_bounds(bounds: (f64, f64, f64, f64), padding: f64) -> (f64, f64, f64, f64) {
    let (x_min, x_max, y_min, y_max) = bounds;
    (
        (x_min - padding).max(0.0),
        x_max + padding,
        (y_min - padding).max(0.0),
        y_max + padding,
    )
}
