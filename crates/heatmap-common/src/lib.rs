//! Common types shared by the grid builder, the renderer and the batch driver.

pub mod config;
pub mod domain;
pub mod error;
pub mod grid;
pub mod sample;

pub use config::{ColourScale, HeatmapConfig};
pub use domain::Domain;
pub use error::{HeatmapError, HeatmapResult};
pub use grid::{linspace, Grid};
pub use sample::{floor_display_name, Location, MeasurementLog, Metric, Sample, Speeds};

/// Minimum number of samples a floor needs before a surface can be built.
pub const MIN_SAMPLES: usize = 3;
