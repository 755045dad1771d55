//! Rendering configuration shared by the grid builder and the renderer.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{HeatmapError, HeatmapResult};

/// Configuration for domain building and surface rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Margin added around the sample bounding box, in pixels.
    pub padding: f64,

    /// Grid points per axis.
    pub resolution: usize,

    /// Number of filled colour bands.
    pub contour_levels: usize,

    /// Colour scale for the bands.
    pub colour_scale: ColourScale,

    /// Longest side of the surface area of the output image, in pixels.
    pub max_dimension: u32,

    /// Opacity of the floor-plan backdrop (0-1).
    pub background_opacity: f32,

    /// Opacity of the colour bands over the backdrop (0-1).
    pub surface_opacity: f32,

    /// Draw thin isolines at band boundaries.
    pub isolines: bool,

    /// Optional TrueType font for labels, legend and title. Without it labels
    /// use built-in stroke glyphs and the title is only embedded as metadata.
    pub font_path: Option<PathBuf>,

    /// Floor-plan image per floor key.
    pub backgrounds: BTreeMap<String, PathBuf>,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            padding: 50.0,
            resolution: 300,
            contour_levels: 20,
            colour_scale: ColourScale::RdYlGn,
            max_dimension: 1200,
            background_opacity: 0.6,
            surface_opacity: 0.4,
            isolines: true,
            font_path: None,
            backgrounds: BTreeMap::new(),
        }
    }
}

impl HeatmapConfig {
    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `HEATMAP_*` environment variables. Unparseable
    /// values are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("HEATMAP_PADDING") {
            if let Ok(padding) = val.parse() {
                self.padding = padding;
            }
        }

        if let Ok(val) = std::env::var("HEATMAP_RESOLUTION") {
            if let Ok(resolution) = val.parse() {
                self.resolution = resolution;
            }
        }

        if let Ok(val) = std::env::var("HEATMAP_CONTOUR_LEVELS") {
            if let Ok(levels) = val.parse() {
                self.contour_levels = levels;
            }
        }

        if let Ok(val) = std::env::var("HEATMAP_COLOUR_SCALE") {
            if let Some(scale) = ColourScale::parse(&val) {
                self.colour_scale = scale;
            }
        }

        if let Ok(val) = std::env::var("HEATMAP_MAX_DIMENSION") {
            if let Ok(max_dimension) = val.parse() {
                self.max_dimension = max_dimension;
            }
        }

        if let Ok(val) = std::env::var("HEATMAP_ISOLINES") {
            self.isolines = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("HEATMAP_FONT") {
            self.font_path = Some(PathBuf::from(val));
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> HeatmapResult<()> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(HeatmapError::invalid_config(format!(
                "padding must be a non-negative number, got {}",
                self.padding
            )));
        }

        if self.resolution < 2 {
            return Err(HeatmapError::invalid_config("resolution must be >= 2"));
        }

        if self.contour_levels == 0 {
            return Err(HeatmapError::invalid_config("contour_levels must be > 0"));
        }

        if self.max_dimension < 16 {
            return Err(HeatmapError::invalid_config("max_dimension must be >= 16"));
        }

        for (name, value) in [
            ("background_opacity", self.background_opacity),
            ("surface_opacity", self.surface_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(HeatmapError::invalid_config(format!(
                    "{} must be within 0-1, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// Background image configured for a floor, if any.
    pub fn background_for(&self, floor: &str) -> Option<&PathBuf> {
        self.backgrounds.get(floor)
    }
}

/// Colour scale for the filled bands. Diverging scales run from red (low) to
/// green or blue (high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColourScale {
    #[default]
    #[serde(alias = "rdylgn")]
    RdYlGn,
    #[serde(alias = "rdylbu")]
    RdYlBu,
    #[serde(alias = "spectral")]
    Spectral,
    #[serde(alias = "viridis")]
    Viridis,
}

impl ColourScale {
    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rdylgn" => Some(Self::RdYlGn),
            "rdylbu" => Some(Self::RdYlBu),
            "spectral" => Some(Self::Spectral),
            "viridis" => Some(Self::Viridis),
            _ => None,
        }
    }

    /// Get the scale name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RdYlGn => "RdYlGn",
            Self::RdYlBu => "RdYlBu",
            Self::Spectral => "Spectral",
            Self::Viridis => "Viridis",
        }
    }
}

impl fmt::Display for ColourScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
