//! Error types for heatmap generation.
//!
//! The first four variants form the per-artifact taxonomy the batch driver
//! reports on; none of them aborts a batch.

use thiserror::Error;

/// Result type alias using HeatmapError.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Primary error type for domain building and rendering.
#[derive(Debug, Error)]
pub enum HeatmapError {
    // === Per-artifact errors ===
    #[error("insufficient data: {count} samples, need at least {required}")]
    InsufficientData { count: usize, required: usize },

    #[error("degenerate domain: {0}")]
    DegenerateDomain(String),

    #[error("background image unavailable ({path}): {message}")]
    BackgroundImage { path: String, message: String },

    #[error("render failed: {0}")]
    Render(String),

    // === Input and configuration errors ===
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid measurement record: {0}")]
    InvalidRecord(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl HeatmapError {
    /// Create an InsufficientData error.
    pub fn insufficient_data(count: usize, required: usize) -> Self {
        Self::InsufficientData { count, required }
    }

    /// Create a DegenerateDomain error.
    pub fn degenerate_domain(msg: impl Into<String>) -> Self {
        Self::DegenerateDomain(msg.into())
    }

    /// Create a BackgroundImage error.
    pub fn background_image(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::BackgroundImage {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a Render error.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Short machine-readable kind, used in batch reports and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            HeatmapError::InsufficientData { .. } => "insufficient_data",
            HeatmapError::DegenerateDomain(_) => "degenerate_domain",
            HeatmapError::BackgroundImage { .. } => "background_image",
            HeatmapError::Render(_) => "render",
            HeatmapError::InvalidConfig(_) => "invalid_config",
            HeatmapError::InvalidRecord(_) => "invalid_record",
            HeatmapError::Io(_) => "io",
        }
    }

    /// Whether a job hitting this error should be reported as skipped rather
    /// than failed. Skips are expected data conditions, failures are not.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            HeatmapError::InsufficientData { .. } | HeatmapError::DegenerateDomain(_)
        )
    }
}

impl From<std::io::Error> for HeatmapError {
    fn from(err: std::io::Error) -> Self {
        HeatmapError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(err: serde_json::Error) -> Self {
        HeatmapError::InvalidRecord(format!("JSON error: {}", err))
    }
}
