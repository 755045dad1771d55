//! Heatmap generator library
//!
//! Drives the grid builder and renderer over every (floor, metric) pair in a
//! measurement log and reports what was produced.

pub mod batch;
pub mod config;
pub mod naming;
pub mod summary;

pub use batch::{run_batch, run_to_directory, BatchReport, JobReport, JobResult};
pub use config::load_config;
pub use naming::{artifact_name, artifact_title};
pub use summary::{summarize, FloorSummary};
