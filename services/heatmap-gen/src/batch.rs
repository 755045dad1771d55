//! Batch driver: one job per (floor, metric), fanned out on the rayon pool.
//!
//! Jobs never fail fast. Floors with too few samples or a degenerate layout
//! are reported as skipped, anything else that goes wrong as failed, and the
//! remaining jobs still run.

use std::fmt;
use std::path::{Path, PathBuf};

use grid_builder::{build_for_config, BackgroundExtent};
use heatmap_common::{HeatmapConfig, HeatmapResult, MeasurementLog, Metric, Sample};
use metrics::counter;
use rayon::prelude::*;
use renderer::background::probe_extent;
use renderer::{render, ArtifactSink, DirectorySink, RenderRequest};
use tracing::{debug, info, warn};

use crate::naming::{artifact_name, artifact_title};

/// Outcome of a single job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobResult {
    Rendered { path: PathBuf, warnings: Vec<String> },
    Skipped { reason: String },
    Failed { reason: String },
}

impl JobResult {
    pub fn status(&self) -> &'static str {
        match self {
            JobResult::Rendered { .. } => "rendered",
            JobResult::Skipped { .. } => "skipped",
            JobResult::Failed { .. } => "failed",
        }
    }
}

/// A job's identity and result.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub floor: String,
    pub metric: Metric,
    pub artifact_name: String,
    pub result: JobResult,
}

/// Results of a batch in (floor, metric) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub jobs: Vec<JobReport>,
}

impl BatchReport {
    /// Paths of every artifact written.
    pub fn artifacts(&self) -> Vec<&Path> {
        self.jobs
            .iter()
            .filter_map(|job| match &job.result {
                JobResult::Rendered { path, .. } => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }

    pub fn rendered_count(&self) -> usize {
        self.count("rendered")
    }

    pub fn skipped_count(&self) -> usize {
        self.count("skipped")
    }

    pub fn failed_count(&self) -> usize {
        self.count("failed")
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// Report for one job, if it was part of the batch.
    pub fn job(&self, floor: &str, metric: Metric) -> Option<&JobReport> {
        self.jobs
            .iter()
            .find(|job| job.floor == floor && job.metric == metric)
    }

    fn count(&self, status: &str) -> usize {
        self.jobs
            .iter()
            .filter(|job| job.result.status() == status)
            .count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for job in &self.jobs {
            match &job.result {
                JobResult::Rendered { path, warnings } => {
                    writeln!(f, "  [ok]   {}", path.display())?;
                    for warning in warnings {
                        writeln!(f, "         warning: {}", warning)?;
                    }
                }
                JobResult::Skipped { reason } => {
                    writeln!(f, "  [skip] {} {}: {}", job.floor, job.metric, reason)?;
                }
                JobResult::Failed { reason } => {
                    writeln!(f, "  [fail] {} {}: {}", job.floor, job.metric, reason)?;
                }
            }
        }
        write!(
            f,
            "{} rendered, {} skipped, {} failed",
            self.rendered_count(),
            self.skipped_count(),
            self.failed_count()
        )
    }
}

/// Render every floor and metric in `log` into `sink`.
pub fn run_batch(log: &MeasurementLog, config: &HeatmapConfig, sink: &dyn ArtifactSink) -> BatchReport {
    let jobs: Vec<(&str, &[Sample], Metric)> = log
        .floors()
        .into_iter()
        .flat_map(|(floor, samples)| Metric::ALL.into_iter().map(move |m| (floor, samples, m)))
        .collect();

    info!(
        floors = log.floors().len(),
        jobs = jobs.len(),
        samples = log.total_samples(),
        "Starting heatmap batch"
    );

    // collect() keeps the (floor, metric) order of `jobs`
    let reports: Vec<JobReport> = jobs
        .par_iter()
        .map(|&(floor, samples, metric)| JobReport {
            floor: floor.to_string(),
            metric,
            artifact_name: artifact_name(floor, metric),
            result: run_job(floor, samples, metric, config, sink),
        })
        .collect();

    let report = BatchReport { jobs: reports };

    info!(
        rendered = report.rendered_count(),
        skipped = report.skipped_count(),
        failed = report.failed_count(),
        "Heatmap batch complete"
    );

    report
}

/// Create the output directory once, then run the batch into it.
pub fn run_to_directory(
    log: &MeasurementLog,
    config: &HeatmapConfig,
    output_dir: impl Into<PathBuf>,
) -> HeatmapResult<BatchReport> {
    let sink = DirectorySink::new(output_dir);
    sink.ensure_root()?;
    Ok(run_batch(log, config, &sink))
}

fn run_job(
    floor: &str,
    samples: &[Sample],
    metric: Metric,
    config: &HeatmapConfig,
    sink: &dyn ArtifactSink,
) -> JobResult {
    let background = config.background_for(floor).map(PathBuf::as_path);
    let extent = background.and_then(|path| match probe_extent(path) {
        Ok((width, height)) => Some(BackgroundExtent::new(width, height)),
        Err(e) => {
            debug!(floor, error = %e, "Background extent unavailable");
            None
        }
    });

    let (domain, grid) = match build_for_config(samples, extent, config) {
        Ok(built) => built,
        Err(e) if e.is_skip() => {
            info!(floor, metric = %metric, reason = %e, "Skipping heatmap");
            counter!("heatmap_artifacts_total", "outcome" => "skipped").increment(1);
            return JobResult::Skipped {
                reason: e.to_string(),
            };
        }
        Err(e) => return failed(floor, metric, e.to_string()),
    };

    let name = artifact_name(floor, metric);
    let title = artifact_title(floor, metric);
    let request = RenderRequest {
        samples,
        domain: &domain,
        grid: &grid,
        metric,
        background,
        title: &title,
        artifact_name: &name,
        config,
    };

    match render(&request, sink) {
        Ok(outcome) => {
            counter!("heatmap_artifacts_total", "outcome" => "rendered").increment(1);
            if !outcome.warnings.is_empty() {
                counter!("heatmap_render_warnings_total").increment(outcome.warnings.len() as u64);
            }
            JobResult::Rendered {
                path: outcome.path,
                warnings: outcome.warnings.iter().map(ToString::to_string).collect(),
            }
        }
        Err(e) => failed(floor, metric, e.to_string()),
    }
}

fn failed(floor: &str, metric: Metric, reason: String) -> JobResult {
    warn!(floor, metric = %metric, reason = %reason, "Heatmap generation failed");
    counter!("heatmap_artifacts_total", "outcome" => "failed").increment(1);
    JobResult::Failed { reason }
}
