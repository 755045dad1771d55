//! Batch driver tests over in-memory and on-disk sinks.

use std::path::Path;

use heatmap_common::{HeatmapConfig, MeasurementLog, Metric};
use heatmap_gen::{run_batch, run_to_directory, JobResult};
use renderer::MemorySink;
use test_utils::{measurement_log, temp_test_dir, write_corrupt_image, write_floor_plan, SAMPLE_LOG_JSON};

fn fast_config() -> HeatmapConfig {
    HeatmapConfig {
        resolution: 40,
        contour_levels: 6,
        max_dimension: 200,
        ..HeatmapConfig::default()
    }
}

#[test]
fn test_sparse_floor_is_skipped() {
    let log = measurement_log(5, 1);
    let sink = MemorySink::new();

    let report = run_batch(&log, &fast_config(), &sink);

    assert_eq!(report.jobs.len(), 6);
    assert_eq!(report.rendered_count(), 3);
    assert_eq!(report.skipped_count(), 3);
    assert_eq!(report.failed_count(), 0);
    assert_eq!(
        sink.names(),
        vec!["floor_1_download.png", "floor_1_ping.png", "floor_1_upload.png"]
    );

    for metric in Metric::ALL {
        match &report.job("floor2", metric).unwrap().result {
            JobResult::Skipped { reason } => assert!(reason.contains("insufficient data"), "{}", reason),
            other => panic!("expected skip for floor2 {}, got {:?}", metric, other),
        }
    }
}

#[test]
fn test_report_order_is_floor_then_metric() {
    let log = measurement_log(6, 7);
    let report = run_batch(&log, &fast_config(), &MemorySink::new());

    let order: Vec<(&str, Metric)> = report
        .jobs
        .iter()
        .map(|job| (job.floor.as_str(), job.metric))
        .collect();
    assert_eq!(
        order,
        vec![
            ("floor1", Metric::Download),
            ("floor1", Metric::Upload),
            ("floor1", Metric::Ping),
            ("floor2", Metric::Download),
            ("floor2", Metric::Upload),
            ("floor2", Metric::Ping),
        ]
    );
    assert_eq!(report.rendered_count(), 6);
}

#[test]
fn test_batch_is_deterministic() {
    let log = measurement_log(8, 4);
    let config = fast_config();

    let first = MemorySink::new();
    let second = MemorySink::new();
    run_batch(&log, &config, &first);
    run_batch(&log, &config, &second);

    for name in first.names() {
        assert_eq!(first.get(&name), second.get(&name), "{} differs", name);
    }
}

#[test]
fn test_empty_log_reports_skips() {
    let log = MeasurementLog::new();
    let report = run_batch(&log, &fast_config(), &MemorySink::new());

    assert_eq!(report.rendered_count(), 0);
    assert_eq!(report.skipped_count(), 6);
    assert!(report.artifacts().is_empty());
    assert!(report.to_string().ends_with("0 rendered, 6 skipped, 0 failed"));
}

#[test]
fn test_run_to_directory_creates_output() {
    let dir = temp_test_dir();
    let output = dir.path().join("output");
    let log = MeasurementLog::from_json(SAMPLE_LOG_JSON).unwrap();

    let report = run_to_directory(&log, &fast_config(), &output).unwrap();

    assert_eq!(report.rendered_count(), 3);
    for path in report.artifacts() {
        assert!(path.starts_with(&output));
        assert!(path.exists(), "{} missing", path.display());
    }
    assert!(output.join("floor_1_ping.png").exists());
    assert!(!output.join("floor_2_ping.png").exists());
}

#[test]
fn test_missing_background_still_renders_with_warning() {
    let dir = temp_test_dir();
    let mut config = fast_config();
    config
        .backgrounds
        .insert("floor1".to_string(), dir.path().join("absent.png"));
    let log = measurement_log(5, 0);

    let report = run_batch(&log, &config, &MemorySink::new());

    match &report.job("floor1", Metric::Download).unwrap().result {
        JobResult::Rendered { warnings, .. } => {
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].contains("absent.png"));
        }
        other => panic!("expected render, got {:?}", other),
    }
    assert_eq!(report.failed_count(), 0);
}

#[test]
fn test_corrupt_background_is_a_warning() {
    let dir = temp_test_dir();
    let mut config = fast_config();
    config.backgrounds.insert(
        "floor1".to_string(),
        write_corrupt_image(dir.path(), "plan.png"),
    );

    let report = run_batch(&measurement_log(5, 0), &config, &MemorySink::new());
    assert_eq!(report.rendered_count(), 3);
    assert!(report.to_string().contains("warning:"));
}

#[test]
fn test_background_extends_domain() {
    let dir = temp_test_dir();
    let plan = write_floor_plan(dir.path(), "floor1.png", 900, 700);
    let mut config = fast_config();
    config.backgrounds.insert("floor1".to_string(), plan);
    let log = MeasurementLog::from_json(SAMPLE_LOG_JSON).unwrap();

    let sink = MemorySink::new();
    let report = run_batch(&log, &config, &sink);
    assert_eq!(report.rendered_count(), 3);

    let png = sink.get("floor_1_download.png").unwrap();
    let img = image::load_from_memory(&png).unwrap();
    // domain grows to 900 x 690, long side scaled to 200, legend strip on the
    // right and the title band on top
    assert_eq!(img.width(), 200 + 90);
    assert_eq!(img.height(), 153 + renderer::render::HEADER_HEIGHT);
}

#[test]
fn test_invalid_config_fails_every_job() {
    let config = HeatmapConfig {
        surface_opacity: 2.0,
        ..fast_config()
    };
    let report = run_batch(&measurement_log(5, 5), &config, &MemorySink::new());

    assert_eq!(report.failed_count(), 6);
    assert!(report.has_failures());
}

#[test]
fn test_failed_sink_write_is_reported() {
    let dir = temp_test_dir();
    let missing = dir.path().join("never-created");
    let sink = renderer::DirectorySink::new(&missing);

    let report = run_batch(&measurement_log(5, 0), &fast_config(), &sink);

    assert_eq!(report.failed_count(), 3);
    assert!(!Path::new(&missing).exists());
}
