//! Benchmarks for the renderer crate - interpolation, band painting and PNG encoding.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grid_builder::build_domain_and_grid;
use heatmap_common::{HeatmapConfig, Metric};
use renderer::interpolation::{prepare_points, Triangulation};
use renderer::{interpolate_surface, png, render_image, RenderRequest};
use test_utils::bump_samples;

// =============================================================================
// TRIANGULATION BENCHMARKS
// =============================================================================

fn bench_triangulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulation");

    for n in [10, 50, 200] {
        let prepared = prepare_points(&bump_samples(n, 500.0), Metric::Download);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("bowyer_watson", n), &prepared.points, |b, pts| {
            b.iter(|| Triangulation::new(black_box(pts)));
        });
    }

    group.finish();
}

// =============================================================================
// INTERPOLATION BENCHMARKS
// =============================================================================

fn bench_interpolation(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolate_surface");
    group.sample_size(20);

    // (samples, resolution)
    let scenarios = [(12, 100), (12, 300), (60, 300)];

    for (n, resolution) in scenarios {
        let samples = bump_samples(n, 500.0);
        let (_, grid) = build_domain_and_grid(&samples, None, 50.0, resolution).unwrap();

        group.throughput(Throughput::Elements(grid.len() as u64));
        group.bench_with_input(
            BenchmarkId::new(format!("{}_samples", n), resolution),
            &grid,
            |b, grid| {
                b.iter(|| interpolate_surface(black_box(&samples), Metric::Download, grid));
            },
        );
    }

    group.finish();
}

// =============================================================================
// FULL PIPELINE BENCHMARKS
// =============================================================================

fn bench_full_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_image");
    group.sample_size(10);

    for max_dimension in [600u32, 1200] {
        let samples = bump_samples(20, 500.0);
        let config = HeatmapConfig {
            max_dimension,
            ..HeatmapConfig::default()
        };
        let (domain, grid) =
            build_domain_and_grid(&samples, None, config.padding, config.resolution).unwrap();

        group.bench_function(BenchmarkId::new("default_config", max_dimension), |b| {
            b.iter(|| {
                let request = RenderRequest {
                    samples: &samples,
                    domain: &domain,
                    grid: &grid,
                    metric: Metric::Download,
                    background: None,
                    title: "Floor 1 - Download Mbps",
                    artifact_name: "floor_1_download.png",
                    config: &config,
                };
                render_image(black_box(&request))
            });
        });
    }

    group.finish();
}

// =============================================================================
// PNG ENCODING BENCHMARKS
// =============================================================================

fn bench_png_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_encoding");

    for size in [256usize, 1024] {
        let pixels: Vec<u8> = (0..size * size)
            .flat_map(|i| {
                let band = ((i % size) * 20 / size) as u8;
                [band * 12, 255 - band * 12, 96, 255]
            })
            .collect();

        group.throughput(Throughput::Bytes(pixels.len() as u64));
        group.bench_with_input(BenchmarkId::new("rgba", size), &pixels, |b, pixels| {
            b.iter(|| png::create_png(black_box(pixels), size, size, &[("Title", "bench")]));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_triangulation,
    bench_interpolation,
    bench_full_render,
    bench_png_encoding,
);
criterion_main!(benches);
