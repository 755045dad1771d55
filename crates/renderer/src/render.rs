//! Compositing of one heatmap image and its hand-off to an [`ArtifactSink`].

use std::path::{Path, PathBuf};

use heatmap_common::{Domain, Grid, HeatmapConfig, HeatmapError, HeatmapResult, Metric, Sample};
use rayon::prelude::*;
use tiny_skia::{FilterQuality, IntSize, Pixmap, PixmapPaint, Rect, Transform};
use tracing::{debug, info, warn};

use crate::annotate::{draw_marker, draw_value_label, TextRenderer};
use crate::background::load_background;
use crate::colour::{Color, ColourRamp};
use crate::contour::{band_index, band_levels, isolines, stroke_contours};
use crate::interpolation::{interpolate_surface, Surface};
use crate::legend::{draw_legend, LEGEND_WIDTH};
use crate::png::encode_pixmap;
use crate::sink::ArtifactSink;

/// Height of the title band above the plot.
pub const HEADER_HEIGHT: u32 = 36;

/// Value of the `Software` PNG text chunk.
pub const SOFTWARE: &str = "heatmap-gen";

const TITLE_SIZE: f32 = 20.0;
const TITLE_MARGIN: f32 = 10.0;
const ISOLINE_COLOUR: Color = Color::new(0, 0, 0, 70);
const ISOLINE_WIDTH: f32 = 0.7;

/// Everything needed to render one (floor, metric) image.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub samples: &'a [Sample],
    pub domain: &'a Domain,
    pub grid: &'a Grid,
    pub metric: Metric,
    pub background: Option<&'a Path>,
    pub title: &'a str,
    pub artifact_name: &'a str,
    pub config: &'a HeatmapConfig,
}

/// An encoded image before it is handed to a sink.
#[derive(Debug)]
pub struct RenderedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub surface: Surface,
    pub warnings: Vec<HeatmapError>,
}

/// Result of a successful [`render`].
#[derive(Debug)]
pub struct RenderOutcome {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Minimum and maximum of the interpolated surface.
    pub value_range: (f64, f64),
    /// Non-fatal problems, such as an unreadable background image.
    pub warnings: Vec<HeatmapError>,
}

/// Maps domain coordinates to canvas pixels.
#[derive(Debug, Clone, Copy)]
struct Placement {
    x_min: f64,
    y_min: f64,
    sx: f64,
    sy: f64,
    top: f64,
}

impl Placement {
    fn to_canvas(self, x: f64, y: f64) -> (f32, f32) {
        (
            ((x - self.x_min) * self.sx) as f32,
            (self.top + (y - self.y_min) * self.sy) as f32,
        )
    }
}

/// Render the request and write the PNG to `sink` as `artifact_name`.
pub fn render(request: &RenderRequest<'_>, sink: &dyn ArtifactSink) -> HeatmapResult<RenderOutcome> {
    let image = render_image(request)?;
    let path = sink.write(request.artifact_name, &image.png)?;

    info!(
        artifact = %path.display(),
        metric = %request.metric,
        width = image.width,
        height = image.height,
        warnings = image.warnings.len(),
        "Rendered heatmap"
    );

    Ok(RenderOutcome {
        path,
        width: image.width,
        height: image.height,
        value_range: (image.surface.min(), image.surface.max()),
        warnings: image.warnings,
    })
}

/// Interpolate, composite and encode without writing anywhere.
pub fn render_image(request: &RenderRequest<'_>) -> HeatmapResult<RenderedImage> {
    let config = request.config;
    config.validate()?;
    if request.samples.is_empty() {
        return Err(HeatmapError::render("no samples to render"));
    }
    if !request.grid.matches(request.domain) {
        return Err(HeatmapError::render("grid does not span the domain"));
    }

    let mut warnings = Vec::new();
    let surface = interpolate_surface(request.samples, request.metric, request.grid)?;

    let domain = request.domain;
    let scale = config.max_dimension as f64 / domain.width().max(domain.height());
    let plot_w = ((domain.width() * scale).round() as u32).max(1);
    let plot_h = ((domain.height() * scale).round() as u32).max(1);

    let text = match config.font_path.as_deref() {
        Some(path) => match TextRenderer::load(path) {
            Ok(font) => font,
            Err(e) => {
                warn!(error = %e, "Falling back to the embedded font");
                warnings.push(e);
                TextRenderer::embedded()?
            }
        },
        None => TextRenderer::embedded()?,
    };
    let header = HEADER_HEIGHT;

    let width = plot_w + LEGEND_WIDTH;
    let height = plot_h + header;
    let mut canvas = Pixmap::new(width, height)
        .ok_or_else(|| HeatmapError::render(format!("cannot allocate {}x{} canvas", width, height)))?;
    canvas.fill(tiny_skia::Color::WHITE);

    let placement = Placement {
        x_min: domain.x_min(),
        y_min: domain.y_min(),
        sx: plot_w as f64 / domain.width(),
        sy: plot_h as f64 / domain.height(),
        top: header as f64,
    };

    if let Some(path) = request.background {
        match load_background(path) {
            Ok(background) => {
                // One image pixel per domain unit, anchored at the domain origin.
                let (tx, ty) = placement.to_canvas(0.0, 0.0);
                let transform =
                    Transform::from_row(placement.sx as f32, 0.0, 0.0, placement.sy as f32, tx, ty);
                let paint = PixmapPaint {
                    opacity: config.background_opacity,
                    quality: FilterQuality::Bilinear,
                    ..PixmapPaint::default()
                };
                canvas.draw_pixmap(0, 0, background.as_ref(), &paint, transform, None);
            }
            Err(e) => {
                warn!(error = %e, artifact = request.artifact_name, "Rendering without background");
                warnings.push(e);
            }
        }
    }

    let levels = band_levels(surface.min(), surface.max(), config.contour_levels);
    let colours =
        ColourRamp::for_metric(config.colour_scale, request.metric).band_colours(levels.len() - 1);

    let bands = paint_bands(&surface, &levels, &colours, plot_w, plot_h)?;
    let paint = PixmapPaint {
        opacity: config.surface_opacity,
        ..PixmapPaint::default()
    };
    canvas.draw_pixmap(0, header as i32, bands.as_ref(), &paint, Transform::identity(), None);

    if config.isolines {
        let contours = isolines(&surface, &levels);
        let transform = Transform::from_row(
            plot_w as f32 / (surface.nx() - 1) as f32,
            0.0,
            0.0,
            plot_h as f32 / (surface.ny() - 1) as f32,
            0.0,
            header as f32,
        );
        stroke_contours(&mut canvas, &contours, transform, ISOLINE_COLOUR, ISOLINE_WIDTH);
        debug!(isolines = contours.len(), "Stroked isolines");
    }

    for sample in request.samples {
        let (x, y) = placement.to_canvas(sample.x(), sample.y());
        draw_marker(&mut canvas, x, y);
        draw_value_label(&mut canvas, &text, x, y, request.metric.value(sample));
    }

    let caption = request.metric.title();
    draw_legend(
        &mut canvas,
        plot_w as f32,
        header as f32,
        plot_h as f32,
        &levels,
        &colours,
        &caption,
        &text,
    );

    // Labels near the top edge may spill into the header band.
    if let Some(rect) = Rect::from_xywh(0.0, 0.0, width as f32, header as f32) {
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(tiny_skia::Color::WHITE);
        canvas.fill_rect(rect, &paint, Transform::identity(), None);
    }
    let title_size = text.fit_size(request.title, TITLE_SIZE, width as f32 - 2.0 * TITLE_MARGIN);
    let title_y = (header as f32 - title_size) / 2.0;
    text.draw(&mut canvas, request.title, TITLE_MARGIN, title_y, title_size, Color::BLACK);

    let png = encode_pixmap(
        &canvas,
        &[
            ("Title", request.title),
            ("Software", SOFTWARE),
            ("Description", caption.as_str()),
        ],
    )
    .map_err(HeatmapError::render)?;

    debug!(
        width,
        height,
        bands = colours.len(),
        bytes = png.len(),
        "Encoded heatmap"
    );

    Ok(RenderedImage {
        png,
        width,
        height,
        surface,
        warnings,
    })
}

/// Colour every plot pixel by the band of the bilinearly sampled surface.
fn paint_bands(
    surface: &Surface,
    levels: &[f64],
    colours: &[Color],
    width: u32,
    height: u32,
) -> HeatmapResult<Pixmap> {
    let (w, h) = (width as usize, height as usize);
    let fx_scale = (surface.nx() - 1) as f64 / w as f64;
    let fy_scale = (surface.ny() - 1) as f64 / h as f64;

    let mut data = vec![0u8; w * h * 4];
    data.par_chunks_mut(w * 4).enumerate().for_each(|(py, row)| {
        let fy = (py as f64 + 0.5) * fy_scale;
        for (px, pixel) in row.chunks_exact_mut(4).enumerate() {
            let fx = (px as f64 + 0.5) * fx_scale;
            let value = surface.sample(fx, fy);
            let c = colours[band_index(levels, value).min(colours.len() - 1)];
            pixel.copy_from_slice(&[c.r, c.g, c.b, 255]);
        }
    });

    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| HeatmapError::render("empty plot area"))?;
    Pixmap::from_vec(data, size).ok_or_else(|| HeatmapError::render("cannot build band layer"))
}
