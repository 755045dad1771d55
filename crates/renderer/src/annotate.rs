//! Sample markers, value labels and text drawing.
//!
//! Text uses the embedded DejaVu Sans face unless a font file overrides it.
//! Glyphs are rasterised with imageproc onto a transparent layer which is
//! then composited onto the canvas.

use std::path::Path;

use heatmap_common::{HeatmapError, HeatmapResult};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};
use tiny_skia::{
    FillRule, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::colour::Color;

/// Embedded font data - DejaVu Sans
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Marker radius in pixels.
pub const MARKER_RADIUS: f32 = 5.0;

/// Label offset from the marker centre, in pixels (right, up).
pub const LABEL_OFFSET: (f32, f32) = (6.0, -6.0);

/// Label text height in pixels.
pub const LABEL_SIZE: f32 = 10.0;

const LABEL_PADDING: f32 = 2.5;

/// Draws text onto a canvas with a TrueType font.
pub struct TextRenderer {
    font: Font<'static>,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl TextRenderer {
    /// The font compiled into the crate.
    pub fn embedded() -> HeatmapResult<Self> {
        Font::try_from_bytes(FONT_DATA)
            .map(|font| TextRenderer { font })
            .ok_or_else(|| HeatmapError::render("embedded font could not be parsed"))
    }

    /// Load a TrueType font from disk.
    pub fn load(path: &Path) -> HeatmapResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            HeatmapError::invalid_config(format!("cannot read font {}: {}", path.display(), e))
        })?;
        let font = Font::try_from_vec(bytes).ok_or_else(|| {
            HeatmapError::invalid_config(format!("{} is not a TrueType font", path.display()))
        })?;
        Ok(TextRenderer { font })
    }

    /// Width of `text` at height `size`.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        self.font
            .layout(text, Scale::uniform(size), point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Largest size up to `size` at which `text` fits in `max_width`.
    pub fn fit_size(&self, text: &str, size: f32, max_width: f32) -> f32 {
        let width = self.measure(text, size);
        if width <= max_width || width <= 0.0 {
            size
        } else {
            size * max_width / width
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw(&self, pixmap: &mut Pixmap, text: &str, x: f32, y: f32, size: f32, colour: Color) {
        if text.is_empty() || size <= 0.0 {
            return;
        }
        let scale = Scale::uniform(size);
        let v_metrics = self.font.v_metrics(scale);
        let width = self.measure(text, size).ceil() as u32 + 2;
        let height = (v_metrics.ascent - v_metrics.descent).ceil().max(1.0) as u32;

        // Premultiplied colour over a transparent layer keeps the layer
        // premultiplied after imageproc's coverage blend.
        let a = colour.a as u16;
        let premultiply = |c: u8| ((c as u16 * a + 127) / 255) as u8;
        let ink = Rgba([
            premultiply(colour.r),
            premultiply(colour.g),
            premultiply(colour.b),
            colour.a,
        ]);

        let mut layer = RgbaImage::new(width, height);
        draw_text_mut(&mut layer, ink, 0, 0, scale, &self.font, text);

        let Some(size) = IntSize::from_wh(width, height) else {
            return;
        };
        let Some(glyphs) = Pixmap::from_vec(layer.into_raw(), size) else {
            return;
        };
        pixmap.draw_pixmap(
            x.round() as i32,
            y.round() as i32,
            glyphs.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

/// Draw a filled circular sample marker.
pub fn draw_marker(pixmap: &mut Pixmap, x: f32, y: f32) {
    let Some(path) = PathBuilder::from_circle(x, y, MARKER_RADIUS) else {
        return;
    };

    let mut fill = Paint::default();
    fill.set_color(Color::MARKER_BLUE.to_skia());
    fill.anti_alias = true;
    pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);

    let mut edge = Paint::default();
    edge.set_color(Color::WHITE.to_skia());
    edge.anti_alias = true;
    let stroke = Stroke {
        width: 1.5,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &edge, &stroke, Transform::identity(), None);
}

/// Format a sample value for its label.
pub fn format_value(value: f64) -> String {
    format!("{:.1}", value)
}

/// Draw a boxed value label next to the marker at `(x, y)`.
///
/// The box's bottom-left corner sits at the label offset from the marker.
pub fn draw_value_label(pixmap: &mut Pixmap, text: &TextRenderer, x: f32, y: f32, value: f64) {
    let label = format_value(value);
    let w = text.measure(&label, LABEL_SIZE);
    let left = x + LABEL_OFFSET.0;
    let bottom = y + LABEL_OFFSET.1;
    let top = bottom - LABEL_SIZE - 2.0 * LABEL_PADDING;

    if let Some(rect) = Rect::from_xywh(left, top, w + 2.0 * LABEL_PADDING, bottom - top) {
        let path = PathBuilder::from_rect(rect);

        let mut fill = Paint::default();
        fill.set_color(Color::WHITE.with_alpha(230).to_skia());
        pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);

        let mut edge = Paint::default();
        edge.set_color(Color::MARKER_BLUE.to_skia());
        edge.anti_alias = true;
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &edge, &stroke, Transform::identity(), None);
    }

    text.draw(
        pixmap,
        &label,
        left + LABEL_PADDING,
        top + LABEL_PADDING,
        LABEL_SIZE,
        Color::BLACK,
    );
}
