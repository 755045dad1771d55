//! Vertical colour legend drawn to the right of the surface.

use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::annotate::{format_value, TextRenderer};
use crate::colour::Color;

/// Horizontal space reserved for the legend, in pixels.
pub const LEGEND_WIDTH: u32 = 90;

const BAR_WIDTH: f32 = 18.0;
const MARGIN: f32 = 14.0;
const TEXT_SIZE: f32 = 10.0;
const CAPTION_SIZE: f32 = 11.0;
const CAPTION_HEIGHT: f32 = CAPTION_SIZE + 6.0;

/// Draw the legend into the strip starting at `left`, spanning `top..top + height`.
///
/// `caption` (metric and unit) sits above the bar. Band 0 (the lowest values)
/// is at the bottom. The minimum, midpoint and maximum of the range are
/// labelled.
#[allow(clippy::too_many_arguments)]
pub fn draw_legend(
    pixmap: &mut Pixmap,
    left: f32,
    top: f32,
    height: f32,
    levels: &[f64],
    colours: &[Color],
    caption: &str,
    text: &TextRenderer,
) {
    let bar_top = top + MARGIN + CAPTION_HEIGHT;
    let bar_height = height - 2.0 * MARGIN - CAPTION_HEIGHT;
    let bar_left = left + MARGIN;
    if bar_height < 4.0 || colours.is_empty() || levels.len() < 2 {
        return;
    }

    let caption_width = LEGEND_WIDTH as f32 - 8.0;
    let caption_size = text.fit_size(caption, CAPTION_SIZE, caption_width);
    text.draw(pixmap, caption, left + 4.0, top + MARGIN, caption_size, Color::BLACK);

    let n = colours.len() as f32;
    for (k, colour) in colours.iter().enumerate() {
        let y0 = bar_top + bar_height * (1.0 - (k as f32 + 1.0) / n);
        let y1 = bar_top + bar_height * (1.0 - k as f32 / n);
        if let Some(rect) = Rect::from_ltrb(bar_left, y0.floor(), bar_left + BAR_WIDTH, y1.ceil()) {
            let mut paint = Paint::default();
            paint.set_color(colour.to_skia());
            paint.anti_alias = false;
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    if let Some(rect) = Rect::from_xywh(bar_left, bar_top, BAR_WIDTH, bar_height) {
        let mut paint = Paint::default();
        paint.set_color(Color::BLACK.with_alpha(160).to_skia());
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        let path = PathBuilder::from_rect(rect);
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    let min = levels[0];
    let max = levels[levels.len() - 1];
    let label_x = bar_left + BAR_WIDTH + 4.0;
    let ticks = [
        (max, bar_top),
        ((min + max) / 2.0, bar_top + bar_height / 2.0),
        (min, bar_top + bar_height),
    ];
    for (value, y) in ticks {
        let mut tick = PathBuilder::new();
        tick.move_to(bar_left + BAR_WIDTH, y);
        tick.line_to(bar_left + BAR_WIDTH + 3.0, y);
        if let Some(path) = tick.finish() {
            let mut paint = Paint::default();
            paint.set_color(Color::BLACK.to_skia());
            pixmap.stroke_path(&path, &paint, &Stroke::default(), Transform::identity(), None);
        }
        text.draw(
            pixmap,
            &format_value(value),
            label_x,
            y - TEXT_SIZE / 2.0,
            TEXT_SIZE,
            Color::BLACK,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::ColourRamp;
    use heatmap_common::ColourScale;

    fn text() -> TextRenderer {
        TextRenderer::embedded().unwrap()
    }

    #[test]
    fn test_legend_bar_colours() {
        let mut pixmap = Pixmap::new(LEGEND_WIDTH, 200).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        let ramp = ColourRamp::for_scale(ColourScale::RdYlGn);
        let colours = ramp.band_colours(4);
        let levels = [0.0, 1.0, 2.0, 3.0, 4.0];

        draw_legend(&mut pixmap, 0.0, 0.0, 200.0, &levels, &colours, "Download Mbps", &text());

        let x = (MARGIN + BAR_WIDTH / 2.0) as u32;
        let bottom = pixmap.pixel(x, 200 - MARGIN as u32 - 5).unwrap();
        let top = pixmap.pixel(x, (MARGIN + CAPTION_HEIGHT) as u32 + 5).unwrap();
        let rgb = |c: &Color| (c.r, c.g, c.b);
        assert_eq!((bottom.red(), bottom.green(), bottom.blue()), rgb(&colours[0]));
        assert_eq!((top.red(), top.green(), top.blue()), rgb(&colours[3]));
    }

    #[test]
    fn test_legend_too_short_is_noop() {
        let mut pixmap = Pixmap::new(LEGEND_WIDTH, 20).unwrap();
        let levels = [0.0, 1.0];
        draw_legend(&mut pixmap, 0.0, 0.0, 20.0, &levels, &[Color::BLACK], "Ping Ms", &text());
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_legend_caption_is_drawn() {
        let mut pixmap = Pixmap::new(LEGEND_WIDTH, 200).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        let colours = ColourRamp::for_scale(ColourScale::Viridis).band_colours(2);

        draw_legend(&mut pixmap, 0.0, 0.0, 200.0, &[0.0, 1.0, 2.0], &colours, "Upload Mbps", &text());

        let caption_ink = (MARGIN as u32..(MARGIN + CAPTION_SIZE) as u32)
            .flat_map(|y| (0..LEGEND_WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| pixmap.pixel(x, y).map_or(false, |p| p.red() < 128))
            .count();
        assert!(caption_ink > 10);
    }
}
