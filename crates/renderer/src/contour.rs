//! Filled contour bands and isolines (marching squares) over a [`Surface`].
//!
//! Band edges are evenly spaced over the surface range. Isolines are traced in
//! grid index coordinates and mapped to canvas pixels when stroked.

use std::collections::HashMap;

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::colour::Color;
use crate::interpolation::Surface;

/// A point in grid index (or pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A line segment between two points
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A connected isoline.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub level: f64,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Band edges for `bands` filled bands between `min` and `max`.
///
/// Returns `bands + 1` increasing edges. A flat range yields a single band
/// around the value.
pub fn band_levels(min: f64, max: f64, bands: usize) -> Vec<f64> {
    let bands = bands.max(1);
    if max.is_nan() || min.is_nan() || max <= min {
        return vec![min, min];
    }
    let step = (max - min) / bands as f64;
    (0..=bands)
        .map(|k| if k == bands { max } else { min + step * k as f64 })
        .collect()
}

/// Index of the band containing `value`, clamped to the outer bands.
pub fn band_index(levels: &[f64], value: f64) -> usize {
    if levels.len() < 3 {
        return 0;
    }
    // Number of interior edges at or below the value.
    levels[1..levels.len() - 1].partition_point(|&edge| edge <= value)
}

/// Marching squares algorithm to generate contour lines
///
/// # Arguments
/// * `data` - Grid data in row-major order
/// * `width` - Grid width
/// * `height` - Grid height
/// * `level` - Contour level to extract
///
/// Segments are in grid index coordinates (column, row).
pub fn march_squares(data: &[f64], width: usize, height: usize, level: f64) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();
    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut case = 0u8;
            if tl >= level {
                case |= 1;
            }
            if tr >= level {
                case |= 2;
            }
            if br >= level {
                case |= 4;
            }
            if bl >= level {
                case |= 8;
            }
            if case == 0 || case == 15 {
                continue;
            }

            let (xf, yf) = (x as f32, y as f32);
            let top = interpolate_edge((xf, yf), (xf + 1.0, yf), tl, tr, level);
            let right = interpolate_edge((xf + 1.0, yf), (xf + 1.0, yf + 1.0), tr, br, level);
            let bottom = interpolate_edge((xf, yf + 1.0), (xf + 1.0, yf + 1.0), bl, br, level);
            let left = interpolate_edge((xf, yf), (xf, yf + 1.0), tl, bl, level);

            let centre_above = (tl + tr + br + bl) / 4.0 >= level;
            let mut push = |start: Point, end: Point| segments.push(Segment { start, end });
            match case {
                1 | 14 => push(left, top),
                2 | 13 => push(top, right),
                3 | 12 => push(left, right),
                4 | 11 => push(right, bottom),
                6 | 9 => push(top, bottom),
                7 | 8 => push(left, bottom),
                // Saddles: the cell centre decides which corners are joined.
                5 if centre_above => {
                    push(left, bottom);
                    push(top, right);
                }
                5 => {
                    push(left, top);
                    push(right, bottom);
                }
                10 if centre_above => {
                    push(left, top);
                    push(right, bottom);
                }
                10 => {
                    push(top, right);
                    push(left, bottom);
                }
                _ => {}
            }
        }
    }
    segments
}

/// Linearly interpolate the crossing of `level` between two corner values.
fn interpolate_edge(p1: (f32, f32), p2: (f32, f32), val1: f64, val2: f64, level: f64) -> Point {
    if (val2 - val1).abs() < 1e-12 {
        return Point::new((p1.0 + p2.0) / 2.0, (p1.1 + p2.1) / 2.0);
    }
    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0) as f32;
    Point::new(p1.0 + t * (p2.0 - p1.0), p1.1 + t * (p2.1 - p1.1))
}

/// Endpoint key with enough precision to join segments from adjacent cells.
fn endpoint_key(p: Point) -> (i64, i64) {
    ((p.x as f64 * 1e4).round() as i64, (p.y as f64 * 1e4).round() as i64)
}

/// Connect unordered segments into polylines.
///
/// Segments meet at shared endpoints; an endpoint index makes this linear in
/// the number of segments.
pub fn connect_segments(segments: &[Segment], level: f64) -> Vec<Contour> {
    let mut by_endpoint: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, seg) in segments.iter().enumerate() {
        by_endpoint.entry(endpoint_key(seg.start)).or_default().push(i);
        by_endpoint.entry(endpoint_key(seg.end)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let next_from = |at: Point, used: &mut Vec<bool>| -> Option<Point> {
        let candidates = by_endpoint.get(&endpoint_key(at))?;
        let &i = candidates.iter().find(|&&i| !used[i])?;
        used[i] = true;
        let seg = &segments[i];
        if endpoint_key(seg.start) == endpoint_key(at) {
            Some(seg.end)
        } else {
            Some(seg.start)
        }
    };

    let mut contours = Vec::new();
    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let mut forward = vec![segments[start].start, segments[start].end];
        while let Some(&tail) = forward.last() {
            match next_from(tail, &mut used) {
                Some(p) => forward.push(p),
                None => break,
            }
        }
        let mut backward = Vec::new();
        let mut head = forward[0];
        while let Some(p) = next_from(head, &mut used) {
            backward.push(p);
            head = p;
        }
        backward.reverse();
        backward.extend(forward);

        let closed = backward.len() > 2
            && endpoint_key(backward[0]) == endpoint_key(backward[backward.len() - 1]);
        contours.push(Contour {
            level,
            points: backward,
            closed,
        });
    }
    contours
}

/// Isolines at the interior band edges of a surface.
pub fn isolines(surface: &Surface, levels: &[f64]) -> Vec<Contour> {
    if levels.len() < 3 {
        return vec![];
    }
    levels[1..levels.len() - 1]
        .iter()
        .flat_map(|&level| {
            let segments = march_squares(surface.values(), surface.nx(), surface.ny(), level);
            connect_segments(&segments, level)
        })
        .collect()
}

/// Stroke contours onto `pixmap`, scaling grid coordinates by `transform`.
pub fn stroke_contours(
    pixmap: &mut Pixmap,
    contours: &[Contour],
    transform: Transform,
    colour: Color,
    width: f32,
) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(colour.r, colour.g, colour.b, colour.a);
    paint.anti_alias = true;

    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    for contour in contours {
        let mut points: Vec<tiny_skia::Point> = contour
            .points
            .iter()
            .map(|p| tiny_skia::Point::from_xy(p.x, p.y))
            .collect();
        transform.map_points(&mut points);
        let Some((first, rest)) = points.split_first() else {
            continue;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        if contour.closed {
            pb.close();
        }
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}
