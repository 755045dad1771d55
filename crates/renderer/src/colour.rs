//! Colour ramps for the filled bands and the legend.

use heatmap_common::{ColourScale, Metric};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);
    pub const MARKER_BLUE: Color = Color::new(31, 80, 220, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| (a as f32 * t_inv + b as f32 * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

// ColorBrewer / matplotlib anchor colours, low to high.
const RD_YL_GN: [&str; 11] = [
    "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#d9ef8b", "#a6d96a",
    "#66bd63", "#1a9850", "#006837",
];
const RD_YL_BU: [&str; 11] = [
    "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee090", "#ffffbf", "#e0f3f8", "#abd9e9",
    "#74add1", "#4575b4", "#313695",
];
const SPECTRAL: [&str; 11] = [
    "#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#e6f598", "#abdda4",
    "#66c2a5", "#3288bd", "#5e4fa2",
];
const VIRIDIS: [&str; 10] = [
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

/// A continuous colour ramp of evenly spaced anchor colours.
#[derive(Debug, Clone, PartialEq)]
pub struct ColourRamp {
    stops: Vec<Color>,
}

impl ColourRamp {
    /// Build a ramp from hex anchors; unparseable entries are skipped.
    pub fn from_hex(anchors: &[&str]) -> Self {
        let stops = anchors
            .iter()
            .filter_map(|h| hex_to_rgb(h))
            .map(|(r, g, b)| Color::opaque(r, g, b))
            .collect();
        Self { stops }
    }

    pub fn for_scale(scale: ColourScale) -> Self {
        match scale {
            ColourScale::RdYlGn => Self::from_hex(&RD_YL_GN),
            ColourScale::RdYlBu => Self::from_hex(&RD_YL_BU),
            ColourScale::Spectral => Self::from_hex(&SPECTRAL),
            ColourScale::Viridis => Self::from_hex(&VIRIDIS),
        }
    }

    /// The ramp for a metric: the "good" end is always the high end of the
    /// scale, so metrics where lower is better get the reversed ramp.
    pub fn for_metric(scale: ColourScale, metric: Metric) -> Self {
        let ramp = Self::for_scale(scale);
        if metric.higher_is_better() {
            ramp
        } else {
            ramp.reversed()
        }
    }

    pub fn reversed(mut self) -> Self {
        self.stops.reverse();
        self
    }

    pub fn stops(&self) -> &[Color] {
        &self.stops
    }

    /// Colour at `t` in [0, 1].
    pub fn at(&self, t: f64) -> Color {
        match self.stops.len() {
            0 => Color::BLACK,
            1 => self.stops[0],
            n => {
                let pos = t.clamp(0.0, 1.0) * (n - 1) as f64;
                let lo = (pos.floor() as usize).min(n - 2);
                interpolate_color(self.stops[lo], self.stops[lo + 1], (pos - lo as f64) as f32)
            }
        }
    }

    /// One colour per band, taken at each band's midpoint.
    pub fn band_colours(&self, bands: usize) -> Vec<Color> {
        (0..bands)
            .map(|k| self.at((k as f64 + 0.5) / bands as f64))
            .collect()
    }
}
