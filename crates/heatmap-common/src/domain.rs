//! The rectangular region a surface is interpolated and rendered over.

use serde::{Deserialize, Serialize};

use crate::error::{HeatmapError, HeatmapResult};
use crate::sample::Sample;

/// An axis-aligned rectangle in floor-plan pixel coordinates.
///
/// Only built through [`Domain::new`] (deserialisation included), so width
/// and height are always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Bounds")]
pub struct Domain {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

#[derive(Deserialize)]
struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl TryFrom<Bounds> for Domain {
    type Error = HeatmapError;

    fn try_from(b: Bounds) -> HeatmapResult<Self> {
        Domain::new(b.x_min, b.x_max, b.y_min, b.y_max)
    }
}

impl Domain {
    /// Create a domain, rejecting zero-area or inverted rectangles.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> HeatmapResult<Self> {
        let values = [x_min, x_max, y_min, y_max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(HeatmapError::degenerate_domain(format!(
                "non-finite bounds {:?}",
                values
            )));
        }
        if x_min >= x_max {
            return Err(HeatmapError::degenerate_domain(format!(
                "zero width: x in [{}, {}]",
                x_min, x_max
            )));
        }
        if y_min >= y_max {
            return Err(HeatmapError::degenerate_domain(format!(
                "zero height: y in [{}, {}]",
                y_min, y_max
            )));
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Unpadded bounds of the sample locations as `(x_min, x_max, y_min, y_max)`.
    ///
    /// Returns `None` for an empty slice. The bounds may be degenerate.
    pub fn sample_bounds(samples: &[Sample]) -> Option<(f64, f64, f64, f64)> {
        let first = samples.first()?;
        let init = (first.x(), first.x(), first.y(), first.y());
        Some(samples.iter().fold(init, |(x0, x1, y0, y1), s| {
            (x0.min(s.x()), x1.max(s.x()), y0.min(s.y()), y1.max(s.y()))
        }))
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Width in pixels.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height in pixels.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Check if a point lies inside the domain (edges included).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Check if a point lies strictly inside the domain.
    pub fn strictly_contains_point(&self, x: f64, y: f64) -> bool {
        x > self.x_min && x < self.x_max && y > self.y_min && y < self.y_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_area() {
        assert!(matches!(
            Domain::new(5.0, 5.0, 0.0, 10.0),
            Err(HeatmapError::DegenerateDomain(_))
        ));
        assert!(matches!(
            Domain::new(0.0, 10.0, 3.0, 1.0),
            Err(HeatmapError::DegenerateDomain(_))
        ));
        assert!(Domain::new(0.0, f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_contains() {
        let d = Domain::new(0.0, 10.0, 0.0, 20.0).unwrap();
        assert_eq!(d.width(), 10.0);
        assert_eq!(d.height(), 20.0);
        assert!(d.contains_point(0.0, 20.0));
        assert!(!d.strictly_contains_point(0.0, 5.0));
        assert!(d.strictly_contains_point(5.0, 5.0));
        assert!(!d.contains_point(-0.1, 5.0));
    }

    #[test]
    fn test_deserialize_validates_bounds() {
        let d: Domain =
            serde_json::from_str(r#"{"x_min": 0.0, "x_max": 4.0, "y_min": 1.0, "y_max": 2.0}"#)
                .unwrap();
        assert_eq!((d.x_min(), d.x_max(), d.y_min(), d.y_max()), (0.0, 4.0, 1.0, 2.0));

        let inverted =
            serde_json::from_str::<Domain>(r#"{"x_min": 4.0, "x_max": 0.0, "y_min": 1.0, "y_max": 2.0}"#);
        assert!(inverted.is_err());
    }

    #[test]
    fn test_sample_bounds() {
        assert_eq!(Domain::sample_bounds(&[]), None);
        let samples = vec![
            Sample::at(10.0, 40.0, 1.0, 1.0, 1.0),
            Sample::at(-3.0, 5.0, 1.0, 1.0, 1.0),
        ];
        assert_eq!(
            Domain::sample_bounds(&samples),
            Some((-3.0, 10.0, 5.0, 40.0))
        );
    }
}
