//! Heatmap rendering for floor-plan speed measurements.
//!
//! - Clough-Tocher interpolation on a Delaunay triangulation
//! - Filled contour bands and isolines (marching squares)
//! - Markers, value labels and a colour legend
//! - PNG encoding and artifact sinks

pub mod annotate;
pub mod background;
pub mod colour;
pub mod contour;
pub mod interpolation;
pub mod legend;
pub mod png;
pub mod render;
pub mod sink;

pub use interpolation::{interpolate_surface, Surface};
pub use render::{render, render_image, RenderOutcome, RenderRequest, RenderedImage};
pub use sink::{ArtifactSink, DirectorySink, MemorySink};
