//! Grid Builder
//!
//! Turns a floor's sample locations into the rectangle a surface is drawn over
//! and the regular mesh it is evaluated on.
//!
//! ```text
//! samples ──► bounds ──► pad (clamp at 0) ──► cover background ──► Domain
//!                                                                    │
//!                                                     linspace x/y ◄─┘
//!                                                          │
//!                                                          ▼
//!                                                         Grid
//! ```
//!
//! # Example
//!
//! ```
//! use grid_builder::build_domain_and_grid;
//! use heatmap_common::Sample;
//!
//! let samples = vec![
//!     Sample::at(0.0, 0.0, 10.0, 5.0, 20.0),
//!     Sample::at(100.0, 0.0, 20.0, 5.0, 20.0),
//!     Sample::at(0.0, 100.0, 30.0, 5.0, 20.0),
//! ];
//! let (domain, grid) = build_domain_and_grid(&samples, None, 50.0, 300).unwrap();
//! assert_eq!(domain.x_min(), 0.0);
//! assert_eq!(domain.x_max(), 150.0);
//! assert_eq!(grid.nx(), 300);
//! ```

pub mod builder;

pub use builder::{build_domain_and_grid, build_for_config, pad_bounds, BackgroundExtent};
