//! Test helpers shared across the workspace: sample generators, on-disk
//! fixtures, font lookup and float assertions.
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Return early from a test when no TrueType font is installed.
///
/// ```ignore
/// let font = test_utils::require_font!();
/// ```
#[macro_export]
macro_rules! require_font {
    () => {{
        match $crate::find_font() {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: no TrueType font found. Set TEST_FONT to a .ttf file.");
                return;
            }
        }
    }};
}

/// Assert two numbers are within `epsilon` of each other.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "values differ: {} vs {} (diff {} > {})",
                left, right, diff, epsilon
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_within_epsilon() {
        assert_approx_eq!(25.0004, 25.0, 0.001);
        assert_approx_eq!(-5.5_f32, -5.500001_f64, 0.0001);
    }

    #[test]
    #[should_panic(expected = "values differ")]
    fn test_assert_approx_eq_outside_epsilon() {
        assert_approx_eq!(26.0, 25.0, 0.5);
    }
}
