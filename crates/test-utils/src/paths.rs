//! Font lookup and scratch directories.

use std::path::PathBuf;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// A TrueType font for label tests. `TEST_FONT` wins when it points at a file.
pub fn find_font() -> Option<PathBuf> {
    std::env::var("TEST_FONT")
        .ok()
        .map(PathBuf::from)
        .filter(|path| path.exists())
        .or_else(|| {
            FONT_CANDIDATES
                .iter()
                .map(PathBuf::from)
                .find(|path| path.exists())
        })
}

/// Scratch directory removed when the guard drops.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("heatmap_test_")
        .tempdir()
        .expect("Failed to create temporary test directory")
}
