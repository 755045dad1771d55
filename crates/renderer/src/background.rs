//! Floor-plan background images.

use std::path::Path;

use heatmap_common::{HeatmapError, HeatmapResult};
use tiny_skia::{ColorU8, Pixmap};
use tracing::debug;

fn image_error(path: &Path, err: impl std::fmt::Display) -> HeatmapError {
    HeatmapError::background_image(path.display().to_string(), err.to_string())
}

/// Pixel size of an image without decoding it fully.
pub fn probe_extent(path: &Path) -> HeatmapResult<(u32, u32)> {
    image::image_dimensions(path).map_err(|e| image_error(path, e))
}

/// Decode an image (PNG, JPEG, ...) into a premultiplied pixmap.
pub fn load_background(path: &Path) -> HeatmapResult<Pixmap> {
    let rgba = image::open(path).map_err(|e| image_error(path, e))?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixmap =
        Pixmap::new(width, height).ok_or_else(|| image_error(path, "image has no pixels"))?;

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    debug!(path = %path.display(), width, height, "Loaded background image");
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixtures::{write_corrupt_image, write_floor_plan};
    use test_utils::temp_test_dir;

    #[test]
    fn test_probe_and_load() {
        let dir = temp_test_dir();
        let path = write_floor_plan(dir.path(), "plan.png", 64, 48);

        assert_eq!(probe_extent(&path).unwrap(), (64, 48));
        let pixmap = load_background(&path).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (64, 48));
    }

    #[test]
    fn test_missing_file_is_background_error() {
        let err = load_background(Path::new("/nonexistent/plan.png")).unwrap_err();
        assert_eq!(err.kind(), "background_image");
        assert!(err.to_string().contains("/nonexistent/plan.png"));
        assert!(probe_extent(Path::new("/nonexistent/plan.png")).is_err());
    }

    #[test]
    fn test_corrupt_file_is_background_error() {
        let dir = temp_test_dir();
        let path = write_corrupt_image(dir.path(), "bad.png");
        let err = load_background(&path).unwrap_err();
        assert!(matches!(err, HeatmapError::BackgroundImage { .. }));
    }
}
