//! CLI command implementations

pub mod info;
pub mod pixels;
pub mod thumb;
pub mod trim;

use anyhow::{Context, Result};
use jpegthumb::ImageHandle;
use std::path::Path;

/// Open a JPEG from path
pub fn open_image(path: &Path) -> Result<ImageHandle> {
    ImageHandle::open_from_file(path).with_context(|| format!("Failed to open: {}", path.display()))
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Thumbnail size for `max` on the longest edge, keeping aspect.
pub fn fit_longest(src_w: u32, src_h: u32, max: u32) -> (u32, u32) {
    fit_inside(src_w, src_h, max, max)
}

/// Largest size with the source aspect that fits inside `w` x `h`.
pub fn fit_inside(src_w: u32, src_h: u32, w: u32, h: u32) -> (u32, u32) {
    // Compare w/src_w against h/src_h without floats
    if (w as u64) * (src_h as u64) <= (h as u64) * (src_w as u64) {
        let fit_h = (src_h as u64 * w as u64 / src_w as u64).max(1) as u32;
        (w.max(1), fit_h)
    } else {
        let fit_w = (src_w as u64 * h as u64 / src_h as u64).max(1) as u32;
        (fit_w, h.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests aspect fitting on both axes.
    #[test]
    fn test_fit_inside() {
        assert_eq!(fit_inside(400, 300, 100, 100), (100, 75));
        assert_eq!(fit_inside(300, 400, 100, 100), (75, 100));
        assert_eq!(fit_longest(1000, 10, 50), (50, 1));
    }

    /// Tests size formatting.
    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
