//! Decoded scanline storage.
//!
//! A [`Scanlines`] owns one contiguous pixel buffer plus a table of row
//! offsets into it. Everything that reads rows (pixel extraction, encode)
//! goes through the offset table, which lets a crop be expressed by
//! re-pointing rows instead of copying pixels. A crop never touches the
//! buffer and a downsample works in place unless it has to enlarge; each
//! runs at most once.

use crate::colorspace::DecodeSpace;
use crate::rect::Rect;
use crate::scale;
use crate::{ThumbError, ThumbResult};

/// Decoded pixels, addressed row by row.
#[derive(Debug)]
pub(crate) struct Scanlines {
    buf: Vec<u8>,
    /// Byte offset of each visible row's first pixel.
    rows: Vec<usize>,
    width: u32,
    height: u32,
    space: DecodeSpace,
    processed: bool,
}

impl Scanlines {
    /// Wraps a tightly packed decode of `width` x `height` pixels.
    pub(crate) fn new(buf: Vec<u8>, width: u32, height: u32, space: DecodeSpace) -> ThumbResult<Self> {
        let stride = width as usize * space.components();
        let expected = stride * height as usize;
        if buf.len() < expected {
            return Err(ThumbError::DecodeFailed(format!(
                "codec produced {} bytes, expected {} for {}x{} {:?}",
                buf.len(),
                expected,
                width,
                height,
                space
            )));
        }

        let mut rows = Vec::new();
        rows.try_reserve_exact(height as usize)
            .map_err(|e| ThumbError::DecodeFailed(format!("scanline table: {e}")))?;
        rows.extend((0..height as usize).map(|y| y * stride));

        Ok(Self {
            buf,
            rows,
            width,
            height,
            space,
            processed: false,
        })
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn space(&self) -> DecodeSpace {
        self.space
    }

    pub(crate) fn components(&self) -> usize {
        self.space.components()
    }

    /// Whether a downsample or crop has already been applied.
    pub(crate) fn is_processed(&self) -> bool {
        self.processed
    }

    /// Visible pixels of row `y`.
    pub(crate) fn row(&self, y: usize) -> &[u8] {
        let start = self.rows[y];
        &self.buf[start..start + self.width as usize * self.components()]
    }

    /// Scales to exactly `target_w` x `target_h` by point sampling.
    ///
    /// Returns `false` without touching anything if the size already
    /// matches or the buffer was processed before.
    pub(crate) fn downsample(&mut self, target_w: u32, target_h: u32) -> bool {
        if self.processed || (self.width == target_w && self.height == target_h) {
            return false;
        }

        let comps = self.components();
        let (src_w, src_h) = (self.width as usize, self.height as usize);
        let (dst_w, dst_h) = (target_w as usize, target_h as usize);

        if dst_w <= src_w && dst_h <= src_h {
            scale::downsample(&mut self.buf, src_w, src_h, comps, dst_w, dst_h);
        } else {
            self.buf = scale::resample(&self.buf, src_w, src_h, comps, dst_w, dst_h);
        }

        let stride = dst_w * comps;
        self.rows.clear();
        self.rows.extend((0..dst_h).map(|y| y * stride));
        self.width = target_w;
        self.height = target_h;
        self.processed = true;
        true
    }

    /// Restricts the visible image to `rect` by re-pointing rows.
    ///
    /// The rectangle is clipped to the current image first. Returns `false`
    /// without touching anything if nothing would change, the clip is
    /// empty, or the buffer was processed before.
    pub(crate) fn crop(&mut self, rect: Rect) -> bool {
        if self.processed {
            return false;
        }
        let Some(clip) = rect.intersect(&Rect::from_size(self.width, self.height)) else {
            return false;
        };
        if clip.width == self.width && clip.height == self.height {
            return false;
        }

        let comps = self.components();
        let (x, y) = (clip.x as usize, clip.y as usize);
        let rows: Vec<usize> = (0..clip.height as usize)
            .map(|row| self.rows[row + y] + x * comps)
            .collect();
        self.rows = rows;
        self.width = clip.width;
        self.height = clip.height;
        self.processed = true;
        true
    }

    /// Copies the visible rows into one tightly packed buffer.
    pub(crate) fn to_packed(&self) -> Vec<u8> {
        let stride = self.width as usize * self.components();
        let mut out = Vec::with_capacity(stride * self.height as usize);
        for y in 0..self.height as usize {
            out.extend_from_slice(self.row(y));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: u32, h: u32, space: DecodeSpace) -> Scanlines {
        let len = (w * h) as usize * space.components();
        let buf = (0..len).map(|i| (i % 256) as u8).collect();
        Scanlines::new(buf, w, h, space).unwrap()
    }

    /// Tests that a short codec buffer is rejected.
    #[test]
    fn test_new_rejects_short_buffer() {
        let err = Scanlines::new(vec![0; 10], 4, 4, DecodeSpace::Gray).unwrap_err();
        assert!(matches!(err, ThumbError::DecodeFailed(_)));
    }

    /// Tests downsample output and its one-shot flag.
    #[test]
    fn test_downsample_once() {
        let mut lines = ramp(8, 8, DecodeSpace::Gray);
        assert!(lines.downsample(4, 2));
        assert_eq!((lines.width(), lines.height()), (4, 2));
        assert_eq!(lines.row(0), &[0, 2, 4, 6]);
        assert_eq!(lines.row(1), &[32, 34, 36, 38]);

        let before = lines.to_packed();
        assert!(!lines.downsample(2, 1));
        assert_eq!(lines.to_packed(), before);
    }

    /// Tests that a matching size is not applicable and leaves the flag unset.
    #[test]
    fn test_downsample_same_size_is_noop() {
        let mut lines = ramp(5, 3, DecodeSpace::Rgb);
        assert!(!lines.downsample(5, 3));
        assert!(!lines.is_processed());
    }

    /// Tests crop re-pointing on a multi-component buffer.
    #[test]
    fn test_crop_repoints_rows() {
        let mut lines = ramp(6, 4, DecodeSpace::Rgb);
        assert!(lines.crop(Rect::new(2, 1, 3, 2)));
        assert_eq!((lines.width(), lines.height()), (3, 2));
        // Row 1, column 2 of a 6-wide RGB ramp starts at byte (6 + 2) * 3.
        assert_eq!(lines.row(0)[0], 24);
        assert_eq!(lines.row(1)[0], 42);
        assert_eq!(lines.row(0).len(), 9);
        assert_eq!(lines.to_packed().len(), 18);
    }

    /// Tests crop clipping and its no-op conditions.
    #[test]
    fn test_crop_clips_and_noops() {
        let mut lines = ramp(4, 4, DecodeSpace::Gray);
        assert!(!lines.crop(Rect::new(-2, -2, 10, 10)));
        assert!(!lines.crop(Rect::new(4, 0, 2, 2)));
        assert!(lines.crop(Rect::new(2, 2, 10, 10)));
        assert_eq!((lines.width(), lines.height()), (2, 2));
        assert_eq!(lines.row(1), &[14, 15]);
        assert!(!lines.crop(Rect::new(0, 0, 1, 1)));
    }

    /// Tests that crop after downsample is refused.
    #[test]
    fn test_processed_blocks_crop() {
        let mut lines = ramp(8, 8, DecodeSpace::Gray);
        assert!(lines.downsample(4, 4));
        assert!(!lines.crop(Rect::new(0, 0, 2, 2)));
        assert_eq!(lines.width(), 4);
    }
}
