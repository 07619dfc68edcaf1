//! Pixel extraction.
//!
//! Copies a caller-chosen rectangle of decoded scanlines into a new, tightly
//! packed buffer in one of the eight [`Colorspace`] layouts.
//!
//! # Clipping
//!
//! The rectangle is clipped against the image. An empty clip is an error.
//! A partial clip still returns a buffer of the *requested* `w x h` size:
//! in-bounds pixels land at their position relative to the requested
//! origin and the out-of-bounds margin is zero-filled.
//!
//! # Formats
//!
//! The decode feeding an extraction is always configured for the output
//! format's [`DecodeSpace`](crate::DecodeSpace), so each format only
//! reorders or pads channels. `Argb32` is always fed an RGB-ordered decode.

use crate::colorspace::{Colorspace, DecodeSpace};
use crate::convert::{cmyk_to_rgb, pack_argb32, ycbcr_to_rgb};
use crate::rect::Rect;
use crate::scanline::Scanlines;
use crate::{ThumbError, ThumbResult};

/// Extracted pixel storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelData {
    /// Byte-per-channel layouts.
    U8(Vec<u8>),
    /// One packed value per pixel ([`Colorspace::Argb32`]).
    U32(Vec<u32>),
}

/// Pixels copied out of an [`ImageHandle`](crate::ImageHandle).
///
/// Owned by the caller and independent of the handle it came from; dropping
/// it releases the memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels (as requested).
    pub width: u32,
    /// Height in pixels (as requested).
    pub height: u32,
    /// Layout of [`data`](Self::data).
    pub colorspace: Colorspace,
    /// Pixel values, row-major, no padding.
    pub data: PixelData,
}

impl PixelBuffer {
    /// Byte view of byte-per-channel data.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.data {
            PixelData::U8(v) => Some(v),
            PixelData::U32(_) => None,
        }
    }

    /// Packed view of [`Colorspace::Argb32`] data.
    pub fn as_u32(&self) -> Option<&[u32]> {
        match &self.data {
            PixelData::U32(v) => Some(v),
            PixelData::U8(_) => None,
        }
    }

    /// Total size of the pixel data in bytes.
    pub fn byte_len(&self) -> usize {
        match &self.data {
            PixelData::U8(v) => v.len(),
            PixelData::U32(v) => v.len() * 4,
        }
    }

    /// Consumes the buffer, returning bytes. Packed values are emitted in
    /// native byte order.
    pub fn into_bytes(self) -> Vec<u8> {
        match self.data {
            PixelData::U8(v) => v,
            PixelData::U32(v) => v.into_iter().flat_map(u32::to_ne_bytes).collect(),
        }
    }
}

/// Allocates a zeroed buffer, reporting allocation failure as an error.
fn alloc_zeroed<T: Clone + Default>(len: usize) -> ThumbResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|e| ThumbError::DecodeFailed(format!("pixel buffer of {len} elements: {e}")))?;
    v.resize(len, T::default());
    Ok(v)
}

/// Clips `rect` to the scanlines, or reports it as out of range.
fn clip(lines: &Scanlines, rect: Rect) -> ThumbResult<Rect> {
    rect.intersect(&Rect::from_size(lines.width(), lines.height()))
        .ok_or(ThumbError::ExtractOutOfRange {
            x: rect.x,
            y: rect.y,
            w: rect.width,
            h: rect.height,
            width: lines.width(),
            height: lines.height(),
        })
}

/// Walks the clipped rectangle, handing each source pixel and the index of
/// its destination pixel in the requested-size buffer to `put`.
fn for_each_pixel(lines: &Scanlines, rect: Rect, clip: Rect, mut put: impl FnMut(&[u8], usize)) {
    let comps = lines.components();
    let ox = (clip.x as i64 - rect.x as i64) as usize;
    let oy = (clip.y as i64 - rect.y as i64) as usize;
    let x0 = clip.x as usize * comps;
    let span = clip.width as usize * comps;

    for row in 0..clip.height as usize {
        let src = &lines.row(clip.y as usize + row)[x0..x0 + span];
        let base = (oy + row) * rect.width as usize + ox;
        for (i, px) in src.chunks_exact(comps).enumerate() {
            put(px, base + i);
        }
    }
}

/// Source of one output byte in a byte-per-channel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    /// Component `n` of the decoded pixel.
    Src(usize),
    /// Constant 0xFF alpha.
    Opaque,
}

/// Output bytes of each byte-per-channel format; `None` for the packed
/// `u32` format.
fn byte_layout(colorspace: Colorspace) -> Option<&'static [Channel]> {
    use Channel::{Opaque, Src};
    match colorspace {
        Colorspace::Gray8 => Some(&[Src(0)]),
        Colorspace::Yuv8 | Colorspace::Rgb8 => Some(&[Src(0), Src(1), Src(2)]),
        Colorspace::Bgr8 => Some(&[Src(2), Src(1), Src(0)]),
        Colorspace::Rgba8 => Some(&[Src(0), Src(1), Src(2), Opaque]),
        Colorspace::Bgra8 => Some(&[Src(2), Src(1), Src(0), Opaque]),
        Colorspace::Cmyk => Some(&[Src(0), Src(1), Src(2), Src(3)]),
        Colorspace::Argb32 => None,
    }
}

/// Extracts `rect` in `colorspace`.
///
/// `lines` must have been decoded for `colorspace.decode_space()`.
pub(crate) fn extract(lines: &Scanlines, rect: Rect, colorspace: Colorspace) -> ThumbResult<PixelBuffer> {
    if lines.space() != colorspace.decode_space() {
        return Err(ThumbError::InvalidColorspace(colorspace as u8));
    }
    let clip = clip(lines, rect)?;
    let count = rect.width as usize * rect.height as usize;

    let data = match byte_layout(colorspace) {
        Some(layout) => {
            let bpp = layout.len();
            let mut out = alloc_zeroed::<u8>(count * bpp)?;
            for_each_pixel(lines, rect, clip, |px, i| {
                let dst = &mut out[i * bpp..(i + 1) * bpp];
                for (byte, channel) in dst.iter_mut().zip(layout) {
                    *byte = match *channel {
                        Channel::Src(c) => px[c],
                        Channel::Opaque => 0xFF,
                    };
                }
            });
            PixelData::U8(out)
        }
        None => {
            let mut out = alloc_zeroed::<u32>(count)?;
            for_each_pixel(lines, rect, clip, |px, i| {
                out[i] = pack_argb32(px[0], px[1], px[2]);
            });
            PixelData::U32(out)
        }
    };

    Ok(PixelBuffer {
        width: rect.width,
        height: rect.height,
        colorspace,
        data,
    })
}

/// Extracts `rect` as RGB8 whatever the decode space.
///
/// Gray is replicated into R = G = B, CMYK is reduced with
/// [`cmyk_to_rgb`], YCbCr is converted, RGB is copied.
pub(crate) fn extract_rgb8(lines: &Scanlines, rect: Rect) -> ThumbResult<PixelBuffer> {
    let clip = clip(lines, rect)?;
    let count = rect.width as usize * rect.height as usize;
    let mut out = alloc_zeroed::<u8>(count * 3)?;
    let space = lines.space();

    for_each_pixel(lines, rect, clip, |px, i| {
        let rgb = match space {
            DecodeSpace::Gray => [px[0]; 3],
            DecodeSpace::Rgb => [px[0], px[1], px[2]],
            DecodeSpace::YCbCr => ycbcr_to_rgb(px[0], px[1], px[2]),
            DecodeSpace::Cmyk => cmyk_to_rgb(px[0], px[1], px[2], px[3]),
        };
        out[i * 3..i * 3 + 3].copy_from_slice(&rgb);
    });

    Ok(PixelBuffer {
        width: rect.width,
        height: rect.height,
        colorspace: Colorspace::Rgb8,
        data: PixelData::U8(out),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 RGB image: red, green / blue, white.
    fn rgb_2x2() -> Scanlines {
        let buf = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        Scanlines::new(buf, 2, 2, DecodeSpace::Rgb).unwrap()
    }

    /// Tests every RGB-family layout on the same pixel.
    #[test]
    fn test_rgb_family_layouts() {
        let lines = Scanlines::new(vec![10, 20, 30], 1, 1, DecodeSpace::Rgb).unwrap();
        let one = Rect::from_size(1, 1);
        let bytes = |cs| extract(&lines, one, cs).unwrap().into_bytes();

        assert_eq!(bytes(Colorspace::Rgb8), vec![10, 20, 30]);
        assert_eq!(bytes(Colorspace::Bgr8), vec![30, 20, 10]);
        assert_eq!(bytes(Colorspace::Rgba8), vec![10, 20, 30, 255]);
        assert_eq!(bytes(Colorspace::Bgra8), vec![30, 20, 10, 255]);

        let packed = extract(&lines, one, Colorspace::Argb32).unwrap();
        assert_eq!(packed.as_u32(), Some(&[0xFF0A_141E][..]));
    }

    /// Tests the per-format buffer size for every colorspace.
    #[test]
    fn test_bytes_per_pixel_written() {
        for cs in Colorspace::ALL {
            let comps = cs.decode_space().components();
            let lines = Scanlines::new(vec![7; 12 * comps], 4, 3, cs.decode_space()).unwrap();
            let buf = extract(&lines, Rect::from_size(4, 3), cs).unwrap();
            assert_eq!(buf.byte_len(), 12 * cs.bytes_per_pixel(), "{cs}");
        }
    }

    /// Tests that byte layouts agree with the bytes-per-pixel table.
    #[test]
    fn test_byte_layout_widths() {
        for cs in Colorspace::ALL {
            match byte_layout(cs) {
                Some(layout) => {
                    assert_eq!(layout.len(), cs.bytes_per_pixel(), "{cs}");
                    assert!(layout.iter().all(|ch| match ch {
                        Channel::Src(c) => *c < cs.decode_space().components(),
                        Channel::Opaque => true,
                    }));
                }
                None => assert_eq!(cs, Colorspace::Argb32),
            }
        }
    }

    /// Tests that a mismatched decode is refused.
    #[test]
    fn test_space_mismatch() {
        let lines = rgb_2x2();
        assert!(matches!(
            extract(&lines, Rect::from_size(1, 1), Colorspace::Gray8),
            Err(ThumbError::InvalidColorspace(0))
        ));
    }

    /// Tests a sub-rectangle copy.
    #[test]
    fn test_sub_rectangle() {
        let lines = rgb_2x2();
        let buf = extract(&lines, Rect::new(1, 0, 1, 2), Colorspace::Rgb8).unwrap();
        assert_eq!(buf.into_bytes(), vec![0, 255, 0, 255, 255, 255]);
    }

    /// Tests the requested-size buffer and zeroed margin on a straddling
    /// rectangle.
    #[test]
    fn test_straddling_rectangle() {
        let lines = rgb_2x2();
        let buf = extract(&lines, Rect::new(-1, -1, 2, 2), Colorspace::Rgba8).unwrap();
        assert_eq!((buf.width, buf.height), (2, 2));
        assert_eq!(
            buf.into_bytes(),
            vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 255, 0, 0, 255]
        );

        let buf = extract(&lines, Rect::new(1, 1, 3, 1), Colorspace::Rgb8).unwrap();
        assert_eq!(buf.into_bytes(), vec![255, 255, 255, 0, 0, 0, 0, 0, 0]);
    }

    /// Tests that fully outside rectangles yield nothing.
    #[test]
    fn test_outside_rectangle() {
        let lines = rgb_2x2();
        for rect in [
            Rect::new(2, 0, 1, 1),
            Rect::new(0, 2, 1, 1),
            Rect::new(-3, 0, 3, 1),
            Rect::new(0, 0, 0, 1),
        ] {
            assert!(matches!(
                extract(&lines, rect, Colorspace::Rgb8),
                Err(ThumbError::ExtractOutOfRange { .. })
            ));
        }
    }

    /// Tests the RGB view of gray, CMYK and YCbCr decodes.
    #[test]
    fn test_extract_rgb8_conversions() {
        let gray = Scanlines::new(vec![0, 90, 180, 255], 2, 2, DecodeSpace::Gray).unwrap();
        let rgb = extract_rgb8(&gray, Rect::from_size(2, 2)).unwrap().into_bytes();
        assert_eq!(rgb.len(), 12);
        for px in rgb.chunks(3) {
            assert!(px[0] == px[1] && px[1] == px[2]);
        }
        assert_eq!(&rgb[3..6], &[90, 90, 90]);

        let cmyk = Scanlines::new(vec![255, 128, 0, 128], 1, 1, DecodeSpace::Cmyk).unwrap();
        let rgb = extract_rgb8(&cmyk, Rect::from_size(1, 1)).unwrap();
        assert_eq!(rgb.into_bytes(), vec![128, 64, 0]);

        let ycc = Scanlines::new(vec![100, 128, 128], 1, 1, DecodeSpace::YCbCr).unwrap();
        let rgb = extract_rgb8(&ycc, Rect::from_size(1, 1)).unwrap();
        assert_eq!(rgb.colorspace, Colorspace::Rgb8);
        assert_eq!(rgb.into_bytes(), vec![100, 100, 100]);
    }
}
