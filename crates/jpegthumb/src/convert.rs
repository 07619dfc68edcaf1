//! Per-pixel color conversions.
//!
//! YCbCr uses the JFIF definition (ITU-R BT.601 coefficients, full 0..=255
//! range, chroma centred on 128). CMYK follows the Adobe convention found in
//! practically every CMYK JPEG: components are stored inverted, so 255 means
//! "no ink", and `channel * K / 255` gives an approximate RGB intensity. This
//! is not colorimetric.

#[inline]
fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// BT.601 luma of an RGB triple.
#[inline]
pub fn rgb_to_luma(r: u8, g: u8, b: u8) -> u8 {
    clamp_u8(0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
}

/// RGB to JFIF YCbCr.
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    [
        clamp_u8(0.299 * r + 0.587 * g + 0.114 * b),
        clamp_u8(-0.168_736 * r - 0.331_264 * g + 0.5 * b + 128.0),
        clamp_u8(0.5 * r - 0.418_688 * g - 0.081_312 * b + 128.0),
    ]
}

/// JFIF YCbCr to RGB.
#[inline]
pub fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> [u8; 3] {
    let (y, cb, cr) = (y as f32, cb as f32 - 128.0, cr as f32 - 128.0);
    [
        clamp_u8(y + 1.402 * cr),
        clamp_u8(y - 0.344_136 * cb - 0.714_136 * cr),
        clamp_u8(y + 1.772 * cb),
    ]
}

/// Inverted CMYK to RGB: each of C, M, Y scaled by K, saturating at 255.
#[inline]
pub fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> [u8; 3] {
    let k = k as u32;
    [
        (c as u32 * k / 255).min(255) as u8,
        (m as u32 * k / 255).min(255) as u8,
        (y as u32 * k / 255).min(255) as u8,
    ]
}

/// RGB to inverted CMYK, the exact inverse of [`cmyk_to_rgb`].
#[inline]
pub fn rgb_to_cmyk(r: u8, g: u8, b: u8) -> [u8; 4] {
    [r, g, b, 255]
}

/// Packs an RGB triple into `0xFF000000 | R << 16 | G << 8 | B`.
#[inline]
pub fn pack_argb32(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that neutral grays survive the YCbCr round trip.
    #[test]
    fn test_ycbcr_neutral() {
        for v in [0u8, 1, 77, 128, 200, 255] {
            assert_eq!(rgb_to_ycbcr(v, v, v), [v, 128, 128]);
            assert_eq!(ycbcr_to_rgb(v, 128, 128), [v, v, v]);
        }
    }

    /// Tests primary colors against the JFIF reference values.
    #[test]
    fn test_ycbcr_primaries() {
        assert_eq!(rgb_to_ycbcr(255, 0, 0), [76, 85, 255]);
        assert_eq!(rgb_to_ycbcr(0, 0, 255), [29, 255, 107]);
        let [r, g, b] = ycbcr_to_rgb(76, 85, 255);
        assert!(r >= 253 && g <= 2 && b <= 2);
    }

    /// Tests the K-scaled CMYK conversion and its saturation.
    #[test]
    fn test_cmyk_to_rgb() {
        assert_eq!(cmyk_to_rgb(255, 255, 255, 255), [255, 255, 255]);
        assert_eq!(cmyk_to_rgb(255, 128, 0, 128), [128, 64, 0]);
        assert_eq!(cmyk_to_rgb(200, 100, 50, 0), [0, 0, 0]);
        let [c, m, y, k] = rgb_to_cmyk(12, 34, 56);
        assert_eq!(cmyk_to_rgb(c, m, y, k), [12, 34, 56]);
    }

    /// Tests ARGB packing byte positions.
    #[test]
    fn test_pack_argb32() {
        assert_eq!(pack_argb32(0x12, 0x34, 0x56), 0xFF12_3456);
        assert_eq!(pack_argb32(0, 0, 0), 0xFF00_0000);
    }

    /// Tests luma weights.
    #[test]
    fn test_luma() {
        assert_eq!(rgb_to_luma(255, 255, 255), 255);
        assert_eq!(rgb_to_luma(0, 255, 0), 150);
    }
}
