//! Pixel format tags.
//!
//! [`Colorspace`] is the caller-facing format of extracted pixels.
//! [`DecodeSpace`] is the component layout the codec is asked to produce
//! for a given output format; several output formats share one decode space
//! and differ only in how the extractor packs channels.
//!
//! | Colorspace | Bytes/pixel | Decode space | Layout              |
//! |------------|-------------|--------------|---------------------|
//! | `Gray8`    | 1           | Gray         | Y                   |
//! | `Yuv8`     | 3           | YCbCr        | Y Cb Cr             |
//! | `Rgb8`     | 3           | Rgb          | R G B               |
//! | `Bgr8`     | 3           | Rgb          | B G R               |
//! | `Rgba8`    | 4           | Rgb          | R G B 0xFF          |
//! | `Bgra8`    | 4           | Rgb          | B G R 0xFF          |
//! | `Argb32`   | 4 (`u32`)   | Rgb          | `0xFF_RR_GG_BB`     |
//! | `Cmyk`     | 4           | Cmyk         | C M Y K             |

use std::fmt;
use std::str::FromStr;

use crate::{ThumbError, ThumbResult};

/// Output pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Colorspace {
    /// 8-bit luma.
    Gray8 = 0,
    /// 8-bit YCbCr, the codec's native color layout.
    Yuv8 = 1,
    /// 8-bit RGB.
    Rgb8 = 2,
    /// 8-bit BGR.
    Bgr8 = 3,
    /// 8-bit RGB with opaque alpha.
    Rgba8 = 4,
    /// 8-bit BGR with opaque alpha.
    Bgra8 = 5,
    /// One `u32` per pixel, `0xFF000000 | R << 16 | G << 8 | B`.
    Argb32 = 6,
    /// 8-bit CMYK.
    Cmyk = 7,
}

impl Colorspace {
    /// All tags, in numeric order.
    pub const ALL: [Colorspace; 8] = [
        Colorspace::Gray8,
        Colorspace::Yuv8,
        Colorspace::Rgb8,
        Colorspace::Bgr8,
        Colorspace::Rgba8,
        Colorspace::Bgra8,
        Colorspace::Argb32,
        Colorspace::Cmyk,
    ];

    /// Bytes occupied by one extracted pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Colorspace::Gray8 => 1,
            Colorspace::Yuv8 | Colorspace::Rgb8 | Colorspace::Bgr8 => 3,
            Colorspace::Rgba8 | Colorspace::Bgra8 | Colorspace::Argb32 | Colorspace::Cmyk => 4,
        }
    }

    /// Component layout the decoder must produce for this format.
    pub const fn decode_space(self) -> DecodeSpace {
        match self {
            Colorspace::Gray8 => DecodeSpace::Gray,
            Colorspace::Yuv8 => DecodeSpace::YCbCr,
            Colorspace::Rgb8
            | Colorspace::Bgr8
            | Colorspace::Rgba8
            | Colorspace::Bgra8
            | Colorspace::Argb32 => DecodeSpace::Rgb,
            Colorspace::Cmyk => DecodeSpace::Cmyk,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Colorspace::Gray8 => "gray8",
            Colorspace::Yuv8 => "yuv8",
            Colorspace::Rgb8 => "rgb8",
            Colorspace::Bgr8 => "bgr8",
            Colorspace::Rgba8 => "rgba8",
            Colorspace::Bgra8 => "bgra8",
            Colorspace::Argb32 => "argb32",
            Colorspace::Cmyk => "cmyk",
        }
    }
}

impl TryFrom<u8> for Colorspace {
    type Error = ThumbError;

    fn try_from(tag: u8) -> ThumbResult<Self> {
        Colorspace::ALL
            .get(tag as usize)
            .copied()
            .ok_or(ThumbError::InvalidColorspace(tag))
    }
}

impl FromStr for Colorspace {
    type Err = ThumbError;

    fn from_str(s: &str) -> ThumbResult<Self> {
        let lower = s.to_ascii_lowercase();
        Colorspace::ALL
            .into_iter()
            .find(|cs| cs.name() == lower || cs.name().trim_end_matches(|c: char| c.is_ascii_digit()) == lower)
            .ok_or_else(|| ThumbError::UnknownColorspace(s.to_string()))
    }
}

impl fmt::Display for Colorspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Component layout of decoded scanlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeSpace {
    /// One luma component.
    Gray,
    /// Y, Cb, Cr (JFIF full range).
    YCbCr,
    /// R, G, B.
    Rgb,
    /// C, M, Y, K, Adobe-inverted (255 = no ink).
    Cmyk,
}

impl DecodeSpace {
    /// Components per decoded pixel.
    pub const fn components(self) -> usize {
        match self {
            DecodeSpace::Gray => 1,
            DecodeSpace::YCbCr | DecodeSpace::Rgb => 3,
            DecodeSpace::Cmyk => 4,
        }
    }
}
