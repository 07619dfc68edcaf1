//! Binding to the JPEG codec.
//!
//! Decoding goes through `jpeg-decoder`, encoding through `jpeg-encoder`.
//! This module turns their APIs into the three operations the handle needs:
//!
//! - [`read_header`]: dimensions, native colorspace and captured marker
//!   segments, without decoding pixels.
//! - [`decode`]: pixels at a DCT scale of `1/s`, converted into a
//!   [`DecodeSpace`], wrapped in [`Scanlines`].
//! - [`encode`]: visible scanlines to a JPEG byte stream with quality,
//!   thumbnail APP7 segments and an optional comment.

use std::io::Read;

use jpeg_decoder::PixelFormat;
use jpeg_encoder::{ColorType as JpegColorType, Encoder, EncodingError, SamplingFactor};

use crate::colorspace::{Colorspace, DecodeSpace};
use crate::convert::{cmyk_to_rgb, rgb_to_cmyk, rgb_to_luma, rgb_to_ycbcr};
use crate::markers::{self, Segment};
use crate::scanline::Scanlines;
use crate::{ThumbError, ThumbResult};

/// Quality at and above which chroma is not subsampled.
pub const FULL_CHROMA_QUALITY: u8 = 90;

/// Header-level facts about a JPEG.
#[derive(Debug, Clone)]
pub(crate) struct Header {
    pub width: u32,
    pub height: u32,
    pub native: Colorspace,
    pub segments: Vec<Segment>,
}

/// Colorspace tag for a decoder pixel format.
fn native_colorspace(format: PixelFormat) -> Colorspace {
    match format {
        PixelFormat::L8 | PixelFormat::L16 => Colorspace::Gray8,
        PixelFormat::RGB24 => Colorspace::Yuv8,
        PixelFormat::CMYK32 => Colorspace::Cmyk,
    }
}

/// Reads dimensions, colorspace and COM/APP7 segments.
pub(crate) fn read_header<R: Read>(reader: R, raw: &[u8]) -> ThumbResult<Header> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    decoder
        .read_info()
        .map_err(|e| ThumbError::OpenFailed(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| ThumbError::OpenFailed("missing JPEG info".into()))?;

    Ok(Header {
        width: info.width as u32,
        height: info.height as u32,
        native: native_colorspace(info.pixel_format),
        segments: markers::scan(raw),
    })
}

/// Flips CMYK samples between ink amounts and the Adobe-inverted form.
///
/// `jpeg-decoder` hands out ink amounts (255 = full ink) and `jpeg-encoder`
/// expects them; [`DecodeSpace::Cmyk`] scanlines hold the inverted form.
fn invert_ink(mut samples: Vec<u8>) -> Vec<u8> {
    for s in &mut samples {
        *s = !*s;
    }
    samples
}

/// Converts decoder output into the requested component layout.
fn to_space(pixels: Vec<u8>, from: PixelFormat, to: DecodeSpace) -> Vec<u8> {
    match (from, to) {
        (PixelFormat::L8, DecodeSpace::Gray) | (PixelFormat::RGB24, DecodeSpace::Rgb) => pixels,
        (PixelFormat::CMYK32, DecodeSpace::Cmyk) => invert_ink(pixels),

        // 16-bit gray: keep the high byte
        (PixelFormat::L16, _) => {
            let l8 = pixels.chunks_exact(2).map(|l16| l16[0]).collect();
            to_space(l8, PixelFormat::L8, to)
        }

        (PixelFormat::L8, DecodeSpace::YCbCr) => pixels.iter().flat_map(|&g| [g, 128, 128]).collect(),
        (PixelFormat::L8, DecodeSpace::Rgb) => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        (PixelFormat::L8, DecodeSpace::Cmyk) => pixels.iter().flat_map(|&g| rgb_to_cmyk(g, g, g)).collect(),

        (PixelFormat::RGB24, DecodeSpace::Gray) => pixels
            .chunks_exact(3)
            .map(|p| rgb_to_luma(p[0], p[1], p[2]))
            .collect(),
        (PixelFormat::RGB24, DecodeSpace::YCbCr) => pixels
            .chunks_exact(3)
            .flat_map(|p| rgb_to_ycbcr(p[0], p[1], p[2]))
            .collect(),
        (PixelFormat::RGB24, DecodeSpace::Cmyk) => pixels
            .chunks_exact(3)
            .flat_map(|p| rgb_to_cmyk(p[0], p[1], p[2]))
            .collect(),

        (PixelFormat::CMYK32, DecodeSpace::Gray) => pixels
            .chunks_exact(4)
            .map(|p| {
                let [r, g, b] = cmyk_to_rgb(!p[0], !p[1], !p[2], !p[3]);
                rgb_to_luma(r, g, b)
            })
            .collect(),
        (PixelFormat::CMYK32, DecodeSpace::Rgb) => pixels
            .chunks_exact(4)
            .flat_map(|p| cmyk_to_rgb(!p[0], !p[1], !p[2], !p[3]))
            .collect(),
        (PixelFormat::CMYK32, DecodeSpace::YCbCr) => pixels
            .chunks_exact(4)
            .flat_map(|p| {
                let [r, g, b] = cmyk_to_rgb(!p[0], !p[1], !p[2], !p[3]);
                rgb_to_ycbcr(r, g, b)
            })
            .collect(),
    }
}

/// Decodes at a DCT scale of `1/scale` into `space`.
///
/// The codec rounds the scaled size its own way; strides always come from
/// the size it reports. If it refuses to scale, the decode falls back to
/// full resolution.
pub(crate) fn decode(raw: &[u8], scale: u32, space: DecodeSpace) -> ThumbResult<Scanlines> {
    let fail = |e: jpeg_decoder::Error| ThumbError::DecodeFailed(e.to_string());

    let mut decoder = jpeg_decoder::Decoder::new(raw);
    decoder.read_info().map_err(fail)?;
    let info = decoder
        .info()
        .ok_or_else(|| ThumbError::DecodeFailed("missing JPEG info".into()))?;

    let mut size = (info.width, info.height);
    if scale > 1 {
        let requested = ((info.width as u32 / scale).max(1) as u16, (info.height as u32 / scale).max(1) as u16);
        match decoder.scale(requested.0, requested.1) {
            Ok(scaled) => size = scaled,
            Err(e) => {
                tracing::warn!("codec refused 1/{scale} scaling, decoding at full size: {e}");
                decoder = jpeg_decoder::Decoder::new(raw);
                decoder.read_info().map_err(fail)?;
            }
        }
    }

    let pixels = decoder.decode().map_err(fail)?;
    let format = decoder.info().map_or(info.pixel_format, |i| i.pixel_format);
    tracing::debug!(
        scale,
        width = size.0,
        height = size.1,
        format = ?format,
        space = ?space,
        "decoded"
    );

    let converted = to_space(pixels, format, space);
    Scanlines::new(converted, size.0 as u32, size.1 as u32, space)
}

/// Output-side settings for [`encode`].
#[derive(Debug, Clone, Default)]
pub(crate) struct EncodeOptions<'a> {
    /// 0..=100; 0 is treated as 1.
    pub quality: u8,
    /// APP7 payloads, written in order.
    pub app7: &'a [Vec<u8>],
    /// COM payload.
    pub comment: Option<&'a str>,
}

/// Encodes the visible scanlines.
pub(crate) fn encode(lines: &Scanlines, options: &EncodeOptions<'_>) -> ThumbResult<Vec<u8>> {
    let fail = |e: EncodingError| ThumbError::EncodeFailed(e.to_string());

    let color_type = match lines.space() {
        DecodeSpace::Gray => JpegColorType::Luma,
        DecodeSpace::YCbCr => JpegColorType::Ycbcr,
        DecodeSpace::Rgb => JpegColorType::Rgb,
        DecodeSpace::Cmyk => JpegColorType::Cmyk,
    };
    let pixel_data = match lines.space() {
        DecodeSpace::Cmyk => invert_ink(lines.to_packed()),
        _ => lines.to_packed(),
    };

    let mut buffer = Vec::new();
    let quality = options.quality.clamp(1, 100);
    let mut encoder = Encoder::new(&mut buffer, quality);
    if quality >= FULL_CHROMA_QUALITY {
        encoder.set_sampling_factor(SamplingFactor::F_1_1);
    }
    for payload in options.app7 {
        encoder.add_app_segment(7, payload).map_err(fail)?;
    }
    encoder
        .encode(&pixel_data, lines.width() as u16, lines.height() as u16, color_type)
        .map_err(fail)?;

    if let Some(comment) = options.comment {
        markers::insert_segment(&mut buffer, markers::COM, comment.as_bytes())?;
    }
    Ok(buffer)
}
