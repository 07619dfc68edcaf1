//! Pixels command
//!
//! Writes a rectangle of thumbnail pixels to a raw file, tightly packed,
//! in one of the eight pixel formats.

use crate::PixelsArgs;
use anyhow::{Context, Result};
use jpegthumb::Colorspace;
use std::fs;
use tracing::{debug, trace};

pub fn run(args: PixelsArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), "pixels::run");
    let mut img = super::open_image(&args.input)?;
    let (src_w, src_h) = img.original_size();
    let w = args.width.unwrap_or(src_w);
    let h = args.height.unwrap_or(src_h);

    let pixels = if args.rgb {
        img.extract_rgb8(args.x, args.y, w, h)?
    } else {
        let colorspace: Colorspace = args
            .format
            .parse()
            .with_context(|| format!("Unknown pixel format: {}", args.format))?;
        img.set_output_colorspace(colorspace)?;
        img.extract_pixels(args.x, args.y, w, h)?
    };
    debug!(format = %pixels.colorspace, bytes = pixels.byte_len(), "extracted");

    if verbose > 0 {
        println!(
            "{}x{} {} -> {} ({})",
            pixels.width,
            pixels.height,
            pixels.colorspace,
            args.output.display(),
            super::format_size(pixels.byte_len() as u64)
        );
    }

    fs::write(&args.output, pixels.into_bytes())
        .with_context(|| format!("Failed to save: {}", args.output.display()))?;
    Ok(())
}
