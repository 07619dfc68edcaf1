//! Trim command
//!
//! Crops a rectangle out of the full-resolution image and encodes it.

use crate::TrimArgs;
use anyhow::{Context, Result};
use tracing::{info, trace};

pub fn run(args: TrimArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "trim::run");
    let mut img = super::open_image(&args.input)?;
    let (src_w, src_h) = img.original_size();

    let w = args.width.unwrap_or(src_w);
    let h = args.height.unwrap_or(src_h);
    img.set_decode_bounds(args.x, args.y, w, h)?;
    img.set_quality(args.quality)?;
    img.set_comment(args.comment.as_deref())?;
    img.set_output_file(Some(args.output.as_path()))?;

    let r = img.decode_bounds();
    if verbose > 0 {
        println!("Trim {}x{} at ({}, {}) from {}x{}", r.width, r.height, r.x, r.y, src_w, src_h);
    }

    img.trim()
        .with_context(|| format!("Failed to write: {}", args.output.display()))?;
    info!(output = %args.output.display(), "trim written");
    Ok(())
}
