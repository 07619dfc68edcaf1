//! Thumbnail command
//!
//! Decodes at the coarsest DCT scale that covers the target, scales to the
//! exact size and encodes.

use crate::ThumbArgs;
use anyhow::{Context, Result, bail};
use tracing::{debug, info, trace};

pub fn run(args: ThumbArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "thumb::run");
    let mut img = super::open_image(&args.input)?;
    let (src_w, src_h) = img.original_size();

    let (dst_w, dst_h) = match (args.max, args.width, args.height) {
        (Some(m), _, _) => super::fit_longest(src_w, src_h, m),
        (None, Some(w), Some(h)) if args.preserve => super::fit_inside(src_w, src_h, w, h),
        (None, Some(w), Some(h)) => (w, h),
        (None, Some(w), None) => super::fit_inside(src_w, src_h, w, u32::MAX),
        (None, None, Some(h)) => super::fit_inside(src_w, src_h, u32::MAX, h),
        (None, None, None) => bail!("Specify --max, --width or --height"),
    };

    img.set_decode_size(dst_w, dst_h)?;
    img.set_quality(args.quality)?;
    img.set_comment(args.comment.as_deref())?;
    img.enable_thumbnail_info(args.thumb_meta)?;
    img.set_output_file(Some(args.output.as_path()))?;
    debug!(scale = img.planned_scale(), "planned");

    let bounds = img.decode_bounds();
    if verbose > 0 {
        println!(
            "Thumbnail {}x{} -> {}x{} (1/{} decode)",
            src_w,
            src_h,
            bounds.width,
            bounds.height,
            img.planned_scale()
        );
    }

    img.encode()
        .with_context(|| format!("Failed to write: {}", args.output.display()))?;
    info!(output = %args.output.display(), "thumbnail written");
    img.close();

    if verbose > 0 {
        println!("Done.");
    }
    Ok(())
}
