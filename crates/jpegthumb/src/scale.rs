//! Decode-scale planning and nearest-neighbour downscaling.
//!
//! Thumbnailing runs in two steps:
//!
//! 1. [`plan_scale`] picks the coarsest DCT scale `1/s` at which the decoded
//!    image is still at least as large as the target. The codec reconstructs
//!    that reduced image cheaply from a subset of the DCT coefficients.
//! 2. [`downsample`] point-samples the coarse image to the exact target
//!    size. No filtering, no anti-aliasing.
//!
//! The planner is only a speed optimisation; the exact output size is always
//! produced by the second step.

/// Largest DCT scale denominator a decode may request.
pub const MAX_SCALE_DENOM: u32 = 8;

/// Chooses the decode scale denominator for a target size.
///
/// `scale = min(orig_w / target_w, orig_h / target_h)` with integer
/// division, clamped to `1..=8`. A zero target is treated as 1.
///
/// # Example
///
/// ```rust
/// use jpegthumb::scale::plan_scale;
///
/// assert_eq!(plan_scale(100, 100, 10, 10), 8);
/// assert_eq!(plan_scale(640, 480, 160, 160), 3);
/// assert_eq!(plan_scale(50, 50, 50, 50), 1);
/// ```
pub fn plan_scale(orig_w: u32, orig_h: u32, target_w: u32, target_h: u32) -> u32 {
    let scale_w = orig_w / target_w.max(1);
    let scale_h = orig_h / target_h.max(1);
    scale_w.min(scale_h).clamp(1, MAX_SCALE_DENOM)
}

/// Source index sampled for output index `i` when mapping `src` samples
/// onto `dst` samples.
#[inline]
fn source_index(i: usize, src: usize, dst: usize) -> usize {
    i * src / dst
}

/// Nearest-neighbour resize of a contiguous buffer, in place.
///
/// `buf` holds `src_h` rows of `src_w` pixels with `comps` bytes each,
/// tightly packed. On return its first `dst_w * dst_h * comps` bytes hold
/// the resized image, tightly packed; the tail is left as is.
///
/// Output pixel (x, y) copies source pixel
/// `(x * src_w / dst_w, y * src_h / dst_h)`. Both targets must not exceed
/// their sources: writes then proceed in increasing order and never pass
/// the read position, so no scratch buffer is needed.
pub fn downsample(
    buf: &mut [u8],
    src_w: usize,
    src_h: usize,
    comps: usize,
    dst_w: usize,
    dst_h: usize,
) {
    debug_assert!(dst_w <= src_w && dst_h <= src_h);
    debug_assert!(buf.len() >= src_w * src_h * comps);

    for y in 0..dst_h {
        let sy = source_index(y, src_h, dst_h);
        for x in 0..dst_w {
            let sx = source_index(x, src_w, dst_w);
            let from = (sy * src_w + sx) * comps;
            let to = (y * dst_w + x) * comps;
            if from != to {
                buf.copy_within(from..from + comps, to);
            }
        }
    }
}

/// Nearest-neighbour resize into a new buffer.
///
/// Same mapping as [`downsample`], for the case where a target dimension
/// exceeds the decoded one and in-place writing would overtake the reads.
pub fn resample(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    comps: usize,
    dst_w: usize,
    dst_h: usize,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(dst_w * dst_h * comps);
    for y in 0..dst_h {
        let sy = source_index(y, src_h, dst_h);
        for x in 0..dst_w {
            let sx = source_index(x, src_w, dst_w);
            let from = (sy * src_w + sx) * comps;
            out.extend_from_slice(&src[from..from + comps]);
        }
    }
    out
}
