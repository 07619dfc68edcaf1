//! # jpegthumb
//!
//! Fast JPEG thumbnails.
//!
//! Opens a JPEG from a file or memory, decodes it at the coarsest DCT scale
//! that still covers the requested size, scales to the exact size by point
//! sampling, and re-encodes. Also crops at full resolution, extracts pixels
//! in eight packed formats, and reads and writes the freedesktop.org
//! `Thumb::` tags and the JPEG comment.
//!
//! # Architecture
//!
//! - [`ImageHandle`] - One opened image and its lifecycle ([`Stage`])
//! - [`scale`] - Scale planner and nearest-neighbour resize
//! - [`markers`] - COM/APP7 segment scanning and splicing
//! - [`thumbinfo`] - `Thumb::` tag parsing and serialization
//! - [`MemorySink`] - Shared in-memory encode destination
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jpegthumb::{Colorspace, ImageHandle};
//!
//! let mut img = ImageHandle::open_from_file("photo.jpg")?;
//! img.set_decode_size(160, 120)?;
//! img.enable_thumbnail_info(true)?;
//! let sink = img.set_output_memory()?;
//! img.encode()?;
//! let jpeg = sink.take();
//!
//! let mut img = ImageHandle::open_from_memory(&jpeg)?;
//! img.set_output_colorspace(Colorspace::Rgba8)?;
//! let pixels = img.extract_pixels(0, 0, 160, 120)?;
//! assert_eq!(pixels.byte_len(), 160 * 120 * 4);
//! # Ok::<(), jpegthumb::ThumbError>(())
//! ```
//!
//! # Dependencies
//!
//! - [`jpeg-decoder`] - JPEG decoding with DCT scaling
//! - [`jpeg-encoder`] - JPEG encoding
//! - [`url`] - `file://` URIs for thumbnail tags

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod codec;
mod colorspace;
mod convert;
mod error;
mod extract;
mod handle;
pub mod markers;
mod memfile;
mod rect;
pub mod scale;
mod scanline;
pub mod thumbinfo;

pub use codec::FULL_CHROMA_QUALITY;
pub use colorspace::{Colorspace, DecodeSpace};
pub use error::{ThumbError, ThumbResult};
pub use extract::{PixelBuffer, PixelData};
pub use handle::{DEFAULT_QUALITY, ImageHandle, Stage};
pub use memfile::MemorySink;
pub use rect::Rect;
pub use thumbinfo::ThumbnailInfo;
