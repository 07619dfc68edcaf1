//! The image handle: open, configure, decode, process, encode.
//!
//! A handle moves through [`Stage`]s in one direction only:
//!
//! ```text
//! Opened ──decode──> Decoded ──downsample/crop──> Processed ──encode──> Finalized
//!    └───────────────────────────encode/trim──────────────────────────────┘
//! ```
//!
//! Decode-time configuration (size, bounds, colorspace, quality, comment,
//! thumbnail tags) is accepted only while the handle is `Opened` and is
//! rejected with [`ThumbError::AlreadyDecoded`] afterwards. A handle encodes
//! once; a second [`encode`](ImageHandle::encode) or
//! [`trim`](ImageHandle::trim) fails with [`ThumbError::AlreadyEncoded`].
//! The decoded pixels stay readable after the encode.

use std::path::Path;
use std::time::UNIX_EPOCH;

use tracing::{debug, trace};

use crate::codec::{self, EncodeOptions};
use crate::colorspace::Colorspace;
use crate::extract::{self, PixelBuffer};
use crate::markers::COM;
use crate::memfile::{Destination, MemorySink, Source};
use crate::rect::Rect;
use crate::scale::plan_scale;
use crate::scanline::Scanlines;
use crate::thumbinfo::{MIMETYPE_JPEG, ThumbnailInfo};
use crate::{ThumbError, ThumbResult};

/// Quality used when none is set.
pub const DEFAULT_QUALITY: u8 = 75;

/// Lifecycle stage of an [`ImageHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Header read, no pixels.
    Opened,
    /// Pixels decoded at the planned or full resolution.
    Decoded,
    /// Pixels scaled to the target or cropped.
    Processed,
    /// Encoded to the destination. Pixels remain readable.
    Finalized,
}

/// An opened JPEG.
///
/// # Example
///
/// ```rust,no_run
/// use jpegthumb::ImageHandle;
///
/// let mut img = ImageHandle::open_from_file("photo.jpg")?;
/// img.set_decode_size(128, 96)?;
/// img.set_quality(85)?;
/// img.set_output_file(Some("thumb.jpg".as_ref()))?;
/// img.encode()?;
/// # Ok::<(), jpegthumb::ThumbError>(())
/// ```
#[derive(Debug)]
pub struct ImageHandle {
    source: Source,
    width: u32,
    height: u32,
    native: Colorspace,
    colorspace: Colorspace,
    bounds: Rect,
    quality: u8,
    comment_in: Option<String>,
    comment_out: Option<String>,
    thumb_in: ThumbnailInfo,
    thumb_out: bool,
    destination: Option<Destination>,
    lines: Option<Scanlines>,
    decoded: Option<(u32, u32)>,
    scale: u32,
    stage: Stage,
}

impl ImageHandle {
    /// Opens a JPEG file and reads its header.
    pub fn open_from_file(path: impl AsRef<Path>) -> ThumbResult<Self> {
        Self::open(Source::from_file(path.as_ref())?)
    }

    /// Opens a JPEG held in memory. The bytes are copied.
    pub fn open_from_memory(data: &[u8]) -> ThumbResult<Self> {
        Self::open(Source::from_memory(data))
    }

    fn open(source: Source) -> ThumbResult<Self> {
        let header = codec::read_header(source.reader(), source.bytes())?;
        if header.width <= 1 || header.height <= 1 {
            return Err(ThumbError::OpenFailed(format!(
                "degenerate dimensions {}x{}",
                header.width, header.height
            )));
        }

        let comment_in = header
            .segments
            .iter()
            .find(|s| s.marker == COM)
            .map(|s| String::from_utf8_lossy(&s.data).into_owned());
        let thumb_in = ThumbnailInfo::parse(&header.segments);

        debug!(
            width = header.width,
            height = header.height,
            native = %header.native,
            segments = header.segments.len(),
            "opened"
        );

        Ok(Self {
            source,
            width: header.width,
            height: header.height,
            native: header.native,
            colorspace: header.native,
            bounds: Rect::from_size(header.width, header.height),
            quality: DEFAULT_QUALITY,
            comment_in,
            comment_out: None,
            thumb_in,
            thumb_out: false,
            destination: None,
            lines: None,
            decoded: None,
            scale: 1,
            stage: Stage::Opened,
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Width and height from the header.
    pub fn original_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Colorspace the JPEG is stored in.
    pub fn native_colorspace(&self) -> Colorspace {
        self.native
    }

    /// Colorspace pixels are decoded and extracted in.
    pub fn output_colorspace(&self) -> Colorspace {
        self.colorspace
    }

    /// Target rectangle: size for thumbnails, position and size for trims.
    pub fn decode_bounds(&self) -> Rect {
        self.bounds
    }

    /// Encode quality.
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Current lifecycle stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Comment read from the file.
    pub fn comment(&self) -> Option<&str> {
        self.comment_in.as_deref()
    }

    /// Thumbnail tags found in the file at open time.
    pub fn thumbnail_info(&self) -> &ThumbnailInfo {
        &self.thumb_in
    }

    /// DCT scale denominator the thumbnail decode will use.
    pub fn planned_scale(&self) -> u32 {
        plan_scale(self.width, self.height, self.bounds.width, self.bounds.height)
    }

    /// Size the codec decoded to, once decoded.
    pub fn decoded_size(&self) -> Option<(u32, u32)> {
        self.decoded
    }

    // ========================================================================
    // Decode-time configuration
    // ========================================================================

    fn configurable(&self) -> ThumbResult<()> {
        match self.stage {
            Stage::Opened => Ok(()),
            _ => Err(ThumbError::AlreadyDecoded),
        }
    }

    /// Sets the thumbnail size, clamped to `[1, original]` on each axis.
    pub fn set_decode_size(&mut self, width: u32, height: u32) -> ThumbResult<()> {
        self.configurable()?;
        self.bounds.width = width.clamp(1, self.width);
        self.bounds.height = height.clamp(1, self.height);
        trace!(width = self.bounds.width, height = self.bounds.height, "decode size");
        Ok(())
    }

    /// Sets the trim rectangle.
    ///
    /// `x` and `y` are clamped to the image, `width` and `height` to
    /// `[1, original]` and then to what remains right of `x` and below `y`.
    pub fn set_decode_bounds(&mut self, x: i32, y: i32, width: u32, height: u32) -> ThumbResult<()> {
        self.configurable()?;
        let x = x.clamp(0, self.width as i32 - 1);
        let y = y.clamp(0, self.height as i32 - 1);
        let width = width.clamp(1, self.width).min(self.width - x as u32);
        let height = height.clamp(1, self.height).min(self.height - y as u32);
        self.bounds = Rect::new(x, y, width, height);
        trace!(bounds = ?self.bounds, "decode bounds");
        Ok(())
    }

    /// Sets the colorspace pixels are decoded and extracted in.
    pub fn set_output_colorspace(&mut self, colorspace: Colorspace) -> ThumbResult<()> {
        self.configurable()?;
        self.colorspace = colorspace;
        Ok(())
    }

    /// Sets the encode quality; values above 100 are clamped.
    pub fn set_quality(&mut self, quality: u8) -> ThumbResult<()> {
        self.configurable()?;
        self.quality = quality.min(100);
        Ok(())
    }

    /// Sets or clears the comment written on encode. The source comment is
    /// not carried over.
    pub fn set_comment(&mut self, comment: Option<&str>) -> ThumbResult<()> {
        self.configurable()?;
        self.comment_out = comment.map(str::to_owned);
        Ok(())
    }

    /// Enables writing thumbnail tags on encode.
    pub fn enable_thumbnail_info(&mut self, enable: bool) -> ThumbResult<()> {
        self.configurable()?;
        self.thumb_out = enable;
        Ok(())
    }

    // ========================================================================
    // Destination
    // ========================================================================

    fn encodable(&self) -> ThumbResult<()> {
        match self.stage {
            Stage::Finalized => Err(ThumbError::AlreadyEncoded),
            _ => Ok(()),
        }
    }

    /// Encodes to `path`, created when the encode runs. `None` clears the
    /// destination.
    pub fn set_output_file(&mut self, path: Option<&Path>) -> ThumbResult<()> {
        self.encodable()?;
        self.destination = path.map(|p| Destination::File(p.to_path_buf()));
        Ok(())
    }

    /// Encodes to memory; the encoded bytes appear in the returned sink.
    pub fn set_output_memory(&mut self) -> ThumbResult<MemorySink> {
        self.encodable()?;
        let sink = MemorySink::new();
        self.destination = Some(Destination::Memory(sink.clone()));
        Ok(sink)
    }

    // ========================================================================
    // Decode and processing
    // ========================================================================

    /// Returns the scanlines, decoding at `1/scale` first if needed.
    fn decoded_lines(&mut self, scale: u32) -> ThumbResult<&mut Scanlines> {
        let lines = match self.lines.take() {
            Some(lines) => lines,
            None => {
                let lines = codec::decode(self.source.bytes(), scale, self.colorspace.decode_space())?;
                self.decoded = Some((lines.width(), lines.height()));
                self.scale = scale;
                self.stage = Stage::Decoded;
                lines
            }
        };
        Ok(self.lines.insert(lines))
    }

    fn mark_processed(&mut self, what: &str) {
        if self.stage == Stage::Decoded {
            self.stage = Stage::Processed;
        }
        debug!(
            op = what,
            width = self.bounds.width,
            height = self.bounds.height,
            "processed"
        );
    }

    /// Decodes for a thumbnail at the planned scale. Does nothing once
    /// decoded.
    pub fn decode(&mut self) -> ThumbResult<()> {
        let scale = self.planned_scale();
        self.decoded_lines(scale).map(|_| ())
    }

    /// Decodes if needed and scales to the target size.
    fn thumbnail_lines(&mut self) -> ThumbResult<&Scanlines> {
        let scale = self.planned_scale();
        let (w, h) = (self.bounds.width, self.bounds.height);
        if self.decoded_lines(scale)?.downsample(w, h) {
            self.mark_processed("downsample");
        }
        self.lines
            .as_ref()
            .ok_or_else(|| ThumbError::DecodeFailed("no pixel buffer".into()))
    }

    // ========================================================================
    // Pixel extraction
    // ========================================================================

    /// Copies a rectangle of the thumbnail in the output colorspace.
    ///
    /// Decodes and scales first if needed. Coordinates are in thumbnail
    /// space; parts of the rectangle outside the image are zero.
    pub fn extract_pixels(&mut self, x: i32, y: i32, width: u32, height: u32) -> ThumbResult<PixelBuffer> {
        let colorspace = self.colorspace;
        let lines = self.thumbnail_lines()?;
        extract::extract(lines, Rect::new(x, y, width, height), colorspace)
    }

    /// Copies a rectangle of the thumbnail as RGB8, whatever the output
    /// colorspace.
    pub fn extract_rgb8(&mut self, x: i32, y: i32, width: u32, height: u32) -> ThumbResult<PixelBuffer> {
        let lines = self.thumbnail_lines()?;
        extract::extract_rgb8(lines, Rect::new(x, y, width, height))
    }

    // ========================================================================
    // Encode
    // ========================================================================

    /// Tags written for this image on encode.
    fn outgoing_thumbnail_info(&self) -> ThumbnailInfo {
        let mut info = ThumbnailInfo {
            width: self.width,
            height: self.height,
            mimetype: Some(MIMETYPE_JPEG.to_string()),
            ..Default::default()
        };
        if let Some(path) = self.source.path() {
            info.uri = std::fs::canonicalize(path)
                .ok()
                .and_then(|abs| url::Url::from_file_path(abs).ok())
                .map(String::from);
            info.mtime = std::fs::metadata(path)
                .and_then(|m| m.modified())
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map_or(0, |d| d.as_secs());
        }
        info
    }

    fn write_out(&mut self) -> ThumbResult<()> {
        let destination = self
            .destination
            .as_ref()
            .ok_or_else(|| ThumbError::EncodeFailed("no output destination set".into()))?;
        let lines = self
            .lines
            .as_ref()
            .ok_or_else(|| ThumbError::EncodeFailed("nothing decoded".into()))?;

        let app7 = if self.thumb_out {
            self.outgoing_thumbnail_info().to_payloads()
        } else {
            Vec::new()
        };
        let bytes = codec::encode(
            lines,
            &EncodeOptions {
                quality: self.quality,
                app7: &app7,
                comment: self.comment_out.as_deref(),
            },
        )?;
        destination.deliver(&bytes)?;

        debug!(
            bytes = bytes.len(),
            width = lines.width(),
            height = lines.height(),
            "encoded"
        );
        self.stage = Stage::Finalized;
        Ok(())
    }

    /// Encodes a thumbnail of the decode size to the destination.
    ///
    /// Decodes at the planned scale if needed, then scales to the exact
    /// target size.
    pub fn encode(&mut self) -> ThumbResult<()> {
        self.encodable()?;
        self.thumbnail_lines()?;
        self.write_out()
    }

    /// Encodes the decode-bounds rectangle at full resolution.
    ///
    /// Fails with [`ThumbError::AlreadyDecoded`] if pixels were decoded at
    /// reduced scale or already processed.
    pub fn trim(&mut self) -> ThumbResult<()> {
        self.encodable()?;
        if let Some(lines) = &self.lines {
            if self.scale != 1 || lines.is_processed() {
                return Err(ThumbError::AlreadyDecoded);
            }
        }

        let rect = self.bounds;
        if self.decoded_lines(1)?.crop(rect) {
            self.mark_processed("crop");
        }
        self.write_out()
    }

    /// Releases the handle and its pixels.
    pub fn close(self) {
        trace!(stage = ?self.stage, "closed");
    }
}
