//! Freedesktop.org thumbnail tags.
//!
//! Thumbnails record where they came from in a set of `Thumb::` keys. Each
//! key travels in its own APP7 segment whose payload is the key, a newline,
//! and the value:
//!
//! ```text
//! Thumb::URI\nfile:///home/user/photo.jpg
//! Thumb::MTime\n1700000000
//! Thumb::Image::Width\n4000
//! Thumb::Image::Height\n3000
//! Thumb::Mimetype\nimage/jpeg
//! ```
//!
//! Unknown keys, payloads without a newline and payloads outside the
//! `Thumb::` namespace are ignored.

use crate::markers::{APP7, Segment};

/// Namespace prefix shared by every key.
pub const NAMESPACE: &str = "Thumb::";

/// Mimetype written for every encoded thumbnail.
pub const MIMETYPE_JPEG: &str = "image/jpeg";

const KEY_URI: &str = "Thumb::URI";
const KEY_MTIME: &str = "Thumb::MTime";
const KEY_WIDTH: &str = "Thumb::Image::Width";
const KEY_HEIGHT: &str = "Thumb::Image::Height";
const KEY_MIMETYPE: &str = "Thumb::Mimetype";

/// Thumbnail provenance tags. Absent values are `None` or 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbnailInfo {
    /// `file://` URI of the original image.
    pub uri: Option<String>,
    /// Modification time of the original, seconds since the Unix epoch.
    pub mtime: u64,
    /// Width of the original image.
    pub width: u32,
    /// Height of the original image.
    pub height: u32,
    /// Mimetype of the original image.
    pub mimetype: Option<String>,
}

impl ThumbnailInfo {
    /// Returns `true` if no tag was found.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reads tags from captured header segments; non-APP7 segments are
    /// skipped.
    pub fn parse(segments: &[Segment]) -> Self {
        let mut info = Self::default();
        for seg in segments.iter().filter(|s| s.marker == APP7) {
            info.apply(&seg.data);
        }
        info
    }

    /// Applies one APP7 payload.
    fn apply(&mut self, payload: &[u8]) {
        if !payload.starts_with(NAMESPACE.as_bytes()) {
            return;
        }
        let Some(nl) = payload.iter().position(|&b| b == b'\n') else {
            return;
        };
        let key = String::from_utf8_lossy(&payload[..nl]);
        let value = String::from_utf8_lossy(&payload[nl + 1..]);
        let value = value.trim_end_matches('\0');

        match key.as_ref() {
            KEY_URI => self.uri = Some(value.to_string()),
            KEY_MTIME => self.mtime = leading_number(value),
            KEY_WIDTH => self.width = leading_number(value) as u32,
            KEY_HEIGHT => self.height = leading_number(value) as u32,
            KEY_MIMETYPE => self.mimetype = Some(value.to_string()),
            other => tracing::trace!(key = other, "ignoring thumbnail tag"),
        }
    }

    /// Serializes the present tags, one APP7 payload each.
    ///
    /// URI and MTime are written only when known; width, height and
    /// mimetype always are.
    pub fn to_payloads(&self) -> Vec<Vec<u8>> {
        let mut out = Vec::with_capacity(5);
        let mut push = |key: &str, value: &str| out.push(format!("{key}\n{value}").into_bytes());

        if let Some(uri) = &self.uri {
            push(KEY_URI, uri);
        }
        if self.mtime != 0 {
            push(KEY_MTIME, &self.mtime.to_string());
        }
        push(KEY_WIDTH, &self.width.to_string());
        push(KEY_HEIGHT, &self.height.to_string());
        push(KEY_MIMETYPE, self.mimetype.as_deref().unwrap_or(MIMETYPE_JPEG));
        out
    }
}

/// Parses the leading decimal digits of `s`, 0 if there are none.
fn leading_number(s: &str) -> u64 {
    let s = s.trim_start();
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    s[..digits].parse().unwrap_or(0)
}
