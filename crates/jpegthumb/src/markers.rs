//! JPEG marker segments.
//!
//! The decoder crate does not surface comment or APPn payloads, so the
//! header segments are walked here: every segment between SOI and SOS is a
//! marker byte plus a big-endian length that counts itself.

use crate::{ThumbError, ThumbResult};

/// Start of image.
pub const SOI: u8 = 0xD8;
/// End of image.
pub const EOI: u8 = 0xD9;
/// Start of scan; header segments end here.
pub const SOS: u8 = 0xDA;
/// JFIF application segment.
pub const APP0: u8 = 0xE0;
/// Application segment carrying `Thumb::` tags.
pub const APP7: u8 = 0xE7;
/// Comment segment.
pub const COM: u8 = 0xFE;

/// Bytes of each APP7 payload kept when scanning. Comments are kept whole.
pub const APP7_CAPTURE_LIMIT: usize = 1024;

/// Largest payload a segment can carry (length field minus itself).
pub const MAX_PAYLOAD: usize = u16::MAX as usize - 2;

/// A captured marker segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Marker code (the byte after 0xFF).
    pub marker: u8,
    /// Payload, without marker and length.
    pub data: Vec<u8>,
}

/// Collects the COM and APP7 segments of a JPEG header, in file order.
///
/// Stops at SOS, EOI, or the first malformed length; whatever was captured
/// up to that point is returned.
pub fn scan(data: &[u8]) -> Vec<Segment> {
    let mut found = Vec::new();
    if data.len() < 2 || data[0] != 0xFF || data[1] != SOI {
        return found;
    }

    let mut pos = 2usize;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        // Fill bytes
        while pos < data.len() && data[pos] == 0xFF {
            pos += 1;
        }
        if pos >= data.len() {
            break;
        }

        let marker = data[pos];
        pos += 1;

        if marker == EOI || marker == SOS {
            break;
        }
        // Standalone markers carry no length
        if (0xD0..=0xD7).contains(&marker) || marker == 0x01 {
            continue;
        }

        if pos + 2 > data.len() {
            break;
        }
        let seg_len = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        pos += 2;
        if seg_len < 2 || pos + seg_len - 2 > data.len() {
            break;
        }
        let payload = &data[pos..pos + seg_len - 2];

        match marker {
            COM => {
                tracing::trace!(len = payload.len(), "COM segment");
                found.push(Segment {
                    marker,
                    data: payload.to_vec(),
                });
            }
            APP7 => {
                let kept = payload.len().min(APP7_CAPTURE_LIMIT);
                tracing::trace!(len = payload.len(), kept, "APP7 segment");
                found.push(Segment {
                    marker,
                    data: payload[..kept].to_vec(),
                });
            }
            _ => {}
        }
        pos += seg_len - 2;
    }

    found
}

/// Splices a segment into an encoded JPEG, right after SOI and the JFIF
/// APP0 segment if one leads.
pub fn insert_segment(jpeg: &mut Vec<u8>, marker: u8, payload: &[u8]) -> ThumbResult<()> {
    if jpeg.len() < 2 || jpeg[0] != 0xFF || jpeg[1] != SOI {
        return Err(ThumbError::EncodeFailed("encoded stream does not start with SOI".into()));
    }
    if payload.len() > MAX_PAYLOAD {
        return Err(ThumbError::EncodeFailed(format!(
            "segment payload of {} bytes exceeds {}",
            payload.len(),
            MAX_PAYLOAD
        )));
    }

    let mut at = 2;
    if jpeg.len() >= 6 && jpeg[2] == 0xFF && jpeg[3] == APP0 {
        let app0_len = u16::from_be_bytes([jpeg[4], jpeg[5]]) as usize;
        if 4 + app0_len <= jpeg.len() {
            at = 4 + app0_len;
        }
    }

    let len = (payload.len() + 2) as u16;
    let mut segment = Vec::with_capacity(payload.len() + 4);
    segment.extend_from_slice(&[0xFF, marker]);
    segment.extend_from_slice(&len.to_be_bytes());
    segment.extend_from_slice(payload);
    jpeg.splice(at..at, segment);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
        let mut v = vec![0xFF, marker];
        v.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        v.extend_from_slice(payload);
        v
    }

    fn header(segments: &[Vec<u8>]) -> Vec<u8> {
        let mut v = vec![0xFF, SOI];
        for s in segments {
            v.extend_from_slice(s);
        }
        v.extend_from_slice(&[0xFF, SOS, 0x00, 0x02, 0xFF, COM]);
        v
    }

    /// Tests capture of COM and APP7 and skipping of everything else.
    #[test]
    fn test_scan_collects_com_and_app7() {
        let data = header(&[
            segment(APP0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0"),
            segment(APP7, b"Thumb::Mimetype\nimage/jpeg"),
            segment(0xE1, b"Exif\0\0"),
            segment(COM, b"hello"),
        ]);
        let found = scan(&data);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].marker, APP7);
        assert_eq!(found[0].data, b"Thumb::Mimetype\nimage/jpeg");
        assert_eq!(found[1], Segment { marker: COM, data: b"hello".to_vec() });
    }

    /// Tests that APP7 is capped and COM is not.
    #[test]
    fn test_scan_capture_limits() {
        let big = vec![b'x'; 4000];
        let data = header(&[segment(APP7, &big), segment(COM, &big)]);
        let found = scan(&data);
        assert_eq!(found[0].data.len(), APP7_CAPTURE_LIMIT);
        assert_eq!(found[1].data.len(), 4000);
    }

    /// Tests truncated and non-JPEG input.
    #[test]
    fn test_scan_malformed() {
        assert!(scan(b"not a jpeg").is_empty());
        assert!(scan(&[0xFF, SOI, 0xFF, COM, 0x00]).is_empty());
        let mut data = header(&[segment(COM, b"ok")]);
        data.truncate(7);
        assert!(scan(&data).is_empty());
    }

    /// Tests placement after the JFIF segment.
    #[test]
    fn test_insert_after_app0() {
        let app0 = segment(APP0, b"JFIF\0");
        let mut data = header(&[app0.clone()]);
        insert_segment(&mut data, COM, b"note").unwrap();
        assert_eq!(&data[2..2 + app0.len()], app0.as_slice());
        assert_eq!(&data[2 + app0.len()..2 + app0.len() + 4], &[0xFF, COM, 0x00, 0x06]);
        assert_eq!(scan(&data), vec![Segment { marker: COM, data: b"note".to_vec() }]);
    }

    /// Tests placement right after SOI, and rejection of bad input.
    #[test]
    fn test_insert_without_app0() {
        let mut data = header(&[]);
        insert_segment(&mut data, APP7, b"x").unwrap();
        assert_eq!(&data[..7], &[0xFF, SOI, 0xFF, APP7, 0x00, 0x03, b'x']);

        let mut bad = vec![0x00, 0x01];
        assert!(insert_segment(&mut bad, COM, b"x").is_err());
        let mut data = header(&[]);
        assert!(insert_segment(&mut data, COM, &vec![0; MAX_PAYLOAD + 1]).is_err());
    }
}
