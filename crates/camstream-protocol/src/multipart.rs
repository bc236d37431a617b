//! Multipart boundary constants and the per-part header formatter.

use core::fmt::Write as _;
use thiserror::Error;

/// Fixed boundary token separating successive parts.
///
/// Chosen long enough that it cannot occur inside JPEG entropy-coded
/// data; clients key on it from the Content-Type header.
pub const BOUNDARY_TOKEN: &str = "123456789000000000000987654321";

/// Content-Type header value announcing the stream and its boundary.
pub const STREAM_CONTENT_TYPE: &str =
    "multipart/x-mixed-replace;boundary=123456789000000000000987654321";

/// Boundary line written before every part.
pub const BOUNDARY_LINE: &str = "\r\n--123456789000000000000987654321\r\n";

/// Upper bound on a single part's payload length.
///
/// Set an order of magnitude above the largest JPEG the sensor can
/// produce (UXGA at the best quality setting stays under 1 MiB), so a
/// length past it can only come from a corrupted frame descriptor. The
/// formatter refuses such a length rather than emit a header for a
/// payload that cannot be real.
pub const MAX_PART_LEN: usize = 10_000_000;

const HEADER_CAPACITY: usize = 64;

/// Errors from part-header formatting.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MultipartError {
    /// The payload length exceeds [`MAX_PART_LEN`] or would not fit the
    /// fixed header buffer.
    #[error("frame length {0} exceeds the multipart header bound")]
    OversizedFrame(usize),
}

/// One formatted part header: `Content-Type` and `Content-Length`
/// followed by the blank line, ready to write between the boundary line
/// and the payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartHeader {
    buf: heapless::String<HEADER_CAPACITY>,
}

impl PartHeader {
    /// Format the header for a part of `len` payload bytes.
    ///
    /// Rejects lengths over [`MAX_PART_LEN`] instead of truncating; the
    /// fixed-capacity buffer makes overlong output a hard error rather
    /// than an overflow.
    pub fn for_len(len: usize) -> Result<Self, MultipartError> {
        if len > MAX_PART_LEN {
            return Err(MultipartError::OversizedFrame(len));
        }

        let mut buf = heapless::String::new();
        write!(
            buf,
            "Content-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
            len
        )
        .map_err(|_| MultipartError::OversizedFrame(len))?;

        Ok(Self { buf })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_agree_on_the_boundary_token() {
        assert!(STREAM_CONTENT_TYPE.ends_with(BOUNDARY_TOKEN));
        assert_eq!(
            BOUNDARY_LINE,
            format!("\r\n--{}\r\n", BOUNDARY_TOKEN).as_str()
        );
    }

    #[test]
    fn header_matches_wire_format_exactly() {
        let header = PartHeader::for_len(48120).unwrap();
        assert_eq!(
            header.as_str(),
            "Content-Type: image/jpeg\r\nContent-Length: 48120\r\n\r\n"
        );
    }

    #[test]
    fn zero_length_part_is_still_well_formed() {
        let header = PartHeader::for_len(0).unwrap();
        assert_eq!(
            header.as_str(),
            "Content-Type: image/jpeg\r\nContent-Length: 0\r\n\r\n"
        );
    }

    #[test]
    fn largest_allowed_length_fits_the_buffer() {
        let header = PartHeader::for_len(MAX_PART_LEN).unwrap();
        assert!(header.as_str().contains("Content-Length: 10000000\r\n"));
        assert!(header.as_bytes().len() <= HEADER_CAPACITY);
    }

    #[test]
    fn oversized_length_is_rejected_not_truncated() {
        let err = PartHeader::for_len(MAX_PART_LEN + 1).unwrap_err();
        assert_eq!(err, MultipartError::OversizedFrame(MAX_PART_LEN + 1));

        let err = PartHeader::for_len(usize::MAX).unwrap_err();
        assert_eq!(err, MultipartError::OversizedFrame(usize::MAX));
    }
}
