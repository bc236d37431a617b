//! # camstream-protocol
//!
//! Wire format for the MJPEG `multipart/x-mixed-replace` stream.
//!
//! A stream is an unterminated sequence of parts over one connection,
//! each part replacing the previous one for the viewer:
//!
//! ```text
//! \r\n--<boundary>\r\n
//! Content-Type: image/jpeg\r\n
//! Content-Length: <n>\r\n
//! \r\n
//! <n raw JPEG bytes>
//! ```
//!
//! There is no closing delimiter; the stream ends when the connection
//! closes.

pub mod multipart;

pub use multipart::{
    MultipartError, PartHeader, BOUNDARY_LINE, BOUNDARY_TOKEN, MAX_PART_LEN, STREAM_CONTENT_TYPE,
};
