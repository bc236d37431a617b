//! # camstream-server
//!
//! Request-handler logic for the camera web server, written against the
//! [`camstream_core`] traits so it runs identically under the ESP-IDF
//! HTTP server and under host tests.
//!
//! Four handlers exist:
//! - index page (`/`) - static HTML
//! - single capture (`/capture`) - one JPEG frame per request
//! - MJPEG stream (`/stream`, second listener) - frames until disconnect
//! - flash toggle (`/flash`) - flips the LED and reports the new state
//!
//! The platform glue owns routing, status lines, and response headers;
//! this crate owns frame-buffer discipline and the bytes on the wire.

pub mod capture;
pub mod flash;
pub mod page;
pub mod sink;
pub mod stream;

pub use capture::{capture_jpeg, CaptureError};
pub use flash::{toggle_flash, FLASH_OFF, FLASH_ON};
pub use page::index_html;
pub use sink::{Disconnected, FrameSink};
pub use stream::{run_stream, StreamEnd};
