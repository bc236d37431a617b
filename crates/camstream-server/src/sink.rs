//! Transport write abstraction.

use thiserror::Error;

/// The peer closed the connection (or the transport timed out under
/// backpressure). The connection is unusable afterwards; there is
/// nothing to report back to the client.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("client disconnected")]
pub struct Disconnected;

/// Byte sink backing an in-flight HTTP response.
///
/// The embedded HTTP server's response writer implements this on the
/// device; tests use in-memory and failure-injecting sinks.
pub trait FrameSink {
    /// Write the whole buffer or report the peer gone.
    fn write_frame_bytes(&mut self, buf: &[u8]) -> Result<(), Disconnected>;
}

impl FrameSink for Vec<u8> {
    fn write_frame_bytes(&mut self, buf: &[u8]) -> Result<(), Disconnected> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn write_frame_bytes(&mut self, buf: &[u8]) -> Result<(), Disconnected> {
        (**self).write_frame_bytes(buf)
    }
}
