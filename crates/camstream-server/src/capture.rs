//! Single-frame capture handler.

use camstream_core::{FrameError, FrameSource};
use thiserror::Error;

use crate::sink::{Disconnected, FrameSink};

/// Why a capture request produced no image.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// Frame acquisition failed; nothing was written and nothing needs
    /// releasing. The glue maps this to a 500 response.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The frame was acquired (and released) but the client went away
    /// before the bytes were delivered.
    #[error("client disconnected during capture write")]
    Disconnected,
}

/// Serve one JPEG frame: exactly one acquire, no retry.
///
/// `open_sink` receives the frame length so the glue can emit a
/// Content-Length header before the body; it runs only after a frame was
/// acquired. The frame is released whether or not the write succeeds.
///
/// Returns the number of payload bytes on success.
pub fn capture_jpeg<S, W, F>(source: &mut S, open_sink: F) -> Result<usize, CaptureError>
where
    S: FrameSource,
    W: FrameSink,
    F: FnOnce(usize) -> Result<W, Disconnected>,
{
    let frame = source.acquire()?;

    let len = frame.as_ref().len();
    let written = open_sink(len).and_then(|mut sink| sink.write_frame_bytes(frame.as_ref()));
    source.release(frame);

    written.map_err(|_| CaptureError::Disconnected)?;
    Ok(len)
}
