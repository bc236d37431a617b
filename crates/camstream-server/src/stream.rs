//! MJPEG stream handler.
//!
//! One long-lived connection, one loop: acquire a frame, write boundary +
//! part header + payload, release, repeat. The client has no stop
//! message; closing the connection surfaces as a write failure and ends
//! the session. Sending is the only steady state.

use camstream_core::{FrameError, FrameSource};
use camstream_protocol::{MultipartError, PartHeader, BOUNDARY_LINE};
use log::{info, warn};

use crate::sink::FrameSink;

/// Why a stream session ended, with the number of complete frames that
/// were delivered before it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// Frame acquisition failed. Fatal for the session: the protocol
    /// gives the client no way to resume mid-part, so there is no retry.
    CaptureFailed {
        error: FrameError,
        frames_sent: u64,
    },

    /// A frame reported a length the part header formatter refuses.
    /// The frame was released; the session cannot continue coherently.
    OversizedFrame {
        error: MultipartError,
        frames_sent: u64,
    },

    /// The peer disconnected (observed as a write failure). This is the
    /// normal way every stream ends.
    Disconnected { frames_sent: u64 },
}

impl StreamEnd {
    pub fn frames_sent(&self) -> u64 {
        match *self {
            StreamEnd::CaptureFailed { frames_sent, .. }
            | StreamEnd::OversizedFrame { frames_sent, .. }
            | StreamEnd::Disconnected { frames_sent } => frames_sent,
        }
    }
}

/// Run the stream loop until the session ends.
///
/// Every acquired frame is released before the next iteration, including
/// on the partial-write path. The caller has already sent the
/// `multipart/x-mixed-replace` response headers.
pub fn run_stream<S, W>(source: &mut S, sink: &mut W) -> StreamEnd
where
    S: FrameSource,
    W: FrameSink,
{
    let mut frames_sent: u64 = 0;

    loop {
        let frame = match source.acquire() {
            Ok(frame) => frame,
            Err(error) => {
                warn!("stream: frame acquisition failed: {error}");
                return StreamEnd::CaptureFailed { error, frames_sent };
            }
        };

        let len = frame.as_ref().len();
        let header = match PartHeader::for_len(len) {
            Ok(header) => header,
            Err(error) => {
                source.release(frame);
                warn!("stream: {error}");
                return StreamEnd::OversizedFrame { error, frames_sent };
            }
        };

        let written = sink
            .write_frame_bytes(BOUNDARY_LINE.as_bytes())
            .and_then(|()| sink.write_frame_bytes(header.as_bytes()))
            .and_then(|()| sink.write_frame_bytes(frame.as_ref()));
        source.release(frame);

        match written {
            Ok(()) => frames_sent += 1,
            Err(_) => {
                info!("stream: client disconnected after {frames_sent} frames");
                return StreamEnd::Disconnected { frames_sent };
            }
        }
    }
}
