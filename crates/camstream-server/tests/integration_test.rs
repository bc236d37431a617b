//! End-to-end handler tests over scripted frame sources and sinks.
//!
//! These exercise the two invariants that matter on the device: every
//! acquired frame buffer is released on every exit path, and the stream
//! bytes match the multipart wire format exactly.

use pretty_assertions::assert_eq;

use camstream_core::{FrameError, FrameSource};
use camstream_protocol::{BOUNDARY_LINE, MAX_PART_LEN};
use camstream_server::{capture_jpeg, run_stream, CaptureError, Disconnected, FrameSink, StreamEnd};

/// Frame source that plays back a script of frames and acquisition
/// failures while counting acquires and releases.
struct ScriptedSource {
    script: Vec<Result<Vec<u8>, FrameError>>,
    acquired: usize,
    released: usize,
}

impl ScriptedSource {
    fn new(script: Vec<Result<Vec<u8>, FrameError>>) -> Self {
        Self {
            script,
            acquired: 0,
            released: 0,
        }
    }

    fn frames(frames: &[&[u8]]) -> Self {
        Self::new(frames.iter().map(|f| Ok(f.to_vec())).collect())
    }
}

impl FrameSource for ScriptedSource {
    type Frame = Vec<u8>;

    fn acquire(&mut self) -> Result<Vec<u8>, FrameError> {
        if self.script.is_empty() {
            // A drained script behaves like an exhausted buffer pool.
            return Err(FrameError::Unavailable);
        }
        let frame = self.script.remove(0)?;
        self.acquired += 1;
        Ok(frame)
    }

    fn release(&mut self, frame: Vec<u8>) {
        self.released += 1;
        drop(frame);
    }
}

/// Sink that records everything and starts failing at a given write call.
struct FlakySink {
    bytes: Vec<u8>,
    writes: usize,
    fail_from_write: Option<usize>,
}

impl FlakySink {
    fn reliable() -> Self {
        Self {
            bytes: Vec::new(),
            writes: 0,
            fail_from_write: None,
        }
    }

    /// Fail every write starting with the `n`-th (1-based).
    fn failing_from(n: usize) -> Self {
        Self {
            bytes: Vec::new(),
            writes: 0,
            fail_from_write: Some(n),
        }
    }
}

impl FrameSink for FlakySink {
    fn write_frame_bytes(&mut self, buf: &[u8]) -> Result<(), Disconnected> {
        self.writes += 1;
        if let Some(n) = self.fail_from_write {
            if self.writes >= n {
                return Err(Disconnected);
            }
        }
        self.bytes.extend_from_slice(buf);
        Ok(())
    }
}

/// Expected on-wire bytes for a sequence of complete frames.
fn expected_stream(frames: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    for frame in frames {
        out.extend_from_slice(BOUNDARY_LINE.as_bytes());
        out.extend_from_slice(
            format!(
                "Content-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
                frame.len()
            )
            .as_bytes(),
        );
        out.extend_from_slice(frame);
    }
    out
}

// Three small stand-in JPEG payloads of distinct lengths.
const JPEG_A: &[u8] = b"\xFF\xD8aaaa\xFF\xD9";
const JPEG_B: &[u8] = b"\xFF\xD8bbbbbbbbbb\xFF\xD9";
const JPEG_C: &[u8] = b"\xFF\xD8cc\xFF\xD9";

// Writes per frame: boundary line, part header, payload.
const WRITES_PER_FRAME: usize = 3;

#[test]
fn stream_bytes_match_the_wire_format_exactly() {
    let mut source = ScriptedSource::frames(&[JPEG_A, JPEG_B, JPEG_C]);
    let mut sink = FlakySink::reliable();

    let end = run_stream(&mut source, &mut sink);

    assert_eq!(end.frames_sent(), 3);
    assert_eq!(sink.bytes, expected_stream(&[JPEG_A, JPEG_B, JPEG_C]));
}

#[test]
fn stream_releases_every_frame_and_ends_on_pool_exhaustion() {
    let mut source = ScriptedSource::frames(&[JPEG_A, JPEG_B]);
    let mut sink = FlakySink::reliable();

    let end = run_stream(&mut source, &mut sink);

    assert_eq!(
        end,
        StreamEnd::CaptureFailed {
            error: FrameError::Unavailable,
            frames_sent: 2,
        }
    );
    assert_eq!(source.acquired, 2);
    assert_eq!(source.released, 2);
}

#[test]
fn hardware_fault_mid_stream_ends_the_session_without_retry() {
    let mut source = ScriptedSource::new(vec![
        Ok(JPEG_A.to_vec()),
        Err(FrameError::Fault(0x105)),
        Ok(JPEG_B.to_vec()),
    ]);
    let mut sink = FlakySink::reliable();

    let end = run_stream(&mut source, &mut sink);

    assert_eq!(
        end,
        StreamEnd::CaptureFailed {
            error: FrameError::Fault(0x105),
            frames_sent: 1,
        }
    );
    // The fault consumed the script entry but never handed out a buffer.
    assert_eq!(source.acquired, 1);
    assert_eq!(source.released, 1);
    assert_eq!(sink.bytes, expected_stream(&[JPEG_A]));
}

#[test]
fn write_failure_on_the_third_frame_stops_after_two_complete_frames() {
    let mut source = ScriptedSource::frames(&[JPEG_A, JPEG_B, JPEG_C, JPEG_A, JPEG_B]);
    // First write of frame 3 fails.
    let mut sink = FlakySink::failing_from(2 * WRITES_PER_FRAME + 1);

    let end = run_stream(&mut source, &mut sink);

    assert_eq!(end, StreamEnd::Disconnected { frames_sent: 2 });
    // Frame 3 was acquired and must still have been released.
    assert_eq!(source.acquired, 3);
    assert_eq!(source.released, 3);
    assert_eq!(sink.bytes, expected_stream(&[JPEG_A, JPEG_B]));
}

#[test]
fn write_failure_mid_payload_still_releases_that_frame() {
    let mut source = ScriptedSource::frames(&[JPEG_A, JPEG_B, JPEG_C]);
    // Boundary and header of frame 3 go through; its payload write fails.
    let mut sink = FlakySink::failing_from(3 * WRITES_PER_FRAME);

    let end = run_stream(&mut source, &mut sink);

    assert_eq!(end, StreamEnd::Disconnected { frames_sent: 2 });
    assert_eq!(source.acquired, 3);
    assert_eq!(source.released, 3);
}

#[test]
fn oversized_frame_is_refused_and_released() {
    let huge = vec![0u8; MAX_PART_LEN + 1];
    let mut source = ScriptedSource::new(vec![Ok(JPEG_A.to_vec()), Ok(huge)]);
    let mut sink = FlakySink::reliable();

    let end = run_stream(&mut source, &mut sink);

    assert!(matches!(
        end,
        StreamEnd::OversizedFrame { frames_sent: 1, .. }
    ));
    assert_eq!(source.acquired, 2);
    assert_eq!(source.released, 2);
    // Nothing of the refused part reached the wire.
    assert_eq!(sink.bytes, expected_stream(&[JPEG_A]));
}

#[test]
fn capture_serves_one_frame_and_releases_it() {
    let mut source = ScriptedSource::frames(&[JPEG_A]);
    let mut body = Vec::new();

    let len = capture_jpeg(&mut source, |len| {
        assert_eq!(len, JPEG_A.len());
        Ok(&mut body)
    })
    .unwrap();

    assert_eq!(len, JPEG_A.len());
    assert_eq!(body, JPEG_A);
    assert_eq!(source.acquired, 1);
    assert_eq!(source.released, 1);
}

#[test]
fn capture_acquisition_failure_surfaces_with_zero_releases() {
    let mut source = ScriptedSource::new(vec![Err(FrameError::Unavailable)]);
    let mut opened = false;

    let result = capture_jpeg(&mut source, |_len| {
        opened = true;
        Ok(Vec::new())
    });

    assert_eq!(
        result,
        Err(CaptureError::Frame(FrameError::Unavailable))
    );
    assert!(!opened, "sink must not be opened when acquisition fails");
    assert_eq!(source.acquired, 0);
    assert_eq!(source.released, 0);
}

#[test]
fn capture_write_failure_still_releases_the_frame() {
    let mut source = ScriptedSource::frames(&[JPEG_B]);

    let result = capture_jpeg(&mut source, |_len| {
        Ok(FlakySink::failing_from(1))
    });

    assert_eq!(result, Err(CaptureError::Disconnected));
    assert_eq!(source.acquired, 1);
    assert_eq!(source.released, 1);
}

#[test]
fn capture_response_open_failure_still_releases_the_frame() {
    let mut source = ScriptedSource::frames(&[JPEG_C]);

    let result: Result<usize, CaptureError> =
        capture_jpeg(&mut source, |_len| Err::<Vec<u8>, _>(Disconnected));

    assert_eq!(result, Err(CaptureError::Disconnected));
    assert_eq!(source.acquired, 1);
    assert_eq!(source.released, 1);
}
