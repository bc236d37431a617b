//! Frame buffer acquisition contract.
//!
//! The camera driver hands out JPEG-encoded frame buffers from a small
//! internal pool. A buffer is exclusively owned by the caller from the
//! moment `acquire` succeeds until it is handed back via `release`; a
//! leaked buffer exhausts the pool and stalls every future acquisition.
//!
//! Handlers must therefore release every acquired frame on every exit
//! path - success, partial write, or loop termination - before returning.

use thiserror::Error;

/// Errors reported by a frame source on acquisition.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The driver had no frame buffer to hand out (pool exhausted or
    /// capture not ready).
    #[error("no frame buffer available")]
    Unavailable,

    /// The sensor or capture pipeline reported a hardware fault.
    #[error("camera fault (esp_err {0})")]
    Fault(i32),
}

/// A source of JPEG-encoded frames with explicit buffer ownership.
///
/// `acquire` transfers ownership of one frame to the caller; `release`
/// transfers it back. Implementations where the frame type returns its
/// buffer to the pool on drop can rely on the default `release`.
pub trait FrameSource {
    /// One acquired frame; `as_ref()` yields the JPEG bytes.
    type Frame: AsRef<[u8]>;

    /// Acquire the next frame, or fail without side effects.
    fn acquire(&mut self) -> Result<Self::Frame, FrameError>;

    /// Return a frame to the source's buffer pool.
    fn release(&mut self, frame: Self::Frame) {
        drop(frame);
    }
}
