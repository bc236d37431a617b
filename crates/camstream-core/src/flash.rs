//! Flash LED state.
//!
//! The flash state is a single process-wide boolean, flipped by the
//! `/flash` handler and never persisted. The cell is an atomic so that
//! concurrent toggles serialize into coherent flips instead of racing on
//! a bare global.

use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide flash LED state cell.
///
/// Starts off. `toggle` is the only mutation; reads are for reporting.
#[derive(Debug, Default)]
pub struct FlashState(AtomicBool);

impl FlashState {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Flip the state and return the new value.
    pub fn toggle(&self) -> bool {
        // fetch_xor returns the previous value; the flag carries no
        // ordering dependencies with other data.
        !self.0.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn is_on(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A digital output that can be driven high or low.
///
/// The ESP32 target implements this over the flash LED pin; tests use a
/// recording fake.
pub trait Lamp {
    type Error;

    /// Drive the output to the given level.
    fn set(&mut self, on: bool) -> Result<(), Self::Error>;
}
