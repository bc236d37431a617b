//! Flash LED toggle handler.

use camstream_core::{FlashState, Lamp};

pub const FLASH_ON: &str = "Flash ON";
pub const FLASH_OFF: &str = "Flash OFF";

/// Flip the flash state, drive the lamp to match, and report the new
/// state as the plaintext response body.
///
/// The state cell flips before the pin is driven; a pin error leaves the
/// cell at its new value (state records intent) and is surfaced for the
/// caller to log and map to an error response. Each call is a toggle,
/// not a set: two calls return to the original state.
pub fn toggle_flash<L: Lamp>(state: &FlashState, lamp: &mut L) -> Result<&'static str, L::Error> {
    let on = state.toggle();
    lamp.set(on)?;
    Ok(if on { FLASH_ON } else { FLASH_OFF })
}
