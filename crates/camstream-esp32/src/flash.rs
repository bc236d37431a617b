//! Flash LED pin driver.

use camstream_core::Lamp;
use esp_idf_svc::hal::gpio::{Gpio4, Output, PinDriver};
use esp_idf_svc::sys::EspError;

/// The onboard flash LED on the AI-Thinker board, wired to GPIO 4.
///
/// Initialized low so the LED stays off across resets.
pub struct FlashLed {
    pin: PinDriver<'static, Gpio4, Output>,
}

impl FlashLed {
    pub fn new(gpio4: Gpio4) -> Result<Self, EspError> {
        let mut pin = PinDriver::output(gpio4)?;
        pin.set_low()?;
        Ok(Self { pin })
    }
}

impl Lamp for FlashLed {
    type Error = EspError;

    fn set(&mut self, on: bool) -> Result<(), EspError> {
        if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}
