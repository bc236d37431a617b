//! OV2640 camera driver setup and frame buffer ownership.
//!
//! Wraps the `esp32-camera` component. The driver is a process-wide
//! singleton in C; [`Camera`] owns its lifetime and [`FrameGuard`] owns
//! one frame buffer, returning it to the pool on drop so a buffer cannot
//! leak across an error path.

use camstream_core::{CameraConfig, FrameError, FrameSource};
use esp_idf_svc::sys::camera::{
    camera_config_t, camera_fb_location_t_CAMERA_FB_IN_DRAM,
    camera_fb_location_t_CAMERA_FB_IN_PSRAM, camera_fb_t,
    camera_grab_mode_t_CAMERA_GRAB_LATEST, esp_camera_deinit, esp_camera_fb_get,
    esp_camera_fb_return, esp_camera_init, esp_camera_sensor_get,
    framesize_t_FRAMESIZE_UXGA, ledc_channel_t_LEDC_CHANNEL_0, ledc_timer_t_LEDC_TIMER_0,
    pixformat_t_PIXFORMAT_JPEG, sensor_t,
};
use esp_idf_svc::sys::{esp, heap_caps_get_total_size, EspError, MALLOC_CAP_SPIRAM};
use log::{info, warn};

/// Camera data and control pins.
///
/// Values are raw GPIO numbers as the C driver expects; `-1` means
/// the line is not wired.
#[derive(Debug, Clone, Copy)]
pub struct CameraPins {
    pub pwdn: i32,
    pub reset: i32,
    pub xclk: i32,
    pub sccb_sda: i32,
    pub sccb_scl: i32,
    pub d7: i32,
    pub d6: i32,
    pub d5: i32,
    pub d4: i32,
    pub d3: i32,
    pub d2: i32,
    pub d1: i32,
    pub d0: i32,
    pub vsync: i32,
    pub href: i32,
    pub pclk: i32,
}

impl CameraPins {
    /// Pinout of the AI-Thinker ESP32-CAM board.
    pub const fn ai_thinker() -> Self {
        Self {
            pwdn: 32,
            reset: -1,
            xclk: 0,
            sccb_sda: 26,
            sccb_scl: 27,
            d7: 35,
            d6: 34,
            d5: 39,
            d4: 36,
            d3: 21,
            d2: 19,
            d1: 18,
            d0: 5,
            vsync: 25,
            href: 23,
            pclk: 22,
        }
    }
}

/// Owns the initialized camera driver. Deinitializes on drop.
pub struct Camera {
    // The C driver holds global state; this field only pins the lifetime.
    _private: (),
}

impl Camera {
    /// Initialize the camera driver for JPEG capture.
    ///
    /// Probes for PSRAM: with it the sensor runs double-buffered at the
    /// configured PSRAM quality, without it a single DRAM buffer at the
    /// base quality.
    pub fn new(cfg: &CameraConfig, pins: CameraPins) -> Result<Self, EspError> {
        let psram = unsafe { heap_caps_get_total_size(MALLOC_CAP_SPIRAM) } > 0;
        let (jpeg_quality, fb_count, fb_location) = if psram {
            info!("PSRAM found, using double-buffered capture");
            (
                cfg.psram_jpeg_quality,
                2usize,
                camera_fb_location_t_CAMERA_FB_IN_PSRAM,
            )
        } else {
            info!("No PSRAM, using single-buffered capture");
            (
                cfg.jpeg_quality,
                1usize,
                camera_fb_location_t_CAMERA_FB_IN_DRAM,
            )
        };

        let mut config = camera_config_t {
            pin_pwdn: pins.pwdn,
            pin_reset: pins.reset,
            pin_xclk: pins.xclk,
            pin_d7: pins.d7,
            pin_d6: pins.d6,
            pin_d5: pins.d5,
            pin_d4: pins.d4,
            pin_d3: pins.d3,
            pin_d2: pins.d2,
            pin_d1: pins.d1,
            pin_d0: pins.d0,
            pin_vsync: pins.vsync,
            pin_href: pins.href,
            pin_pclk: pins.pclk,
            xclk_freq_hz: 20_000_000,
            ledc_timer: ledc_timer_t_LEDC_TIMER_0,
            ledc_channel: ledc_channel_t_LEDC_CHANNEL_0,
            pixel_format: pixformat_t_PIXFORMAT_JPEG,
            frame_size: framesize_t_FRAMESIZE_UXGA,
            jpeg_quality,
            fb_count,
            fb_location,
            grab_mode: camera_grab_mode_t_CAMERA_GRAB_LATEST,
            ..Default::default()
        };
        config.__bindgen_anon_1.pin_sccb_sda = pins.sccb_sda;
        config.__bindgen_anon_2.pin_sccb_scl = pins.sccb_scl;

        esp!(unsafe { esp_camera_init(&config) })?;
        info!("Camera initialized");

        apply_sensor_defaults(cfg.vertical_flip);

        Ok(Self { _private: () })
    }

    /// Handle for acquiring frames. The handle must not outlive the
    /// `Camera` that issued it.
    pub fn source(&self) -> CameraSource {
        CameraSource { _private: () }
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        if let Err(e) = esp!(unsafe { esp_camera_deinit() }) {
            warn!("Camera deinit failed: {e}");
        }
    }
}

/// Lightweight frame-acquisition handle backed by the global driver.
#[derive(Clone, Copy)]
pub struct CameraSource {
    _private: (),
}

impl FrameSource for CameraSource {
    type Frame = FrameGuard;

    fn acquire(&mut self) -> Result<FrameGuard, FrameError> {
        let fb = unsafe { esp_camera_fb_get() };
        if fb.is_null() {
            return Err(FrameError::Unavailable);
        }
        Ok(FrameGuard { fb })
    }
}

/// One frame buffer checked out of the driver's pool. Returned on drop.
pub struct FrameGuard {
    fb: *mut camera_fb_t,
}

// The buffer is owned exclusively by this guard until it is dropped.
unsafe impl Send for FrameGuard {}

impl AsRef<[u8]> for FrameGuard {
    fn as_ref(&self) -> &[u8] {
        // camera_fb_t is packed on some IDF versions, so read the
        // fields unaligned.
        unsafe {
            let buf = std::ptr::addr_of!((*self.fb).buf).read_unaligned();
            let len = std::ptr::addr_of!((*self.fb).len).read_unaligned();
            std::slice::from_raw_parts(buf, len as usize)
        }
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        unsafe { esp_camera_fb_return(self.fb) };
    }
}

/// Sensor tuning matching the OV2640's JPEG sweet spot, with the
/// vertical flip applied for the board's mounting orientation.
fn apply_sensor_defaults(vertical_flip: bool) {
    let s = unsafe { esp_camera_sensor_get() };
    if s.is_null() {
        warn!("Sensor handle unavailable, skipping tuning");
        return;
    }

    unsafe {
        sensor_set(s, (*s).set_brightness, 0);
        sensor_set(s, (*s).set_contrast, 0);
        sensor_set(s, (*s).set_saturation, 0);
        sensor_set(s, (*s).set_special_effect, 0);
        sensor_set(s, (*s).set_whitebal, 1);
        sensor_set(s, (*s).set_awb_gain, 1);
        sensor_set(s, (*s).set_wb_mode, 0);
        sensor_set(s, (*s).set_exposure_ctrl, 1);
        sensor_set(s, (*s).set_aec2, 0);
        sensor_set(s, (*s).set_gain_ctrl, 1);
        sensor_set(s, (*s).set_agc_gain, 0);
        if let Some(set_gainceiling) = (*s).set_gainceiling {
            set_gainceiling(s, 0);
        }
        sensor_set(s, (*s).set_bpc, 0);
        sensor_set(s, (*s).set_wpc, 1);
        sensor_set(s, (*s).set_raw_gma, 1);
        sensor_set(s, (*s).set_lenc, 1);
        sensor_set(s, (*s).set_hmirror, 0);
        sensor_set(s, (*s).set_vflip, i32::from(vertical_flip));
        sensor_set(s, (*s).set_dcw, 1);
        sensor_set(s, (*s).set_colorbar, 0);
    }
}

unsafe fn sensor_set(
    s: *mut sensor_t,
    setter: Option<unsafe extern "C" fn(*mut sensor_t, i32) -> i32>,
    value: i32,
) {
    if let Some(setter) = setter {
        setter(s, value);
    }
}
