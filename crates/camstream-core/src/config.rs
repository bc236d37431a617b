//! Server, WiFi, and camera configuration.
//!
//! Plain serde-derive structs with usable defaults. The firmware binary
//! fills these in from compile-time constants; nothing here is persisted
//! or changed at runtime.

use serde::{Deserialize, Serialize};

/// HTTP listener configuration.
///
/// The device runs two listener instances: index/capture/flash on
/// `base_port`, and the MJPEG stream alone on `base_port + 1` so a
/// long-lived stream cannot starve the control routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server name used in logs.
    pub name: String,

    /// Port of the index/capture/flash listener.
    pub base_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "camstream".to_string(),
            base_port: 80,
        }
    }
}

/// Base of the per-listener httpd control sockets (the ESP-IDF default).
const CTRL_PORT_BASE: u16 = 32768;

impl ServerConfig {
    /// Port of the stream listener, one above the base port.
    ///
    /// Saturates instead of wrapping; a saturated pair collides and is
    /// rejected by the server bootstrap.
    pub fn stream_port(&self) -> u16 {
        self.base_port.saturating_add(1)
    }

    /// Whether the two listeners bind distinct ports.
    pub fn ports_distinct(&self) -> bool {
        self.stream_port() != self.base_port
    }

    /// UDP control socket of the base listener's httpd instance.
    pub fn ctrl_port(&self) -> u16 {
        CTRL_PORT_BASE
    }

    /// UDP control socket of the stream listener's httpd instance.
    ///
    /// Each httpd instance needs its own control socket; the stream
    /// listener's is offset by one, mirroring its HTTP port.
    pub fn stream_ctrl_port(&self) -> u16 {
        CTRL_PORT_BASE + 1
    }
}

/// WPA2-Enterprise credentials.
///
/// `identity` is the outer EAP identity; most deployments use the same
/// value for `identity` and `username`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WifiConfig {
    /// Network SSID.
    pub ssid: String,

    /// EAP outer identity.
    pub identity: String,

    /// EAP username.
    pub username: String,

    /// EAP password.
    pub password: String,
}

/// Camera sensor tuning.
///
/// JPEG quality is the driver's 0-63 scale where lower is better. The
/// PSRAM value applies when external RAM allows double buffering; boards
/// without PSRAM fall back to a single buffer at `jpeg_quality`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// JPEG quality without PSRAM (single frame buffer).
    pub jpeg_quality: i32,

    /// JPEG quality with PSRAM (two frame buffers).
    pub psram_jpeg_quality: i32,

    /// Flip the image vertically (sensor mounted upside down).
    pub vertical_flip: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 12,
            psram_jpeg_quality: 15,
            vertical_flip: true,
        }
    }
}
