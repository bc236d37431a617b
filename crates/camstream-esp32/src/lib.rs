//! ESP32-specific components for the camera streamer.
//!
//! This crate binds the platform-agnostic camstream crates to the ESP-IDF:
//! - WPA2-Enterprise WiFi join and the reconnect watchdog
//! - OV2640 camera driver setup and frame buffer ownership
//! - Flash LED pin driver
//! - The two HTTP servers (control endpoints and the MJPEG stream)
//!
//! # Architecture
//!
//! The handler logic lives in `camstream-server` behind the `FrameSource`
//! and `FrameSink` traits, so it is testable on the host. This crate
//! supplies the device-side implementations and wires them into
//! `EspHttpServer` instances. The main binary (`camstream-server-esp32`)
//! imports this crate and uses its components.

pub mod camera;
pub mod flash;
pub mod http;
pub mod wifi;
