//! # camstream-core
//!
//! Core abstractions for the camstream camera web server.
//!
//! This crate provides:
//! - The frame-source contract (acquire/release of JPEG frame buffers)
//! - The flash LED state cell and digital-output trait
//! - Configuration types shared by all listeners
//!
//! This crate is intentionally platform-agnostic and contains no ESP-IDF
//! code, making it testable on the host and usable from the ESP32 target.

pub mod config;
pub mod flash;
pub mod frame;

pub use config::{CameraConfig, ServerConfig, WifiConfig};
pub use flash::{FlashState, Lamp};
pub use frame::{FrameError, FrameSource};
