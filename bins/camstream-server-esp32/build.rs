//! Build script for the ESP32-CAM streamer firmware.
//!
//! This script sets up the ESP-IDF environment variables needed for compilation.

fn main() {
    // Output ESP-IDF environment configuration
    // This is required for the esp-idf-svc crate to find the IDF toolchain
    embuild::espidf::sysenv::output();
}
