//! MJPEG camera streamer firmware for the AI-Thinker ESP32-CAM.
//!
//! Boot sequence: flash LED pin low, camera driver up, WPA2-Enterprise
//! join, then two HTTP servers (control endpoints on the base port, the
//! MJPEG stream one port above). The main task then runs the WiFi
//! watchdog forever.

use std::sync::{Arc, Mutex};

use camstream_core::{CameraConfig, FlashState, ServerConfig, WifiConfig};
use camstream_esp32::camera::{Camera, CameraPins};
use camstream_esp32::flash::FlashLed;
use camstream_esp32::http::{start_control_server, start_stream_server};
use camstream_esp32::wifi::{connect_enterprise, liveness_loop};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use log::{error, info};

// Replace with real credentials before flashing.
const WIFI_SSID: &str = "eduroam";
const WIFI_IDENTITY: &str = "user@example.org";
const WIFI_USERNAME: &str = "user@example.org";
const WIFI_PASSWORD: &str = "changeme";

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    info!("ESP32-CAM streamer starting...");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    // LED off before anything else so a reset does not leave it lit.
    let lamp = Arc::new(Mutex::new(FlashLed::new(peripherals.pins.gpio4)?));
    let flash = Arc::new(FlashState::new());

    let camera = Camera::new(&CameraConfig::default(), CameraPins::ai_thinker())?;

    let wifi_cfg = WifiConfig {
        ssid: WIFI_SSID.to_string(),
        identity: WIFI_IDENTITY.to_string(),
        username: WIFI_USERNAME.to_string(),
        password: WIFI_PASSWORD.to_string(),
    };
    let (wifi, ip) = connect_enterprise(&wifi_cfg, peripherals.modem, sysloop)?;
    let wifi = Arc::new(Mutex::new(wifi));

    let server_cfg = ServerConfig::default();

    // The servers deregister their handlers when dropped, so both
    // handles stay alive for the rest of the program. A failed start
    // leaves the other listener running.
    let _control = match start_control_server(
        &server_cfg,
        camera.source(),
        flash.clone(),
        lamp.clone(),
    ) {
        Ok(server) => Some(server),
        Err(e) => {
            error!("Control server failed to start: {e}");
            None
        }
    };
    let _stream = match start_stream_server(&server_cfg, camera.source()) {
        Ok(server) => Some(server),
        Err(e) => {
            error!("Stream server failed to start: {e}");
            None
        }
    };

    info!("Camera ready! Browse to http://{ip}:{}/", server_cfg.base_port);
    info!(
        "Stream available at http://{ip}:{}/stream",
        server_cfg.stream_port()
    );

    liveness_loop(wifi)
}
