//! WPA2-Enterprise WiFi join and the reconnect watchdog.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use camstream_core::WifiConfig;
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::peripheral,
    sys::{
        esp, esp_eap_client_set_identity, esp_eap_client_set_password,
        esp_eap_client_set_username, esp_wifi_sta_enterprise_enable, EspError,
    },
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};
use log::{info, warn};

/// How often the watchdog checks the link.
pub const LIVENESS_INTERVAL: Duration = Duration::from_secs(10);

/// Connection attempts before giving up the initial join.
const JOIN_ATTEMPTS: usize = 3;

/// Connect to a WPA2-Enterprise (PEAP) network.
///
/// Registers the EAP identity and credentials with the supplicant before
/// connecting, then waits for a DHCP lease.
///
/// Returns a boxed `EspWifi` instance that must be kept alive for the
/// connection to remain active, plus the leased IP as a string.
pub fn connect_enterprise(
    creds: &WifiConfig,
    modem: impl peripheral::Peripheral<P = esp_idf_svc::hal::modem::Modem> + 'static,
    sysloop: EspSystemEventLoop,
) -> Result<(Box<EspWifi<'static>>, String)> {
    if creds.ssid.is_empty() {
        bail!("WiFi SSID cannot be empty");
    }
    if creds.username.is_empty() || creds.password.is_empty() {
        bail!("WPA2-Enterprise requires a username and password");
    }

    let mut esp_wifi = EspWifi::new(modem, sysloop.clone(), None)?;
    let mut wifi = BlockingWifi::wrap(&mut esp_wifi, sysloop)?;

    // Initial configuration for scanning
    wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))?;
    wifi.start()?;

    info!("Scanning for WiFi networks...");
    let ap_infos = wifi.scan()?;

    let channel = ap_infos
        .into_iter()
        .find(|ap| ap.ssid == creds.ssid.as_str())
        .map(|ap| {
            info!("Found '{}' on channel {}", creds.ssid, ap.channel);
            ap.channel
        });

    if channel.is_none() {
        info!("Network '{}' not found in scan, will try anyway", creds.ssid);
    }

    // EAP credentials go to the supplicant, not the client configuration.
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: creds
            .ssid
            .as_str()
            .try_into()
            .expect("SSID too long (max 32 chars)"),
        channel,
        auth_method: AuthMethod::WPA2Enterprise,
        ..Default::default()
    }))?;

    enable_enterprise(creds).context("failed to configure WPA2-Enterprise supplicant")?;

    info!("Connecting to '{}' as '{}'...", creds.ssid, creds.username);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match wifi.connect() {
            Ok(()) => break,
            Err(e) if attempt < JOIN_ATTEMPTS => {
                warn!("Join attempt {attempt} failed: {e}; retrying");
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to join '{}' after {attempt} attempts", creds.ssid)
                });
            }
        }
    }

    info!("Waiting for DHCP lease...");
    wifi.wait_netif_up()?;

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    info!("WiFi connected!");
    info!("  IP address: {}", ip_info.ip);
    info!("  Gateway:    {}", ip_info.subnet.gateway);

    Ok((Box::new(esp_wifi), ip_info.ip.to_string()))
}

/// Hand the EAP identity and credentials to the supplicant and enable
/// station-mode enterprise authentication.
fn enable_enterprise(creds: &WifiConfig) -> Result<(), EspError> {
    let identity = creds.identity.as_bytes();
    let username = creds.username.as_bytes();
    let password = creds.password.as_bytes();
    unsafe {
        esp!(esp_eap_client_set_identity(
            identity.as_ptr(),
            identity.len() as i32
        ))?;
        esp!(esp_eap_client_set_username(
            username.as_ptr(),
            username.len() as i32
        ))?;
        esp!(esp_eap_client_set_password(
            password.as_ptr(),
            password.len() as i32
        ))?;
        esp!(esp_wifi_sta_enterprise_enable())
    }
}

/// Periodic link watchdog. Never returns.
///
/// Every [`LIVENESS_INTERVAL`] this logs the current lease while the link
/// is up and asks the driver to reconnect when it is not. Run it on its
/// own thread after the initial join.
pub fn liveness_loop(wifi: Arc<Mutex<Box<EspWifi<'static>>>>) -> ! {
    loop {
        std::thread::sleep(LIVENESS_INTERVAL);

        let mut wifi = match wifi.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match wifi.is_connected() {
            Ok(true) => match wifi.sta_netif().get_ip_info() {
                Ok(ip_info) => info!("WiFi up, IP {}", ip_info.ip),
                Err(e) => warn!("WiFi up but no IP info: {e}"),
            },
            Ok(false) => {
                warn!("WiFi connection lost, reconnecting...");
                if let Err(e) = wifi.connect() {
                    warn!("Reconnect failed: {e}");
                }
            }
            Err(e) => warn!("WiFi status check failed: {e}"),
        }
    }
}
