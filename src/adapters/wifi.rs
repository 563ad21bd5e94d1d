//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`], the hexagonal boundary for network
//! connectivity.  There is no reconnect policy: the link is brought up
//! once at startup and a later drop only shows up as failed fetches.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stub whose link comes up after a
//!   configurable number of `is_connected` polls.

use log::info;

use crate::app::ports::{ConnectivityError, ConnectivityPort};
use crate::config::Credentials;

// ───────────────────────────────────────────────────────────────
// ESP-IDF adapter
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct WifiAdapter {
    wifi: esp_idf_svc::wifi::EspWifi<'static>,
}

#[cfg(target_os = "espidf")]
impl WifiAdapter {
    pub fn new(modem: esp_idf_hal::modem::Modem) -> anyhow::Result<Self> {
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use esp_idf_svc::nvs::EspDefaultNvsPartition;

        let sys_loop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take()?;
        let wifi = esp_idf_svc::wifi::EspWifi::new(modem, sys_loop, Some(nvs))?;
        Ok(Self { wifi })
    }
}

#[cfg(target_os = "espidf")]
fn driver_error(e: esp_idf_svc::sys::EspError) -> ConnectivityError {
    log::error!("WiFi driver error: {}", e);
    ConnectivityError::Driver(e.code())
}

#[cfg(target_os = "espidf")]
impl ConnectivityPort for WifiAdapter {
    fn begin_connect(&mut self, credentials: &Credentials) -> Result<(), ConnectivityError> {
        use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let auth_method = if credentials.is_open() {
            info!("WiFi password is empty. Authentication is disabled.");
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        let config = Configuration::Client(ClientConfiguration {
            ssid: credentials
                .ssid()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidSsid)?,
            password: credentials
                .password()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });

        self.wifi.set_configuration(&config).map_err(driver_error)?;
        self.wifi.start().map_err(driver_error)?;
        // Non-blocking: association completes in the driver task.
        self.wifi.connect().map_err(driver_error)?;
        info!("WiFi: connecting to '{}'", credentials.ssid());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.wifi.is_up().unwrap_or(false)
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub struct WifiAdapter {
    started: bool,
    /// `None` = link never comes up.
    polls_until_up: Option<u32>,
    polls: core::cell::Cell<u32>,
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "espidf"))]
impl WifiAdapter {
    /// Link is up on the first query after `begin_connect`.
    pub fn new() -> Self {
        Self::with_link_delay(0)
    }

    /// Link comes up after `polls` negative `is_connected` answers.
    pub fn with_link_delay(polls: u32) -> Self {
        Self {
            started: false,
            polls_until_up: Some(polls),
            polls: core::cell::Cell::new(0),
        }
    }

    /// Link never comes up.
    pub fn unreachable() -> Self {
        Self {
            started: false,
            polls_until_up: None,
            polls: core::cell::Cell::new(0),
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl ConnectivityPort for WifiAdapter {
    fn begin_connect(&mut self, credentials: &Credentials) -> Result<(), ConnectivityError> {
        info!("WiFi(sim): connecting to '{}'", credentials.ssid());
        self.started = true;
        self.polls.set(0);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        if !self.started {
            return false;
        }
        let Some(limit) = self.polls_until_up else {
            return false;
        };
        let seen = self.polls.get();
        if seen >= limit {
            true
        } else {
            self.polls.set(seen + 1);
            false
        }
    }
}
