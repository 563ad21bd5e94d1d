//! Device configuration parameters
//!
//! All tunables for the YesNo indicator.  Values are fixed at build time:
//! defaults below, optionally overridden through `YESNO_*` environment
//! variables when the firmware is compiled.  WiFi credentials are never
//! hard-coded; they come from `YESNO_WIFI_SSID` / `YESNO_WIFI_PASSWORD`.

use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigError, ConnectivityError};

/// Public JSON feed polled by the device.
pub const DEFAULT_STATUS_URL: &str =
    "https://raw.githubusercontent.com/bigcrimping/ned_json/main/events.json";

/// Core device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Polling ---
    /// Minimum time between two status fetches (seconds)
    pub poll_interval_secs: u32,
    /// Sleep between control-loop iterations (milliseconds)
    pub tick_interval_ms: u32,

    // --- Self-test ---
    /// How long both indicators stay lit during a self-test (milliseconds)
    pub self_test_dwell_ms: u32,

    // --- WiFi ---
    /// Give up on association after this many seconds
    pub connect_timeout_secs: u32,
    /// Full on+off period of the connect blink (milliseconds)
    pub connect_blink_period_ms: u32,

    // --- Status feed ---
    pub status_url: String,
    /// Sent as the `User-Agent` header
    pub user_agent: String,
    /// JSON field carrying the status string
    pub status_field: String,
    /// Responses larger than this are rejected (bytes)
    pub max_body_bytes: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // Polling
            poll_interval_secs: 60,
            tick_interval_ms: 100, // 10 Hz

            // Self-test
            self_test_dwell_ms: 3_000,

            // WiFi
            connect_timeout_secs: 10,
            connect_blink_period_ms: 1_000, // 1 Hz

            // Status feed
            status_url: DEFAULT_STATUS_URL.into(),
            user_agent: "YesNo".into(),
            status_field: "nuke gone off?".into(),
            max_body_bytes: 4096,
        }
    }
}

impl DeviceConfig {
    /// Defaults plus build-time overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(secs) = option_env!("YESNO_POLL_INTERVAL_SECS") {
            config.poll_interval_secs = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::ValidationFailed("YESNO_POLL_INTERVAL_SECS is not a number"))?;
        }
        if let Some(url) = option_env!("YESNO_STATUS_URL") {
            config.status_url = url.into();
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject degenerate timings and empty feed settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("poll interval must be non-zero"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick interval must be non-zero"));
        }
        if u64::from(self.tick_interval_ms) >= self.poll_interval_ms() {
            return Err(ConfigError::ValidationFailed("tick must be shorter than poll interval"));
        }
        if self.self_test_dwell_ms == 0 {
            return Err(ConfigError::ValidationFailed("self-test dwell must be non-zero"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed("connect timeout must be non-zero"));
        }
        if self.connect_blink_period_ms < 2 {
            return Err(ConfigError::ValidationFailed("blink period too short"));
        }
        if self.status_url.is_empty() || self.status_field.is_empty() {
            return Err(ConfigError::ValidationFailed("status URL and field must be set"));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::ValidationFailed("body cap must be non-zero"));
        }
        Ok(())
    }

    pub fn poll_interval_ms(&self) -> u64 {
        u64::from(self.poll_interval_secs) * 1000
    }

    /// Number of blink cycles that fit in the connect timeout.
    pub fn connect_attempts(&self) -> u32 {
        (self.connect_timeout_secs.saturating_mul(1000) / self.connect_blink_period_ms).max(1)
    }
}

// ---------------------------------------------------------------------------
// WiFi credentials
// ---------------------------------------------------------------------------

/// Station credentials, validated on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl Credentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut creds = Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
        };
        creds.ssid.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        creds
            .password
            .push_str(password)
            .map_err(|_| ConnectivityError::InvalidPassword)?;
        Ok(creds)
    }

    /// Load the credentials baked in at build time.
    pub fn from_env() -> Result<Self, ConfigError> {
        let ssid = option_env!("YESNO_WIFI_SSID").ok_or(ConfigError::NotFound)?;
        let password = option_env!("YESNO_WIFI_PASSWORD").unwrap_or("");
        Self::new(ssid, password).map_err(|e| match e {
            ConnectivityError::InvalidPassword => {
                ConfigError::ValidationFailed("YESNO_WIFI_PASSWORD must be empty or 8-64 bytes")
            }
            _ => ConfigError::ValidationFailed("YESNO_WIFI_SSID must be 1-32 printable ASCII bytes"),
        })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Open network (no passphrase).
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}
