//! Port traits — the hexagonal boundary between the control loop and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (indicator pins, WiFi, HTTP, clock, log) implement these
//! traits.  The [`ControlLoop`](super::service::ControlLoop) consumes them
//! via generics, so the domain core never touches hardware directly.

use core::fmt;

use crate::config::Credentials;

use super::events::AppEvent;
use super::status::{IndicatorFrame, StatusValue};

// ───────────────────────────────────────────────────────────────
// Indicator port (domain → LEDs)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the indicator board.
///
/// Writes are fire-and-forget: driving a digital output has no failure
/// mode the loop could act on.
pub trait IndicatorPort {
    /// Drive the "no event" LED.
    fn set_no(&mut self, on: bool);

    /// Drive the "event active" LED.
    fn set_yes(&mut self, on: bool);

    /// Enable or disable the indicator power supply.
    fn set_power(&mut self, on: bool);

    /// Drive the WiFi status LED.
    fn set_wifi_led(&mut self, on: bool);

    /// Apply both status LEDs at once.
    fn show(&mut self, frame: IndicatorFrame) {
        self.set_no(frame.no);
        self.set_yes(frame.yes);
    }
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (domain ↔ WiFi station)
// ───────────────────────────────────────────────────────────────

/// Station-mode network link.
///
/// `begin_connect` only starts association; the caller polls
/// `is_connected` so it can animate the indicators while waiting.
pub trait ConnectivityPort {
    /// Configure the station with `credentials` and start associating.
    fn begin_connect(&mut self, credentials: &Credentials) -> Result<(), ConnectivityError>;

    /// `true` once the link is up and has an address.
    fn is_connected(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Status source port (remote feed → domain)
// ───────────────────────────────────────────────────────────────

/// Performs one poll of the remote status feed.
pub trait StatusSource {
    fn fetch_status(&mut self) -> Result<StatusValue, FetchError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time and blocking delays.
pub trait ClockPort {
    /// Milliseconds since boot.
    fn uptime_ms(&self) -> u64;

    /// Block the calling task for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from loading or validating configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A required value (e.g. the WiFi SSID) was not provided at build time.
    NotFound,
    /// A value failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

/// Errors from [`ConnectivityPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    InvalidSsid,
    InvalidPassword,
    /// The WiFi driver rejected a call (raw ESP-IDF error code).
    Driver(i32),
    /// The link did not come up within the connect timeout.
    Timeout,
}

/// Errors from [`StatusSource::fetch_status`].
///
/// Every variant means "no new data": the loop keeps its last status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, TLS, or read failure below HTTP.
    Transport,
    /// The server answered with something other than 200.
    HttpStatus(u16),
    /// The body is not a JSON object.
    Parse,
    /// The body exceeded the configured size cap.
    BodyTooLarge,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "required value not set"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::Driver(rc) => write!(f, "WiFi driver error (rc={})", rc),
            Self::Timeout => write!(f, "WiFi did not connect before timeout"),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport error"),
            Self::HttpStatus(code) => write!(f, "HTTP status {}", code),
            Self::Parse => write!(f, "body is not a JSON object"),
            Self::BodyTooLarge => write!(f, "body too large"),
        }
    }
}
