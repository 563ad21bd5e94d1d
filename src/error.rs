//! Unified error type for the YesNo firmware.
//!
//! A single `Error` enum that every subsystem converts into, so `main` and
//! the control loop handle failures uniformly.  All variants are `Copy`.

use core::fmt;

use crate::app::ports::{ConfigError, ConnectivityError, FetchError};
use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// WiFi did not associate within the connect timeout.  Fatal at startup.
    Connection(ConnectivityError),
    /// One status poll failed.  Recoverable: the loop keeps the last status.
    Fetch(FetchError),
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// Configuration or credentials are missing or invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(e) => write!(f, "connection: {e}"),
            Self::Fetch(e) => write!(f, "fetch: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Connection(e)
    }
}

impl From<FetchError> for Error {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
