//! YesNo Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single blocking control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  IndicatorDriver   WifiAdapter        HttpStatusSource     │
//! │  (IndicatorPort)   (Connectivity)     (StatusSource)       │
//! │  SystemClock       LogEventSink       SELF_TEST (ISR flag) │
//! │                                                            │
//! │  ──────────────── Port Trait Boundary ───────────────      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │          ControlLoop (pure logic)                │      │
//! │  │  last status · poll timer · self-test override   │      │
//! │  └──────────────────────────────────────────────────┘      │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use yesno::adapters::hardware;
use yesno::adapters::http_status::HttpStatusSource;
use yesno::adapters::log_sink::LogEventSink;
use yesno::adapters::time::SystemClock;
use yesno::adapters::wifi::WifiAdapter;
use yesno::app::service::ControlLoop;
use yesno::config::{Credentials, DeviceConfig};
use yesno::drivers::hw_init;
use yesno::drivers::self_test::SELF_TEST;
use yesno::error::Error;

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  YesNo v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = DeviceConfig::from_env().map_err(Error::from)?;
    let credentials = load_credentials()?;
    info!(
        "Polling {} every {}s (field '{}')",
        config.status_url, config.poll_interval_secs, config.status_field
    );

    // ── 3. Hardware ───────────────────────────────────────────
    let board = hardware::take_board()?;
    let mut indicators = board.indicators;
    hw_init::init_isr_service().map_err(Error::from)?;
    #[cfg(not(target_os = "espidf"))]
    {
        yesno::drivers::self_test::spawn_stdin_trigger(&SELF_TEST)?;
        info!("Press <Enter> to trigger a self-test");
    }

    // ── 4. Adapters ───────────────────────────────────────────
    #[cfg(target_os = "espidf")]
    let mut wifi = WifiAdapter::new(board.modem)?;
    #[cfg(not(target_os = "espidf"))]
    let mut wifi = WifiAdapter::new();

    let mut source = HttpStatusSource::new(&config);
    let mut clock = SystemClock::new();
    let mut sink = LogEventSink::new();
    let mut control = ControlLoop::new(config);

    // ── 5. Connect, then run forever ──────────────────────────
    if let Err(e) = control.startup(&mut indicators, &mut wifi, &mut clock, &credentials, &mut sink) {
        error!("Startup failed: {}", e);
        return halt(e);
    }

    control.run(&SELF_TEST, &mut indicators, &mut source, &mut clock, &mut sink)
}

fn load_credentials() -> Result<Credentials> {
    match Credentials::from_env() {
        Ok(c) => Ok(c),
        #[cfg(not(target_os = "espidf"))]
        Err(yesno::app::ports::ConfigError::NotFound) => {
            warn!("YESNO_WIFI_SSID not set at build time, using simulated network");
            Ok(Credentials::new("yesno-sim", "").map_err(Error::from)?)
        }
        Err(e) => Err(Error::from(e).into()),
    }
}

/// Device: park the main task with the LEDs dark until power-cycled.
#[cfg(target_os = "espidf")]
fn halt(e: Error) -> Result<()> {
    warn!("Halted after {}; power-cycle to retry", e);
    loop {
        std::thread::sleep(std::time::Duration::from_secs(3600));
    }
}

/// Host: surface the failure as a nonzero exit.
#[cfg(not(target_os = "espidf"))]
fn halt(e: Error) -> Result<()> {
    Err(e.into())
}
