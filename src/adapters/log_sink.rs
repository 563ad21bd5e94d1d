//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the logger
//! (UART / USB-CDC on the device, stderr on host).  Each line starts with
//! a fixed tag so serial captures can be grepped.

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | indicators powered, status unknown");
            }
            AppEvent::WaitingForLink { attempt } => {
                debug!("WIFI  | waiting for link ({})", attempt);
            }
            AppEvent::Connected => {
                info!("WIFI  | connected");
            }
            AppEvent::ConnectionFailed(e) => {
                error!("WIFI  | connection failed: {}", e);
            }
            AppEvent::StatusUpdated { status, changed } => {
                if *changed {
                    info!("STATUS | {} (changed)", status.label());
                } else {
                    info!("STATUS | {}", status.label());
                }
            }
            AppEvent::FetchFailed(e) => {
                warn!("FETCH | failed: {}, keeping last status", e);
            }
            AppEvent::SelfTestStarted => {
                info!("SELFTEST | both indicators on");
            }
            AppEvent::SelfTestFinished { restored } => match restored {
                Some(status) => info!("SELFTEST | done, restored {}", status.label()),
                None => info!("SELFTEST | done, status still unknown"),
            },
        }
    }
}
