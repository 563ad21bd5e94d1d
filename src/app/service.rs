//! Control loop — the hexagonal core.
//!
//! [`ControlLoop`] owns the last known status and the poll timer.  It
//! arbitrates between the self-test override and periodic polling, and it
//! is the only writer of the indicator LEDs after startup.  All I/O flows
//! through port traits injected at call sites, so the loop is testable
//! with mock adapters and a simulated clock.
//!
//! ```text
//!  SelfTestTrigger ──▶ ┌──────────────────────┐ ──▶ IndicatorPort
//!                      │     ControlLoop      │
//!   StatusSource   ──▶ │ LastStatus · poll ts │ ──▶ EventSink
//!                      └──────────────────────┘
//! ```
//!
//! Iteration priority: a pending self-test always wins over a due poll.
//! The self-test dwell blocks the loop; edges arriving during it are kept
//! in the trigger and produce one more cycle on the next iteration.

use log::{debug, info};

use crate::config::{Credentials, DeviceConfig};
use crate::drivers::self_test::SelfTestTrigger;
use crate::error::{Error, Result};

use super::events::AppEvent;
use super::ports::{
    ClockPort, ConnectivityError, ConnectivityPort, EventSink, FetchError, IndicatorPort, StatusSource,
};
use super::status::{IndicatorFrame, StatusValue};

/// What one loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A self-test cycle ran (including its dwell).
    SelfTest,
    /// A poll ran; carries its result.
    Polled(core::result::Result<StatusValue, FetchError>),
    /// Nothing was due.
    Idle,
}

/// Counters since boot, reported at debug level.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    pub fetch_ok: u32,
    pub fetch_failed: u32,
    pub self_tests: u32,
}

pub struct ControlLoop {
    config: DeviceConfig,
    last_status: Option<StatusValue>,
    /// Uptime of the last fetch attempt; `None` until the first one.
    last_fetch_ms: Option<u64>,
    stats: LoopStats,
}

impl ControlLoop {
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            last_status: None,
            last_fetch_ms: None,
            stats: LoopStats::default(),
        }
    }

    // ── Startup ───────────────────────────────────────────────

    /// Power the indicators, show "unknown", and bring the link up.
    ///
    /// Blinks every LED at the configured period while waiting.  On
    /// timeout all LEDs go dark and [`Error::Connection`] is returned; the
    /// indicator supply is then left exactly as the first write set it.
    pub fn startup(
        &mut self,
        io: &mut impl IndicatorPort,
        net: &mut impl ConnectivityPort,
        clock: &mut impl ClockPort,
        credentials: &Credentials,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        io.set_power(true);
        io.show(IndicatorFrame::BOTH);
        sink.emit(&AppEvent::Started);

        if let Err(e) = net.begin_connect(credentials) {
            return Err(self.connection_failed(io, sink, e));
        }

        let half_period = self.config.connect_blink_period_ms / 2;
        let attempts = self.config.connect_attempts();
        let mut attempt = 0;
        while !net.is_connected() && attempt < attempts {
            attempt += 1;
            io.set_wifi_led(true);
            io.show(IndicatorFrame::BOTH);
            clock.sleep_ms(half_period);
            io.set_wifi_led(false);
            io.show(IndicatorFrame::OFF);
            clock.sleep_ms(half_period);
            sink.emit(&AppEvent::WaitingForLink { attempt });
        }

        if !net.is_connected() {
            return Err(self.connection_failed(io, sink, ConnectivityError::Timeout));
        }

        io.set_wifi_led(true);
        io.show(IndicatorFrame::for_status(self.last_status));
        io.set_power(true);
        sink.emit(&AppEvent::Connected);
        Ok(())
    }

    fn connection_failed(
        &self,
        io: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
        e: ConnectivityError,
    ) -> Error {
        io.set_wifi_led(false);
        io.show(IndicatorFrame::OFF);
        sink.emit(&AppEvent::ConnectionFailed(e));
        Error::Connection(e)
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one loop iteration without the trailing tick sleep.
    pub fn step(
        &mut self,
        trigger: &SelfTestTrigger,
        io: &mut impl IndicatorPort,
        source: &mut impl StatusSource,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> StepOutcome {
        if trigger.take() {
            self.run_self_test(io, clock, sink);
            return StepOutcome::SelfTest;
        }

        let now = clock.uptime_ms();
        if !self.poll_due(now) {
            return StepOutcome::Idle;
        }

        let result = source.fetch_status();
        match result {
            Ok(status) => {
                let changed = self.last_status != Some(status);
                self.last_status = Some(status);
                self.stats.fetch_ok += 1;
                self.render(io);
                sink.emit(&AppEvent::StatusUpdated { status, changed });
            }
            Err(e) => {
                self.stats.fetch_failed += 1;
                sink.emit(&AppEvent::FetchFailed(e));
            }
        }
        // Reset on every attempt so a failing feed is retried one poll
        // interval later, not on the next tick.
        self.last_fetch_ms = Some(now);
        debug!("loop stats: {:?}", self.stats);
        StepOutcome::Polled(result)
    }

    /// Run forever: one [`step`](Self::step) then one tick of sleep.
    pub fn run(
        &mut self,
        trigger: &SelfTestTrigger,
        io: &mut impl IndicatorPort,
        source: &mut impl StatusSource,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> ! {
        info!(
            "Control loop running (poll every {}s, tick {}ms)",
            self.config.poll_interval_secs, self.config.tick_interval_ms
        );
        loop {
            self.step(trigger, io, source, clock, sink);
            clock.sleep_ms(self.config.tick_interval_ms);
        }
    }

    fn run_self_test(
        &mut self,
        io: &mut impl IndicatorPort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        self.stats.self_tests += 1;
        sink.emit(&AppEvent::SelfTestStarted);
        io.show(IndicatorFrame::BOTH);
        clock.sleep_ms(self.config.self_test_dwell_ms);
        self.render(io);
        sink.emit(&AppEvent::SelfTestFinished {
            restored: self.last_status,
        });
    }

    fn poll_due(&self, now_ms: u64) -> bool {
        match self.last_fetch_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.config.poll_interval_ms(),
        }
    }

    // ── Rendering ─────────────────────────────────────────────

    /// Drive the status LEDs from the last known status.
    ///
    /// Unknown keeps both on.  Calling this repeatedly only re-asserts the
    /// same pin levels.
    pub fn render(&self, io: &mut impl IndicatorPort) {
        io.show(IndicatorFrame::for_status(self.last_status));
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn last_status(&self) -> Option<StatusValue> {
        self.last_status
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }
}
