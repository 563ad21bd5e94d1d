//! System clock adapter.
//!
//! Implements [`ClockPort`] for the control loop.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side simulation.
//!
//! Both sleep with `std::thread::sleep`, which on ESP-IDF yields to the
//! FreeRTOS scheduler.

use crate::app::ports::ClockPort;

pub struct SystemClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl ClockPort for SystemClock {
    fn uptime_ms(&self) -> u64 {
        self.uptime_us() / 1_000
    }

    fn sleep_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
