//! Indicator driver — two status LEDs, the indicator supply enable, and the
//! WiFi status LED.
//!
//! ## Dual-target design
//!
//! Generic over [`embedded_hal::digital::OutputPin`]: on ESP-IDF the pins
//! are `esp_idf_hal` `PinDriver`s, on host/test they are
//! [`SimPin`](crate::adapters::hardware::SimPin)s that only track state.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::IndicatorPort;

pub struct IndicatorDriver<NO, YES, PWR, WIFI> {
    no: NO,
    yes: YES,
    power: PWR,
    wifi: WIFI,
}

impl<NO, YES, PWR, WIFI> IndicatorDriver<NO, YES, PWR, WIFI>
where
    NO: OutputPin,
    YES: OutputPin,
    PWR: OutputPin,
    WIFI: OutputPin,
{
    pub fn new(no: NO, yes: YES, power: PWR, wifi: WIFI) -> Self {
        Self { no, yes, power, wifi }
    }

    /// Give the pins back (tests and teardown).
    pub fn release(self) -> (NO, YES, PWR, WIFI) {
        (self.no, self.yes, self.power, self.wifi)
    }
}

fn drive(pin: &mut impl OutputPin, on: bool, name: &'static str) {
    // A failed GPIO write is logged and otherwise ignored; the next render
    // re-asserts the level.
    if pin.set_state(PinState::from(on)).is_err() {
        warn!("indicator: {} write failed", name);
    }
}

impl<NO, YES, PWR, WIFI> IndicatorPort for IndicatorDriver<NO, YES, PWR, WIFI>
where
    NO: OutputPin,
    YES: OutputPin,
    PWR: OutputPin,
    WIFI: OutputPin,
{
    fn set_no(&mut self, on: bool) {
        drive(&mut self.no, on, "status-no");
    }

    fn set_yes(&mut self, on: bool) {
        drive(&mut self.yes, on, "status-yes");
    }

    fn set_power(&mut self, on: bool) {
        drive(&mut self.power, on, "indicator-power-enable");
    }

    fn set_wifi_led(&mut self, on: bool) {
        drive(&mut self.wifi, on, "wifi-status-led");
    }
}
