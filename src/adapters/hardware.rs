//! Hardware adapter — hands the board's GPIOs to the indicator driver.
//!
//! On ESP-IDF the four outputs are `PinDriver`s taken from
//! [`Peripherals`](esp_idf_hal::peripherals::Peripherals); the modem is
//! returned alongside for the WiFi adapter.  On every other target the
//! outputs are [`SimPin`]s that remember their level and log transitions.

use crate::drivers::indicator::IndicatorDriver;

// ── Simulated pin ─────────────────────────────────────────────

/// Host stand-in for a push-pull GPIO output.
#[derive(Debug)]
pub struct SimPin {
    name: &'static str,
    high: bool,
    writes: usize,
}

impl SimPin {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            high: false,
            writes: 0,
        }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    /// Number of level writes since construction.
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn write(&mut self, high: bool) {
        if high != self.high {
            log::trace!("gpio(sim): {} -> {}", self.name, if high { "HIGH" } else { "LOW" });
        }
        self.high = high;
        self.writes += 1;
    }
}

impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}

// ── Board wiring ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub type BoardPin = esp_idf_hal::gpio::PinDriver<
    'static,
    esp_idf_hal::gpio::AnyOutputPin,
    esp_idf_hal::gpio::Output,
>;

#[cfg(not(target_os = "espidf"))]
pub type BoardPin = SimPin;

pub type BoardIndicators = IndicatorDriver<BoardPin, BoardPin, BoardPin, BoardPin>;

/// Everything `main()` needs from the peripheral set.
pub struct Board {
    pub indicators: BoardIndicators,
    #[cfg(target_os = "espidf")]
    pub modem: esp_idf_hal::modem::Modem,
}

/// Take the peripherals and configure the indicator outputs.
///
/// GPIO numbers follow [`crate::pins`].
#[cfg(target_os = "espidf")]
pub fn take_board() -> anyhow::Result<Board> {
    use esp_idf_hal::gpio::{OutputPin, PinDriver};
    use esp_idf_hal::peripherals::Peripherals;

    use crate::drivers::hw_init::HwInitError;

    let p = Peripherals::take().map_err(|_| HwInitError::PeripheralsTaken)?;

    // Pin numbers here must match crate::pins.
    let no = PinDriver::output(p.pins.gpio1.downgrade_output())?;
    let yes = PinDriver::output(p.pins.gpio2.downgrade_output())?;
    let power = PinDriver::output(p.pins.gpio3.downgrade_output())?;
    let wifi = PinDriver::output(p.pins.gpio7.downgrade_output())?;

    log::info!(
        "hardware: outputs no=GPIO{} yes=GPIO{} power=GPIO{} wifi=GPIO{}",
        crate::pins::STATUS_NO_GPIO,
        crate::pins::STATUS_YES_GPIO,
        crate::pins::INDICATOR_POWER_EN_GPIO,
        crate::pins::WIFI_STATUS_LED_GPIO,
    );

    Ok(Board {
        indicators: IndicatorDriver::new(no, yes, power, wifi),
        modem: p.modem,
    })
}

#[cfg(not(target_os = "espidf"))]
pub fn take_board() -> anyhow::Result<Board> {
    log::info!("hardware(sim): using simulated indicator pins");
    Ok(Board {
        indicators: IndicatorDriver::new(
            SimPin::new("status-no"),
            SimPin::new("status-yes"),
            SimPin::new("indicator-power-enable"),
            SimPin::new("wifi-status-led"),
        ),
    })
}
