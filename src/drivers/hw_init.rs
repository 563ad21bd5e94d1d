//! One-shot GPIO interrupt initialisation.
//!
//! Configures the self-test input and registers its falling-edge ISR using
//! raw ESP-IDF sys calls.  Called once from `main()` before the control
//! loop starts.  Output pins are owned by `PinDriver`s in
//! [`adapters::hardware`](crate::adapters::hardware) instead.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    /// `Peripherals::take()` was called twice.
    PeripheralsTaken,
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrHandlerFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PeripheralsTaken     => write!(f, "peripherals already taken"),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrHandlerFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::drivers::self_test::self_test_isr_handler;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn self_test_gpio_isr(_arg: *mut core::ffi::c_void) {
    self_test_isr_handler();
}

/// Configure the self-test input and attach its falling-edge ISR.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::SELF_TEST_EN_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    // SAFETY: Called once from main() before the control loop; single-threaded.
    // The ISR only stores into an atomic flag.
    unsafe {
        let ret = gpio_config(&cfg);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }

        // ESP_ERR_INVALID_STATE means the service is already installed.
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let ret = gpio_isr_handler_add(
            pins::SELF_TEST_EN_GPIO,
            Some(self_test_gpio_isr),
            core::ptr::null_mut(),
        );
        if ret != ESP_OK as i32 {
            return Err(HwInitError::IsrHandlerFailed(ret));
        }
        gpio_intr_enable(pins::SELF_TEST_EN_GPIO);
    }
    info!("hw_init: self-test ISR installed on GPIO{}", pins::SELF_TEST_EN_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped, self-test fed from stdin");
    Ok(())
}
