//! GPIO pin assignments for the YesNo indicator board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Renumber here when porting to another board;
//! the `Peripherals` lookup in `adapters::hardware` must be kept in step.

// ---------------------------------------------------------------------------
// Status indicators
// ---------------------------------------------------------------------------

/// Digital output: "no event" indicator LED (active HIGH).
pub const STATUS_NO_GPIO: i32 = 1;
/// Digital output: "event active" indicator LED (active HIGH).
pub const STATUS_YES_GPIO: i32 = 2;
/// Digital output: enables the indicator power supply (active HIGH).
pub const INDICATOR_POWER_EN_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Connectivity
// ---------------------------------------------------------------------------

/// Digital output: white WiFi status LED.
pub const WIFI_STATUS_LED_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Self-test input (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Built-in self-test enable.  Falling edge requests a self-test cycle.
pub const SELF_TEST_EN_GPIO: i32 = 9;
