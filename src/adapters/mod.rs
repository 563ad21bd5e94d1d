//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements    | Connects to                    |
//! |---------------|---------------|--------------------------------|
//! | `hardware`    | (pins)        | ESP32 GPIO via `PinDriver`     |
//! | `http_status` | StatusSource  | HTTPS GET + JSON status feed   |
//! | `log_sink`    | EventSink     | Serial log output              |
//! | `time`        | ClockPort     | ESP32 system timer             |
//! | `wifi`        | ConnectivityPort | ESP-IDF WiFi STA            |
//!
//! The indicator pins themselves implement `IndicatorPort` through
//! [`IndicatorDriver`](crate::drivers::indicator::IndicatorDriver).

pub mod hardware;
pub mod http_status;
pub mod log_sink;
pub mod time;
pub mod wifi;
