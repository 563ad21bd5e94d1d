//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — today that is the serial log.

use super::ports::{ConnectivityError, FetchError};
use super::status::StatusValue;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Startup began; indicators show the unknown pattern.
    Started,

    /// One blink cycle of the connect wait has elapsed without a link.
    WaitingForLink { attempt: u32 },

    /// The station link is up.
    Connected,

    /// The station link did not come up.  Startup aborts.
    ConnectionFailed(ConnectivityError),

    /// A poll succeeded.  `changed` is false when the status matched the
    /// previous one.
    StatusUpdated { status: StatusValue, changed: bool },

    /// A poll failed; the previous status is retained.
    FetchFailed(FetchError),

    /// A self-test cycle began (both indicators on).
    SelfTestStarted,

    /// A self-test cycle ended.  `restored` is the status rendered
    /// afterwards, or `None` when it is still unknown.
    SelfTestFinished { restored: Option<StatusValue> },
}
