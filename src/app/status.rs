//! Status value model and the response-to-status mapping.
//!
//! The mapping is biased towards the alarm: only the exact
//! string `"no"` is read as "no event".  Anything else that arrives in a
//! well-formed JSON object — `"yes"`, `"No"`, a number, `null`, or a missing
//! field — lights the "yes" indicator.  Only transport-level and framing
//! failures (non-200, unparsable body) count as "no new data".

use serde_json::{Map, Value};

use super::ports::FetchError;

/// The two-valued status reported by the remote feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusValue {
    NoEvent,
    EventActive,
}

impl StatusValue {
    /// Map the raw field value.  `None` means the field is absent.
    pub fn from_field(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if s == "no" => Self::NoEvent,
            _ => Self::EventActive,
        }
    }

    /// Complementary LED pattern for this status.
    pub fn frame(self) -> IndicatorFrame {
        match self {
            Self::NoEvent => IndicatorFrame::NO,
            Self::EventActive => IndicatorFrame::YES,
        }
    }

    /// Short label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::NoEvent => "No",
            Self::EventActive => "Yes",
        }
    }
}

/// Desired state of the two status LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorFrame {
    pub no: bool,
    pub yes: bool,
}

impl IndicatorFrame {
    /// Both on: boot, unknown status, and self-test.
    pub const BOTH: Self = Self { no: true, yes: true };
    /// Both off: the dark half of the connect blink.
    pub const OFF: Self = Self { no: false, yes: false };
    pub const NO: Self = Self { no: true, yes: false };
    pub const YES: Self = Self { no: false, yes: true };

    /// Frame for an optional last-known status.
    pub fn for_status(status: Option<StatusValue>) -> Self {
        status.map_or(Self::BOTH, StatusValue::frame)
    }
}

/// Interpret one HTTP response from the status feed.
///
/// `http_status` must be 200; `body` must parse as a JSON object.
/// The value of `field` is then mapped with [`StatusValue::from_field`].
pub fn interpret_response(
    http_status: u16,
    body: &[u8],
    field: &str,
) -> Result<StatusValue, FetchError> {
    if http_status != 200 {
        return Err(FetchError::HttpStatus(http_status));
    }
    let object: Map<String, Value> = serde_json::from_slice(body).map_err(|_| FetchError::Parse)?;
    Ok(StatusValue::from_field(object.get(field)))
}
