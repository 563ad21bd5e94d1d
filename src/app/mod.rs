//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the rules of the indicator: the status mapping,
//! the self-test override, and the poll schedule.  All interaction with
//! hardware and the network happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
pub mod status;
