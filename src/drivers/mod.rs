//! Indicator and self-test drivers, plus interrupt initialisation.

pub mod hw_init;
pub mod indicator;
