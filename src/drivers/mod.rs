//! Peripheral drivers: anomaly/fill lamps and the reset button.

pub mod button;
pub mod indicator;
