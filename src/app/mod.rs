//! Application core: pure domain logic, zero I/O.
//!
//! Business rules of the node (classification, override, reset, actuator
//! evaluation) live in [`service`].  All interaction with hardware and the
//! network happens through the **port traits** defined in [`ports`], keeping
//! this layer testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
