//! WasteNode firmware library.
//!
//! Control logic of a smart-bin monitoring node: threshold classification of
//! temperature and humidity into an anomaly condition, an operator override,
//! the anomaly/fill lamps and the reset button.  Everything here runs on the
//! host for testing; ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` inside each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod anomaly;
pub mod app;
pub mod config;
pub mod drivers;
pub mod endpoints;
pub mod error;
pub mod events;
pub mod field;
pub mod runtime;
pub mod sensors;
