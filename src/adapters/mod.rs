//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements                      | Connects to            |
//! |----------------|---------------------------------|------------------------|
//! | `coordinator`  | RegistrationPort, ObserverPort  | loopback (log only)    |
//! | `log_sink`     | EventSink                       | Serial log output      |
//! | `nvs`          | ConfigPort                      | NVS / in-memory store  |
//! | `registration` | (drives RegistrationPort)       | coordinator backoff    |
//! | `time`         | monotonic clock                 | ESP32 system timer     |
//!
//! The lamp adapter lives in [`drivers::indicator`](crate::drivers::indicator)
//! and the request transport bridge in
//! [`endpoints::channels`](crate::endpoints::channels).

pub mod coordinator;
pub mod log_sink;
pub mod nvs;
pub mod registration;
pub mod time;
