//! Hardware Abstraction Layer for PropTach (ESP-IDF only).
//!
//! Thin wrappers around ESP-IDF timer and GPIO interrupt services.
//! Business logic stays in core modules, HAL is just I/O.

pub mod blade_sensor;
pub mod clock;

pub use blade_sensor::{attach_blade_sensor, SensorError};
pub use clock::EspTimerClock;
