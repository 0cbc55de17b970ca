//! # PropTach
//!
//! Interrupt-driven propeller tachometer.
//!
//! ## Architecture
//!
//! ```text
//! Blade sensor ──ISR──▶ BladeRing ──▶ Tachometer ──▶ PropSpeed ──▶ telemetry
//!  (falling edge)      (atomics)     (foreground)    (snapshot)    (MQTT)
//! ```
//!
//! - The interrupt handler is the only writer of [`BladeRing`]
//! - [`Tachometer`] reads it from the foreground: average period, blade
//!   frequency, RPM, and a combined [`PropSpeed`] snapshot
//! - No locks anywhere: every shared value is a single 32-bit atomic
//!
//! Everything except `hal` and the WiFi/MQTT links builds and tests on host.

#![cfg_attr(not(test), no_std)]

pub mod blade;
pub mod clock;
pub mod config;
pub mod log_drain;
pub mod log_globals;
pub mod logging;
pub mod speed;
pub mod tachometer;
pub mod telemetry;

#[cfg(target_os = "espidf")]
pub mod hal;

pub use blade::{BladeRing, BLADE_RING};
pub use clock::{ManualClock, MicrosClock};
pub use config::{TachometerConfig, DEFAULT_BLADE_WINDOW, DEFAULT_MAX_BLADE_TIME_US};
pub use logging::{LogLevel, LogStream};
pub use speed::{PropSpeed, ShaftState};
pub use tachometer::Tachometer;

#[cfg(target_os = "espidf")]
pub use hal::{EspTimerClock, SensorError};

/// Build identification (`PropTach v<version>-g<git hash>`).
pub const VERSION: &str = env!("VERSION_STRING");
