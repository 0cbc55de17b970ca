//! Module: config
//!
//! Purpose: Construction-time configuration for the tachometer.
//!
//! Architecture:
//! - build.rs: generates `tach_defaults.rs` from PROP_TACH_* env variables
//! - Generated constants: ring capacity and staleness threshold defaults
//! - `TachometerConfig`: immutable once handed to a `Tachometer`
//!
//! Safety: Safe. Copy types only.

use core::num::NonZeroU32;

mod generated_defaults {
    include!(concat!(env!("OUT_DIR"), "/tach_defaults.rs"));
}

pub use generated_defaults::{DEFAULT_BLADE_WINDOW, DEFAULT_MAX_BLADE_TIME_US};

/// Tachometer configuration.
///
/// The blade count is the divisor converting blade-crossing frequency into
/// shaft RPM, so it is non-zero by type. Nothing checks that it matches the
/// real propeller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TachometerConfig {
    /// Number of propeller blades (crossings per shaft revolution).
    pub num_prop_blades: NonZeroU32,

    /// GPIO number the blade sensor is wired to.
    pub blade_sensor_pin: i32,

    /// Time without a blade crossing after which the shaft is considered
    /// stopped (µs).
    pub max_blade_time_us: u32,
}

impl TachometerConfig {
    /// Create a config with the build-time default staleness threshold.
    pub const fn new(num_prop_blades: NonZeroU32, blade_sensor_pin: i32) -> Self {
        Self {
            num_prop_blades,
            blade_sensor_pin,
            max_blade_time_us: DEFAULT_MAX_BLADE_TIME_US,
        }
    }

    /// Override the staleness threshold.
    pub const fn with_max_blade_time_us(mut self, max_blade_time_us: u32) -> Self {
        self.max_blade_time_us = max_blade_time_us;
        self
    }

    /// Blade count as a float divisor.
    #[inline]
    pub fn blades_f32(&self) -> f32 {
        self.num_prop_blades.get() as f32
    }
}
