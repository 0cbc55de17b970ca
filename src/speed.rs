//! Module: speed
//!
//! Purpose: Derived propeller speed values. Pure math on an average blade
//! period; no shared state, fully testable on host.
//!
//! Chain: blade period (µs) → blade crossing frequency (Hz) → shaft RPM.
//!
//! Safety: Safe. Copy types only.

/// Microseconds per second.
const US_PER_SECOND: f32 = 1_000_000.0;

/// Seconds per minute.
const SECONDS_PER_MINUTE: f32 = 60.0;

/// Shaft state as seen by the most recent query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaftState {
    /// No blade crossing within the staleness threshold.
    Stopped,
    /// A blade crossed recently; derived values are meaningful.
    Spinning,
}

/// Propeller speed snapshot.
///
/// All three fields are derived from one average-period read, so they are
/// always mutually consistent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PropSpeed {
    /// Shaft speed (revolutions per minute).
    pub rpm: f32,
    /// Average time between blade crossings (µs).
    pub blade_period_us: f32,
    /// Blade crossings per second (Hz).
    pub blade_freq_hz: f32,
}

impl PropSpeed {
    /// All-zero reading (shaft stopped or sensor silent).
    pub const STOPPED: Self = Self {
        rpm: 0.0,
        blade_period_us: 0.0,
        blade_freq_hz: 0.0,
    };

    /// Derive frequency and RPM from an average blade period.
    pub fn from_period(blade_period_us: f32, num_prop_blades: f32) -> Self {
        let blade_freq_hz = blade_freq_hz(blade_period_us);
        Self {
            rpm: shaft_rpm(blade_freq_hz, num_prop_blades),
            blade_period_us,
            blade_freq_hz,
        }
    }

    /// Check if this reading represents a stopped shaft.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.blade_period_us <= 0.0
    }
}

/// Blade crossing frequency for an average period.
///
/// A zero period means "no measurable period" and maps to 0 Hz instead of
/// dividing by zero. Everything downstream relies on this branch.
#[inline]
pub fn blade_freq_hz(blade_period_us: f32) -> f32 {
    if blade_period_us > 0.0 {
        US_PER_SECOND / blade_period_us
    } else {
        0.0
    }
}

/// Shaft RPM from blade crossing frequency.
///
/// `num_prop_blades` must be positive; the config type guarantees it.
#[inline]
pub fn shaft_rpm(blade_freq_hz: f32, num_prop_blades: f32) -> f32 {
    blade_freq_hz * SECONDS_PER_MINUTE / num_prop_blades
}
