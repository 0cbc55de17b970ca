//! Propeller tachometer.
//!
//! Foreground half of the blade sensor: reads the `BladeRing` the ISR fills
//! and turns it into blade period, blade crossing frequency and shaft RPM.
//!
//! # States
//!
//! - **Spinning**: last crossing within `max_blade_time_us` and a non-zero
//!   average. Values are the sliding average over the last `N` blade periods.
//! - **Stopped**: no crossing within the threshold, or no period recorded
//!   yet. Every value reads 0.
//!
//! The next crossing after a stop moves the shaft back to Spinning on the
//! following query.
//!
//! # Consistency
//!
//! `prop_speed()` derives all three values from a single ring read. Separate
//! calls to `avg_blade_period_us()`, `blade_freq_hz()` and `rpm()` each read
//! the ring again and may straddle a crossing.

use core::cell::Cell;

use crate::blade::BladeRing;
use crate::clock::MicrosClock;
use crate::config::{TachometerConfig, DEFAULT_BLADE_WINDOW};
use crate::log_globals::TACH_LOG_STREAM;
use crate::speed::{self, PropSpeed, ShaftState};

/// Tachometer bound to a blade ring and a clock.
///
/// Foreground only: not `Sync`, meant to be polled from one context.
pub struct Tachometer<'r, C: MicrosClock, const N: usize = DEFAULT_BLADE_WINDOW> {
    ring: &'r BladeRing<N>,
    clock: C,
    config: TachometerConfig,
    /// State observed by the previous query, for transition logging.
    state: Cell<ShaftState>,
}

impl<'r, C: MicrosClock, const N: usize> Tachometer<'r, C, N> {
    /// Create a tachometer reading `ring`.
    ///
    /// The ring must be the one the blade sensor interrupt writes to.
    pub fn new(ring: &'r BladeRing<N>, clock: C, config: TachometerConfig) -> Self {
        Self {
            ring,
            clock,
            config,
            state: Cell::new(ShaftState::Stopped),
        }
    }

    /// Average blade period in microseconds, 0 if the shaft is stopped.
    pub fn avg_blade_period_us(&self) -> f32 {
        // Crossing time first, then the clock. Reading the clock first would
        // let a crossing land in between and make `now - last` wrap to a huge
        // value.
        let last_crossing_us = self.ring.last_crossing_us();
        let now_us = self.clock.now_us();
        let elapsed_us = now_us.wrapping_sub(last_crossing_us);

        let period_us = if elapsed_us <= self.config.max_blade_time_us {
            self.ring.period_sum_us() as f32 / N as f32
        } else {
            0.0
        };

        // Fresh after boot the ring is all zeros: nothing to report yet
        let state = if period_us > 0.0 {
            ShaftState::Spinning
        } else {
            ShaftState::Stopped
        };

        self.note_state(state, now_us, elapsed_us);
        period_us
    }

    /// Blade crossing frequency in Hz, 0 if the shaft is stopped.
    pub fn blade_freq_hz(&self) -> f32 {
        speed::blade_freq_hz(self.avg_blade_period_us())
    }

    /// Shaft speed in revolutions per minute, 0 if the shaft is stopped.
    pub fn rpm(&self) -> f32 {
        speed::shaft_rpm(self.blade_freq_hz(), self.config.blades_f32())
    }

    /// RPM, blade frequency and blade period from one ring read.
    ///
    /// Preferred over the individual getters when more than one value is
    /// needed.
    pub fn prop_speed(&self) -> PropSpeed {
        PropSpeed::from_period(self.avg_blade_period_us(), self.config.blades_f32())
    }

    /// Shaft state observed by the most recent query.
    #[inline]
    pub fn shaft_state(&self) -> ShaftState {
        self.state.get()
    }

    /// Configuration this tachometer was built with.
    #[inline]
    pub fn config(&self) -> &TachometerConfig {
        &self.config
    }

    /// The ring this tachometer reads.
    #[inline]
    pub fn ring(&self) -> &'r BladeRing<N> {
        self.ring
    }

    fn note_state(&self, state: ShaftState, now_us: u32, elapsed_us: u32) {
        if self.state.replace(state) == state {
            return;
        }

        match state {
            ShaftState::Stopped => {
                crate::log_info!(
                    TACH_LOG_STREAM,
                    now_us,
                    "shaft stopped: no blade for {} us",
                    elapsed_us
                );
            }
            ShaftState::Spinning => {
                crate::log_info!(
                    TACH_LOG_STREAM,
                    now_us,
                    "shaft spinning: {} crossings",
                    self.ring.crossings()
                );
            }
        }
    }
}
