//! Lock-free blade period ring shared between the sensor ISR and the
//! foreground.
//!
//! # Architecture
//!
//! ```text
//! Blade sensor ──ISR──▶ BladeRing ──────▶ Tachometer
//!  (falling edge)        (atomics)         (foreground reads)
//! ```
//!
//! # Rules
//!
//! - The ISR is the only writer. It never blocks, allocates or logs.
//! - Every shared field is a single 32-bit atomic, so no reader can see a
//!   torn value.
//! - Readers never assume two separate loads are mutually consistent: take
//!   `last_crossing_us()` once and work from the local copy.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::DEFAULT_BLADE_WINDOW;

/// Ring of the most recent `N` blade periods (µs).
///
/// # Memory Ordering
///
/// - ISR stores the period slot and the write index with `Relaxed`, then
///   publishes the crossing time with `Release`.
/// - Foreground loads the crossing time with `Acquire` before summing the
///   slots, so it sees every period recorded up to that crossing.
///
/// # Startup
///
/// Slots start at zero. Until `N` crossings have happened the average is
/// biased toward zero, and the first recorded period spans boot to the first
/// crossing. Both are accepted transients.
pub struct BladeRing<const N: usize = DEFAULT_BLADE_WINDOW> {
    /// Inter-crossing intervals, oldest overwritten first.
    periods_us: [AtomicU32; N],

    /// Slot the next crossing writes to (always < N).
    write_idx: AtomicU32,

    /// Clock reading at the most recent crossing.
    last_crossing_us: AtomicU32,

    /// Total crossings since boot (wrapping). Diagnostics only: the
    /// averaging never reads it.
    crossings: AtomicU32,
}

impl<const N: usize> BladeRing<N> {
    /// Create an all-zero ring.
    ///
    /// # Panics
    ///
    /// Panics if N is zero (at compile time when used in a const or static).
    pub const fn new() -> Self {
        assert!(N > 0, "Blade window must hold at least one period");

        #[allow(clippy::declare_interior_mutable_const)]
        const ZERO: AtomicU32 = AtomicU32::new(0);

        Self {
            periods_us: [ZERO; N],
            write_idx: AtomicU32::new(0),
            last_crossing_us: AtomicU32::new(0),
            crossings: AtomicU32::new(0),
        }
    }

    /// Record one blade crossing observed at `now_us`.
    ///
    /// This is the body of the interrupt handler: one interval store, one
    /// index store, one timestamp store, plus the diagnostic crossing count. Plain load/store pairs are enough
    /// because the ISR is the sole writer and is not reentrant.
    ///
    /// # Timing
    ///
    /// O(1), no loops, no blocking, no allocation.
    #[inline]
    pub fn on_blade_crossing(&self, now_us: u32) {
        let last = self.last_crossing_us.load(Ordering::Relaxed);
        let idx = self.write_idx.load(Ordering::Relaxed) as usize;

        self.periods_us[idx].store(now_us.wrapping_sub(last), Ordering::Relaxed);

        let next = if idx + 1 == N { 0 } else { idx + 1 };
        self.write_idx.store(next as u32, Ordering::Relaxed);

        let crossings = self.crossings.load(Ordering::Relaxed);
        self.crossings.store(crossings.wrapping_add(1), Ordering::Relaxed);

        self.last_crossing_us.store(now_us, Ordering::Release);
    }

    /// Clock reading at the most recent crossing (0 before the first one).
    #[inline]
    pub fn last_crossing_us(&self) -> u32 {
        self.last_crossing_us.load(Ordering::Acquire)
    }

    /// Sum of all `N` period slots.
    ///
    /// Each slot is read exactly once. Accumulates in `u64`, which cannot
    /// overflow for any realistic `N`.
    #[inline]
    pub fn period_sum_us(&self) -> u64 {
        self.periods_us
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed) as u64)
            .sum()
    }

    /// Copy of every slot, in storage order (not arrival order).
    pub fn periods_us(&self) -> [u32; N] {
        core::array::from_fn(|i| self.periods_us[i].load(Ordering::Relaxed))
    }

    /// Slot the next crossing will overwrite.
    #[inline]
    pub fn write_index(&self) -> usize {
        self.write_idx.load(Ordering::Relaxed) as usize
    }

    /// Total crossings recorded since boot (wrapping).
    #[inline]
    pub fn crossings(&self) -> u32 {
        self.crossings.load(Ordering::Relaxed)
    }

    /// Get the ring capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for BladeRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide ring written by the blade sensor interrupt.
///
/// One sensor per process: the interrupt handler has no context argument,
/// so it reaches its state through this static.
pub static BLADE_RING: BladeRing = BladeRing::new();
