//! Monotonic microsecond clock source.
//!
//! Timestamps are `u32` microseconds that wrap every ~71.6 minutes. All
//! interval arithmetic uses `wrapping_sub`, so a single wrap between two
//! readings still yields the correct interval. 32 bits also keeps every
//! shared timestamp a single native atomic on the 32-bit targets.

use core::sync::atomic::{AtomicU32, Ordering};

/// Source of monotonic, wrapping microsecond timestamps.
pub trait MicrosClock {
    /// Current time in microseconds.
    fn now_us(&self) -> u32;
}

impl<C: MicrosClock + ?Sized> MicrosClock for &C {
    #[inline]
    fn now_us(&self) -> u32 {
        (**self).now_us()
    }
}

/// Manually driven clock.
///
/// Used by host tests and the host simulation to control time exactly.
/// Shareable between a producer thread and the foreground.
pub struct ManualClock {
    now_us: AtomicU32,
}

impl ManualClock {
    /// Create a clock reading `start_us`.
    pub const fn new(start_us: u32) -> Self {
        Self {
            now_us: AtomicU32::new(start_us),
        }
    }

    /// Jump to an absolute time.
    #[inline]
    pub fn set(&self, now_us: u32) {
        self.now_us.store(now_us, Ordering::Release);
    }

    /// Advance by `delta_us` (wrapping) and return the new time.
    #[inline]
    pub fn advance(&self, delta_us: u32) -> u32 {
        self.now_us
            .fetch_add(delta_us, Ordering::AcqRel)
            .wrapping_add(delta_us)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl MicrosClock for ManualClock {
    #[inline]
    fn now_us(&self) -> u32 {
        self.now_us.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.advance(50), 150);
        assert_eq!(clock.now_us(), 150);

        clock.set(10);
        assert_eq!(clock.now_us(), 10);
    }

    #[test]
    fn test_manual_clock_wraps() {
        let clock = ManualClock::new(u32::MAX - 9);
        assert_eq!(clock.advance(20), 10);

        // Interval across the wrap is still exact
        assert_eq!(clock.now_us().wrapping_sub(u32::MAX - 9), 20);
    }

    #[test]
    fn test_clock_by_reference() {
        let clock = ManualClock::new(42);
        let by_ref: &ManualClock = &clock;
        assert_eq!(MicrosClock::now_us(&by_ref), 42);
    }
}
