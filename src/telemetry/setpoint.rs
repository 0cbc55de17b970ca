//! Latest RPM setpoint received from the broker.
//!
//! Written from the MQTT event task, read from the foreground loop.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Single-value mailbox for setpoints.
///
/// `take()` hands each stored value out once; `latest()` peeks without
/// consuming.
pub struct SetpointSlot {
    /// f32 bits of the latest setpoint.
    bits: AtomicU32,
    /// A value has been stored since the last `take()`.
    fresh: AtomicBool,
    /// Any value has ever been stored.
    received: AtomicBool,
}

impl SetpointSlot {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(0),
            fresh: AtomicBool::new(false),
            received: AtomicBool::new(false),
        }
    }

    /// Store a new setpoint, replacing any unread one.
    #[inline]
    pub fn store(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Release);
        self.received.store(true, Ordering::Release);
        self.fresh.store(true, Ordering::Release);
    }

    /// Take the setpoint if one arrived since the previous call.
    #[inline]
    pub fn take(&self) -> Option<f32> {
        if self.fresh.swap(false, Ordering::AcqRel) {
            Some(f32::from_bits(self.bits.load(Ordering::Acquire)))
        } else {
            None
        }
    }

    /// Most recent setpoint ever received, without consuming it.
    #[inline]
    pub fn latest(&self) -> Option<f32> {
        if self.received.load(Ordering::Acquire) {
            Some(f32::from_bits(self.bits.load(Ordering::Acquire)))
        } else {
            None
        }
    }
}

impl Default for SetpointSlot {
    fn default() -> Self {
        Self::new()
    }
}
