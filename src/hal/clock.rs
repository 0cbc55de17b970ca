//! esp_timer backed microsecond clock.

use esp_idf_svc::sys as esp_idf_sys;

use crate::clock::MicrosClock;

/// Monotonic clock from `esp_timer_get_time()`.
///
/// The 64-bit timer is truncated to 32 bits, so readings wrap every ~71.6
/// minutes like a classic `micros()` counter. Interval math in the crate is
/// wrapping, so this is harmless.
#[derive(Clone, Copy, Debug, Default)]
pub struct EspTimerClock;

impl MicrosClock for EspTimerClock {
    #[inline]
    fn now_us(&self) -> u32 {
        // SAFETY: esp_timer_get_time has no preconditions and is ISR-safe.
        unsafe { esp_idf_sys::esp_timer_get_time() as u32 }
    }
}
