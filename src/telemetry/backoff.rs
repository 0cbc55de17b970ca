//! Reconnect policy.
//!
//! Bounded retries with a delay between attempts. The delay doubles per
//! attempt up to `max_delay_ms`; with `delay_ms == max_delay_ms` it is a
//! fixed interval.

/// Default delay between connection attempts (ms).
pub const DEFAULT_RETRY_DELAY_MS: u32 = 5_000;

/// Default number of retries after the first failed attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 12;

/// How often and how patiently to retry a connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry (ms).
    pub delay_ms: u32,
    /// Upper bound for the doubled delay (ms).
    pub max_delay_ms: u32,
}

impl ReconnectPolicy {
    /// Fixed-interval policy.
    pub const fn fixed(max_retries: u32, delay_ms: u32) -> Self {
        Self {
            max_retries,
            delay_ms,
            max_delay_ms: delay_ms,
        }
    }

    /// Start a fresh retry sequence.
    pub fn backoff(&self) -> Backoff {
        Backoff {
            policy: *self,
            retries: 0,
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS)
    }
}

/// One retry sequence.
#[derive(Clone, Debug)]
pub struct Backoff {
    policy: ReconnectPolicy,
    retries: u32,
}

impl Backoff {
    /// Delay before the next retry, or `None` once retries are exhausted.
    pub fn next_delay_ms(&mut self) -> Option<u32> {
        if self.retries >= self.policy.max_retries {
            return None;
        }

        let shift = self.retries.min(31);
        let delay = ((self.policy.delay_ms as u64) << shift).min(self.policy.max_delay_ms as u64);
        self.retries += 1;

        Some(delay as u32)
    }

    /// Retries handed out so far.
    #[inline]
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Start over, e.g. after a successful connection.
    #[inline]
    pub fn reset(&mut self) {
        self.retries = 0;
    }
}

/// Run `attempt` until it succeeds or `policy` gives up.
///
/// `attempt` receives the zero-based attempt number. `wait_ms` is called
/// with the delay between a failure and the next attempt. On exhaustion the
/// last error is returned.
pub fn retry<T, E>(
    policy: &ReconnectPolicy,
    mut attempt: impl FnMut(u32) -> Result<T, E>,
    mut wait_ms: impl FnMut(u32),
) -> Result<T, E> {
    let mut backoff = policy.backoff();
    let mut n = 0;

    loop {
        match attempt(n) {
            Ok(value) => return Ok(value),
            Err(e) => match backoff.next_delay_ms() {
                Some(delay) => {
                    wait_ms(delay);
                    n += 1;
                }
                None => return Err(e),
            },
        }
    }
}
