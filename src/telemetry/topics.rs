//! MQTT topic names.
//!
//! Every device publishes under `<prefix>/<client id>/`, so several
//! tachometers can share one broker.

use core::fmt;

use crate::logging::BufWriter;

/// Longest topic name stored.
pub const TOPIC_MAX_LEN: usize = 96;

/// Topic name too long for `TOPIC_MAX_LEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicError {
    pub len: usize,
}

impl fmt::Display for TopicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "topic length {} exceeds {} bytes",
            self.len, TOPIC_MAX_LEN
        )
    }
}

/// Topic name stored inline.
#[derive(Clone, Copy)]
pub struct Topic {
    buf: [u8; TOPIC_MAX_LEN],
    len: usize,
}

impl Topic {
    fn build(prefix: &str, client_id: &str, leaf: &str) -> Result<Self, TopicError> {
        use core::fmt::Write;

        let len = prefix.len() + client_id.len() + leaf.len() + 2;
        if len > TOPIC_MAX_LEN {
            return Err(TopicError { len });
        }

        let mut buf = [0u8; TOPIC_MAX_LEN];
        let mut writer = BufWriter::new(&mut buf);
        let _ = write!(writer, "{}/{}/{}", prefix, client_id, leaf);

        Ok(Self { buf, len })
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }
}

impl PartialEq<&str> for Topic {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topics one tachometer publishes to and listens on.
#[derive(Clone, Copy, Debug)]
pub struct TopicSet {
    /// Shaft speed (RPM).
    pub rpm: Topic,
    /// Average blade period (µs).
    pub blade_period_us: Topic,
    /// Blade crossing frequency (Hz).
    pub blade_freq_hz: Topic,
    /// Incoming RPM setpoint.
    pub rpm_setpoint: Topic,
}

impl TopicSet {
    pub fn new(prefix: &str, client_id: &str) -> Result<Self, TopicError> {
        Ok(Self {
            rpm: Topic::build(prefix, client_id, "rpm")?,
            blade_period_us: Topic::build(prefix, client_id, "blade_period_us")?,
            blade_freq_hz: Topic::build(prefix, client_id, "blade_freq_hz")?,
            rpm_setpoint: Topic::build(prefix, client_id, "rpm_setpoint")?,
        })
    }
}
