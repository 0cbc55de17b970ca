//! MQTT payload text.
//!
//! Speeds go out as plain decimal text. Setpoints come in the same way and
//! are parsed strictly: anything that is not a finite number is an error,
//! never a silent zero.

use core::fmt;

use crate::logging::BufWriter;

/// Largest payload `format_f32` produces.
pub const PAYLOAD_MAX_LEN: usize = 32;

/// Why a setpoint payload was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetpointError {
    /// Payload is not valid UTF-8.
    NotUtf8,
    /// Payload is empty or whitespace only.
    Empty,
    /// Payload is not a decimal number.
    NotANumber,
    /// Payload parsed to NaN or infinity.
    NotFinite,
}

impl fmt::Display for SetpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NotUtf8 => "payload is not UTF-8",
            Self::Empty => "empty payload",
            Self::NotANumber => "payload is not a number",
            Self::NotFinite => "payload is not finite",
        };
        f.write_str(msg)
    }
}

/// Format `value` with two decimals into `buf`.
///
/// Returns the number of bytes written (truncated to `buf`).
pub fn format_f32(value: f32, buf: &mut [u8]) -> usize {
    use core::fmt::Write;

    let mut writer = BufWriter::new(buf);
    let _ = write!(writer, "{:.2}", value);
    writer.len()
}

/// Parse a setpoint payload such as `b"2400"` or `b" 2400.5\n"`.
pub fn parse_setpoint(payload: &[u8]) -> Result<f32, SetpointError> {
    let text = core::str::from_utf8(payload).map_err(|_| SetpointError::NotUtf8)?;
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');

    if text.is_empty() {
        return Err(SetpointError::Empty);
    }

    let value: f32 = text.parse().map_err(|_| SetpointError::NotANumber)?;
    if !value.is_finite() {
        return Err(SetpointError::NotFinite);
    }

    Ok(value)
}
