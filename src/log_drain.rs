//! Log output.
//!
//! Drains `LogStream`s into any `core::fmt::Write` sink. On the device the
//! sink is stdout (ESP-IDF console UART); on host it is stdout or a test
//! buffer.

use core::fmt::Write;

use crate::logging::{LogEntry, LogStream};

/// Format log entry as text.
///
/// Format: `[timestamp_us] LEVEL: message\n`
pub fn write_log_entry(entry: &LogEntry, out: &mut dyn Write) -> core::fmt::Result {
    writeln!(
        out,
        "[{:10}] {}: {}",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.message()
    )
}

/// Drain every pending entry of `stream` into `out`.
///
/// If messages were dropped since the last drain, a warning line with the
/// count is emitted after the entries and the counter is reset.
///
/// Returns the number of entries written.
pub fn drain_into<const N: usize>(stream: &LogStream<N>, out: &mut dyn Write) -> usize {
    let mut count = 0;

    while let Some(entry) = stream.drain() {
        let _ = write_log_entry(&entry, out);
        count += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let _ = writeln!(out, "[WARN] Dropped: {}", dropped);
        stream.reset_dropped();
    }

    count
}
