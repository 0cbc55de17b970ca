//! Non-blocking logging for PropTach.
//!
//! # Architecture
//!
//! ```text
//! Foreground / net       LogStream            Drain (main loop)
//! ────────────────       ─────────            ─────────────────
//!
//! log_info!() ────────▶ [L0][L1][L2] ──────▶ stdout / UART
//! no alloc                lock-free           blocking ok
//! never blocks            MPSC ring
//! ```
//!
//! # Rules
//!
//! - The blade sensor ISR never logs.
//! - One drain per stream (see `log_globals`).
//! - Messages are dropped, and counted, when the ring is full.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 120;

/// Log buffer size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct LogEntry {
    /// Timestamp in microseconds (wrapping clock).
    pub timestamp_us: u32,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text.
    ///
    /// A message cut inside a multi-byte character keeps its valid prefix.
    pub fn message(&self) -> &str {
        let bytes = &self.msg[..self.len as usize];
        match core::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
        }
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One ring slot: entry plus its publication marker.
struct Slot {
    /// `2 * lap` when free for that lap, `2 * lap + 1` once filled.
    seq: AtomicU32,
    entry: UnsafeCell<LogEntry>,
}

/// Lock-free log ring: many producers, one drain.
///
/// Producers claim a position with a CAS on `write_idx`, fill the slot, then
/// publish it through the slot marker with `Release`. The drain only reads
/// slots whose marker says "filled for this lap", so a half-written entry is
/// never observed.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    slots: [Slot; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: A slot entry is written only by the producer that won the CAS for
// its position, and read only by the single drain after the marker publishes
// it. The drain hands the slot back by advancing the marker to the next lap.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two() && N > 1, "Log buffer size must be power of 2 (>= 2)");

        #[allow(clippy::declare_interior_mutable_const)]
        const EMPTY_SLOT: Slot = Slot {
            seq: AtomicU32::new(0),
            entry: UnsafeCell::new(LogEntry::EMPTY),
        };

        Self {
            slots: [EMPTY_SLOT; N],
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Marker of a slot free for the lap containing `pos`.
    #[inline]
    const fn free_mark(pos: u32) -> u32 {
        (pos / N as u32) * 2
    }

    /// Marker of a slot filled at `pos`.
    #[inline]
    const fn full_mark(pos: u32) -> u32 {
        Self::free_mark(pos) + 1
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if message was queued, `false` if dropped (ring full).
    ///
    /// # Thread Safety
    ///
    /// Safe for concurrent producers. Retries only when another producer
    /// claimed the position first.
    #[inline]
    pub fn push(&self, timestamp_us: u32, level: LogLevel, msg: &[u8]) -> bool {
        let mut pos = self.write_idx.load(Ordering::Relaxed);

        loop {
            let slot = &self.slots[(pos as usize) & Self::MASK];
            let seq = slot.seq.load(Ordering::Acquire);

            if seq == Self::free_mark(pos) {
                match self.write_idx.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        let len = msg.len().min(MAX_MSG_LEN);

                        // SAFETY: This producer owns the claimed position
                        // until the marker below publishes it.
                        unsafe {
                            let entry = &mut *slot.entry.get();
                            entry.timestamp_us = timestamp_us;
                            entry.level = level;
                            entry.len = len as u8;
                            entry.msg[..len].copy_from_slice(&msg[..len]);
                        }

                        slot.seq.store(Self::full_mark(pos), Ordering::Release);
                        return true;
                    }
                    Err(current) => pos = current,
                }
            } else {
                let current = self.write_idx.load(Ordering::Relaxed);
                if current == pos {
                    // Slot from the previous lap not drained yet
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    return false;
                }
                pos = current;
            }
        }
    }

    /// Drain next log entry.
    ///
    /// Returns `None` if no published entry is available. Single consumer
    /// only.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let pos = self.read_idx.load(Ordering::Relaxed);
        let slot = &self.slots[(pos as usize) & Self::MASK];

        if slot.seq.load(Ordering::Acquire) != Self::full_mark(pos) {
            return None;
        }

        // SAFETY: Marker says the producer finished writing this slot.
        let entry = unsafe { *slot.entry.get() };

        slot.seq
            .store(Self::free_mark(pos.wrapping_add(N as u32)), Ordering::Release);
        self.read_idx.store(pos.wrapping_add(1), Ordering::Relaxed);
        Some(entry)
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Get number of entries claimed but not yet drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed buffer `core::fmt::Write` sink that truncates instead of failing.
pub struct BufWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BufWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }
}

impl core::fmt::Write for BufWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = self.buf.len() - self.pos;
        let to_write = bytes.len().min(remaining);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Format a message into a buffer.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = BufWriter::new(buf);
    let _ = core::fmt::write(&mut writer, args);
    writer.len()
}

/// Non-blocking log macro.
///
/// # Example
///
/// ```ignore
/// log_event!(LogLevel::Info, TACH_LOG_STREAM, now_us, "rpm {}", rpm);
/// ```
#[macro_export]
macro_rules! log_event {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($timestamp, $level, &buf[..len]);
    }};
}

/// Info log.
#[macro_export]
macro_rules! log_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_event!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// Warning log.
#[macro_export]
macro_rules! log_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_event!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// Error log.
#[macro_export]
macro_rules! log_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_event!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// Debug log.
#[macro_export]
macro_rules! log_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::log_event!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}
