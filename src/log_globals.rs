//! Global log stream instances.
//!
//! Streams are split by source, not by context. Both accept several
//! producers:
//! - tachometer: shaft state changes, attach, setpoint reports
//! - network: WiFi bring-up, MQTT foreground calls and event callback
//!
//! The blade sensor ISR has no stream; it never logs.

use crate::logging::LogStream;

/// Tachometer log stream.
pub static TACH_LOG_STREAM: LogStream = LogStream::new();

/// Network log stream (connection management and MQTT callback).
pub static NET_LOG_STREAM: LogStream = LogStream::new();
