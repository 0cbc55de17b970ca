//! Station link status, as reported after joining a network.

use core::fmt;

use crate::telemetry::identity::MacAddress;

/// Access point the station is associated with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StationStatus {
    /// Received signal strength (dBm).
    pub rssi_dbm: i8,
    /// Access point hardware address.
    pub bssid: MacAddress,
    /// Primary channel.
    pub channel: u8,
    /// Link uses any authentication/encryption.
    pub encrypted: bool,
}

impl StationStatus {
    /// Coarse signal rating for log lines.
    pub fn signal(&self) -> &'static str {
        match self.rssi_dbm {
            -55..=0 => "excellent",
            -67..=-56 => "good",
            -80..=-68 => "weak",
            _ => "unusable",
        }
    }
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RSSI {} dBm ({}), BSSID {}, channel {}, {}",
            self.rssi_dbm,
            self.signal(),
            self.bssid,
            self.channel,
            if self.encrypted { "encrypted" } else { "open" }
        )
    }
}
