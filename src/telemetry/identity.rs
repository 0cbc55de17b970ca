//! Device identity derived from the station MAC address.

use core::fmt;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// 48-bit hardware address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// MQTT client id: the twelve hex digits of the address, no separators.
    pub fn client_id(&self) -> ClientId {
        let mut digits = [0u8; 12];
        for (i, byte) in self.0.iter().enumerate() {
            digits[i * 2] = HEX_UPPER[(byte >> 4) as usize];
            digits[i * 2 + 1] = HEX_UPPER[(byte & 0x0F) as usize];
        }
        ClientId(digits)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}

/// Client id string, stored inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientId([u8; 12]);

impl ClientId {
    pub fn as_str(&self) -> &str {
        // Only ASCII hex digits are ever stored
        core::str::from_utf8(&self.0).unwrap_or("")
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAC: MacAddress = MacAddress([0x24, 0x0A, 0xC4, 0x00, 0xBE, 0xEF]);

    #[test]
    fn test_mac_display() {
        assert_eq!(MAC.to_string(), "24:0A:C4:00:BE:EF");
    }

    #[test]
    fn test_client_id() {
        assert_eq!(MAC.client_id().as_str(), "240AC400BEEF");
    }
}
