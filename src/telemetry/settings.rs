//! Network settings.

use core::fmt;

use crate::telemetry::backoff::ReconnectPolicy;

/// Default MQTT broker port.
pub const DEFAULT_BROKER_PORT: u16 = 1883;

/// Default topic prefix.
pub const DEFAULT_TOPIC_PREFIX: &str = "prop";

/// WiFi credentials, broker address and retry policy.
#[derive(Clone, Copy, Debug)]
pub struct NetConfig {
    pub ssid: &'static str,
    pub password: &'static str,
    pub broker_host: &'static str,
    pub broker_port: u16,
    pub topic_prefix: &'static str,
    pub reconnect: ReconnectPolicy,
}

impl NetConfig {
    /// Settings with the default port, prefix and retry policy.
    pub fn new(ssid: &'static str, password: &'static str, broker_host: &'static str) -> Self {
        Self {
            ssid,
            password,
            broker_host,
            broker_port: DEFAULT_BROKER_PORT,
            topic_prefix: DEFAULT_TOPIC_PREFIX,
            reconnect: ReconnectPolicy::default(),
        }
    }

    /// Write the broker URL (`mqtt://host:port`).
    pub fn write_broker_url(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "mqtt://{}:{}", self.broker_host, self.broker_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = NetConfig::new("net", "secret", "broker.local");
        assert_eq!(cfg.broker_port, 1883);
        assert_eq!(cfg.topic_prefix, "prop");
        assert_eq!(cfg.reconnect, ReconnectPolicy::default());
    }

    #[test]
    fn test_broker_url() {
        let mut cfg = NetConfig::new("net", "", "10.0.0.2");
        cfg.broker_port = 8883;

        let mut url = String::new();
        cfg.write_broker_url(&mut url).unwrap();
        assert_eq!(url, "mqtt://10.0.0.2:8883");
    }
}
