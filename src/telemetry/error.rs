//! Network errors.

use core::fmt;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

use crate::telemetry::topics::TopicError;

/// WiFi and MQTT errors.
#[derive(Debug)]
pub enum NetError {
    /// Broker link is down; the publish was skipped.
    NotConnected,
    /// SSID does not fit the driver's buffer.
    SsidTooLong,
    /// Password does not fit the driver's buffer.
    PasswordTooLong,
    /// Topic name too long.
    Topic(TopicError),
    /// ESP-IDF driver error.
    #[cfg(target_os = "espidf")]
    Esp(EspError),
}

impl NetError {
    /// Short error code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotConnected => "E_NOLINK",
            Self::SsidTooLong => "E_SSID",
            Self::PasswordTooLong => "E_PASS",
            Self::Topic(_) => "E_TOPIC",
            #[cfg(target_os = "espidf")]
            Self::Esp(_) => "E_ESP",
        }
    }
}

impl From<TopicError> for NetError {
    fn from(e: TopicError) -> Self {
        NetError::Topic(e)
    }
}

#[cfg(target_os = "espidf")]
impl From<EspError> for NetError {
    fn from(e: EspError) -> Self {
        NetError::Esp(e)
    }
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "{}: broker not connected", self.code()),
            Self::SsidTooLong => write!(f, "{}: SSID too long", self.code()),
            Self::PasswordTooLong => write!(f, "{}: password too long", self.code()),
            Self::Topic(e) => write!(f, "{}: {}", self.code(), e),
            #[cfg(target_os = "espidf")]
            Self::Esp(e) => write!(f, "{}: {}", self.code(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        assert_eq!(NetError::NotConnected.to_string(), "E_NOLINK: broker not connected");
        let topic = NetError::from(TopicError { len: 200 });
        assert!(topic.to_string().starts_with("E_TOPIC: "));
    }
}
