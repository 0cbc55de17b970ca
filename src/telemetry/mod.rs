//! Speed reporting and setpoint intake.
//!
//! Networking glue around the tachometer: it reads `PropSpeed` snapshots,
//! forwards them over MQTT and receives RPM setpoints. Nothing here touches
//! the blade ring.
//!
//! Pure pieces (payloads, topics, retry policy, setpoint slot) build and
//! test on host. WiFi and MQTT clients exist only on ESP-IDF.

pub mod backoff;
pub mod error;
pub mod identity;
pub mod payload;
pub mod publish;
pub mod settings;
pub mod setpoint;
pub mod status;
pub mod topics;

#[cfg(target_os = "espidf")]
pub mod mqtt;
#[cfg(target_os = "espidf")]
pub mod wifi;

pub use backoff::{retry, Backoff, ReconnectPolicy};
pub use error::NetError;
pub use identity::{ClientId, MacAddress};
pub use payload::{format_f32, parse_setpoint, SetpointError, PAYLOAD_MAX_LEN};
pub use publish::{publish_prop_speed, SpeedPublisher};
pub use settings::NetConfig;
pub use setpoint::SetpointSlot;
pub use status::StationStatus;
pub use topics::{Topic, TopicError, TopicSet};

#[cfg(target_os = "espidf")]
pub use mqtt::MqttLink;
#[cfg(target_os = "espidf")]
pub use wifi::WifiLink;
