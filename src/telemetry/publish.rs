//! Publishing speed snapshots.

use crate::speed::PropSpeed;
use crate::telemetry::payload::{format_f32, PAYLOAD_MAX_LEN};
use crate::telemetry::topics::TopicSet;

/// Sink for speed values, one topic per value.
///
/// Implemented by the MQTT link on the device and by recorders in tests.
pub trait SpeedPublisher {
    type Error;

    /// Publish one payload. Fire-and-forget: no delivery guarantee.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), Self::Error>;
}

/// Publish RPM, blade period and blade frequency of one snapshot.
///
/// Stops at the first failed publish.
pub fn publish_prop_speed<P: SpeedPublisher + ?Sized>(
    publisher: &mut P,
    topics: &TopicSet,
    speed: &PropSpeed,
) -> Result<(), P::Error> {
    let mut buf = [0u8; PAYLOAD_MAX_LEN];

    for (topic, value) in [
        (&topics.rpm, speed.rpm),
        (&topics.blade_period_us, speed.blade_period_us),
        (&topics.blade_freq_hz, speed.blade_freq_hz),
    ] {
        let len = format_f32(value, &mut buf);
        publisher.publish(topic.as_str(), &buf[..len])?;
    }

    Ok(())
}
