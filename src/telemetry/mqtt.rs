//! MQTT broker link.
//!
//! Publishes speed snapshots and feeds setpoints into a `SetpointSlot`.
//!
//! # Threading
//!
//! The ESP-MQTT client runs its own task and reconnects on its own. Events
//! arrive on that task; they only touch atomics (`LINK` flags and the
//! setpoint slot). Subscribing happens from the foreground in `service()`,
//! after each (re)connect.

extern crate alloc;
use alloc::string::String;

use core::sync::atomic::{AtomicBool, Ordering};

use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::mqtt::client::{
    EspMqttClient, EspMqttEvent, EventPayload, MqttClientConfiguration, QoS,
};
use esp_idf_svc::sys::EspError;

use crate::clock::MicrosClock;
use crate::hal::EspTimerClock;
use crate::log_globals::NET_LOG_STREAM;
use crate::telemetry::backoff::retry;
use crate::telemetry::error::NetError;
use crate::telemetry::identity::ClientId;
use crate::telemetry::payload::parse_setpoint;
use crate::telemetry::publish::SpeedPublisher;
use crate::telemetry::settings::NetConfig;
use crate::telemetry::setpoint::SetpointSlot;
use crate::telemetry::topics::TopicSet;

/// Connection flags shared with the MQTT event task.
struct LinkFlags {
    connected: AtomicBool,
    needs_subscribe: AtomicBool,
}

static LINK: LinkFlags = LinkFlags {
    connected: AtomicBool::new(false),
    needs_subscribe: AtomicBool::new(false),
};

/// Broker connection.
pub struct MqttLink {
    client: EspMqttClient<'static>,
    topics: TopicSet,
}

impl MqttLink {
    /// Create the client and start connecting to the broker.
    ///
    /// Setpoints received on `topics.rpm_setpoint` land in `setpoint`.
    pub fn connect(
        config: &NetConfig,
        client_id: &ClientId,
        topics: TopicSet,
        setpoint: &'static SetpointSlot,
    ) -> Result<Self, NetError> {
        let mut url = String::new();
        let _ = config.write_broker_url(&mut url);

        let conf = MqttClientConfiguration {
            client_id: Some(client_id.as_str()),
            ..Default::default()
        };

        let client = retry(
            &config.reconnect,
            |attempt| {
                crate::log_info!(
                    NET_LOG_STREAM,
                    EspTimerClock.now_us(),
                    "MQTT: connecting to {} as {} (attempt {})",
                    url,
                    client_id,
                    attempt + 1
                );
                let setpoint_topic = topics.rpm_setpoint;
                EspMqttClient::new_cb(&url, &conf, move |event: EspMqttEvent<'_>| {
                    on_event(event.payload(), setpoint_topic.as_str(), setpoint)
                })
            },
            |delay_ms| {
                crate::log_warn!(
                    NET_LOG_STREAM,
                    EspTimerClock.now_us(),
                    "MQTT: client start failed, retry in {} ms",
                    delay_ms
                );
                FreeRtos::delay_ms(delay_ms);
            },
        )?;

        Ok(Self { client, topics })
    }

    /// Broker session currently up.
    #[inline]
    pub fn is_connected(&self) -> bool {
        LINK.connected.load(Ordering::Acquire)
    }

    /// Subscribe to the setpoint topic after a (re)connect.
    ///
    /// Call from the foreground loop.
    pub fn service(&mut self) -> Result<(), NetError> {
        if !LINK.needs_subscribe.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        let topic = self.topics.rpm_setpoint;
        if let Err(e) = self.client.subscribe(topic.as_str(), QoS::AtMostOnce) {
            LINK.needs_subscribe.store(true, Ordering::Release);
            return Err(e.into());
        }

        crate::log_info!(
            NET_LOG_STREAM,
            EspTimerClock.now_us(),
            "MQTT: subscribed to {}",
            topic
        );
        Ok(())
    }

    pub fn topics(&self) -> &TopicSet {
        &self.topics
    }
}

impl SpeedPublisher for MqttLink {
    type Error = NetError;

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), NetError> {
        if !self.is_connected() {
            return Err(NetError::NotConnected);
        }

        self.client.enqueue(topic, QoS::AtMostOnce, false, payload)?;
        Ok(())
    }
}

/// MQTT event handler. Runs on the ESP-MQTT task.
fn on_event(payload: EventPayload<'_, EspError>, setpoint_topic: &str, setpoint: &SetpointSlot) {
    let now_us = EspTimerClock.now_us();

    match payload {
        EventPayload::Connected(_) => {
            LINK.connected.store(true, Ordering::Release);
            LINK.needs_subscribe.store(true, Ordering::Release);
            crate::log_info!(NET_LOG_STREAM, now_us, "MQTT: connected");
        }
        EventPayload::Disconnected => {
            LINK.connected.store(false, Ordering::Release);
            crate::log_warn!(NET_LOG_STREAM, now_us, "MQTT: disconnected");
        }
        EventPayload::Received {
            topic: Some(topic),
            data,
            ..
        } if topic == setpoint_topic => match parse_setpoint(data) {
            Ok(rpm) => {
                setpoint.store(rpm);
                crate::log_info!(NET_LOG_STREAM, now_us, "MQTT: setpoint {} rpm", rpm);
            }
            Err(e) => {
                crate::log_warn!(NET_LOG_STREAM, now_us, "MQTT: setpoint rejected: {}", e);
            }
        },
        EventPayload::Error(e) => {
            crate::log_error!(NET_LOG_STREAM, now_us, "MQTT: {}", e);
        }
        _ => {}
    }
}
