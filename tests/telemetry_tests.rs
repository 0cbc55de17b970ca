//! Telemetry glue tests: publishing snapshots and receiving setpoints

use std::num::NonZeroU32;

use prop_tach::telemetry::{
    parse_setpoint, publish_prop_speed, retry, MacAddress, NetConfig, ReconnectPolicy,
    SetpointError, SetpointSlot, SpeedPublisher, TopicSet,
};
use prop_tach::{BladeRing, ManualClock, PropSpeed, Tachometer, TachometerConfig};

/// Publisher that records every message.
#[derive(Default)]
struct Recorder {
    messages: Vec<(String, String)>,
}

impl SpeedPublisher for Recorder {
    type Error = ();

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), ()> {
        self.messages
            .push((topic.to_string(), String::from_utf8(payload.to_vec()).unwrap()));
        Ok(())
    }
}

fn device_topics() -> TopicSet {
    let mac = MacAddress([0xA0, 0xB7, 0x65, 0x01, 0x02, 0x03]);
    TopicSet::new("prop", mac.client_id().as_str()).unwrap()
}

#[test]
fn test_publish_measured_speed() {
    let ring = BladeRing::<4>::new();
    let clock = ManualClock::new(0);
    let config = TachometerConfig::new(NonZeroU32::new(2).unwrap(), 4);
    let tach = Tachometer::new(&ring, &clock, config);

    for _ in 0..4 {
        ring.on_blade_crossing(clock.advance(10_000));
    }

    let mut recorder = Recorder::default();
    publish_prop_speed(&mut recorder, &device_topics(), &tach.prop_speed()).unwrap();

    assert_eq!(
        recorder.messages,
        vec![
            ("prop/A0B765010203/rpm".to_string(), "3000.00".to_string()),
            ("prop/A0B765010203/blade_period_us".to_string(), "10000.00".to_string()),
            ("prop/A0B765010203/blade_freq_hz".to_string(), "100.00".to_string()),
        ]
    );
}

#[test]
fn test_publish_stopped_is_zero() {
    let mut recorder = Recorder::default();
    publish_prop_speed(&mut recorder, &device_topics(), &PropSpeed::STOPPED).unwrap();

    assert_eq!(recorder.messages.len(), 3);
    assert!(recorder.messages.iter().all(|(_, payload)| payload == "0.00"));
}

#[test]
fn test_setpoint_intake() {
    let slot = SetpointSlot::new();

    // What the MQTT callback does with each received payload
    let payloads: [&[u8]; 4] = [b"abc", b"", b" 2400 \n", b"nan"];
    for payload in payloads {
        if let Ok(rpm) = parse_setpoint(payload) {
            slot.store(rpm);
        }
    }

    assert_eq!(slot.take(), Some(2400.0));
    assert_eq!(slot.take(), None);
    assert_eq!(slot.latest(), Some(2400.0));
}

#[test]
fn test_setpoint_errors_are_not_zero() {
    assert_eq!(parse_setpoint(b"abc"), Err(SetpointError::NotANumber));
    assert_eq!(parse_setpoint(b"\n"), Err(SetpointError::Empty));
    assert_eq!(
        parse_setpoint(b"oops").unwrap_err().to_string(),
        "payload is not a number"
    );
}

#[test]
fn test_connect_retries_with_delay() {
    let net = NetConfig::new("shop", "secret", "broker.local");
    let mut waited = Vec::new();
    let mut attempts = 0;

    let result: Result<&str, &str> = retry(
        &net.reconnect,
        |_| {
            attempts += 1;
            if attempts < 3 {
                Err("refused")
            } else {
                Ok("connected")
            }
        },
        |delay_ms| waited.push(delay_ms),
    );

    assert_eq!(result, Ok("connected"));
    assert_eq!(waited, vec![5_000, 5_000]);
}

#[test]
fn test_connect_gives_up() {
    let policy = ReconnectPolicy::fixed(4, 250);
    let mut waited = 0u32;

    let result: Result<(), &str> = retry(&policy, |_| Err("unreachable"), |d| waited += d);

    assert_eq!(result, Err("unreachable"));
    assert_eq!(waited, 1_000);
}
