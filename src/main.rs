//! PropTach - Main entry point
//!
//! On ESP-IDF:
//! 1. Attach the blade sensor interrupt and build the tachometer
//! 2. Join WiFi and connect to the MQTT broker
//! 3. Loop at 10 Hz: publish the speed snapshot, pick up setpoints, drain logs
//!
//! On any other target the same tachometer runs against a simulated blade
//! sensor driven from a producer thread.

use prop_tach::log_drain::drain_into;
use prop_tach::log_globals::{NET_LOG_STREAM, TACH_LOG_STREAM};

/// Print everything pending in the log streams.
fn drain_logs() {
    let mut out = String::new();
    drain_into(&TACH_LOG_STREAM, &mut out);
    drain_into(&NET_LOG_STREAM, &mut out);
    if !out.is_empty() {
        print!("{}", out);
    }
}

#[cfg(target_os = "espidf")]
fn main() {
    esp_idf_svc::sys::link_patches();

    println!("{}", prop_tach::VERSION);

    if let Err(e) = firmware::run() {
        drain_logs();
        println!("[FATAL] {}", e);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    println!("{} (host simulation)", prop_tach::VERSION);
    simulation::run();
}

#[cfg(target_os = "espidf")]
mod firmware {
    use core::fmt;
    use core::num::NonZeroU32;

    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::sys::EspError;

    use prop_tach::log_globals::{NET_LOG_STREAM, TACH_LOG_STREAM};
    use prop_tach::telemetry::{
        publish_prop_speed, MqttLink, NetConfig, NetError, SetpointSlot, TopicSet, WifiLink,
    };
    use prop_tach::{log_info, log_warn};
    use prop_tach::{EspTimerClock, MicrosClock, SensorError, Tachometer, TachometerConfig};

    const NUM_PROP_BLADES: NonZeroU32 = match NonZeroU32::new(2) {
        Some(n) => n,
        None => panic!("blade count must be non-zero"),
    };

    const BLADE_SENSOR_PIN: i32 = 4;

    /// Foreground loop period (10 Hz).
    const LOOP_PERIOD_MS: u32 = 100;

    const WIFI_SSID: &str = match option_env!("PROP_TACH_WIFI_SSID") {
        Some(s) => s,
        None => "",
    };
    const WIFI_PASSWORD: &str = match option_env!("PROP_TACH_WIFI_PASSWORD") {
        Some(s) => s,
        None => "",
    };
    const MQTT_BROKER: &str = match option_env!("PROP_TACH_MQTT_BROKER") {
        Some(s) => s,
        None => "192.168.1.10",
    };

    static SETPOINT: SetpointSlot = SetpointSlot::new();

    #[derive(Debug)]
    pub enum StartupError {
        Esp(EspError),
        Sensor(SensorError),
        Net(NetError),
    }

    impl From<EspError> for StartupError {
        fn from(e: EspError) -> Self {
            StartupError::Esp(e)
        }
    }

    impl From<SensorError> for StartupError {
        fn from(e: SensorError) -> Self {
            StartupError::Sensor(e)
        }
    }

    impl From<NetError> for StartupError {
        fn from(e: NetError) -> Self {
            StartupError::Net(e)
        }
    }

    impl fmt::Display for StartupError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Esp(e) => write!(f, "ESP-IDF: {}", e),
                Self::Sensor(e) => write!(f, "blade sensor: {}", e),
                Self::Net(e) => write!(f, "network: {}", e),
            }
        }
    }

    pub fn run() -> Result<(), StartupError> {
        let peripherals = Peripherals::take()?;
        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take()?;

        let tach = Tachometer::attach(TachometerConfig::new(NUM_PROP_BLADES, BLADE_SENSOR_PIN))?;
        super::drain_logs();

        let net = NetConfig::new(WIFI_SSID, WIFI_PASSWORD, MQTT_BROKER);
        let mut wifi = WifiLink::connect(peripherals.modem, sysloop, nvs, &net)?;
        super::drain_logs();

        let client_id = wifi.mac()?.client_id();
        let topics = TopicSet::new(net.topic_prefix, client_id.as_str()).map_err(NetError::from)?;
        let mut mqtt = MqttLink::connect(&net, &client_id, topics, &SETPOINT)?;

        loop {
            let speed = tach.prop_speed();
            let now_us = EspTimerClock.now_us();

            if let Err(e) = wifi.ensure_connected(&net) {
                log_warn!(NET_LOG_STREAM, now_us, "WiFi: {}", e);
            }

            if let Err(e) = mqtt.service() {
                log_warn!(NET_LOG_STREAM, now_us, "MQTT: {}", e);
            }

            if mqtt.is_connected() {
                if let Err(e) = publish_prop_speed(&mut mqtt, &topics, &speed) {
                    log_warn!(NET_LOG_STREAM, now_us, "publish: {}", e);
                }
            }

            // No motor control here: the setpoint is only reported
            if let Some(rpm) = SETPOINT.take() {
                log_info!(
                    TACH_LOG_STREAM,
                    now_us,
                    "setpoint {} rpm, measured {} rpm",
                    rpm,
                    speed.rpm
                );
            }

            super::drain_logs();
            FreeRtos::delay_ms(LOOP_PERIOD_MS);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod simulation {
    use std::num::NonZeroU32;
    use std::thread;
    use std::time::Duration;

    use prop_tach::{ManualClock, Tachometer, TachometerConfig, BLADE_RING};

    /// Simulated time. Only the blade producer advances it while running.
    static CLOCK: ManualClock = ManualClock::new(0);

    const NUM_PROP_BLADES: u32 = 2;

    /// Blade period at full speed (µs): 3000 rpm with two blades.
    const CRUISE_PERIOD_US: u32 = 10_000;

    /// Simulated silence per poll once the producer has stopped (µs).
    const IDLE_STEP_US: u32 = 100_000;

    /// Blade periods: spin up from 3x the cruise period, then hold.
    fn blade_profile() -> impl Iterator<Item = u32> {
        let spin_up = (0..40u32).map(|i| CRUISE_PERIOD_US * 3 - i * CRUISE_PERIOD_US / 20);
        let cruise = core::iter::repeat(CRUISE_PERIOD_US).take(60);
        spin_up.chain(cruise)
    }

    pub fn run() {
        let blades = NonZeroU32::new(NUM_PROP_BLADES).unwrap_or(NonZeroU32::MIN);
        let tach = Tachometer::new(&BLADE_RING, &CLOCK, TachometerConfig::new(blades, 0));

        // Stands in for the falling-edge interrupt
        let producer = thread::spawn(|| {
            for period_us in blade_profile() {
                let now_us = CLOCK.advance(period_us);
                BLADE_RING.on_blade_crossing(now_us);
                thread::sleep(Duration::from_millis(2));
            }
        });

        while !producer.is_finished() {
            report(&tach);
            thread::sleep(Duration::from_millis(20));
        }
        let _ = producer.join();

        // Sensor silent: let simulated time run until the reading decays
        for _ in 0..8 {
            CLOCK.advance(IDLE_STEP_US);
            report(&tach);
        }
    }

    fn report(tach: &Tachometer<'_, &ManualClock>) {
        let speed = tach.prop_speed();
        super::drain_logs();
        println!(
            "t={:>9} us  {:?}  rpm={:8.1}  period={:8.1} us  freq={:6.1} Hz",
            prop_tach::MicrosClock::now_us(&CLOCK),
            tach.shaft_state(),
            speed.rpm,
            speed.blade_period_us,
            speed.blade_freq_hz
        );
    }
}
