//! Interrupt/foreground boundary emulated with threads
//!
//! A producer thread plays the interrupt handler (sole writer of the ring
//! and the clock); the test thread polls like the foreground loop.

use std::num::NonZeroU32;
use std::thread;

use prop_tach::speed::{blade_freq_hz, shaft_rpm};
use prop_tach::{BladeRing, ManualClock, ShaftState, Tachometer, TachometerConfig};

const PERIOD_US: u32 = 1_000;
const CROSSINGS: u32 = 2_000;
const WINDOW: usize = 8;

#[test]
fn test_concurrent_reads_see_whole_periods() {
    let ring = BladeRing::<WINDOW>::new();
    let clock = ManualClock::new(0);

    // Generous threshold: a reader delayed by many crossings still sees a
    // value, but a wrapped `now - last` would not fit
    let config = TachometerConfig::new(NonZeroU32::new(2).unwrap(), 4)
        .with_max_blade_time_us(u32::MAX / 2);
    let tach = Tachometer::new(&ring, &clock, config);

    thread::scope(|s| {
        let producer = s.spawn(|| {
            for _ in 0..CROSSINGS {
                let now = clock.advance(PERIOD_US);
                ring.on_blade_crossing(now);
            }
        });

        let mut polls = 0u32;
        while !producer.is_finished() || polls == 0 {
            let speed = tach.prop_speed();
            polls += 1;

            // Stopped only until the first period lands in the ring
            let expected = if speed.blade_period_us > 0.0 {
                ShaftState::Spinning
            } else {
                ShaftState::Stopped
            };
            assert_eq!(tach.shaft_state(), expected);

            // Slots only ever go from 0 to PERIOD_US, so the sum is a whole
            // number of periods
            let slots = speed.blade_period_us * WINDOW as f32 / PERIOD_US as f32;
            assert_eq!(slots, slots.round(), "torn average {}", speed.blade_period_us);
            assert!(slots <= WINDOW as f32);

            assert_eq!(speed.blade_freq_hz, blade_freq_hz(speed.blade_period_us));
            assert_eq!(speed.rpm, shaft_rpm(speed.blade_freq_hz, 2.0));
        }
    });

    assert_eq!(ring.crossings(), CROSSINGS);
    assert_eq!(tach.avg_blade_period_us(), PERIOD_US as f32);
    assert_eq!(tach.rpm(), 30_000.0);
}

#[test]
fn test_reading_decays_after_producer_stops() {
    let ring = BladeRing::<WINDOW>::new();
    let clock = ManualClock::new(0);
    let config = TachometerConfig::new(NonZeroU32::new(3).unwrap(), 4)
        .with_max_blade_time_us(50_000);
    let tach = Tachometer::new(&ring, &clock, config);

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..100 {
                ring.on_blade_crossing(clock.advance(5_000));
            }
        });
    });

    assert_eq!(tach.avg_blade_period_us(), 5_000.0);
    assert_eq!(tach.rpm(), 4_000.0);

    clock.advance(50_001);
    assert!(tach.prop_speed().is_stopped());
    assert_eq!(tach.shaft_state(), ShaftState::Stopped);
}

#[test]
fn test_never_spinning_with_zero_reading() {
    let ring = BladeRing::<WINDOW>::new();
    let clock = ManualClock::new(0);
    let config = TachometerConfig::new(NonZeroU32::new(2).unwrap(), 4)
        .with_max_blade_time_us(u32::MAX / 2);
    let tach = Tachometer::new(&ring, &clock, config);

    thread::scope(|s| {
        let producer = s.spawn(|| {
            for _ in 0..CROSSINGS {
                ring.on_blade_crossing(clock.advance(PERIOD_US));
            }
        });

        while !producer.is_finished() {
            let speed = tach.prop_speed();
            assert_eq!(
                tach.shaft_state() == ShaftState::Spinning,
                !speed.is_stopped()
            );
        }
    });
}
