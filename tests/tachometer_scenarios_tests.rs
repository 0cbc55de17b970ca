//! Tachometer behavior scenarios
//!
//! Every test drives its own `BladeRing` with a `ManualClock`, calling the
//! interrupt body directly, so tests stay independent of the global ring.

use std::num::NonZeroU32;

use prop_tach::speed::{blade_freq_hz, shaft_rpm};
use prop_tach::{BladeRing, ManualClock, MicrosClock, ShaftState, Tachometer, TachometerConfig};

fn config(blades: u32, max_blade_time_us: u32) -> TachometerConfig {
    TachometerConfig::new(NonZeroU32::new(blades).unwrap(), 4)
        .with_max_blade_time_us(max_blade_time_us)
}

/// Emulate interrupts `intervals` apart, advancing the clock with them.
fn feed<const N: usize>(ring: &BladeRing<N>, clock: &ManualClock, intervals: &[u32]) {
    for &interval in intervals {
        let now = clock.advance(interval);
        ring.on_blade_crossing(now);
    }
}

#[test]
fn test_scenario_a_steady_window() {
    let ring = BladeRing::<12>::new();
    let clock = ManualClock::new(0);
    let tach = Tachometer::new(&ring, &clock, config(2, 500_000));

    feed(&ring, &clock, &[10_000; 12]);

    assert_eq!(tach.avg_blade_period_us(), 10_000.0);
    assert_eq!(tach.blade_freq_hz(), 100.0);
    assert_eq!(tach.rpm(), 3_000.0);
}

#[test]
fn test_scenario_b_no_crossings() {
    let ring = BladeRing::<12>::new();
    let clock = ManualClock::new(600_000);
    let tach = Tachometer::new(&ring, &clock, config(2, 500_000));

    assert_eq!(tach.avg_blade_period_us(), 0.0);
    assert_eq!(tach.blade_freq_hz(), 0.0);
    assert_eq!(tach.rpm(), 0.0);
    assert_eq!(tach.shaft_state(), ShaftState::Stopped);
}

#[test]
fn test_boot_inside_threshold_reads_stopped() {
    let ring = BladeRing::<12>::new();
    let clock = ManualClock::new(100_000);
    let tach = Tachometer::new(&ring, &clock, config(2, 500_000));

    // Last crossing is the zero default, well inside the threshold
    let speed = tach.prop_speed();

    assert!(speed.is_stopped());
    assert_eq!(tach.shaft_state(), ShaftState::Stopped);
    assert_eq!(tach.avg_blade_period_us(), 0.0);
    assert_eq!(tach.blade_freq_hz(), 0.0);
    assert_eq!(tach.rpm(), 0.0);

    // First crossing makes it spin
    ring.on_blade_crossing(clock.advance(10_000));
    assert!(!tach.prop_speed().is_stopped());
    assert_eq!(tach.shaft_state(), ShaftState::Spinning);
}

#[test]
fn test_scenario_c_irregular_intervals() {
    let ring = BladeRing::<3>::new();
    let clock = ManualClock::new(0);
    let tach = Tachometer::new(&ring, &clock, config(1, 500_000));

    feed(&ring, &clock, &[5_000, 15_000, 10_000]);

    let speed = tach.prop_speed();
    assert_eq!(speed.blade_period_us, 10_000.0);
    assert_eq!(speed.blade_freq_hz, 100.0);
    assert_eq!(speed.rpm, 6_000.0);
}

#[test]
fn test_scenario_d_wraparound_same_value() {
    let ring = BladeRing::<12>::new();
    let clock = ManualClock::new(0);
    let tach = Tachometer::new(&ring, &clock, config(2, 500_000));

    feed(&ring, &clock, &[8_000; 13]);

    assert_eq!(tach.avg_blade_period_us(), 8_000.0);
    assert_eq!(ring.write_index(), 1);
    assert_eq!(ring.crossings(), 13);
}

#[test]
fn test_staleness_boundary_inclusive() {
    let ring = BladeRing::<4>::new();
    let clock = ManualClock::new(0);
    let tach = Tachometer::new(&ring, &clock, config(2, 500_000));

    feed(&ring, &clock, &[10_000; 4]);

    // Exactly at the threshold: still spinning
    clock.advance(500_000);
    assert_eq!(tach.avg_blade_period_us(), 10_000.0);
    assert_eq!(tach.shaft_state(), ShaftState::Spinning);

    // One microsecond past: stopped
    clock.advance(1);
    assert_eq!(tach.avg_blade_period_us(), 0.0);
    assert_eq!(tach.shaft_state(), ShaftState::Stopped);
}

#[test]
fn test_p1_stale_reads_zero_for_all_configs() {
    for blades in 1..=6 {
        for &threshold in &[1_000u32, 250_000, 500_000, 2_000_000] {
            let ring = BladeRing::<5>::new();
            let clock = ManualClock::new(0);
            let tach = Tachometer::new(&ring, &clock, config(blades, threshold));

            feed(&ring, &clock, &[700; 5]);
            clock.advance(threshold + 1);

            assert_eq!(tach.avg_blade_period_us(), 0.0, "blades={} threshold={}", blades, threshold);
            assert_eq!(tach.blade_freq_hz(), 0.0);
            assert_eq!(tach.rpm(), 0.0);
            assert!(tach.prop_speed().is_stopped());
        }
    }
}

#[test]
fn test_p1_stale_across_clock_wrap() {
    let ring = BladeRing::<4>::new();
    let clock = ManualClock::new(u32::MAX - 100_000);
    let tach = Tachometer::new(&ring, &clock, config(2, 500_000));

    feed(&ring, &clock, &[10_000; 4]);
    assert_eq!(tach.avg_blade_period_us(), 10_000.0);

    // Silence that straddles the 32-bit wrap is still silence
    clock.advance(600_000);
    assert_eq!(tach.avg_blade_period_us(), 0.0);
}

#[test]
fn test_p4_snapshot_consistency() {
    let ring = BladeRing::<6>::new();
    let clock = ManualClock::new(0);

    for blades in 1..=4 {
        let tach = Tachometer::new(&ring, &clock, config(blades, 500_000));
        feed(&ring, &clock, &[3_000, 7_000, 11_000, 13_000, 17_000, 19_000]);

        let speed = tach.prop_speed();
        let expected_freq = blade_freq_hz(speed.blade_period_us);
        assert_eq!(speed.blade_freq_hz, expected_freq);
        assert_eq!(speed.rpm, shaft_rpm(expected_freq, blades as f32));
    }
}

#[test]
fn test_p5_windowed_average_and_overwrite() {
    let ring = BladeRing::<4>::new();
    let clock = ManualClock::new(0);
    let tach = Tachometer::new(&ring, &clock, config(2, 500_000));

    feed(&ring, &clock, &[1_000, 2_000, 3_000, 4_000]);
    assert_eq!(tach.avg_blade_period_us(), 10_000.0 / 4.0);

    // Fifth interval replaces the first
    feed(&ring, &clock, &[9_000]);
    assert_eq!(tach.avg_blade_period_us(), (2_000.0 + 3_000.0 + 4_000.0 + 9_000.0) / 4.0);
    assert_eq!(ring.periods_us(), [9_000, 2_000, 3_000, 4_000]);
}

#[test]
fn test_startup_transient_counts_zero_slots() {
    let ring = BladeRing::<12>::new();
    let clock = ManualClock::new(0);
    let tach = Tachometer::new(&ring, &clock, config(2, 500_000));

    feed(&ring, &clock, &[12_000; 3]);

    // 3 of 12 slots written
    assert_eq!(tach.avg_blade_period_us(), 3_000.0);
}

#[test]
fn test_crossing_at_current_time_is_spinning() {
    let ring = BladeRing::<2>::new();
    let clock = ManualClock::new(0);
    let tach = Tachometer::new(&ring, &clock, config(1, 500_000));

    feed(&ring, &clock, &[20_000, 20_000]);

    // Crossing stamped at the current clock reading: zero elapsed
    ring.on_blade_crossing(clock.now_us());
    assert_eq!(tach.shaft_state(), ShaftState::Stopped);
    tach.avg_blade_period_us();
    assert_eq!(tach.shaft_state(), ShaftState::Spinning);
}
