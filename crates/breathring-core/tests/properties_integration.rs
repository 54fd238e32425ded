//! Property tests for elapsed-time accounting, lap geometry and the breath
//! pulse.

use std::time::Duration;

use breathring_core::timer::{BreathCycle, BreathShape, ProgressGeometry};
use breathring_core::{Config, ManualClock, TimerConfig, TimerEngine, TimerState};
use proptest::prelude::*;

fn engine(total_ms: u64) -> (TimerEngine<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let config = TimerConfig::new(total_ms, 5000, 5000, 0.6, 0.9).unwrap();
    let engine = TimerEngine::new(Config::from(config), clock.clone()).unwrap();
    (engine, clock)
}

proptest! {
    #[test]
    fn paused_wall_time_never_counts(
        spans in prop::collection::vec((0u64..5_000, 0u64..100_000), 1..20)
    ) {
        let (mut engine, clock) = engine(10_000_000);
        engine.start();

        let mut running_ms = 0u64;
        for (run, idle) in spans {
            clock.advance_ms(run);
            engine.tick();
            running_ms += run;

            engine.pause_or_resume();
            let at_pause = engine.accumulated_elapsed();
            prop_assert_eq!(at_pause, Duration::from_millis(running_ms));

            clock.advance_ms(idle);
            engine.pause_or_resume();
            prop_assert_eq!(engine.elapsed(), at_pause);
        }
    }

    #[test]
    fn lap_index_is_monotonic_and_alternates(a in 0u64..10_000_000, b in 0u64..10_000_000) {
        let g = ProgressGeometry::new(18.0);
        let total = Duration::from_secs(60);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let s_lo = g.sample(Duration::from_millis(lo), total);
        let s_hi = g.sample(Duration::from_millis(hi), total);

        prop_assert!(s_hi.lap_index >= s_lo.lap_index);
        prop_assert_eq!(s_lo.lap_index, (lo as f64 / 1000.0 * 18.0 / 360.0).floor() as u64);
        prop_assert_eq!(s_lo.is_erasing_lap, s_lo.lap_index % 2 == 1);
        prop_assert!(s_lo.normalized_angle_deg >= -90.0 && s_lo.normalized_angle_deg < 270.0);
        prop_assert!(s_lo.cycle_progress >= 0.0 && s_lo.cycle_progress < 1.0);
        prop_assert!(s_lo.fraction_of_total >= 0.0 && s_lo.fraction_of_total <= 1.0);
    }

    #[test]
    fn completion_fires_once_regardless_of_frame_timing(
        total in 100u64..20_000,
        steps in prop::collection::vec(1u64..3_000, 1..200)
    ) {
        let (mut engine, clock) = engine(total);
        let mut completions = 0;
        engine.start();
        for step in steps {
            clock.advance_ms(step);
            if engine.tick().is_some() {
                completions += 1;
            }
        }
        // Keep delivering frames well past the end.
        clock.advance_ms(total);
        if engine.tick().is_some() {
            completions += 1;
        }
        clock.advance_ms(1);
        prop_assert!(engine.tick().is_none());

        prop_assert_eq!(completions, 1);
        prop_assert_eq!(engine.state(), TimerState::Complete);
        prop_assert_eq!(engine.accumulated_elapsed(), Duration::from_millis(total));
    }

    #[test]
    fn stop_always_returns_to_initial(run in 0u64..50_000, pause_first in any::<bool>()) {
        let (mut engine, clock) = engine(60_000);
        engine.start();
        clock.advance_ms(run);
        engine.tick();
        if pause_first && engine.state() == TimerState::Running {
            engine.pause_or_resume();
        }
        engine.stop();
        prop_assert_eq!(engine.state(), TimerState::Initial);
        prop_assert_eq!(engine.accumulated_elapsed(), Duration::ZERO);
    }

    #[test]
    fn breath_radius_stays_in_range(start in 60.0f64..100.0, dts in prop::collection::vec(0u64..20_000, 1..50)) {
        let shape = BreathShape::new(66.0, 99.0, Duration::from_millis(4000), Duration::from_millis(6000));
        let mut cycle = BreathCycle::starting_at(&shape, start);
        for dt in dts {
            cycle.advance(&shape, Duration::from_millis(dt));
            let r = cycle.radius(&shape);
            prop_assert!((66.0 - 1e-9..=99.0 + 1e-9).contains(&r));
        }
    }
}
