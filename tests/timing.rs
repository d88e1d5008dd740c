//! Tick cadence tests. Bounds are loose to tolerate loaded CI machines.

mod common;

use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use common::{fixed, RecordingDispatcher, ScriptedDriver};
use tracking_osc::core::types::{Category, DeviceClass, RotationMode};
use tracking_osc::registry;
use tracking_osc::Scheduler;

fn scheduler(
    query_cost: Duration,
    interval: Duration,
) -> Scheduler<ScriptedDriver, RecordingDispatcher> {
    let mut driver =
        ScriptedDriver::new(vec![(DeviceClass::Hmd, fixed([0.0; 3], 0.0, 0.0, 0.0))]);
    driver.query_cost = query_cost;
    let tracking = registry::enumerate(&driver, &[Category::Hmd]).unwrap();
    Scheduler::new(
        driver,
        RecordingDispatcher::default(),
        tracking,
        RotationMode::Euler,
        interval,
    )
}

#[test]
fn test_period_converges_to_interval() {
    let interval = Duration::from_millis(5);
    let ticks = 40;
    let mut scheduler = scheduler(Duration::ZERO, interval);
    let running = AtomicBool::new(true);

    let start = Instant::now();
    assert_eq!(scheduler.run_ticks(ticks, &running), ticks);
    let elapsed = start.elapsed();

    // Each tick lasts at least one interval; sleeping overshoots a little
    assert!(elapsed >= interval * ticks as u32, "elapsed {:?}", elapsed);
    let period = elapsed / ticks as u32;
    assert!(
        period < interval * 2,
        "mean period {:?} for interval {:?}",
        period,
        interval
    );
}

#[test]
fn test_zero_cost_ticks_plan_a_sleep() {
    let mut scheduler = scheduler(Duration::ZERO, Duration::from_millis(20));
    let report = scheduler.tick();
    assert!(!report.overran());
    assert!(report.sleep <= Duration::from_millis(20));
    assert!(report.sleep + report.work <= Duration::from_millis(20) + Duration::from_micros(1));
}

#[test]
fn test_overrun_never_sleeps_or_catches_up() {
    let interval = Duration::from_millis(1);
    let mut scheduler = scheduler(Duration::from_millis(4), interval);

    let start = Instant::now();
    for _ in 0..5 {
        let report = scheduler.step();
        assert!(report.work >= Duration::from_millis(4));
        assert_eq!(report.sleep, Duration::ZERO);
        assert!(report.overran());
    }
    // Five overrunning ticks, no extra ticks squeezed in to catch up
    assert_eq!(scheduler.ticks(), 5);
    assert!(start.elapsed() >= Duration::from_millis(20));
}
