//! Fixed-rate tick loop
//!
//! # State machine
//!
//! ```text
//!  Idle ──run()──▶ Running ──running flag cleared──▶ Stopped
//!                   │    ▲
//!                   └────┘ one tick per interval
//! ```
//!
//! # Tick
//!
//! ```text
//! 1. t0 = now
//! 2. sample every device in tracking-set order (failures skipped)
//! 3. encode successes into one immediate bundle
//! 4. send the bundle as one datagram
//! 5. notify observers with the TickReport
//! 6. sleep max(0, interval - (now - t0))
//! ```
//!
//! Overruns are not compensated: a late tick is followed immediately by the
//! next one, never by a burst of catch-up ticks.

use crate::core::driver::TrackingDriver;
use crate::core::types::{RotationMode, TickReport, TrackedSample, TrackingSet};
use crate::error::{Error, Result};
use crate::observers::TickObserver;
use crate::sampler;
use crate::streaming::encoder::{self, TYPICAL_MESSAGE_LEN};
use crate::streaming::udp_publisher::Dispatcher;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Highest accepted tick rate
pub const MAX_FREQUENCY_HZ: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Tick interval for a rate in Hz
pub fn interval_from_hz(hz: u32) -> Result<Duration> {
    if hz == 0 || hz > MAX_FREQUENCY_HZ {
        return Err(Error::Config(format!(
            "Frequency must be 1-{} Hz, got {}",
            MAX_FREQUENCY_HZ, hz
        )));
    }
    Ok(Duration::from_nanos(1_000_000_000 / hz as u64))
}

/// Time left in the interval after `elapsed` of work, clamped at zero
#[inline]
pub fn remaining_sleep(elapsed: Duration, interval: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

pub struct Scheduler<D: TrackingDriver, T: Dispatcher> {
    driver: D,
    dispatcher: T,
    tracking: TrackingSet,
    mode: RotationMode,
    interval: Duration,
    observers: Vec<Box<dyn TickObserver>>,
    state: SchedulerState,
    tick: u64,
    /// Reused send buffer
    buffer: Vec<u8>,
}

impl<D: TrackingDriver, T: Dispatcher> Scheduler<D, T> {
    pub fn new(
        driver: D,
        dispatcher: T,
        tracking: TrackingSet,
        mode: RotationMode,
        interval: Duration,
    ) -> Self {
        let buffer = Vec::with_capacity(16 + tracking.len() * TYPICAL_MESSAGE_LEN);
        Self {
            driver,
            dispatcher,
            tracking,
            mode,
            interval,
            observers: Vec::new(),
            state: SchedulerState::Idle,
            tick: 0,
            buffer,
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn TickObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn tracking(&self) -> &TrackingSet {
        &self.tracking
    }

    /// Ticks completed so far
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Sample, encode and send once. Does not sleep or notify observers.
    pub fn tick(&mut self) -> TickReport {
        let start = Instant::now();
        let mut samples = Vec::with_capacity(self.tracking.len());
        let mut failed = Vec::new();

        for device in self.tracking.iter() {
            match sampler::sample(&mut self.driver, device, self.mode) {
                Ok(sample) => samples.push(TrackedSample {
                    address: device.address.clone(),
                    sample,
                }),
                Err(e) => {
                    log::debug!("Sample failed for {}: {}", device.address, e);
                    failed.push(device.address.clone());
                }
            }
        }

        encoder::encode_to_buffer(&samples, &mut self.buffer);
        let bytes = self.buffer.len();
        // Dispatcher logs failures itself
        let sent = self.dispatcher.send(&self.buffer).is_ok();

        let work = start.elapsed();
        let report = TickReport {
            tick: self.tick,
            samples,
            failed,
            bytes,
            sent,
            work,
            sleep: remaining_sleep(work, self.interval),
        };
        self.tick += 1;

        log::trace!(
            "Tick {}: {} sent, {} failed, {} bytes, work {:?}",
            report.tick,
            report.samples.len(),
            report.failed.len(),
            report.bytes,
            report.work
        );
        report
    }

    /// One full loop iteration: tick, observers, then sleep out the interval
    pub fn step(&mut self) -> TickReport {
        let start = Instant::now();
        let report = self.tick();
        for observer in &mut self.observers {
            observer.on_tick(&report);
        }

        let sleep = remaining_sleep(start.elapsed(), self.interval);
        if !sleep.is_zero() {
            thread::sleep(sleep);
        }
        report
    }

    /// Run until `running` is cleared. Returns the number of ticks run.
    pub fn run(&mut self, running: &AtomicBool) -> u64 {
        self.run_ticks(0, running)
    }

    /// Run at most `limit` ticks (0 = unlimited), stopping early if
    /// `running` is cleared.
    pub fn run_ticks(&mut self, limit: u64, running: &AtomicBool) -> u64 {
        self.state = SchedulerState::Running;
        log::info!(
            "Tick loop running: {} devices every {:?} ({})",
            self.tracking.len(),
            self.interval,
            self.mode
        );

        let mut count = 0;
        while running.load(Ordering::Relaxed) && (limit == 0 || count < limit) {
            self.step();
            count += 1;
        }

        self.state = SchedulerState::Stopped;
        log::info!("Tick loop stopped after {} ticks", count);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_hz() {
        assert_eq!(interval_from_hz(250).unwrap(), Duration::from_millis(4));
        assert_eq!(interval_from_hz(1).unwrap(), Duration::from_secs(1));
        assert!(interval_from_hz(0).is_err());
        assert!(interval_from_hz(MAX_FREQUENCY_HZ + 1).is_err());
    }

    #[test]
    fn test_remaining_sleep_never_negative() {
        let interval = Duration::from_millis(4);
        assert_eq!(
            remaining_sleep(Duration::from_millis(1), interval),
            Duration::from_millis(3)
        );
        assert_eq!(remaining_sleep(interval, interval), Duration::ZERO);
        assert_eq!(
            remaining_sleep(Duration::from_millis(50), interval),
            Duration::ZERO
        );
    }
}
