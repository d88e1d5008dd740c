//! Periodic loop statistics in the log.

use super::TickObserver;
use crate::core::types::TickReport;
use std::time::{Duration, Instant};

/// Counters for one reporting window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsWindow {
    pub ticks: u64,
    pub overruns: u64,
    pub sample_failures: u64,
    pub send_failures: u64,
    pub messages: u64,
    pub work_total: Duration,
    pub work_max: Duration,
}

impl StatsWindow {
    pub fn mean_work(&self) -> Duration {
        if self.ticks == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(self.work_total.as_secs_f64() / self.ticks as f64)
        }
    }

    fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.messages += report.samples.len() as u64;
        self.sample_failures += report.failed.len() as u64;
        if !report.sent {
            self.send_failures += 1;
        }
        if report.overran() {
            self.overruns += 1;
        }
        self.work_total += report.work;
        self.work_max = self.work_max.max(report.work);
    }
}

/// Logs a summary line every `interval`
pub struct StatsLogger {
    interval: Duration,
    window_start: Instant,
    window: StatsWindow,
}

impl StatsLogger {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_start: Instant::now(),
            window: StatsWindow::default(),
        }
    }

    /// Counters accumulated since the last summary
    pub fn window(&self) -> &StatsWindow {
        &self.window
    }

    fn flush(&mut self, now: Instant) {
        let span = now.duration_since(self.window_start).as_secs_f64();
        let w = &self.window;
        let rate = if span > 0.0 { w.ticks as f64 / span } else { 0.0 };
        log::info!(
            "{} ticks ({:.1} Hz), {} messages, work mean {:?} max {:?}, {} overruns, {} sample failures, {} send failures",
            w.ticks,
            rate,
            w.messages,
            w.mean_work(),
            w.work_max,
            w.overruns,
            w.sample_failures,
            w.send_failures
        );
        self.window = StatsWindow::default();
        self.window_start = now;
    }
}

impl TickObserver for StatsLogger {
    fn on_tick(&mut self, report: &TickReport) {
        self.window.record(report);
        let now = Instant::now();
        if now.duration_since(self.window_start) >= self.interval {
            self.flush(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_window_counts() {
        let mut stats = StatsLogger::new(Duration::from_secs(3600));
        stats.on_tick(&TickReport {
            failed: vec!["/hmd/1".into()],
            sent: true,
            work: Duration::from_millis(1),
            sleep: Duration::from_millis(3),
            ..Default::default()
        });
        stats.on_tick(&TickReport {
            sent: false,
            work: Duration::from_millis(5),
            sleep: Duration::ZERO,
            ..Default::default()
        });

        let w = stats.window();
        assert_eq!(w.ticks, 2);
        assert_eq!(w.overruns, 1);
        assert_eq!(w.sample_failures, 1);
        assert_eq!(w.send_failures, 1);
        assert_relative_eq!(w.mean_work().as_secs_f64(), 0.003, epsilon = 1e-9);
        assert_eq!(w.work_max, Duration::from_millis(5));
    }

    #[test]
    fn test_window_resets_after_interval() {
        let mut stats = StatsLogger::new(Duration::ZERO);
        stats.on_tick(&TickReport::default());
        assert_eq!(stats.window().ticks, 0);
    }

    #[test]
    fn test_mean_work_beyond_u32_ticks() {
        let window = StatsWindow {
            ticks: 1 << 32,
            work_total: Duration::from_millis(1 << 32),
            ..Default::default()
        };
        assert_relative_eq!(window.mean_work().as_secs_f64(), 0.001, epsilon = 1e-9);
    }
}
