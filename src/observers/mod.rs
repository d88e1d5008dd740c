//! Tick observers
//!
//! The scheduler hands every [`TickReport`] to each registered observer after
//! the bundle is sent. Observers run on the loop thread and must stay cheap;
//! anything slow belongs behind [`ChannelObserver`].

pub mod channel;
pub mod console;
pub mod stats;

use crate::core::types::TickReport;

pub use channel::ChannelObserver;
pub use console::ConsoleTable;
pub use stats::StatsLogger;

/// Receives the result of every tick
pub trait TickObserver {
    fn on_tick(&mut self, report: &TickReport);
}
