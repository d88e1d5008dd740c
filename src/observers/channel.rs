//! Forwards tick reports to another thread over a bounded channel.

use super::TickObserver;
use crate::core::types::TickReport;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Non-blocking hand-off of tick reports
///
/// When the receiver falls behind, reports are dropped rather than stalling
/// the loop.
pub struct ChannelObserver {
    tx: Sender<TickReport>,
    dropped: u64,
    disconnected: bool,
}

impl ChannelObserver {
    /// Create the observer and its receiving end
    pub fn new(capacity: usize) -> (Self, Receiver<TickReport>) {
        let (tx, rx) = bounded(capacity);
        (
            Self {
                tx,
                dropped: 0,
                disconnected: false,
            },
            rx,
        )
    }

    /// Reports dropped because the channel was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl TickObserver for ChannelObserver {
    fn on_tick(&mut self, report: &TickReport) {
        if self.disconnected {
            return;
        }
        match self.tx.try_send(report.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.dropped += 1,
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("Tick report receiver gone, channel observer idle");
                self.disconnected = true;
            }
        }
    }
}
