//! TrackingDriver trait definition

use crate::core::types::{DeviceHandle, DiscoveredDevice, PoseMatrix};
use crate::error::Result;

/// Tracking runtime abstraction
///
/// Calls must be bounded: a driver that cannot produce a pose returns an
/// error instead of blocking.
pub trait TrackingDriver: Send {
    /// Human-readable driver name for logs
    fn name(&self) -> &str;

    /// Connect to the tracking runtime
    ///
    /// Failure here is fatal at startup ("driver unavailable").
    fn initialize(&mut self) -> Result<()>;

    /// All devices currently visible, in discovery order
    fn list_devices(&self) -> Result<Vec<DiscoveredDevice>>;

    /// Current device-to-absolute-tracking transform for one device
    fn pose(&mut self, handle: DeviceHandle) -> Result<PoseMatrix>;
}

impl<D: TrackingDriver + ?Sized> TrackingDriver for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn initialize(&mut self) -> Result<()> {
        (**self).initialize()
    }

    fn list_devices(&self) -> Result<Vec<DiscoveredDevice>> {
        (**self).list_devices()
    }

    fn pose(&mut self, handle: DeviceHandle) -> Result<PoseMatrix> {
        (**self).pose(handle)
    }
}
