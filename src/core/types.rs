//! Core data types for devices, poses, and tick results.
//!
//! Key types:
//! - [`Device`]: One enumerated device with its stable per-category id and OSC address
//! - [`TrackingSet`]: Ordered, immutable list of devices polled every tick
//! - [`PoseSample`]: Position plus orientation in the run's [`RotationMode`]
//! - [`TickReport`]: Everything one tick produced, handed to observers

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Device category as used on the wire and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Head-mounted display
    Hmd,
    /// Hand controller
    Controller,
    /// Generic (puck) tracker
    Tracker,
    /// Base station / lighthouse
    TrackingReference,
}

impl Category {
    /// All categories in canonical order
    pub const ALL: [Category; 4] = [
        Category::Hmd,
        Category::Controller,
        Category::Tracker,
        Category::TrackingReference,
    ];

    /// Name used in OSC addresses and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hmd => "hmd",
            Category::Controller => "controller",
            Category::Tracker => "tracker",
            Category::TrackingReference => "tracking_reference",
        }
    }

    /// Map a driver device class to its category (`None` for unsupported classes)
    pub fn from_class(class: DeviceClass) -> Option<Self> {
        match class {
            DeviceClass::Hmd => Some(Category::Hmd),
            DeviceClass::Controller => Some(Category::Controller),
            DeviceClass::GenericTracker => Some(Category::Tracker),
            DeviceClass::TrackingReference => Some(Category::TrackingReference),
            DeviceClass::Other => None,
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hmd" | "headset" => Ok(Category::Hmd),
            "controller" => Ok(Category::Controller),
            "tracker" => Ok(Category::Tracker),
            "tracking_reference" | "tracking reference" | "base_station" => {
                Ok(Category::TrackingReference)
            }
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device class as reported by the tracking driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Hmd,
    Controller,
    GenericTracker,
    TrackingReference,
    /// Anything the bridge does not forward (displays, invalid slots)
    Other,
}

/// Opaque driver handle (device index in the tracking runtime)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceHandle(pub u32);

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raw device entry returned by [`crate::core::driver::TrackingDriver::list_devices`]
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredDevice {
    pub handle: DeviceHandle,
    pub class: DeviceClass,
    pub serial: String,
}

/// An enumerated device. Built once by the registry, never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub category: Category,
    /// 1-based ordinal within the category, in discovery order
    pub id: u32,
    pub handle: DeviceHandle,
    pub serial: String,
    /// OSC address `/<category>/<id>`
    pub address: Arc<str>,
}

impl Device {
    pub fn new(category: Category, id: u32, handle: DeviceHandle, serial: String) -> Self {
        let address: Arc<str> = format!("/{}/{}", category.as_str(), id).into();
        Self {
            category,
            id,
            handle,
            serial,
            address,
        }
    }
}

/// Ordered list of devices polled every tick.
///
/// Read-only once built; shared by every tick of the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingSet {
    devices: Vec<Device>,
}

impl TrackingSet {
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Device> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Number of devices in the given category
    pub fn count(&self, category: Category) -> usize {
        self.devices
            .iter()
            .filter(|d| d.category == category)
            .count()
    }

    /// OSC addresses in polling order
    pub fn addresses(&self) -> Vec<&str> {
        self.devices.iter().map(|d| &*d.address).collect()
    }
}

impl<'a> IntoIterator for &'a TrackingSet {
    type Item = &'a Device;
    type IntoIter = std::slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}

/// Row-major 3x4 device-to-absolute-tracking transform (rotation | translation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseMatrix(pub [[f32; 4]; 3]);

impl PoseMatrix {
    pub const IDENTITY: PoseMatrix = PoseMatrix([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
    ]);

    /// Translation column
    #[inline]
    pub fn translation(&self) -> [f32; 3] {
        [self.0[0][3], self.0[1][3], self.0[2][3]]
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.iter().flatten().all(|v| v.is_finite())
    }
}

/// Rotation representation, fixed for the whole run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RotationMode {
    /// Yaw, pitch, roll in degrees
    #[default]
    Euler,
    /// Unit quaternion (w, x, y, z)
    Quaternion,
}

impl fmt::Display for RotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationMode::Euler => f.write_str("euler"),
            RotationMode::Quaternion => f.write_str("quaternion"),
        }
    }
}

/// Orientation in one of the two representations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Orientation {
    Euler { yaw: f32, pitch: f32, roll: f32 },
    Quaternion { w: f32, x: f32, y: f32, z: f32 },
}

/// One device pose taken during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    pub position: [f32; 3],
    pub orientation: Orientation,
}

impl PoseSample {
    pub fn euler(position: [f32; 3], yaw: f32, pitch: f32, roll: f32) -> Self {
        Self {
            position,
            orientation: Orientation::Euler { yaw, pitch, roll },
        }
    }

    pub fn quaternion(position: [f32; 3], w: f32, x: f32, y: f32, z: f32) -> Self {
        Self {
            position,
            orientation: Orientation::Quaternion { w, x, y, z },
        }
    }

    /// Flattened payload: position followed by orientation components
    pub fn values(&self) -> Vec<f32> {
        let [px, py, pz] = self.position;
        match self.orientation {
            Orientation::Euler { yaw, pitch, roll } => vec![px, py, pz, yaw, pitch, roll],
            Orientation::Quaternion { w, x, y, z } => vec![px, py, pz, w, x, y, z],
        }
    }
}

/// A successful sample paired with the device's OSC address
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedSample {
    pub address: Arc<str>,
    pub sample: PoseSample,
}

/// Result of one tick, handed to every observer
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Tick counter, starting at 0
    pub tick: u64,
    /// Successful samples in tracking-set order
    pub samples: Vec<TrackedSample>,
    /// Addresses of devices whose sample failed this tick
    pub failed: Vec<Arc<str>>,
    /// Encoded bundle size
    pub bytes: usize,
    /// Whether the datagram was handed to the socket
    pub sent: bool,
    /// Time spent sampling, encoding, and sending
    pub work: Duration,
    /// Planned sleep before the next tick (zero on overrun)
    pub sleep: Duration,
}

impl TickReport {
    /// True if the tick's work took at least the whole interval
    pub fn overran(&self) -> bool {
        self.sleep.is_zero()
    }

    pub fn sample_for(&self, address: &str) -> Option<&PoseSample> {
        self.samples
            .iter()
            .find(|s| &*s.address == address)
            .map(|s| &s.sample)
    }
}
