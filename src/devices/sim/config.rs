//! Simulated runtime configuration
//!
//! Every field has a default, so an empty `[driver.simulation]` table (or
//! none at all) yields a room-scale setup:
//!
//! | Device | Count | Motion |
//! |--------|-------|--------|
//! | hmd | 1 | slow orbit at head height |
//! | controller | 2 | faster orbits either side |
//! | generic_tracker | 2 | waist and foot |
//! | tracking_reference | 2 | static, opposite corners |
//!
//! The simulated frame is Z-up: devices orbit in the X-Y plane and bob
//! along Z; heading is reported as yaw.

use crate::core::types::DeviceClass;
use serde::Deserialize;

/// Top-level simulation settings
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// `false` makes initialization fail like an absent runtime
    #[serde(default = "default_available")]
    pub available: bool,

    /// 0 = random each run
    #[serde(default)]
    pub random_seed: u64,

    /// Position noise standard deviation (meters)
    #[serde(default = "default_position_stddev")]
    pub position_stddev: f32,

    /// Simulated devices in discovery order (empty = default room)
    #[serde(default)]
    pub devices: Vec<SimDeviceConfig>,
}

fn default_available() -> bool {
    true
}
fn default_position_stddev() -> f32 {
    0.0005
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            available: default_available(),
            random_seed: 0,
            position_stddev: default_position_stddev(),
            devices: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Configured devices, or the default room if none are configured
    pub fn devices_or_default(&self) -> Vec<SimDeviceConfig> {
        if self.devices.is_empty() {
            default_room()
        } else {
            self.devices.clone()
        }
    }
}

/// One simulated device
#[derive(Debug, Clone, Deserialize)]
pub struct SimDeviceConfig {
    pub class: DeviceClass,

    /// Reported serial (generated from class and index if absent)
    #[serde(default)]
    pub serial: Option<String>,

    /// Orbit center [x, y, z] (meters)
    #[serde(default)]
    pub center: [f32; 3],

    /// Orbit radius (meters, 0 = stationary)
    #[serde(default)]
    pub radius: f32,

    /// Orbit rate (rad/s)
    #[serde(default)]
    pub angular_speed: f32,

    /// Starting angle on the orbit (rad)
    #[serde(default)]
    pub phase: f32,

    /// Vertical bob amplitude (meters)
    #[serde(default)]
    pub height_amplitude: f32,

    /// Probability a pose query fails (1.0 = never tracks)
    #[serde(default)]
    pub dropout_rate: f32,
}

impl SimDeviceConfig {
    fn moving(class: DeviceClass, center: [f32; 3], radius: f32, speed: f32, phase: f32) -> Self {
        Self {
            class,
            serial: None,
            center,
            radius,
            angular_speed: speed,
            phase,
            height_amplitude: 0.02,
            dropout_rate: 0.0,
        }
    }

    fn fixed(class: DeviceClass, center: [f32; 3], heading: f32) -> Self {
        Self {
            class,
            serial: None,
            center,
            radius: 0.0,
            angular_speed: 0.0,
            phase: heading,
            height_amplitude: 0.0,
            dropout_rate: 0.0,
        }
    }
}

fn default_room() -> Vec<SimDeviceConfig> {
    use std::f32::consts::PI;
    vec![
        SimDeviceConfig::moving(DeviceClass::Hmd, [0.0, 0.0, 1.7], 0.3, 0.5, 0.0),
        SimDeviceConfig::fixed(DeviceClass::TrackingReference, [-2.0, -2.0, 2.4], PI / 4.0),
        SimDeviceConfig::moving(DeviceClass::Controller, [0.0, 0.25, 1.2], 0.4, 1.0, 0.0),
        SimDeviceConfig::moving(DeviceClass::Controller, [0.0, -0.25, 1.2], 0.4, 1.0, PI),
        SimDeviceConfig::moving(DeviceClass::GenericTracker, [0.0, 0.0, 1.0], 0.3, 0.5, 0.0),
        SimDeviceConfig::moving(DeviceClass::GenericTracker, [0.0, 0.1, 0.1], 0.3, 0.5, 0.0),
        SimDeviceConfig::fixed(
            DeviceClass::TrackingReference,
            [2.0, 2.0, 2.4],
            -3.0 * PI / 4.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_room_layout() {
        let devices = SimulationConfig::default().devices_or_default();
        let count = |class| devices.iter().filter(|d| d.class == class).count();
        assert_eq!(count(DeviceClass::Hmd), 1);
        assert_eq!(count(DeviceClass::Controller), 2);
        assert_eq!(count(DeviceClass::GenericTracker), 2);
        assert_eq!(count(DeviceClass::TrackingReference), 2);
    }

    #[test]
    fn test_device_table_parses() {
        let toml_content = r#"
random_seed = 9
position_stddev = 0.0

[[devices]]
class = "generic_tracker"
serial = "LHR-TEST"
center = [1.0, 2.0, 0.5]
radius = 0.2
dropout_rate = 1.0

[[devices]]
class = "controller"
"#;
        let config: SimulationConfig = toml::from_str(toml_content).unwrap();
        assert!(config.available);
        assert_eq!(config.random_seed, 9);
        assert_eq!(config.devices.len(), 2);
        assert_eq!(config.devices[0].serial.as_deref(), Some("LHR-TEST"));
        assert_eq!(config.devices[0].dropout_rate, 1.0);
        assert_eq!(config.devices[1].class, DeviceClass::Controller);
        assert_eq!(config.devices[1].radius, 0.0);
    }
}
