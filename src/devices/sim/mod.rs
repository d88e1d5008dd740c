//! Simulated tracking runtime for hardware-free runs
//!
//! Stands in for a real tracking SDK: devices are described in configuration
//! and move along simple orbits, so listeners receive plausible, continuously
//! changing poses without a headset attached.
//!
//! # Configuration
//!
//! ```toml
//! [driver]
//! type = "sim"
//!
//! [driver.simulation]
//! random_seed = 42          # 0 = random each run
//! position_stddev = 0.0005  # meters
//!
//! [[driver.simulation.devices]]
//! class = "generic_tracker"
//! center = [0.0, 0.0, 1.0]
//! radius = 0.3
//! angular_speed = 0.5       # rad/s
//! dropout_rate = 0.05       # 5% of pose queries fail
//! ```
//!
//! # Motion model
//!
//! For a device with orbit angle `θ = phase + angular_speed * t`:
//!
//! - position = center + (r·cos θ, r·sin θ, h·sin 2θ)
//! - yaw = θ + 90° (facing along the orbit), pitch and roll = 0
//!
//! Stationary devices (radius 0, speed 0) keep yaw = phase.

pub mod config;
mod noise;

use crate::core::driver::TrackingDriver;
use crate::core::math::pose_from_euler;
use crate::core::types::{DeviceClass, DeviceHandle, DiscoveredDevice, PoseMatrix};
use crate::error::{Error, Result};

use config::{SimDeviceConfig, SimulationConfig};
use noise::TrackingNoise;

use std::f32::consts::FRAC_PI_2;
use std::time::Instant;

struct SimDevice {
    config: SimDeviceConfig,
    serial: String,
}

impl SimDevice {
    /// Noise-free pose at `t` seconds into the run
    fn pose_at(&self, t: f32) -> PoseMatrix {
        let c = &self.config;
        let theta = c.phase + c.angular_speed * t;
        let moving = c.radius != 0.0 || c.angular_speed != 0.0;

        let position = [
            c.center[0] + c.radius * theta.cos(),
            c.center[1] + c.radius * theta.sin(),
            c.center[2] + c.height_amplitude * (2.0 * theta).sin(),
        ];
        let heading = if moving { theta + FRAC_PI_2 } else { theta };

        pose_from_euler(position, heading.to_degrees(), 0.0, 0.0)
    }
}

fn class_prefix(class: DeviceClass) -> &'static str {
    match class {
        DeviceClass::Hmd => "HMD",
        DeviceClass::Controller => "CTRL",
        DeviceClass::GenericTracker => "TRK",
        DeviceClass::TrackingReference => "LHB",
        DeviceClass::Other => "DEV",
    }
}

/// Simulated tracking driver
pub struct SimDriver {
    config: SimulationConfig,
    devices: Vec<SimDevice>,
    noise: TrackingNoise,
    started: Option<Instant>,
}

impl SimDriver {
    pub fn new(config: SimulationConfig) -> Self {
        let devices = config
            .devices_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, device)| {
                let serial = device
                    .serial
                    .clone()
                    .unwrap_or_else(|| format!("SIM-{}-{:04}", class_prefix(device.class), index));
                SimDevice {
                    config: device,
                    serial,
                }
            })
            .collect();
        let noise = TrackingNoise::new(config.random_seed);

        Self {
            config,
            devices,
            noise,
            started: None,
        }
    }

    fn device(&self, handle: DeviceHandle) -> Result<&SimDevice> {
        self.devices
            .get(handle.0 as usize)
            .ok_or_else(|| Error::PoseUnavailable {
                handle: handle.0,
                reason: "unknown device".to_string(),
            })
    }
}

impl TrackingDriver for SimDriver {
    fn name(&self) -> &str {
        "simulated"
    }

    fn initialize(&mut self) -> Result<()> {
        if !self.config.available {
            return Err(Error::DriverUnavailable(
                "simulated runtime disabled (available = false)".to_string(),
            ));
        }
        self.started = Some(Instant::now());
        log::info!(
            "Simulated tracking runtime started with {} devices",
            self.devices.len()
        );
        Ok(())
    }

    fn list_devices(&self) -> Result<Vec<DiscoveredDevice>> {
        if self.started.is_none() {
            return Err(Error::DriverUnavailable(
                "simulated runtime not initialized".to_string(),
            ));
        }
        Ok(self
            .devices
            .iter()
            .enumerate()
            .map(|(index, d)| DiscoveredDevice {
                handle: DeviceHandle(index as u32),
                class: d.config.class,
                serial: d.serial.clone(),
            })
            .collect())
    }

    fn pose(&mut self, handle: DeviceHandle) -> Result<PoseMatrix> {
        let t = self
            .started
            .map(|s| s.elapsed().as_secs_f32())
            .ok_or_else(|| Error::DriverUnavailable("simulated runtime not initialized".into()))?;

        let device = self.device(handle)?;
        let dropout_rate = device.config.dropout_rate;
        let mut pose = device.pose_at(t);

        if self.noise.tracking_lost(dropout_rate) {
            return Err(Error::PoseUnavailable {
                handle: handle.0,
                reason: "tracking lost".to_string(),
            });
        }

        self.noise.jitter_translation(&mut pose, self.config.position_stddev);
        Ok(pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::to_euler;
    use approx::assert_relative_eq;

    fn single(device: SimDeviceConfig) -> SimulationConfig {
        SimulationConfig {
            random_seed: 1,
            position_stddev: 0.0,
            devices: vec![device],
            ..Default::default()
        }
    }

    fn tracker() -> SimDeviceConfig {
        SimDeviceConfig {
            class: DeviceClass::GenericTracker,
            serial: None,
            center: [1.0, 2.0, 1.0],
            radius: 0.5,
            angular_speed: 1.0,
            phase: 0.0,
            height_amplitude: 0.0,
            dropout_rate: 0.0,
        }
    }

    #[test]
    fn test_unavailable_runtime_fails_initialize() {
        let mut driver = SimDriver::new(SimulationConfig {
            available: false,
            ..Default::default()
        });
        assert!(matches!(
            driver.initialize(),
            Err(Error::DriverUnavailable(_))
        ));
    }

    #[test]
    fn test_list_requires_initialize() {
        let mut driver = SimDriver::new(SimulationConfig::default());
        assert!(driver.list_devices().is_err());
        driver.initialize().unwrap();
        let listed = driver.list_devices().unwrap();
        assert_eq!(listed.len(), 7);
        assert_eq!(listed[0].class, DeviceClass::Hmd);
        assert_eq!(listed[0].serial, "SIM-HMD-0000");
        assert_eq!(listed[3].handle, DeviceHandle(3));
    }

    #[test]
    fn test_orbit_stays_on_circle() {
        let device = SimDevice {
            config: tracker(),
            serial: String::new(),
        };
        for t in [0.0, 0.7, 2.5] {
            let [x, y, z] = device.pose_at(t).translation();
            let r = ((x - 1.0).powi(2) + (y - 2.0).powi(2)).sqrt();
            assert_relative_eq!(r, 0.5, epsilon = 1e-5);
            assert_relative_eq!(z, 1.0);
        }
    }

    #[test]
    fn test_static_device_keeps_heading() {
        let mut config = tracker();
        config.radius = 0.0;
        config.angular_speed = 0.0;
        config.phase = std::f32::consts::FRAC_PI_4;
        let device = SimDevice {
            config,
            serial: String::new(),
        };
        let pose = device.pose_at(10.0);
        assert_eq!(pose.translation(), [1.0, 2.0, 1.0]);
        assert_relative_eq!(to_euler(&pose)[0], 45.0, epsilon = 1e-3);
    }

    #[test]
    fn test_full_dropout_always_fails() {
        let mut config = tracker();
        config.dropout_rate = 1.0;
        let mut driver = SimDriver::new(single(config));
        driver.initialize().unwrap();
        for _ in 0..10 {
            assert!(matches!(
                driver.pose(DeviceHandle(0)),
                Err(Error::PoseUnavailable { handle: 0, .. })
            ));
        }
    }

    #[test]
    fn test_unknown_handle() {
        let mut driver = SimDriver::new(single(tracker()));
        driver.initialize().unwrap();
        assert!(driver.pose(DeviceHandle(5)).is_err());
        assert!(driver.pose(DeviceHandle(0)).is_ok());
    }
}
