//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracking_osc::core::driver::TrackingDriver;
use tracking_osc::core::math::pose_from_euler;
use tracking_osc::core::types::{DeviceClass, DeviceHandle, DiscoveredDevice, PoseMatrix};
use tracking_osc::streaming::Dispatcher;
use tracking_osc::{Error, Result};

/// Per-device behaviour of the scripted driver
#[derive(Clone)]
pub enum Script {
    Fixed(PoseMatrix),
    AlwaysFails,
}

/// Driver whose devices return fixed poses or always fail
pub struct ScriptedDriver {
    devices: Vec<(DeviceClass, Script)>,
    /// Artificial cost of every pose query
    pub query_cost: Duration,
}

impl ScriptedDriver {
    pub fn new(devices: Vec<(DeviceClass, Script)>) -> Self {
        Self {
            devices,
            query_cost: Duration::ZERO,
        }
    }
}

impl TrackingDriver for ScriptedDriver {
    fn name(&self) -> &str {
        "scripted"
    }

    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn list_devices(&self) -> Result<Vec<DiscoveredDevice>> {
        Ok(self
            .devices
            .iter()
            .enumerate()
            .map(|(i, (class, _))| DiscoveredDevice {
                handle: DeviceHandle(i as u32),
                class: *class,
                serial: format!("SCRIPT-{}", i),
            })
            .collect())
    }

    fn pose(&mut self, handle: DeviceHandle) -> Result<PoseMatrix> {
        if !self.query_cost.is_zero() {
            std::thread::sleep(self.query_cost);
        }
        match self.devices.get(handle.0 as usize) {
            Some((_, Script::Fixed(pose))) => Ok(*pose),
            Some((_, Script::AlwaysFails)) | None => Err(Error::PoseUnavailable {
                handle: handle.0,
                reason: "scripted failure".to_string(),
            }),
        }
    }
}

/// Dispatcher that keeps every payload it is given
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    pub sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl RecordingDispatcher {
    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn send(&mut self, payload: &[u8]) -> Result<usize> {
        self.sent.lock().unwrap().push(payload.to_vec());
        Ok(payload.len())
    }
}

pub fn fixed(position: [f32; 3], yaw: f32, pitch: f32, roll: f32) -> Script {
    Script::Fixed(pose_from_euler(position, yaw, pitch, roll))
}

/// Dispatcher whose every send fails, counting the attempts
#[derive(Clone, Default)]
pub struct FailingDispatcher {
    pub attempts: Arc<Mutex<usize>>,
}

impl Dispatcher for FailingDispatcher {
    fn send(&mut self, _payload: &[u8]) -> Result<usize> {
        *self.attempts.lock().unwrap() += 1;
        Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "listener unreachable",
        )))
    }
}
