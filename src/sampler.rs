//! Per-device pose sampling.
//!
//! One driver query per device per tick, converted into the run's
//! [`RotationMode`]. Failures are per device and never abort a tick.

use crate::core::driver::TrackingDriver;
use crate::core::math::{to_euler, to_quaternion};
use crate::core::types::{Device, PoseMatrix, PoseSample, RotationMode};
use std::time::{Duration, Instant};

/// Driver queries slower than this are logged
const SLOW_QUERY: Duration = Duration::from_millis(2);

/// Why a device produced no sample this tick
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// Driver returned an error (disconnected, not tracking, timeout)
    #[error("driver error: {0}")]
    Driver(#[from] crate::error::Error),

    /// Driver returned a matrix with NaN or infinite entries
    #[error("non-finite pose")]
    NonFinite,
}

/// Convert a driver pose into a sample in the requested representation
pub fn convert(pose: &PoseMatrix, mode: RotationMode) -> PoseSample {
    let position = pose.translation();
    match mode {
        RotationMode::Euler => {
            let [yaw, pitch, roll] = to_euler(pose);
            PoseSample::euler(position, yaw, pitch, roll)
        }
        RotationMode::Quaternion => {
            let [w, x, y, z] = to_quaternion(pose);
            PoseSample::quaternion(position, w, x, y, z)
        }
    }
}

/// Query one device and convert its pose
pub fn sample<D: TrackingDriver + ?Sized>(
    driver: &mut D,
    device: &Device,
    mode: RotationMode,
) -> Result<PoseSample, SampleError> {
    let start = Instant::now();
    let pose = driver.pose(device.handle);
    let elapsed = start.elapsed();
    if elapsed > SLOW_QUERY {
        log::debug!("Slow pose query for {}: {:?}", device.address, elapsed);
    }

    let pose = pose?;
    if !pose.is_finite() {
        return Err(SampleError::NonFinite);
    }
    Ok(convert(&pose, mode))
}
