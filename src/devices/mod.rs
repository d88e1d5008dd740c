//! Tracking driver implementations

pub mod sim;

use crate::config::DriverConfig;
use crate::core::driver::TrackingDriver;
use crate::error::{Error, Result};
use sim::SimDriver;

/// Create a tracking driver based on configuration
pub fn create_driver(config: &DriverConfig) -> Result<Box<dyn TrackingDriver>> {
    match config.driver_type.as_str() {
        "sim" | "mock" => Ok(Box::new(SimDriver::new(config.simulation.clone()))),
        _ => Err(Error::UnknownDriver(config.driver_type.clone())),
    }
}
