//! Error types for tracking-osc

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Startup and transport errors.
///
/// Per-device pose failures during a tick use [`crate::sampler::SampleError`]
/// instead, so they never travel through the startup path.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error (socket, config file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration value rejected by validation
    #[error("Config error: {0}")]
    Config(String),

    /// Requested category name is not one of the known device categories
    #[error("Unknown device category '{0}' (expected hmd, controller, tracker or tracking_reference)")]
    UnknownCategory(String),

    /// Driver type in configuration is not supported
    #[error("Unknown driver type: {0}")]
    UnknownDriver(String),

    /// Tracking runtime could not be reached
    #[error("Tracking driver unavailable: {0}")]
    DriverUnavailable(String),

    /// Driver reported no devices at all
    #[error("No tracked devices discovered")]
    NoDevices,

    /// Pose query failed inside the driver
    #[error("Pose unavailable for device {handle}: {reason}")]
    PoseUnavailable {
        /// Driver handle of the device
        handle: u32,
        /// Driver-supplied reason
        reason: String,
    },

    /// Encoded bundle does not fit in one datagram
    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Encoded size
        size: usize,
        /// Datagram limit
        max: usize,
    },

    /// Malformed OSC packet
    #[error("OSC decode error: {0}")]
    Osc(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
