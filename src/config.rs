//! Configuration for tracking-osc
//!
//! Loaded from an optional TOML file, then overridden by command-line flags.
//! Every field has a default, so the bridge runs with no file at all.
//!
//! ```toml
//! [network]
//! ip = "127.0.0.1"
//! port = 7000
//!
//! [tracking]
//! track = ["hmd", "tracker", "controller"]
//! frequency_hz = 250
//! mode = "euler"            # or "quaternion"
//!
//! [driver]
//! type = "sim"
//!
//! [console]
//! enabled = true
//! refresh_ms = 100
//!
//! [stats]
//! interval_secs = 10        # 0 = off
//!
//! [logging]
//! level = "info"
//! ```

use crate::cli::Args;
use crate::core::types::{Category, RotationMode};
use crate::devices::sim::config::SimulationConfig;
use crate::error::{Error, Result};
use crate::scheduler::interval_from_hz;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OSC listener destination
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_ip")]
    pub ip: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_ip() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7000
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ip: default_ip(),
            port: default_port(),
        }
    }
}

/// What to poll and how often
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    /// Category names, in the order devices are polled and sent
    #[serde(default = "default_track")]
    pub track: Vec<String>,

    /// Tick rate (Hz)
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: u32,

    #[serde(default)]
    pub mode: RotationMode,
}

fn default_track() -> Vec<String> {
    vec!["hmd".into(), "tracker".into(), "controller".into()]
}
fn default_frequency_hz() -> u32 {
    250
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            track: default_track(),
            frequency_hz: default_frequency_hz(),
            mode: RotationMode::default(),
        }
    }
}

/// Tracking driver selection
#[derive(Debug, Clone, Deserialize)]
pub struct DriverConfig {
    /// Driver type ("sim")
    #[serde(rename = "type", default = "default_driver_type")]
    pub driver_type: String,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_driver_type() -> String {
    "sim".to_string()
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            driver_type: default_driver_type(),
            simulation: SimulationConfig::default(),
        }
    }
}

/// Live console table
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_console_enabled")]
    pub enabled: bool,
    /// Minimum time between redraws (ms)
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
}

fn default_console_enabled() -> bool {
    true
}
fn default_refresh_ms() -> u64 {
    100
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: default_console_enabled(),
            refresh_ms: default_refresh_ms(),
        }
    }
}

/// Periodic statistics in the log
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// Seconds between summaries (0 = off)
    #[serde(default = "default_stats_interval")]
    pub interval_secs: u64,
}

fn default_stats_interval() -> u64 {
    10
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_stats_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Overlay command-line flags on top of file/default values
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ip) = &args.ip {
            self.network.ip = ip.clone();
        }
        if let Some(port) = args.port {
            self.network.port = port;
        }
        if let Some(track) = &args.track {
            self.tracking.track = track.clone();
        }
        if let Some(freq) = args.freq {
            self.tracking.frequency_hz = freq;
        }
        if let Some(mode) = args.mode {
            self.tracking.mode = mode;
        }
        if args.no_console {
            self.console.enabled = false;
        }
    }

    /// Requested categories, parsed and in order
    pub fn categories(&self) -> Result<Vec<Category>> {
        if self.tracking.track.is_empty() {
            return Err(Error::Config("No device categories to track".to_string()));
        }
        self.tracking.track.iter().map(|s| s.parse()).collect()
    }

    /// Tick interval derived from `frequency_hz`
    pub fn interval(&self) -> Result<Duration> {
        interval_from_hz(self.tracking.frequency_hz)
    }

    /// Reject settings that can only fail later
    pub fn validate(&self) -> Result<()> {
        self.categories()?;
        self.interval()?;
        if self.network.port == 0 {
            return Err(Error::Config("Destination port must not be 0".to_string()));
        }
        if self.network.ip.trim().is_empty() {
            return Err(Error::Config("Destination ip must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.network.ip, "127.0.0.1");
        assert_eq!(config.network.port, 7000);
        assert_eq!(
            config.categories().unwrap(),
            vec![Category::Hmd, Category::Tracker, Category::Controller]
        );
        assert_eq!(config.interval().unwrap(), Duration::from_millis(4));
        assert_eq!(config.tracking.mode, RotationMode::Euler);
        assert_eq!(config.driver.driver_type, "sim");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_content = r#"
[network]
port = 9001

[tracking]
mode = "quaternion"
track = ["controller"]

[driver.simulation]
random_seed = 42
"#;
        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.network.ip, "127.0.0.1");
        assert_eq!(config.network.port, 9001);
        assert_eq!(config.tracking.mode, RotationMode::Quaternion);
        assert_eq!(config.tracking.frequency_hz, 250);
        assert_eq!(config.driver.simulation.random_seed, 42);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tracking]\nfrequency_hz = 100\n[console]\nenabled = false").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.interval().unwrap(), Duration::from_millis(10));
        assert!(!config.console.enabled);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tracking\nfrequency_hz = ").unwrap();
        assert!(matches!(
            AppConfig::load(file.path()),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_args_override_file() {
        let mut config: AppConfig = toml::from_str("[network]\nip = \"10.1.1.1\"\nport = 8000").unwrap();
        let args = Args::parse_from(["tracking-osc", "--port", "7100", "--freq", "90", "--no-console"]);
        config.apply_args(&args);
        assert_eq!(config.network.ip, "10.1.1.1");
        assert_eq!(config.network.port, 7100);
        assert_eq!(config.tracking.frequency_hz, 90);
        assert!(!config.console.enabled);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.tracking.track = vec!["hmd".into(), "gloves".into()];
        assert!(matches!(config.validate(), Err(Error::UnknownCategory(_))));

        let mut config = AppConfig::default();
        config.tracking.frequency_hz = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.tracking.track.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shipped_config_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tracking-osc.toml");
        let config = AppConfig::load(path).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.driver.simulation.random_seed, 42);
    }
}
