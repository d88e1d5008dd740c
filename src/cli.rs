//! Command-line arguments
//!
//! Every flag is optional; unset flags fall back to the config file, then to
//! built-in defaults (see [`crate::config::AppConfig`]).

use crate::core::types::RotationMode;
use clap::Parser;
use std::path::PathBuf;

/// Stream tracked-device poses to an OSC listener over UDP
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// IP of the OSC listener [default: 127.0.0.1]
    #[arg(long)]
    pub ip: Option<String>,

    /// Port the OSC listener is receiving on [default: 7000]
    #[arg(long)]
    pub port: Option<u16>,

    /// Device categories to track (hmd, tracker, controller, tracking_reference)
    /// [default: hmd tracker controller]
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    pub track: Option<Vec<String>>,

    /// Tick rate in Hz [default: 250]
    #[arg(long)]
    pub freq: Option<u32>,

    /// Rotation representation [default: euler]
    #[arg(long, value_enum)]
    pub mode: Option<RotationMode>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop after this many ticks (0 = run until interrupted)
    #[arg(long, default_value_t = 0)]
    pub ticks: u64,

    /// Disable the live console table
    #[arg(long)]
    pub no_console: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags() {
        let args = Args::try_parse_from(["tracking-osc"]).unwrap();
        assert!(args.ip.is_none());
        assert!(args.track.is_none());
        assert_eq!(args.ticks, 0);
        assert!(!args.no_console);
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "tracking-osc",
            "--ip",
            "10.0.0.5",
            "--port",
            "9000",
            "--track",
            "tracker",
            "controller",
            "--freq",
            "120",
            "--mode",
            "quaternion",
            "--no-console",
        ])
        .unwrap();
        assert_eq!(args.ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(args.port, Some(9000));
        assert_eq!(
            args.track,
            Some(vec!["tracker".to_string(), "controller".to_string()])
        );
        assert_eq!(args.freq, Some(120));
        assert_eq!(args.mode, Some(RotationMode::Quaternion));
        assert!(args.no_console);
    }

    #[test]
    fn test_track_accepts_commas() {
        let args = Args::try_parse_from(["tracking-osc", "--track", "hmd,tracker"]).unwrap();
        assert_eq!(
            args.track,
            Some(vec!["hmd".to_string(), "tracker".to_string()])
        );
    }

    #[test]
    fn test_bad_mode_rejected() {
        assert!(Args::try_parse_from(["tracking-osc", "--mode", "matrix"]).is_err());
    }
}
