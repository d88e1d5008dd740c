//! tracking-osc - Tracked-device pose bridge daemon
//!
//! ## Usage
//!
//! ```bash
//! tracking-osc --ip 192.168.1.20 --port 7000 --track hmd controller --mode quaternion
//! tracking-osc --config bridge.toml --freq 120
//! RUST_LOG=debug tracking-osc --no-console
//! ```
//!
//! Runs until Ctrl-C (exit 0). Startup failures (no driver, no devices,
//! bad configuration) exit non-zero.

use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;

use tracking_osc::cli::Args;
use tracking_osc::config::AppConfig;
use tracking_osc::devices::create_driver;
use tracking_osc::observers::{ConsoleTable, StatsLogger};
use tracking_osc::registry;
use tracking_osc::streaming::UdpDispatcher;
use tracking_osc::utils::setup_shutdown_handler;
use tracking_osc::{Result, Scheduler};

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.apply_args(args);
    Ok(config)
}

fn run(config: AppConfig, ticks: u64) -> Result<()> {
    log::info!("tracking-osc v{} starting...", env!("CARGO_PKG_VERSION"));

    config.validate()?;
    let categories = config.categories()?;
    let interval = config.interval()?;
    let mode = config.tracking.mode;

    // Driver: fatal if the runtime is unavailable or shows no devices
    let mut driver = create_driver(&config.driver)?;
    driver.initialize()?;
    log::info!("Tracking driver: {}", driver.name());

    let tracking = registry::enumerate(&driver, &categories)?;

    let dispatcher = UdpDispatcher::connect(&config.network.ip, config.network.port)?;
    log::info!(
        "Sending OSC tracking data on {}:{} ({} Hz, {})",
        config.network.ip,
        config.network.port,
        config.tracking.frequency_hz,
        mode
    );

    let running = setup_shutdown_handler()?;

    let rows = tracking.iter().map(|d| d.address.clone()).collect();
    let mut scheduler = Scheduler::new(driver, dispatcher, tracking, mode, interval);

    if config.console.enabled {
        let stdout = std::io::stdout();
        let in_place = stdout.is_terminal();
        let table = ConsoleTable::new(
            stdout,
            rows,
            mode,
            Duration::from_millis(config.console.refresh_ms),
        );
        let table = if in_place { table } else { table.append_only() };
        scheduler.add_observer(Box::new(table));
    }
    if config.stats.interval_secs > 0 {
        scheduler.add_observer(Box::new(StatsLogger::new(Duration::from_secs(
            config.stats.interval_secs,
        ))));
    }

    log::info!("tracking-osc running. Press Ctrl-C to stop.");
    scheduler.run_ticks(ticks, &running);

    // Releases the socket and the driver
    drop(scheduler);
    log::info!("tracking-osc stopped");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    match run(config, args.ticks) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
