//! Process-level utilities

pub mod signal;

pub use signal::setup_shutdown_handler;
