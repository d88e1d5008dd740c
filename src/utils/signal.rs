//! Signal handling for graceful shutdown.

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Set up a Ctrl-C / SIGTERM handler that clears the returned flag.
///
/// # Example
/// ```ignore
/// let running = setup_shutdown_handler()?;
/// while running.load(Ordering::Relaxed) {
///     // ... tick ...
/// }
/// ```
pub fn setup_shutdown_handler() -> Result<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting shutdown signal handler: {}", e)))?;
    Ok(running)
}
