//! tracking-osc - Tracked-device pose bridge to OSC
//!
//! Polls a tracking runtime at a fixed rate and sends every tracked device's
//! pose to an OSC listener, one UDP bundle per tick.
//!
//! ## Pipeline
//!
//! ```text
//! registry::enumerate ──▶ TrackingSet (built once)
//!                              │
//!   Scheduler tick ──▶ sampler::sample (per device) ──▶ encoder::encode
//!          ▲                                                │
//!          └── sleep remainder ◀── observers ◀── Dispatcher::send
//! ```
//!
//! ## Wire format
//!
//! One OSC bundle per datagram, time tag "immediately", one message per
//! device addressed `/<category>/<id>` with float32 arguments
//! `x y z yaw pitch roll` (euler) or `x y z w qx qy qz` (quaternion).

pub mod cli;
pub mod config;
pub mod core;
pub mod devices;
pub mod error;
pub mod observers;
pub mod registry;
pub mod sampler;
pub mod scheduler;
pub mod streaming;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{Error, Result};
pub use scheduler::Scheduler;
