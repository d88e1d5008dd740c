//! Core abstractions shared by every stage of the loop.
//!
//! - [`driver::TrackingDriver`]: Trait to implement for a tracking runtime
//! - [`types`]: Devices, poses, and tick results
//! - [`math`]: Pose matrix to Euler/quaternion conversion

pub mod driver;
pub mod math;
pub mod types;
