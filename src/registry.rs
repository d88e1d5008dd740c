//! Device registry: one-shot enumeration into an immutable [`TrackingSet`].
//!
//! Ids are assigned per category in discovery order, starting at 1, so the
//! first controller is always `/controller/1` regardless of its driver handle.

use crate::core::driver::TrackingDriver;
use crate::core::types::{Category, Device, DiscoveredDevice, TrackingSet};
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Classify every discovered device and assign its per-category id.
///
/// Devices whose class has no category are dropped.
pub fn classify(discovered: &[DiscoveredDevice]) -> Vec<Device> {
    let mut counters: HashMap<Category, u32> = HashMap::new();
    let mut devices = Vec::with_capacity(discovered.len());

    for entry in discovered {
        let Some(category) = Category::from_class(entry.class) else {
            log::debug!(
                "Ignoring device {} ({:?}, serial {})",
                entry.handle,
                entry.class,
                entry.serial
            );
            continue;
        };
        let counter = counters.entry(category).or_insert(0);
        *counter += 1;
        devices.push(Device::new(
            category,
            *counter,
            entry.handle,
            entry.serial.clone(),
        ));
    }

    devices
}

/// Build the tracking set from already-classified devices.
///
/// Categories are visited in `requested` order (repeats ignored), devices in
/// discovery order within each category.
pub fn select(devices: &[Device], requested: &[Category]) -> TrackingSet {
    let mut selected = Vec::new();
    let mut seen = Vec::with_capacity(requested.len());

    for &category in requested {
        if seen.contains(&category) {
            continue;
        }
        seen.push(category);

        let before = selected.len();
        selected.extend(devices.iter().filter(|d| d.category == category).cloned());
        if selected.len() == before {
            log::warn!("No {} devices found, nothing will be sent for it", category);
        }
    }

    TrackingSet::new(selected)
}

/// Query the driver once and build the tracking set for `requested`.
///
/// Fails with [`Error::NoDevices`] only if the driver sees no devices at all.
pub fn enumerate<D: TrackingDriver + ?Sized>(
    driver: &D,
    requested: &[Category],
) -> Result<TrackingSet> {
    let discovered = driver.list_devices()?;
    if discovered.is_empty() {
        return Err(Error::NoDevices);
    }

    for entry in &discovered {
        log::info!(
            "Discovered {:?} {} (serial {})",
            entry.class,
            entry.handle,
            entry.serial
        );
    }

    let devices = classify(&discovered);
    let set = select(&devices, requested);
    log::info!(
        "Tracking {} of {} devices: [{}]",
        set.len(),
        discovered.len(),
        set.addresses().join(", ")
    );
    Ok(set)
}
