//! Batch encoder: one tick's samples into one OSC bundle.
//!
//! Encoding is pure. The same ordered input always yields the same bundle and
//! therefore the same bytes.

use crate::core::types::TrackedSample;
use crate::streaming::osc::{OscBundle, OscMessage};

/// Typical single-device message size, used to pre-size send buffers
pub const TYPICAL_MESSAGE_LEN: usize = 64;

/// Build one message per sample, in input order, wrapped in an immediate bundle
pub fn encode(samples: &[TrackedSample]) -> OscBundle {
    OscBundle::immediate(
        samples
            .iter()
            .map(|s| OscMessage::new(s.address.clone(), s.sample.values()))
            .collect(),
    )
}

/// Encode straight into a reusable byte buffer (cleared first)
pub fn encode_to_buffer(samples: &[TrackedSample], buf: &mut Vec<u8>) {
    buf.clear();
    encode(samples).encode_into(buf);
}
