//! OSC encoding and UDP delivery

pub mod encoder;
pub mod osc;
pub mod udp_publisher;

pub use osc::{OscBundle, OscMessage, OscPacket};
pub use udp_publisher::{Dispatcher, UdpDispatcher};
