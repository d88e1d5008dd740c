//! UDP dispatcher for per-tick OSC bundles
//!
//! One socket, one destination, one datagram per tick. Delivery is
//! fire-and-forget: no acknowledgment, no retry. A failed send is returned to
//! the caller and the next tick tries again independently.
//!
//! # Failure logging
//!
//! Send failures are logged on transitions so an unreachable listener does
//! not flood the log at the tick rate:
//!
//! | Transition | Level |
//! |------------|-------|
//! | ok → failing | warn |
//! | failing → failing | debug |
//! | failing → ok | info (with count of failed sends) |

use crate::error::{Error, Result};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Largest UDP payload over IPv4 (65535 - 8 byte UDP header - 20 byte IP header)
pub const MAX_UDP_PAYLOAD: usize = 65_507;

/// Sink for encoded bundles
pub trait Dispatcher {
    /// Transmit one encoded bundle. Returns bytes sent.
    fn send(&mut self, payload: &[u8]) -> Result<usize>;
}

/// Dispatcher that owns a UDP socket for the lifetime of the run
pub struct UdpDispatcher {
    socket: UdpSocket,
    target: SocketAddr,
    /// Consecutive failed sends (0 while healthy)
    failing: u64,
    sent: u64,
    failed: u64,
}

impl UdpDispatcher {
    /// Bind an ephemeral local socket and resolve the destination
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let target = (host, port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| Error::Config(format!("Could not resolve {}:{}", host, port)))?;

        // Bind to any available port (we only send, not receive)
        let bind_addr = if target.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(bind_addr)
            .map_err(|e| Error::Other(format!("Failed to create UDP socket: {}", e)))?;

        log::debug!(
            "UDP dispatcher bound to {} -> {}",
            socket.local_addr()?,
            target
        );

        Ok(Self {
            socket,
            target,
            failing: 0,
            sent: 0,
            failed: 0,
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// (datagrams sent, sends failed) since creation
    pub fn counters(&self) -> (u64, u64) {
        (self.sent, self.failed)
    }

    fn record_failure(&mut self, e: &Error) {
        self.failed += 1;
        self.failing += 1;
        if self.failing == 1 {
            log::warn!("Failed to send OSC bundle to {}: {}", self.target, e);
        } else {
            log::debug!("Send to {} still failing: {}", self.target, e);
        }
    }

    fn record_success(&mut self) {
        self.sent += 1;
        if self.failing > 0 {
            log::info!(
                "Sending to {} recovered after {} failed sends",
                self.target,
                self.failing
            );
            self.failing = 0;
        }
    }
}

impl Dispatcher for UdpDispatcher {
    fn send(&mut self, payload: &[u8]) -> Result<usize> {
        let result = if payload.len() > MAX_UDP_PAYLOAD {
            Err(Error::PayloadTooLarge {
                size: payload.len(),
                max: MAX_UDP_PAYLOAD,
            })
        } else {
            self.socket
                .send_to(payload, self.target)
                .map_err(Error::from)
        };

        match result {
            Ok(n) => {
                self.record_success();
                Ok(n)
            }
            Err(e) => {
                self.record_failure(&e);
                Err(e)
            }
        }
    }
}

impl Drop for UdpDispatcher {
    fn drop(&mut self) {
        log::info!(
            "UDP dispatcher closed ({} datagrams sent, {} failed)",
            self.sent,
            self.failed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_send_reaches_listener() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut dispatcher = UdpDispatcher::connect("127.0.0.1", port).unwrap();
        assert_eq!(dispatcher.send(b"#bundle\0").unwrap(), 8);

        let mut buf = [0u8; 64];
        let (n, _) = listener.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"#bundle\0");
        assert_eq!(dispatcher.counters(), (1, 0));
    }

    #[test]
    fn test_oversize_payload_is_transport_failure() {
        let mut dispatcher = UdpDispatcher::connect("127.0.0.1", 9).unwrap();
        let payload = vec![0u8; MAX_UDP_PAYLOAD + 1];
        assert!(matches!(
            dispatcher.send(&payload),
            Err(Error::PayloadTooLarge { .. })
        ));
        assert_eq!(dispatcher.counters(), (0, 1));
    }
}
