//! Loopback suppression for the inbound path.
//!
//! A socket joined to a multicast group receives the host's own
//! transmissions. Processing those would make the engine answer its own
//! queries, so every datagram is checked against a filter before it is
//! decoded.

use std::net::IpAddr;

use crate::message::IncomingPacket;

/// Decides whether an inbound datagram should be dropped before decoding.
///
/// Implementations must be non-blocking pure predicates; the listener calls
/// this once per datagram on its hot path.
pub trait PacketFilter {
    /// Returns `true` if the packet should be discarded without decoding.
    fn should_ignore(&self, packet: &IncomingPacket<'_>) -> bool;
}

/// Ignores packets originating from the local host's own addresses.
///
/// # Example
///
/// ```rust
/// use mdns_engine::{IncomingPacket, LocalHostFilter, PacketFilter};
/// use std::net::{IpAddr, Ipv4Addr};
///
/// let local = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 10));
/// let filter = LocalHostFilter::new(vec![local]);
///
/// let own = IncomingPacket { data: &[], addr: local, port: 5353 };
/// assert!(filter.should_ignore(&own));
///
/// let peer = IncomingPacket {
///     data: &[],
///     addr: IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)),
///     port: 5353,
/// };
/// assert!(!filter.should_ignore(&peer));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalHostFilter {
    local_addrs: Vec<IpAddr>,
}

impl LocalHostFilter {
    /// Create a filter for the given local addresses.
    pub fn new(local_addrs: Vec<IpAddr>) -> Self {
        Self { local_addrs }
    }
}

impl PacketFilter for LocalHostFilter {
    fn should_ignore(&self, packet: &IncomingPacket<'_>) -> bool {
        self.local_addrs.contains(&packet.addr)
    }
}
