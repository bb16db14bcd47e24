//! Configuration for the mDNS engine core.
//!
//! This module provides the [`EngineConfig`] struct for configuring the
//! inbound path of an engine instance, plus the protocol constants shared by
//! every component.
//!
//! # Examples
//!
//! Default configuration (standard group, standard port, no throttle):
//!
//! ```rust
//! use mdns_engine::EngineConfig;
//!
//! let config = EngineConfig::default();
//! ```
//!
//! Throttled listener on a specific interface:
//!
//! ```rust
//! use mdns_engine::EngineConfig;
//! use std::net::Ipv4Addr;
//! use std::time::Duration;
//!
//! let config = EngineConfig::default()
//!     .with_name("my-engine")
//!     .with_throttle_delay(Duration::from_millis(2))
//!     .with_interface(Ipv4Addr::new(192, 168, 1, 100));
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// The mDNS multicast group address (224.0.0.251).
pub const MDNS_MULTICAST_IPV4: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);

/// The well-known mDNS port (5353).
pub const MDNS_PORT: u16 = 5353;

/// mDNS multicast destination address (224.0.0.251:5353).
///
/// All group-wide mDNS traffic is addressed here.
///
/// # Example
///
/// ```rust
/// use mdns_engine::MDNS_DEST_ADDR;
///
/// assert_eq!(MDNS_DEST_ADDR.to_string(), "224.0.0.251:5353");
/// ```
pub const MDNS_DEST_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(MDNS_MULTICAST_IPV4), MDNS_PORT);

/// Maximum absolute size of an mDNS message on the wire.
///
/// 9000 bytes of link MTU less the IP (20) and UDP (8) headers. Sizes the
/// listener's reusable receive buffer.
pub const MAX_MSG_SIZE: usize = 8972;

/// Configuration for an engine instance's inbound path.
///
/// Use the builder pattern to construct a configuration:
///
/// ```rust
/// use mdns_engine::EngineConfig;
/// use std::time::Duration;
///
/// let config = EngineConfig::new()
///     .with_name("living-room")
///     .with_throttle_delay(Duration::from_millis(1));
/// ```
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Name of the owning engine instance.
    ///
    /// Embedded in the listener thread's name so that stack dumps and logs
    /// can be attributed to a particular engine.
    ///
    /// Default: `"mdns-engine"`
    pub name: String,

    /// The multicast group address queries are re-dispatched to.
    ///
    /// Default: [`MDNS_MULTICAST_IPV4`]
    pub group_address: Ipv4Addr,

    /// The well-known protocol port.
    ///
    /// Queries arriving from any other source port are treated as
    /// unicast-origin queries and dispatched twice (targeted, then group).
    ///
    /// Default: [`MDNS_PORT`]
    pub well_known_port: u16,

    /// Delay inserted between consecutive receives.
    ///
    /// Some misbehaving devices flood the network with mDNS packets; an
    /// unthrottled receive loop then starves other threads of CPU. A non-zero
    /// delay yields the CPU between receives. Zero disables the throttle.
    ///
    /// Default: zero (no throttle)
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_engine::EngineConfig;
    /// use std::time::Duration;
    ///
    /// let config = EngineConfig::default()
    ///     .with_throttle_delay(Duration::from_millis(5));
    /// ```
    pub throttle_delay: Duration,

    /// IPv4 address of the network interface to join the group on.
    ///
    /// When `None`, the group is joined on all interfaces (`INADDR_ANY`).
    ///
    /// Default: `None`
    pub interface: Option<Ipv4Addr>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "mdns-engine".to_string(),
            group_address: MDNS_MULTICAST_IPV4,
            well_known_port: MDNS_PORT,
            throttle_delay: Duration::ZERO,
            interface: None,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    ///
    /// Equivalent to [`EngineConfig::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine instance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the multicast group address.
    pub fn with_group_address(mut self, group_address: Ipv4Addr) -> Self {
        self.group_address = group_address;
        self
    }

    /// Set the well-known protocol port.
    pub fn with_well_known_port(mut self, well_known_port: u16) -> Self {
        self.well_known_port = well_known_port;
        self
    }

    /// Set the inter-receive throttle delay.
    ///
    /// A value of zero disables the throttle.
    pub fn with_throttle_delay(mut self, throttle_delay: Duration) -> Self {
        self.throttle_delay = throttle_delay;
        self
    }

    /// Set a specific network interface for multicast operations.
    pub fn with_interface(mut self, interface: Ipv4Addr) -> Self {
        self.interface = Some(interface);
        self
    }
}
